use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{
    form_fields::{
        check_date_range, deserialize_optional_date, deserialize_optional_text, deserialize_tags,
        deserialize_trimmed, effective_end_date, validate_tags, TagList,
    },
    schema::{Cardinality, Column, ColumnValue, OrderBy, OwnedEntity, SchemaVersion},
};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Education {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Legacy mirror of `title`.
    pub degree: Option<String>,
    pub institution: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    #[sqlx(try_from = "Vec<String>")]
    pub tags: TagList,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_education_dates"))]
pub struct EducationInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 150, message = "Title is required (max 150 characters)"))]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 150, message = "Institution is required (max 150 characters)"))]
    pub institution: String,

    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[validate(required(message = "Start date is required"))]
    pub start_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub current: bool,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 150, message = "Location is too long"))]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

fn validate_education_dates(input: &EducationInput) -> Result<(), ValidationError> {
    check_date_range(input.start_date, input.end_date, input.current)
}

impl OwnedEntity for Education {
    type Row = Education;
    type Input = EducationInput;

    const TABLE: &'static str = "education";
    const SINGULAR: &'static str = "education entry";
    const PLURAL: &'static str = "education";
    const CARDINALITY: Cardinality = Cardinality::Many;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("current"), OrderBy::desc("start_date")];

    fn columns(input: &EducationInput, schema: SchemaVersion) -> Vec<Column> {
        let mut columns = vec![
            ("title", ColumnValue::text(input.title.clone())),
            ("institution", ColumnValue::text(input.institution.clone())),
            ("start_date", ColumnValue::Date(input.start_date)),
            ("end_date", ColumnValue::Date(effective_end_date(input.end_date, input.current))),
            ("current", ColumnValue::Bool(input.current)),
            ("description", ColumnValue::Text(input.description.clone())),
            ("location", ColumnValue::Text(input.location.clone())),
            ("tags", ColumnValue::TextList(input.tags.clone())),
        ];
        if schema.writes_legacy_columns() {
            columns.push(("degree", ColumnValue::text(input.title.clone())));
        }
        columns
    }

    fn id(row: &Education) -> Uuid {
        row.id
    }

    fn owner(row: &Education) -> Uuid {
        row.user_id
    }
}
