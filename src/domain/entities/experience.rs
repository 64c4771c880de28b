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
pub struct WorkExperience {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Legacy mirror of `title`.
    pub position: Option<String>,
    pub company: String,
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
#[validate(schema(function = "validate_experience_dates"))]
pub struct WorkExperienceInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 150, message = "Title is required (max 150 characters)"))]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 150, message = "Company is required (max 150 characters)"))]
    pub company: String,

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

fn validate_experience_dates(input: &WorkExperienceInput) -> Result<(), ValidationError> {
    check_date_range(input.start_date, input.end_date, input.current)
}

impl OwnedEntity for WorkExperience {
    type Row = WorkExperience;
    type Input = WorkExperienceInput;

    const TABLE: &'static str = "work_experience";
    const SINGULAR: &'static str = "work experience";
    const PLURAL: &'static str = "work experience";
    const CARDINALITY: Cardinality = Cardinality::Many;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("current"), OrderBy::desc("start_date")];

    fn columns(input: &WorkExperienceInput, schema: SchemaVersion) -> Vec<Column> {
        let mut columns = vec![
            ("title", ColumnValue::text(input.title.clone())),
            ("company", ColumnValue::text(input.company.clone())),
            ("start_date", ColumnValue::Date(input.start_date)),
            ("end_date", ColumnValue::Date(effective_end_date(input.end_date, input.current))),
            ("current", ColumnValue::Bool(input.current)),
            ("description", ColumnValue::Text(input.description.clone())),
            ("location", ColumnValue::Text(input.location.clone())),
            ("tags", ColumnValue::TextList(input.tags.clone())),
        ];
        if schema.writes_legacy_columns() {
            columns.push(("position", ColumnValue::text(input.title.clone())));
        }
        columns
    }

    fn id(row: &WorkExperience) -> Uuid {
        row.id
    }

    fn owner(row: &WorkExperience) -> Uuid {
        row.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::schema::column;
    use crate::errors::AppError;

    fn engineer() -> WorkExperienceInput {
        serde_json::from_str(
            r#"{
                "title": "Engineer",
                "company": "Acme",
                "start_date": "2022-01-01",
                "end_date": "2023-06-30",
                "current": true,
                "tags": "Rust, Postgres"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn current_role_drops_end_date() {
        let cols = WorkExperience::columns(&engineer(), SchemaVersion::V2);
        assert_eq!(column(&cols, "end_date"), Some(&ColumnValue::Date(None)));
        assert_eq!(column(&cols, "current"), Some(&ColumnValue::Bool(true)));
    }

    #[test]
    fn legacy_position_follows_schema_version() {
        let v1 = WorkExperience::columns(&engineer(), SchemaVersion::V1);
        let v2 = WorkExperience::columns(&engineer(), SchemaVersion::V2);
        assert_eq!(column(&v1, "position"), Some(&ColumnValue::text("Engineer")));
        assert!(column(&v2, "position").is_none());
    }

    #[test]
    fn end_before_start_is_reported_on_end_date() {
        let mut input = engineer();
        input.current = false;
        input.end_date = NaiveDate::from_ymd_opt(2021, 1, 1);

        let err: AppError = input.validate().unwrap_err().into();
        match err {
            AppError::ValidationError(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "end_date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_start_date_is_required() {
        let input = WorkExperienceInput {
            title: "Engineer".into(),
            company: "Acme".into(),
            ..Default::default()
        };
        assert!(input.validate().unwrap_err().field_errors().contains_key("start_date"));
    }
}
