use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    form_fields::deserialize_trimmed,
    schema::{Cardinality, Column, ColumnValue, OrderBy, OwnedEntity, SchemaVersion},
};

/// Free-form markdown telling the owner's story on the about page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Journey {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JourneyInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 20000, message = "Journey content is required (max 20000 characters)"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JourneyView {
    pub content: String,
    pub content_html: String,
    pub updated_at: DateTime<Utc>,
}

impl OwnedEntity for Journey {
    type Row = Journey;
    type Input = JourneyInput;

    const TABLE: &'static str = "journey";
    const SINGULAR: &'static str = "journey";
    const PLURAL: &'static str = "journey";
    const CARDINALITY: Cardinality = Cardinality::OnePerOwner;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("updated_at")];

    fn columns(input: &JourneyInput, _schema: SchemaVersion) -> Vec<Column> {
        vec![("content", ColumnValue::text(input.content.clone()))]
    }

    fn id(row: &Journey) -> Uuid {
        row.id
    }

    fn owner(row: &Journey) -> Uuid {
        row.user_id
    }
}
