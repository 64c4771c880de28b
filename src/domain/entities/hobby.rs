use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{
    form_fields::{deserialize_optional_text, deserialize_trimmed, new_validation_error},
    schema::{Cardinality, Column, ColumnValue, OrderBy, OwnedEntity, SchemaVersion},
};

/// Icon names the client knows how to draw.
pub const HOBBY_ICONS: [&str; 12] = [
    "book", "music", "camera", "gamepad", "plane", "code", "coffee", "dumbbell", "palette", "heart",
    "film", "globe",
];

fn validate_hobby_icon(value: &str) -> Result<(), ValidationError> {
    if HOBBY_ICONS.contains(&value) {
        Ok(())
    } else {
        Err(new_validation_error("hobby_icon", "Choose one of the available icons"))
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Hobby {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct HobbyInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 80, message = "Name is required (max 80 characters)"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 500, message = "Description is too long"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_hobby_icon"))]
    pub icon: String,
}

impl OwnedEntity for Hobby {
    type Row = Hobby;
    type Input = HobbyInput;

    const TABLE: &'static str = "hobbies";
    const SINGULAR: &'static str = "hobby";
    const PLURAL: &'static str = "hobbies";
    const CARDINALITY: Cardinality = Cardinality::Many;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::asc("created_at")];

    fn columns(input: &HobbyInput, _schema: SchemaVersion) -> Vec<Column> {
        vec![
            ("name", ColumnValue::text(input.name.clone())),
            ("description", ColumnValue::Text(input.description.clone())),
            ("icon", ColumnValue::text(input.icon.clone())),
        ]
    }

    fn id(row: &Hobby) -> Uuid {
        row.id
    }

    fn owner(row: &Hobby) -> Uuid {
        row.user_id
    }
}
