use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{
    form_fields::{deserialize_trimmed, new_validation_error},
    schema::{Cardinality, Column, ColumnValue, OrderBy, OwnedEntity, SchemaVersion},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageLevel {
    Native,
    Fluent,
    Advanced,
    Intermediate,
    Basic,
}

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 5] = [
        LanguageLevel::Native,
        LanguageLevel::Fluent,
        LanguageLevel::Advanced,
        LanguageLevel::Intermediate,
        LanguageLevel::Basic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageLevel::Native => "Native",
            LanguageLevel::Fluent => "Fluent",
            LanguageLevel::Advanced => "Advanced",
            LanguageLevel::Intermediate => "Intermediate",
            LanguageLevel::Basic => "Basic",
        }
    }
}

impl FromStr for LanguageLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown language level: {s}"))
    }
}

fn validate_language_level(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<LanguageLevel>()
        .map(|_| ())
        .map_err(|_| new_validation_error("language_level", "Choose a valid proficiency level"))
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Language {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub proficiency: String,
    pub is_native: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LanguageInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 60, message = "Language name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_language_level"))]
    pub proficiency: String,

    #[serde(default)]
    pub is_native: bool,
}

impl OwnedEntity for Language {
    type Row = Language;
    type Input = LanguageInput;

    const TABLE: &'static str = "languages";
    const SINGULAR: &'static str = "language";
    const PLURAL: &'static str = "languages";
    const CARDINALITY: Cardinality = Cardinality::Many;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("is_native"), OrderBy::asc("name")];

    fn columns(input: &LanguageInput, _schema: SchemaVersion) -> Vec<Column> {
        let level = input
            .proficiency
            .parse::<LanguageLevel>()
            .map(|l| l.as_str().to_string())
            .unwrap_or_else(|_| input.proficiency.clone());

        vec![
            ("name", ColumnValue::text(input.name.clone())),
            ("proficiency", ColumnValue::text(level)),
            ("is_native", ColumnValue::Bool(input.is_native)),
        ]
    }

    fn id(row: &Language) -> Uuid {
        row.id
    }

    fn owner(row: &Language) -> Uuid {
        row.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_a_closed_set() {
        assert_eq!("fluent".parse::<LanguageLevel>(), Ok(LanguageLevel::Fluent));
        assert!("Bilingual".parse::<LanguageLevel>().is_err());

        let input = LanguageInput { name: "French".into(), proficiency: "Expert".into(), is_native: false };
        assert!(input.validate().unwrap_err().field_errors().contains_key("proficiency"));
    }
}
