use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{
    form_fields::{deserialize_optional_text, deserialize_trimmed, new_validation_error},
    schema::{Cardinality, Column, ColumnValue, ImageSlot, OrderBy, OwnedEntity, SchemaVersion},
    storage::Bucket,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    DevOps,
    Mobile,
    Tools,
    Design,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 8] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Database,
        SkillCategory::DevOps,
        SkillCategory::Mobile,
        SkillCategory::Tools,
        SkillCategory::Design,
        SkillCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Database => "Database",
            SkillCategory::DevOps => "DevOps",
            SkillCategory::Mobile => "Mobile",
            SkillCategory::Tools => "Tools",
            SkillCategory::Design => "Design",
            SkillCategory::Other => "Other",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown skill category: {s}"))
    }
}

fn validate_skill_category(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<SkillCategory>()
        .map(|_| ())
        .map_err(|_| new_validation_error("skill_category", "Choose a valid category"))
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub proficiency: i32,
    pub description: Option<String>,
    pub years_experience: Option<i32>,
    pub projects_count: Option<i32>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SkillInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 80, message = "Name is required (max 80 characters)"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_skill_category"))]
    pub category: String,

    #[validate(
        required(message = "Proficiency is required"),
        range(min = 0, max = 100, message = "Proficiency must be between 0 and 100")
    )]
    pub proficiency: Option<i32>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 1000, message = "Description is too long"))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Years of experience cannot be negative"))]
    pub years_experience: Option<i32>,

    #[validate(range(min = 0, message = "Project count cannot be negative"))]
    pub projects_count: Option<i32>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
}

impl OwnedEntity for Skill {
    type Row = Skill;
    type Input = SkillInput;

    const TABLE: &'static str = "skills";
    const SINGULAR: &'static str = "skill";
    const PLURAL: &'static str = "skills";
    const CARDINALITY: Cardinality = Cardinality::Many;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::asc("category"), OrderBy::desc("proficiency")];
    const IMAGE: Option<ImageSlot> = Some(ImageSlot { bucket: Bucket::Skills, column: "image_url" });

    fn columns(input: &SkillInput, _schema: SchemaVersion) -> Vec<Column> {
        let category = input
            .category
            .parse::<SkillCategory>()
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|_| input.category.clone());

        let mut columns = vec![
            ("name", ColumnValue::text(input.name.clone())),
            ("category", ColumnValue::text(category)),
            ("proficiency", ColumnValue::Int(Some(input.proficiency.unwrap_or_default()))),
            ("description", ColumnValue::Text(input.description.clone())),
            ("years_experience", ColumnValue::Int(input.years_experience)),
            ("projects_count", ColumnValue::Int(input.projects_count)),
        ];
        if let Some(url) = &input.image_url {
            columns.push(("image_url", ColumnValue::text(url.clone())));
        }
        columns
    }

    fn id(row: &Skill) -> Uuid {
        row.id
    }

    fn owner(row: &Skill) -> Uuid {
        row.user_id
    }

    fn image_url(row: &Skill) -> Option<&str> {
        row.image_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::schema::column;

    fn react() -> SkillInput {
        SkillInput {
            name: "React".into(),
            category: "frontend".into(),
            proficiency: Some(80),
            ..Default::default()
        }
    }

    #[test]
    fn category_is_normalised_on_write() {
        let cols = Skill::columns(&react(), SchemaVersion::V2);
        assert_eq!(column(&cols, "category"), Some(&ColumnValue::text("Frontend")));
        assert_eq!(column(&cols, "proficiency"), Some(&ColumnValue::Int(Some(80))));
        assert!(column(&cols, "image_url").is_none());
    }

    #[test]
    fn unknown_category_and_range_are_rejected() {
        let mut input = react();
        input.category = "Cooking".into();
        input.proficiency = Some(101);
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("category"));
        assert!(fields.contains_key("proficiency"));
    }

    #[test]
    fn missing_name_and_proficiency_are_field_errors() {
        let input: SkillInput = serde_json::from_str(r#"{"category": "Backend"}"#).unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("proficiency"));
    }
}
