use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    form_fields::{deserialize_optional_text, deserialize_tags, deserialize_trimmed, validate_tags, TagList},
    schema::{Cardinality, Column, ColumnValue, ImageSlot, OrderBy, OwnedEntity, SchemaVersion},
    storage::Bucket,
};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    #[serde(flatten)]
    #[sqlx(try_from = "Vec<String>")]
    pub tags: TagList,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProjectInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 150, message = "Title is required (max 150 characters)"))]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 5000, message = "Description is required"))]
    pub description: String,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "Demo link must be a valid URL"))]
    pub demo_url: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "Repository link must be a valid URL"))]
    pub github_url: Option<String>,

    #[serde(default)]
    pub featured: bool,
}

impl OwnedEntity for Project {
    type Row = Project;
    type Input = ProjectInput;

    const TABLE: &'static str = "projects";
    const SINGULAR: &'static str = "project";
    const PLURAL: &'static str = "projects";
    const CARDINALITY: Cardinality = Cardinality::Many;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("featured"), OrderBy::desc("created_at")];
    const IMAGE: Option<ImageSlot> = Some(ImageSlot { bucket: Bucket::Projects, column: "image_url" });

    fn columns(input: &ProjectInput, _schema: SchemaVersion) -> Vec<Column> {
        let mut columns = vec![
            ("title", ColumnValue::text(input.title.clone())),
            ("description", ColumnValue::text(input.description.clone())),
            ("tags", ColumnValue::TextList(input.tags.clone())),
            ("demo_url", ColumnValue::Text(input.demo_url.clone())),
            ("github_url", ColumnValue::Text(input.github_url.clone())),
            ("featured", ColumnValue::Bool(input.featured)),
        ];
        if let Some(url) = &input.image_url {
            columns.push(("image_url", ColumnValue::text(url.clone())));
        }
        columns
    }

    fn id(row: &Project) -> Uuid {
        row.id
    }

    fn owner(row: &Project) -> Uuid {
        row.user_id
    }

    fn image_url(row: &Project) -> Option<&str> {
        row.image_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::schema::column;

    #[test]
    fn comma_separated_tags_are_stored_as_a_list() {
        let input: ProjectInput = serde_json::from_str(
            r#"{"title": "Folio", "description": "Site", "tags": "A, B, C", "demo_url": ""}"#,
        )
        .unwrap();
        assert!(input.validate().is_ok());

        let cols = Project::columns(&input, SchemaVersion::V1);
        assert_eq!(
            column(&cols, "tags"),
            Some(&ColumnValue::TextList(vec!["A".into(), "B".into(), "C".into()]))
        );
        assert_eq!(column(&cols, "demo_url"), Some(&ColumnValue::Text(None)));
    }

    #[test]
    fn bad_links_are_rejected() {
        let input = ProjectInput {
            title: "Folio".into(),
            description: "Site".into(),
            github_url: Some("not a url".into()),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("github_url"));
    }
}
