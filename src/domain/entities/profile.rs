use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    form_fields::{deserialize_optional_text, deserialize_tags, deserialize_trimmed, validate_tags},
    schema::{Cardinality, Column, ColumnValue, ImageSlot, OrderBy, OwnedEntity, SchemaVersion},
    storage::Bucket,
};

// ───── Profile ─────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileInput {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 160, message = "Headline is too long"))]
    pub headline: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 2000, message = "Bio is too long"))]
    pub bio: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

impl OwnedEntity for Profile {
    type Row = Profile;
    type Input = ProfileInput;

    const TABLE: &'static str = "profiles";
    const SINGULAR: &'static str = "profile";
    const PLURAL: &'static str = "profile";
    const CARDINALITY: Cardinality = Cardinality::OnePerOwner;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("updated_at")];
    const IMAGE: Option<ImageSlot> = Some(ImageSlot { bucket: Bucket::Avatars, column: "avatar_url" });

    fn columns(input: &ProfileInput, _schema: SchemaVersion) -> Vec<Column> {
        let mut columns = vec![
            ("full_name", ColumnValue::text(input.full_name.clone())),
            ("headline", ColumnValue::Text(input.headline.clone())),
            ("bio", ColumnValue::Text(input.bio.clone())),
            ("description", ColumnValue::Text(input.description.clone())),
        ];
        // the avatar is replaced through its own upload route
        if let Some(url) = &input.avatar_url {
            columns.push(("avatar_url", ColumnValue::text(url.clone())));
        }
        columns
    }

    fn id(row: &Profile) -> Uuid {
        row.id
    }

    fn owner(row: &Profile) -> Uuid {
        row.user_id
    }

    fn image_url(row: &Profile) -> Option<&str> {
        row.avatar_url.as_deref()
    }
}

// ───── Personal info ─────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PersonalInfo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub location: Option<String>,
    pub availability: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PersonalInfoInput {
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 40, message = "Phone number is too long"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 40, message = "WhatsApp number is too long"))]
    pub whatsapp: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "GitHub must be a valid URL"))]
    pub github: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(url(message = "LinkedIn must be a valid URL"))]
    pub linkedin: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 150, message = "Location is too long"))]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    #[validate(custom(function = "validate_tags"))]
    pub availability: Vec<String>,
}

impl OwnedEntity for PersonalInfo {
    type Row = PersonalInfo;
    type Input = PersonalInfoInput;

    const TABLE: &'static str = "personal_info";
    const SINGULAR: &'static str = "personal info";
    const PLURAL: &'static str = "personal info";
    const CARDINALITY: Cardinality = Cardinality::OnePerOwner;
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("updated_at")];

    fn columns(input: &PersonalInfoInput, _schema: SchemaVersion) -> Vec<Column> {
        vec![
            ("email", ColumnValue::Text(input.email.clone())),
            ("phone", ColumnValue::Text(input.phone.clone())),
            ("whatsapp", ColumnValue::Text(input.whatsapp.clone())),
            ("website", ColumnValue::Text(input.website.clone())),
            ("github", ColumnValue::Text(input.github.clone())),
            ("linkedin", ColumnValue::Text(input.linkedin.clone())),
            ("location", ColumnValue::Text(input.location.clone())),
            ("availability", ColumnValue::TextList(input.availability.clone())),
        ]
    }

    fn id(row: &PersonalInfo) -> Uuid {
        row.id
    }

    fn owner(row: &PersonalInfo) -> Uuid {
        row.user_id
    }
}
