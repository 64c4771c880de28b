use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::form_fields::{deserialize_optional_text, deserialize_trimmed};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(max = 150, message = "Subject is too long"))]
    pub subject: Option<String>,

    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 5, max = 5000, message = "Message must be between 5 and 5000 characters"))]
    pub message: String,
}

impl ContactForm {
    /// Lower-cased address used for rate-limit keys and storage.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl From<ContactForm> for ContactMessageInsert {
    fn from(form: ContactForm) -> Self {
        ContactMessageInsert {
            email: form.normalized_email(),
            name: form.name,
            subject: form.subject,
            message: form.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ContactReceived {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactMessageList {
    pub messages: Vec<ContactMessage>,
    pub total: i64,
    pub unread: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default = "default_true")]
    pub read: bool,
}

fn default_true() -> bool {
    true
}
