use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::contact_message::{ContactForm, ContactMessage, ContactMessageInsert, ContactMessageList, ContactReceived},
    errors::AppError,
    repositories::contact::ContactRepository,
};

pub struct ContactHandler<R>
where
    R: ContactRepository,
{
    pub contact_repo: R,
    max_rows: i64,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository,
{
    pub fn new(contact_repo: R, max_rows: i64) -> Self {
        ContactHandler { contact_repo, max_rows }
    }

    /// Stores a message from the public contact form.
    pub async fn submit(&self, form: ContactForm) -> Result<ContactReceived, AppError> {
        form.validate()?;

        let insert = ContactMessageInsert::from(form);
        let id = self.contact_repo.create_message(&insert).await.map_err(|e| {
            tracing::error!("Failed to store contact message: {}", e);
            AppError::InternalError("Failed to send message".into())
        })?;

        tracing::info!(message_id = %id, "Contact message received");
        Ok(ContactReceived {
            id,
            message: "Your message has been received.".to_string(),
        })
    }

    /// Newest first, with totals for the inbox badge.
    pub async fn list(&self) -> Result<ContactMessageList, AppError> {
        let messages = self.contact_repo.list_messages(self.max_rows).await?;
        let (total, unread) = self.contact_repo.count_messages().await?;

        if total > self.max_rows {
            tracing::warn!(total, cap = self.max_rows, "Inbox truncated at max_list_rows");
        }

        Ok(ContactMessageList { messages, total, unread })
    }

    pub async fn mark_read(&self, id: &Uuid, read: bool) -> Result<ContactMessage, AppError> {
        let message = self.contact_repo.set_read(id, read).await?;
        tracing::info!(message_id = %id, read, "Contact message updated");
        Ok(message)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        self.contact_repo.delete_message(id).await?;
        tracing::info!(message_id = %id, "Contact message deleted");
        Ok(())
    }
}
