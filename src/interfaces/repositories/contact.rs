use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::contact_message::{ContactMessage, ContactMessageInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError>;
    async fn list_messages(&self, limit: i64) -> Result<Vec<ContactMessage>, AppError>;
    async fn count_messages(&self) -> Result<(i64, i64), AppError>;
    async fn set_read(&self, id: &Uuid, read: bool) -> Result<ContactMessage, AppError>;
    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.subject)
        .bind(&msg.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_messages(&self, limit: i64) -> Result<Vec<ContactMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT id, name, email, subject, message, read, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Returns `(total, unread)`.
    async fn count_messages(&self) -> Result<(i64, i64), AppError> {
        let counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT read) FROM contact_messages",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn set_read(&self, id: &Uuid, read: bool) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages SET read = $2
            WHERE id = $1
            RETURNING id, name, email, subject, message, read, created_at
            "#,
        )
        .bind(id)
        .bind(read)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact message not found".into()))
    }

    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact message not found".into()));
        }

        Ok(())
    }
}
