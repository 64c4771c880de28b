use async_trait::async_trait;

use crate::errors::AppError;

/// Delivers password reset links to the account owner.
#[async_trait]
pub trait ResetLinkNotifier: Send + Sync {
    async fn send_reset_link(&self, email: &str, link: &str) -> Result<(), AppError>;
}
