use async_trait::async_trait;

use crate::errors::AuthError;

/// Deny-list for tokens that were signed out before they expired.
#[async_trait]
pub trait TokenRevocation: Send + Sync {
    async fn revoke(&self, prefix: &str, jti: &str, ttl_seconds: u64) -> Result<(), AuthError>;
    async fn is_revoked(&self, prefix: &str, jti: &str) -> Result<bool, AuthError>;
}
