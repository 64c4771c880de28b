use async_trait::async_trait;
use deadpool_redis::{
    redis::{self, AsyncCommands},
    Config, Connection, CreatePoolError, Pool, Runtime,
};

use crate::{errors::{AppError, AuthError}, repositories::revocation::TokenRevocation};

/// Thin wrapper over the deadpool pool with the few commands the API needs.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn from_url(url: &str) -> Result<Self, CreatePoolError> {
        let pool = Config::from_url(url).create_pool(Some(Runtime::Tokio1))?;
        Ok(RedisStore { pool })
    }

    async fn connection(&self) -> Result<Connection, String> {
        self.pool.get().await.map_err(|e| e.to_string())
    }

    pub async fn ping(&self) -> bool {
        let Ok(mut conn) = self.connection().await else {
            return false;
        };
        matches!(
            redis::cmd("PING").query_async::<String>(&mut conn).await,
            Ok(pong) if pong == "PONG"
        )
    }

    /// Fixed-window counter: the TTL starts with the first hit.
    pub async fn incr_with_ttl(&self, key: &str, ttl_seconds: u64) -> Result<u64, AppError> {
        let mut conn = self.connection().await.map_err(|e| {
            tracing::error!("Redis connection failed: {}", e);
            AppError::InternalError("Rate limiter unavailable".into())
        })?;

        let count: u64 = conn.incr(key, 1).await.map_err(|e| {
            tracing::error!("Redis INCR failed for {}: {}", key, e);
            AppError::InternalError("Rate limiter unavailable".into())
        })?;

        if count == 1 {
            let _: () = conn.expire(key, ttl_seconds as i64).await.map_err(|e| {
                tracing::error!("Redis EXPIRE failed for {}: {}", key, e);
                AppError::InternalError("Rate limiter unavailable".into())
            })?;
        }

        Ok(count)
    }
}

#[async_trait]
impl TokenRevocation for RedisStore {
    async fn revoke(&self, prefix: &str, jti: &str, ttl_seconds: u64) -> Result<(), AuthError> {
        let mut conn = self.connection().await.map_err(AuthError::RedisOperation)?;
        let key = format!("{prefix}:{jti}");
        let _: () = conn
            .set_ex(&key, 1u8, ttl_seconds.max(1))
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))?;
        Ok(())
    }

    async fn is_revoked(&self, prefix: &str, jti: &str) -> Result<bool, AuthError> {
        let mut conn = self.connection().await.map_err(AuthError::RedisOperation)?;
        conn.exists(format!("{prefix}:{jti}"))
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))
    }
}

/// Revocation is a no-op when Redis is not configured.
#[async_trait]
impl TokenRevocation for Option<RedisStore> {
    async fn revoke(&self, prefix: &str, jti: &str, ttl_seconds: u64) -> Result<(), AuthError> {
        match self {
            Some(store) => store.revoke(prefix, jti, ttl_seconds).await,
            None => {
                tracing::debug!("Token revocation skipped ({prefix}): no Redis configured");
                Ok(())
            }
        }
    }

    async fn is_revoked(&self, prefix: &str, jti: &str) -> Result<bool, AuthError> {
        match self {
            Some(store) => store.is_revoked(prefix, jti).await,
            None => Ok(false),
        }
    }
}
