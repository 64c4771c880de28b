use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::settings::AppConfig;

const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// Connects with exponential backoff so the API can start alongside the
/// database container.
pub async fn create_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections.max(1))
        .acquire_timeout(Duration::from_secs(5));

    let mut attempt = 1;
    let mut backoff = Duration::from_secs(2);

    loop {
        match options.clone().connect(&config.database_url).await {
            Ok(pool) => {
                tracing::info!(max_connections = config.db_max_connections, "Database connection established");
                return Ok(pool);
            }
            Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                tracing::warn!(
                    "Database unavailable (attempt {}/{}): {}. Retrying in {}s",
                    attempt,
                    MAX_CONNECT_ATTEMPTS,
                    e,
                    backoff.as_secs()
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
