use async_trait::async_trait;
use serde::Serialize;

use crate::{errors::AppError, repositories::notifier::ResetLinkNotifier, settings::AppConfig};

#[derive(Serialize)]
struct ResetLinkPayload<'a> {
    email: &'a str,
    link: &'a str,
    kind: &'static str,
}

/// How reset links leave the server: posted to a webhook (mail relay) when
/// one is configured, otherwise written to the log.
#[derive(Clone)]
pub enum ResetNotifier {
    Log { reveal_links: bool },
    Webhook { client: reqwest::Client, url: String },
}

impl ResetNotifier {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.reset_webhook_url {
            Some(url) if !url.trim().is_empty() => ResetNotifier::Webhook {
                client: reqwest::Client::new(),
                url: url.clone(),
            },
            _ => ResetNotifier::Log { reveal_links: !config.is_production() },
        }
    }
}

#[async_trait]
impl ResetLinkNotifier for ResetNotifier {
    async fn send_reset_link(&self, email: &str, link: &str) -> Result<(), AppError> {
        match self {
            ResetNotifier::Log { reveal_links: true } => {
                tracing::info!(%email, %link, "Password reset link issued");
                Ok(())
            }
            ResetNotifier::Log { reveal_links: false } => {
                tracing::warn!(%email, "Password reset link issued but no delivery webhook is configured");
                Ok(())
            }
            ResetNotifier::Webhook { client, url } => {
                let payload = ResetLinkPayload { email, link, kind: "password_recovery" };
                let response = client
                    .post(url)
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| AppError::InternalError(format!("Reset webhook unreachable: {e}")))?;

                if !response.status().is_success() {
                    return Err(AppError::InternalError(format!(
                        "Reset webhook returned {}",
                        response.status()
                    )));
                }
                Ok(())
            }
        }
    }
}
