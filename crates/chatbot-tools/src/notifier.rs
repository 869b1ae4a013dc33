//! Push notifications for the profile owner.
//!
//! Delivery is best-effort: tools call [`notify_best_effort`], which logs and
//! swallows every failure so nothing reaches the conversation.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub const PUSHOVER_ENDPOINT: &str = "https://api.pushover.net/1/messages.json";
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("missing notification credential: {0}")]
    MissingCredentials(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification endpoint returned HTTP {0}")]
    Status(u16),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Send a notification and absorb any failure.
pub async fn notify_best_effort(notifier: &dyn Notifier, message: &str) {
    match notifier.notify(message).await {
        Ok(()) => log::debug!("Notification delivered"),
        Err(error) => log::warn!("Notification dropped: {}", error),
    }
}

/// Pushover client: form POST of `user`, `token` and `message`.
pub struct PushoverNotifier {
    client: reqwest::Client,
    endpoint: String,
    user: Option<String>,
    token: Option<String>,
}

impl PushoverNotifier {
    pub fn new(user: Option<String>, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .unwrap_or_else(|error| {
                log::warn!("Failed to build notifier HTTP client, using defaults: {}", error);
                reqwest::Client::new()
            });

        Self {
            client,
            endpoint: PUSHOVER_ENDPOINT.to_string(),
            user: user.filter(|value| !value.trim().is_empty()),
            token: token.filter(|value| !value.trim().is_empty()),
        }
    }

    /// Read `PUSHOVER_USER` and `PUSHOVER_TOKEN` from the environment.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("PUSHOVER_USER").ok(),
            std::env::var("PUSHOVER_TOKEN").ok(),
        )
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let user = self
            .user
            .as_deref()
            .ok_or(NotifyError::MissingCredentials("PUSHOVER_USER"))?;
        let token = self
            .token
            .as_deref()
            .ok_or(NotifyError::MissingCredentials("PUSHOVER_TOKEN"))?;

        log::info!("Sending push notification ({} chars)", message.len());
        log::debug!("Push: {}", message);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("user", user), ("token", token), ("message", message)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Used when push credentials are not configured; only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        log::info!("Notification not sent, no push credentials configured");
        log::debug!("Unsent notification: {}", message);
        Ok(())
    }
}
