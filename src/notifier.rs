use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Priority;
use crate::utils::error::{AppError, Result};

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

// Pushover requires a retry cadence and expiry for emergency-priority
// messages; it keeps alerting until acknowledged or expired.
const EMERGENCY_RETRY_SECS: u32 = 60;
const EMERGENCY_EXPIRE_SECS: u32 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationMessage {
    pub body: String,
    pub title: String,
    pub priority: i8,
    pub sound: String,
}

impl NotificationMessage {
    pub fn new(body: impl Into<String>, title: impl Into<String>, priority: Priority, sound: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            title: title.into(),
            priority: priority.as_pushover(),
            sound: sound.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResult {
    pub delivered: bool,
}

/// Push-notification delivery seam. Implementations must treat missing
/// credentials as a silent success, never an error.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, message: &NotificationMessage) -> Result<NotificationResult>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushoverCredentials {
    pub user_key: String,
    pub api_token: String,
}

#[derive(Serialize)]
struct PushoverRequest<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
    title: &'a str,
    priority: i8,
    sound: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expire: Option<u32>,
}

pub struct PushoverNotifier {
    client: Client,
    api_url: String,
    credentials: Option<PushoverCredentials>,
}

impl PushoverNotifier {
    pub fn new(credentials: Option<PushoverCredentials>) -> Self {
        Self::with_api_url(credentials, PUSHOVER_API_URL.to_string())
    }

    pub fn with_api_url(credentials: Option<PushoverCredentials>, api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            credentials,
        }
    }
}

#[async_trait]
impl Notify for PushoverNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<NotificationResult> {
        let Some(credentials) = &self.credentials else {
            info!(title = %message.title, "No Pushover credentials configured, skipping delivery");
            return Ok(NotificationResult { delivered: false });
        };

        let (retry, expire) = if message.priority >= Priority::Emergency.as_pushover() {
            (Some(EMERGENCY_RETRY_SECS), Some(EMERGENCY_EXPIRE_SECS))
        } else {
            (None, None)
        };

        let request = PushoverRequest {
            token: &credentials.api_token,
            user: &credentials.user_key,
            message: &message.body,
            title: &message.title,
            priority: message.priority,
            sound: &message.sound,
            retry,
            expire,
        };

        debug!(title = %message.title, priority = message.priority, "Sending Pushover notification");

        let response = self.client.post(&self.api_url).form(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "Pushover returned {}: {}",
                status, body
            )));
        }

        info!(title = %message.title, "Notification delivered");
        Ok(NotificationResult { delivered: true })
    }
}
