//! Reply API client.
//!
//! The dispatcher only talks to the [`ReplyClient`] trait; [`LineClient`] is
//! the production implementation on top of a shared `reqwest::Client`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use crate::error::{BotError, ReplyError};
use crate::Config;

/// Path of the reply endpoint, relative to the API base URL.
const REPLY_PATH: &str = "v2/bot/message/reply";

/// An outbound message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyMessage {
    Text { text: String },
}

impl ReplyMessage {
    pub fn text(text: impl Into<String>) -> Self {
        ReplyMessage::Text { text: text.into() }
    }
}

/// Body of a reply API request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest<'a> {
    pub reply_token: &'a str,
    pub messages: &'a [ReplyMessage],
}

/// Sends replies addressed by reply token.
#[async_trait]
pub trait ReplyClient: Send + Sync {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<(), ReplyError>;
}

#[async_trait]
impl<T> ReplyClient for Arc<T>
where
    T: ReplyClient + ?Sized,
{
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<(), ReplyError> {
        (**self).reply(reply_token, messages).await
    }
}

/// LINE Messaging API reply client.
#[derive(Clone)]
pub struct LineClient {
    http: Client,
    endpoint: Url,
    access_token: String,
    timeout: Duration,
}

impl LineClient {
    /// Create a client from the channel credentials in `config`.
    ///
    /// `http` is shared across requests so connections are pooled.
    pub fn new(config: &Config, http: Client) -> Result<Self, BotError> {
        if !config.has_channel_secret() {
            return Err(BotError::ClientInit("CHANNEL_SECRET is not set".to_string()));
        }
        if !config.has_access_token() {
            return Err(BotError::ClientInit(
                "CHANNEL_ACCESS_TOKEN is not set".to_string(),
            ));
        }

        // A trailing slash keeps any path prefix of the base when joining
        let base = format!("{}/", config.api_base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join(REPLY_PATH))
            .map_err(|e| {
                BotError::ClientInit(format!(
                    "invalid API base URL {}: {}",
                    config.api_base_url, e
                ))
            })?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.channel_access_token.clone(),
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ReplyClient for LineClient {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<(), ReplyError> {
        let request = ReplyRequest {
            reply_token,
            messages,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.access_token)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(
                    is_timeout = e.is_timeout(),
                    error = %e,
                    "reply_request_error"
                );
                ReplyError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status_code = status.as_u16(), body = %body, "reply_api_rejected");
            return Err(ReplyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            status_code = status.as_u16(),
            message_count = messages.len(),
            "reply_api_accepted"
        );

        Ok(())
    }
}
