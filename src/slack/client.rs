//! Slack API client module
//!
//! The two Web API calls the unroller makes: resolving a permalink and posting
//! the unrolled attachment. Each is a single attempt; failures are returned to
//! the caller, which logs and drops the event.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use slack_morphism::{SlackApiToken, SlackApiTokenValue};
use std::time::Duration;

use crate::core::models::OutboundAttachment;
use crate::errors::UnrollError;
use crate::slack::response_builder::create_attachment_payload;

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

#[derive(Debug, Deserialize)]
struct PermalinkResponse {
    ok: bool,
    permalink: Option<String>,
    error: Option<String>,
}

/// The outbound half of the Slack platform, as seen by the unroll pipeline.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Resolve the shareable link of the message `message_ts` in `channel`.
    async fn get_message_permalink(
        &self,
        channel: &str,
        message_ts: &str,
    ) -> Result<String, UnrollError>;

    /// Post `attachment` as a new top-level message in `channel`.
    async fn post_attachment(
        &self,
        channel: &str,
        attachment: &OutboundAttachment,
    ) -> Result<(), UnrollError>;
}

/// Slack Web API client authenticated with the bot token.
pub struct SlackClient {
    token: SlackApiToken,
    api_url: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String, api_url: &str) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_url, method)
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    /// # Errors
    ///
    /// Returns an error if the Slack API request or response parsing fails.
    async fn get_message_permalink(
        &self,
        channel: &str,
        message_ts: &str,
    ) -> Result<String, UnrollError> {
        let resp = HTTP_CLIENT
            .get(self.method_url("chat.getPermalink"))
            .bearer_auth(&self.token.token_value.0)
            .query(&[("channel", channel), ("message_ts", message_ts)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(UnrollError::ApiError(format!(
                "chat.getPermalink HTTP {}",
                resp.status()
            )));
        }

        let perm_resp: PermalinkResponse = resp.json().await.map_err(|e| {
            UnrollError::ParseError(format!("chat.getPermalink response: {e}"))
        })?;

        if !perm_resp.ok {
            return Err(UnrollError::ApiError(format!(
                "chat.getPermalink error: {}",
                perm_resp.error.unwrap_or_else(|| "unknown".to_string())
            )));
        }

        perm_resp
            .permalink
            .filter(|link| !link.is_empty())
            .ok_or_else(|| UnrollError::ParseError("No permalink in response".to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Slack returns an error.
    async fn post_attachment(
        &self,
        channel: &str,
        attachment: &OutboundAttachment,
    ) -> Result<(), UnrollError> {
        let payload = create_attachment_payload(channel, attachment);

        let resp = HTTP_CLIENT
            .post(self.method_url("chat.postMessage"))
            .bearer_auth(&self.token.token_value.0)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(UnrollError::ApiError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| UnrollError::ParseError(format!("chat.postMessage response: {e}")))?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            return Err(UnrollError::ApiError(format!(
                "chat.postMessage error: {}",
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
            )));
        }

        Ok(())
    }
}
