//! Message-building utilities for unrolled thread replies.
//!
//! This module turns a thread reply and its permalink into the attachment that
//! gets posted back into the channel timeline.

use serde_json::{Value, json};

use crate::core::models::{OutboundAttachment, ThreadReply};

/// Neutral gray accent bar shown next to every unrolled reply.
pub const ATTACHMENT_COLOR: &str = "#D0D0D0";

pub const VIEW_IN_THREAD_LABEL: &str = "view in thread";

/// Format a Slack user mention, e.g. `<@U123>`.
#[must_use]
pub fn user_mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Format a Slack link with a display label, e.g. `<https://...|label>`.
#[must_use]
pub fn labeled_link(url: &str, label: &str) -> String {
    format!("<{url}|{label}>")
}

/// Build the attachment for one unrolled reply
///
/// The reply text is copied verbatim; Slack applies its own formatting when
/// the message is posted.
///
/// # Examples
///
/// ```
/// use unroll::core::models::ThreadReply;
/// use unroll::slack::response_builder::build_unroll_attachment;
///
/// let reply = ThreadReply {
///     channel_id: "C1".into(),
///     user_id: "U1".into(),
///     ts: "1700000001.000200".into(),
///     thread_ts: "1700000000.000100".into(),
///     text: "hello".into(),
/// };
/// let attachment = build_unroll_attachment(&reply, "https://example.slack.com/p1");
/// assert_eq!(attachment.pretext, "<@U1> said:");
/// ```
#[must_use]
pub fn build_unroll_attachment(reply: &ThreadReply, permalink: &str) -> OutboundAttachment {
    OutboundAttachment {
        pretext: format!("{} said:", user_mention(&reply.user_id)),
        text: reply.text.clone(),
        from_url: permalink.to_string(),
        color: ATTACHMENT_COLOR.to_string(),
        footer: labeled_link(permalink, VIEW_IN_THREAD_LABEL),
    }
}

/// Create the `chat.postMessage` JSON body carrying `attachment` into `channel`.
#[must_use]
pub fn create_attachment_payload(channel: &str, attachment: &OutboundAttachment) -> Value {
    json!({
        "channel": channel,
        "attachments": [attachment],
    })
}
