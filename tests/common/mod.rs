#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use slack_morphism::events::SlackPushEventCallback;
use tokio::sync::oneshot;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use unroll::core::config::ChannelAllowList;
use unroll::core::models::OutboundAttachment;
use unroll::errors::UnrollError;
use unroll::slack::{EventsApiDelivery, SlackApi, SocketEvent};

pub const MESSAGE_TS: &str = "1700000001.000200";
pub const THREAD_TS: &str = "1700000000.000100";
pub const PERMALINK: &str = "https://example.slack.com/archives/C1/p1700000001000200";

/// Records every outbound call and answers with canned results.
#[derive(Default)]
pub struct RecordingApi {
    pub fail_permalink: bool,
    pub fail_post: bool,
    pub permalink_calls: Mutex<Vec<(String, String)>>,
    pub post_calls: Mutex<Vec<(String, OutboundAttachment)>>,
}

impl RecordingApi {
    pub fn permalink_calls(&self) -> Vec<(String, String)> {
        self.permalink_calls.lock().unwrap().clone()
    }

    pub fn post_calls(&self) -> Vec<(String, OutboundAttachment)> {
        self.post_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlackApi for RecordingApi {
    async fn get_message_permalink(
        &self,
        channel: &str,
        message_ts: &str,
    ) -> Result<String, UnrollError> {
        self.permalink_calls
            .lock()
            .unwrap()
            .push((channel.to_string(), message_ts.to_string()));
        if self.fail_permalink {
            return Err(UnrollError::ApiError("message_not_found".to_string()));
        }
        Ok(PERMALINK.to_string())
    }

    async fn post_attachment(
        &self,
        channel: &str,
        attachment: &OutboundAttachment,
    ) -> Result<(), UnrollError> {
        self.post_calls
            .lock()
            .unwrap()
            .push((channel.to_string(), attachment.clone()));
        if self.fail_post {
            return Err(UnrollError::ApiError("not_in_channel".to_string()));
        }
        Ok(())
    }
}

pub fn allow_list(channels: &[&str]) -> ChannelAllowList {
    channels.iter().map(ToString::to_string).collect()
}

pub fn message_body(channel: &str, user: &str, text: &str, thread_ts: Option<&str>) -> Value {
    let mut body = json!({
        "type": "message",
        "channel": channel,
        "user": user,
        "text": text,
        "ts": MESSAGE_TS,
    });
    if let Some(thread_ts) = thread_ts {
        body["thread_ts"] = Value::String(thread_ts.to_string());
    }
    body
}

pub fn push_callback(body: Value) -> SlackPushEventCallback {
    serde_json::from_value(json!({
        "team_id": "T1",
        "api_app_id": "A1",
        "event": body,
        "event_id": "Ev1",
        "event_time": 1_700_000_001
    }))
    .unwrap()
}

/// An Events API delivery plus the receiver the listener would wait on.
pub fn delivery(body: Value) -> (SocketEvent, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    (
        SocketEvent::EventsApi(EventsApiDelivery::new(push_callback(body), tx)),
        rx,
    )
}

pub fn thread_reply_event(channel: &str) -> (SocketEvent, oneshot::Receiver<()>) {
    delivery(message_body(channel, "U1", "hello", Some(THREAD_TS)))
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains("ERROR"))
            .collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route this thread's logs into a buffer until the guard is dropped.
///
/// `#[tokio::test]` runs on a current-thread runtime, so everything the test
/// awaits logs through this subscriber.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
