//! Socket Mode event source
//!
//! Wraps slack-morphism's Socket Mode listener. Every Events API envelope is
//! pushed into a bounded channel and held open until the consumer acknowledges
//! it; the listener confirms the envelope to Slack once the push callback returns.

use std::sync::Arc;

use slack_morphism::prelude::*;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::errors::UnrollError;

/// Capacity of the channel between the listener and the dispatch loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// An item delivered by the Socket Mode source.
#[derive(Debug)]
pub enum SocketEvent {
    /// The socket connection has been established. Carries nothing to acknowledge.
    Connected,
    /// An Events API envelope.
    EventsApi(EventsApiDelivery),
}

#[derive(Debug)]
pub struct EventsApiDelivery {
    callback: SlackPushEventCallback,
    ack: Option<oneshot::Sender<()>>,
}

impl EventsApiDelivery {
    #[must_use]
    pub fn new(callback: SlackPushEventCallback, ack: oneshot::Sender<()>) -> Self {
        Self {
            callback,
            ack: Some(ack),
        }
    }

    #[must_use]
    pub fn callback(&self) -> &SlackPushEventCallback {
        &self.callback
    }

    /// Release the envelope back to the listener. Only the first call has an effect.
    pub fn acknowledge(&mut self) {
        if let Some(ack) = self.ack.take() {
            // The listener may have gone away during shutdown.
            let _ = ack.send(());
        }
    }

    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        self.ack.is_none()
    }
}

#[must_use]
pub fn event_channel() -> (mpsc::Sender<SocketEvent>, mpsc::Receiver<SocketEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

/// State handed to the push callback through `SlackClientEventsUserState`.
struct SocketSourceState {
    sender: mpsc::Sender<SocketEvent>,
}

pub struct SocketModeSource {
    app_token: SlackApiToken,
    api_url: String,
    sender: mpsc::Sender<SocketEvent>,
}

impl SocketModeSource {
    #[must_use]
    pub fn new(app_token: &str, api_url: &str, sender: mpsc::Sender<SocketEvent>) -> Self {
        Self {
            app_token: SlackApiToken::new(SlackApiTokenValue::new(app_token.to_string())),
            api_url: api_url.trim_end_matches('/').to_string(),
            sender,
        }
    }

    /// Connect and serve until the process is interrupted.
    ///
    /// Reconnects and ping/pong are handled by the listener itself.
    ///
    /// # Errors
    ///
    /// Returns `UnrollError::Connection` if the HTTP connector cannot be built or
    /// `apps.connections.open` rejects the app token.
    pub async fn run(self) -> Result<(), UnrollError> {
        let connector = SlackClientHyperConnector::new()
            .map_err(|e| UnrollError::Connection(format!("HTTP connector: {e}")))?
            .with_slack_api_url(&format!("{}/", self.api_url));
        let client = Arc::new(SlackClient::new(connector));

        // The listener retries forever on its own, so auth failures only surface here.
        client
            .open_session(&self.app_token)
            .apps_connections_open(&SlackApiAppsConnectionOpenRequest::new())
            .await
            .map_err(|e| UnrollError::Connection(format!("apps.connections.open: {e}")))?;

        let state = Arc::new(SocketSourceState {
            sender: self.sender.clone(),
        });

        let callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(forward_push_event);

        let environment = Arc::new(
            SlackClientEventsListenerEnvironment::new(client)
                .with_error_handler(socket_error_handler)
                .with_user_state(state),
        );

        let listener = SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            environment,
            callbacks,
        );

        listener.listen_for(&self.app_token).await?;
        info!("slack socket mode connected");

        if self.sender.send(SocketEvent::Connected).await.is_err() {
            warn!("dispatch loop is gone before the first event");
        }

        let exit_code = listener.serve().await;
        info!(exit_code, "slack socket mode listener stopped");

        Ok(())
    }
}

async fn forward_push_event(
    event: SlackPushEventCallback,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> UserCallbackResult<()> {
    let sender = {
        let guard = states.read().await;
        guard
            .get_user_state::<Arc<SocketSourceState>>()
            .map(|state| state.sender.clone())
    };

    let Some(sender) = sender else {
        return Err(Box::new(UnrollError::Unacknowledged(
            "socket source state missing".to_string(),
        )));
    };

    enqueue_envelope(&sender, event).await?;
    Ok(())
}

/// Hand one envelope to the dispatch loop and wait for it to be acknowledged.
///
/// Fails when the loop is gone or drops the envelope unacknowledged; the
/// envelope must then stay unconfirmed so Slack redelivers it.
async fn enqueue_envelope(
    sender: &mpsc::Sender<SocketEvent>,
    event: SlackPushEventCallback,
) -> Result<(), UnrollError> {
    let (ack_tx, ack_rx) = oneshot::channel();
    sender
        .send(SocketEvent::EventsApi(EventsApiDelivery::new(event, ack_tx)))
        .await
        .map_err(|e| UnrollError::Unacknowledged(format!("dispatch loop closed: {e}")))?;

    ack_rx.await.map_err(|_| {
        UnrollError::Unacknowledged("envelope dropped before acknowledgment".to_string())
    })
}

/// Status reported to the listener for a failed push callback. Anything other
/// than `OK` keeps the listener from confirming the envelope.
fn envelope_status(err: &(dyn std::error::Error + Send + Sync + 'static)) -> HttpStatusCode {
    match err.downcast_ref::<UnrollError>() {
        Some(UnrollError::Unacknowledged(_)) => HttpStatusCode::SERVICE_UNAVAILABLE,
        _ => HttpStatusCode::OK,
    }
}

fn socket_error_handler(
    err: Box<dyn std::error::Error + Send + Sync>,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> HttpStatusCode {
    warn!(error = %err, "slack socket mode error");
    envelope_status(err.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn callback() -> SlackPushEventCallback {
        serde_json::from_value(json!({
            "team_id": "T1",
            "api_app_id": "A1",
            "event": {
                "type": "message",
                "channel": "C1",
                "user": "U1",
                "text": "hello",
                "ts": "1700000001.000200",
                "thread_ts": "1700000000.000100"
            },
            "event_id": "Ev1",
            "event_time": 1_700_000_001
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_acknowledge_signals_listener_once() {
        let (tx, rx) = oneshot::channel();
        let mut delivery = EventsApiDelivery::new(callback(), tx);

        assert!(!delivery.is_acknowledged());
        delivery.acknowledge();
        delivery.acknowledge();

        assert!(delivery.is_acknowledged());
        assert!(rx.await.is_ok());
    }

    #[test]
    fn test_acknowledge_after_listener_dropped_is_noop() {
        let (tx, rx) = oneshot::channel();
        drop(rx);
        let mut delivery = EventsApiDelivery::new(callback(), tx);

        delivery.acknowledge();
        assert!(delivery.is_acknowledged());
    }

    #[test]
    fn test_dropped_delivery_releases_listener() {
        let (tx, mut rx) = oneshot::channel();
        drop(EventsApiDelivery::new(callback(), tx));

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_enqueue_envelope_succeeds_once_acknowledged() {
        let (tx, mut rx) = event_channel();
        let consumer = tokio::spawn(async move {
            if let Some(SocketEvent::EventsApi(mut delivery)) = rx.recv().await {
                delivery.acknowledge();
            }
        });

        assert!(enqueue_envelope(&tx, callback()).await.is_ok());
        consumer.await.unwrap();
    }

    #[tokio::test]
    async fn test_enqueue_envelope_fails_when_dropped_unacknowledged() {
        let (tx, mut rx) = event_channel();
        let consumer = tokio::spawn(async move {
            drop(rx.recv().await);
        });

        let err = enqueue_envelope(&tx, callback()).await.unwrap_err();
        assert!(matches!(err, UnrollError::Unacknowledged(_)));
        consumer.await.unwrap();
    }

    #[tokio::test]
    async fn test_enqueue_envelope_fails_when_loop_closed() {
        let (tx, rx) = event_channel();
        drop(rx);

        let err = enqueue_envelope(&tx, callback()).await.unwrap_err();
        assert!(matches!(err, UnrollError::Unacknowledged(_)));
    }

    #[test]
    fn test_unacknowledged_envelope_is_not_confirmed() {
        let unacked: Box<dyn std::error::Error + Send + Sync> =
            Box::new(UnrollError::Unacknowledged("dispatch loop closed".to_string()));
        assert_ne!(envelope_status(unacked.as_ref()), HttpStatusCode::OK);

        let other: Box<dyn std::error::Error + Send + Sync> = "decode failure".into();
        assert_eq!(envelope_status(other.as_ref()), HttpStatusCode::OK);
    }
}
