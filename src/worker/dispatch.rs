//! Dispatch loop
//!
//! A single task pulls events off the socket channel and processes them one at a
//! time, in delivery order. Events API envelopes are acknowledged before any
//! filtering, so a failed unroll is never redelivered.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::deliver::{UnrollOutcome, unroll_reply};
use crate::core::config::ChannelAllowList;
use crate::slack::SlackApi;
use crate::slack::socket::SocketEvent;
use crate::utils::filters::eligible_reply;

pub struct Dispatcher<A> {
    api: A,
    channels: ChannelAllowList,
}

impl<A> Dispatcher<A>
where
    A: SlackApi,
{
    #[must_use]
    pub fn new(api: A, channels: ChannelAllowList) -> Self {
        Self { api, channels }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run until `cancel` fires or the event source hangs up.
    ///
    /// Cancellation is only observed between events; an unroll in flight runs
    /// to completion first. Events still queued at that point are not drained.
    pub async fn run(&self, mut events: mpsc::Receiver<SocketEvent>, cancel: CancellationToken) {
        loop {
            let event = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("dispatch loop cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => event,
                    None => {
                        info!("event source closed");
                        break;
                    }
                },
            };

            self.handle_event(event).await;
        }
    }

    /// Process one delivered item. Returns `None` when nothing was unrolled
    /// because the item was not eligible.
    pub async fn handle_event(&self, mut event: SocketEvent) -> Option<UnrollOutcome> {
        let SocketEvent::EventsApi(delivery) = &mut event else {
            debug!("ignoring connection event");
            return None;
        };

        delivery.acknowledge();
        debug!(event_id = ?delivery.callback().event_id, "events api envelope acknowledged");

        let reply = eligible_reply(&event, &self.channels)?;
        Some(unroll_reply(&self.api, &reply).await)
    }
}
