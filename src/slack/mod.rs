//! All Slack-specific functionality

pub mod client;
pub mod response_builder;
pub mod socket;

// Re-export main types for convenience
pub use client::{SlackApi, SlackClient};
pub use socket::{EventsApiDelivery, SocketEvent, SocketModeSource};
