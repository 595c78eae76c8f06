use serde::Serialize;

/// A message posted as a reply inside a thread, decoded from a `message` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadReply {
    pub channel_id: String,
    pub user_id: String,
    /// The reply's own timestamp. Permalinks are resolved against this one.
    pub ts: String,
    /// Timestamp of the thread's root message. Empty on top-level posts.
    pub thread_ts: String,
    pub text: String,
}

/// The attachment posted into the channel timeline for one unrolled reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundAttachment {
    pub pretext: String,
    pub text: String,
    pub from_url: String,
    pub color: String,
    pub footer: String,
}
