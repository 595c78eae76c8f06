use slack_morphism::events::{SlackEventCallbackBody, SlackMessageEvent};

use crate::core::config::ChannelAllowList;
use crate::core::models::ThreadReply;
use crate::slack::socket::SocketEvent;

/// Decode the inner body of an Events API callback into a `ThreadReply`.
///
/// Only `message` bodies that name a channel convert. Author and text fall back
/// to empty strings, the thread timestamp to an empty string on top-level posts.
#[must_use]
pub fn thread_reply_from_event(body: &SlackEventCallbackBody) -> Option<ThreadReply> {
    match body {
        SlackEventCallbackBody::Message(message) => thread_reply_from_message(message),
        _ => None,
    }
}

fn thread_reply_from_message(message: &SlackMessageEvent) -> Option<ThreadReply> {
    let channel_id = message.origin.channel.as_ref()?.0.clone();

    Some(ThreadReply {
        channel_id,
        user_id: message
            .sender
            .user
            .as_ref()
            .map(|u| u.0.clone())
            .unwrap_or_default(),
        ts: message.origin.ts.0.clone(),
        thread_ts: message
            .origin
            .thread_ts
            .as_ref()
            .map(|t| t.0.clone())
            .unwrap_or_default(),
        text: message
            .content
            .as_ref()
            .and_then(|c| c.text.clone())
            .unwrap_or_default(),
    })
}

/// Run the full eligibility chain and hand back the decoded reply when it passes.
///
/// An event is eligible when it is an Events API delivery carrying a `message`
/// body, posted inside a thread, in an allow-listed channel.
#[must_use]
pub fn eligible_reply(event: &SocketEvent, channels: &ChannelAllowList) -> Option<ThreadReply> {
    let SocketEvent::EventsApi(delivery) = event else {
        return None;
    };

    thread_reply_from_event(&delivery.callback().event)
        .filter(|reply| !reply.thread_ts.is_empty())
        .filter(|reply| channels.contains(&reply.channel_id))
}

#[must_use]
pub fn is_eligible(event: &SocketEvent, channels: &ChannelAllowList) -> bool {
    eligible_reply(event, channels).is_some()
}
