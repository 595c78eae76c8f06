use tracing::{error, info};

use crate::core::models::ThreadReply;
use crate::slack::SlackApi;
use crate::slack::response_builder::build_unroll_attachment;

/// What happened to one eligible thread reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnrollOutcome {
    Forwarded { permalink: String },
    PermalinkFailed,
    CopyFailed,
}

/// Resolve the reply's permalink, then post the attachment into the same channel.
///
/// Single attempt each. Failures are logged and reported through the outcome;
/// nothing is retried.
pub async fn unroll_reply<A>(api: &A, reply: &ThreadReply) -> UnrollOutcome
where
    A: SlackApi + ?Sized,
{
    let permalink = match api
        .get_message_permalink(&reply.channel_id, &reply.ts)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            error!(
                channel = %reply.channel_id,
                ts = %reply.ts,
                error = %e,
                "cannot get permalink"
            );
            return UnrollOutcome::PermalinkFailed;
        }
    };

    let attachment = build_unroll_attachment(reply, &permalink);

    if let Err(e) = api.post_attachment(&reply.channel_id, &attachment).await {
        error!(channel = %reply.channel_id, error = %e, "cannot copy message");
        return UnrollOutcome::CopyFailed;
    }

    info!(channel = %reply.channel_id, permalink = %permalink, "unrolled thread reply");
    UnrollOutcome::Forwarded { permalink }
}
