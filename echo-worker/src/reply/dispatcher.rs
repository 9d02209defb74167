//! Event dispatch: one reply per message event, in input order.

use tracing::{error, info};

use super::client::{ReplyClient, ReplyMessage};
use crate::config::ReplyFailurePolicy;
use crate::error::{BotError, FailedReply};
use crate::webhook::{Event, EventKind, Message};

/// Reply sent for message kinds that cannot be echoed back.
pub const UNSUPPORTED_MESSAGE_NOTICE: &str = "おうむ返しに対応していないメッセージです";

/// Counts for one dispatched envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchSummary {
    pub events: usize,
    pub replies: usize,
    pub skipped: usize,
}

/// Build the reply for a message: the same text, or the fixed notice.
pub fn reply_for(message: &Message) -> ReplyMessage {
    match message {
        Message::Text { text, .. } => ReplyMessage::text(text.clone()),
        Message::Other { .. } => ReplyMessage::text(UNSUPPORTED_MESSAGE_NOTICE),
    }
}

/// Reply to every message event in `events`, sequentially and in order.
///
/// Non-message events are skipped. Under [`ReplyFailurePolicy::Abort`] the
/// first failed reply ends the batch; under [`ReplyFailurePolicy::Continue`]
/// every event is attempted and all failures are returned together.
pub async fn dispatch_events<C>(
    client: &C,
    events: &[Event],
    policy: ReplyFailurePolicy,
) -> Result<DispatchSummary, BotError>
where
    C: ReplyClient + ?Sized,
{
    let mut summary = DispatchSummary {
        events: events.len(),
        ..Default::default()
    };
    let mut failures = Vec::new();
    let mut attempted = 0;

    for (index, event) in events.iter().enumerate() {
        let (reply_token, message) = match &event.kind {
            EventKind::Message {
                reply_token,
                message,
            } => (reply_token, message),
            EventKind::Other(event_type) => {
                info!(index, event_type = %event_type, "event_skipped");
                summary.skipped += 1;
                continue;
            }
        };

        let reply = reply_for(message);
        attempted += 1;

        info!(
            index,
            message_kind = message.kind(),
            echoed = matches!(message, Message::Text { .. }),
            "reply_sending"
        );

        match client.reply(reply_token, std::slice::from_ref(&reply)).await {
            Ok(()) => {
                summary.replies += 1;
                info!(index, "reply_sent");
            }
            Err(e) => {
                error!(index, error = %e, "reply_failed");
                match policy {
                    ReplyFailurePolicy::Abort => {
                        return Err(BotError::Reply {
                            index,
                            reply_token: reply_token.clone(),
                            source: e,
                        });
                    }
                    ReplyFailurePolicy::Continue => failures.push(FailedReply {
                        index,
                        reply_token: reply_token.clone(),
                        error: e,
                    }),
                }
            }
        }
    }

    if !failures.is_empty() {
        return Err(BotError::PartialReply {
            attempted,
            failures,
        });
    }

    info!(
        events = summary.events,
        replies = summary.replies,
        skipped = summary.skipped,
        "dispatch_complete"
    );

    Ok(summary)
}
