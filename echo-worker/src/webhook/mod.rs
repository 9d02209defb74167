//! Webhook processing pipeline.
//!
//! ## Processing Flow
//!
//! ```text
//! body + signature → verify → decode → client init → dispatch_events() → done
//! ```
//!
//! Each step is terminal on failure; nothing is replied unless the body is
//! authenticated and fully decoded.

pub mod types;

use tracing::{info, warn};

use crate::error::BotError;
use crate::reply::{dispatch_events, DispatchSummary, ReplyClient};
use crate::web::signature::verify_signature;
use crate::Config;

pub use types::{Event, EventKind, Message, Source, WebhookEnvelope};

/// Authenticate, decode and dispatch one webhook request.
///
/// `connect` builds the reply client and is only called once the body has
/// been verified and decoded.
pub async fn handle_webhook<C, F>(
    config: &Config,
    signature: &str,
    body: &[u8],
    connect: F,
) -> Result<DispatchSummary, BotError>
where
    C: ReplyClient,
    F: FnOnce(&Config) -> Result<C, BotError>,
{
    if !verify_signature(&config.channel_secret, signature, body) {
        warn!(body_length = body.len(), "webhook_signature_rejected");
        return Err(BotError::InvalidSignature);
    }

    let envelope: WebhookEnvelope = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body_length = body.len(), "webhook_body_malformed");
        BotError::MalformedBody(e)
    })?;

    info!(
        destination = ?envelope.destination,
        event_count = envelope.events.len(),
        "webhook_decoded"
    );

    let client = connect(config)?;

    dispatch_events(&client, &envelope.events, config.reply_failure_policy).await
}
