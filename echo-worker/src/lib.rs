//! LINE echo bot - webhook receiver that replies with what it was sent.
//!
//! This library backs the `echo-bot-web` binary.
//!
//! ## Architecture
//!
//! ```text
//! LINE → POST /callback → verify signature → decode events → reply API (one call per message event)
//! ```

pub mod config;
pub mod error;
pub mod reply;
pub mod web;
pub mod webhook;

// Re-export commonly used types
pub use config::{Config, ReplyFailurePolicy};
pub use error::{BotError, ReplyError};
pub use reply::{dispatch_events, DispatchSummary, LineClient, ReplyClient, ReplyMessage};
pub use web::{verify_signature, AppState};
pub use webhook::{handle_webhook, Event, EventKind, Message, WebhookEnvelope};
