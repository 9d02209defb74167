//! Outbound replies.
//!
//! ## Dispatch Flow
//!
//! ```text
//! [Event] → dispatch_events() → ReplyClient::reply() per message event
//! ```

pub mod client;
pub mod dispatcher;

pub use client::{LineClient, ReplyClient, ReplyMessage, ReplyRequest};
pub use dispatcher::{dispatch_events, reply_for, DispatchSummary, UNSUPPORTED_MESSAGE_NOTICE};
