//! Web server module for handling inbound LINE webhooks.
//!
//! This module provides the HTTP surface:
//! - `POST /callback` receives LINE webhook events
//! - `GET /health` reports liveness
//!
//! Signature verification lives in [`signature`]; everything after it is
//! delegated to [`crate::webhook::handle_webhook`].

pub mod handlers;
pub mod signature;

pub use handlers::{health, line_webhook, router, AppState, HealthResponse};
pub use signature::{verify_signature, SIGNATURE_HEADER};
