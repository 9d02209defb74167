//! Error taxonomy for a single webhook invocation.
//!
//! Every variant is terminal for the request that produced it. None are
//! retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure of one outbound reply call.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("reply request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The reply API answered with a non-success status.
    #[error("reply API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// One failed reply inside a best-effort batch.
#[derive(Debug)]
pub struct FailedReply {
    pub index: usize,
    pub reply_token: String,
    pub error: ReplyError,
}

/// Errors surfaced to the HTTP layer for one webhook request.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed webhook body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("can't create reply client: {0}")]
    ClientInit(String),

    #[error("can't reply to event {index} (token {reply_token}): {source}")]
    Reply {
        index: usize,
        reply_token: String,
        #[source]
        source: ReplyError,
    },

    #[error("{} of {attempted} replies failed", .failures.len())]
    PartialReply {
        attempted: usize,
        failures: Vec<FailedReply>,
    },
}

impl BotError {
    /// Stable label for logs and response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::InvalidSignature => "invalid_signature",
            BotError::MalformedBody(_) => "malformed_body",
            BotError::ClientInit(_) => "client_init_failure",
            BotError::Reply { .. } => "reply_failure",
            BotError::PartialReply { .. } => "partial_reply_failure",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BotError::InvalidSignature => StatusCode::UNAUTHORIZED,
            BotError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            BotError::ClientInit(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BotError::Reply { .. } | BotError::PartialReply { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                status: self.kind(),
            }),
        )
            .into_response()
    }
}
