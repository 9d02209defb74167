//! Webhook endpoint handlers.
//!
//! The LINE handler hands the raw body and signature header to
//! [`handle_webhook`] and turns its outcome into an HTTP response: 200 with an
//! empty body on success, or the error's status code.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info};

use crate::error::BotError;
use crate::reply::LineClient;
use crate::web::signature::SIGNATURE_HEADER;
use crate::webhook::handle_webhook;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Pooled HTTP client reused by every reply client
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, http: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http,
        }
    }
}

/// Build the router with all endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/callback", post(line_webhook))
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// LINE Webhook
// =============================================================================

/// LINE webhook endpoint.
///
/// This endpoint:
/// 1. Verifies the `x-line-signature` header against the raw body
/// 2. Decodes the event envelope
/// 3. Replies to each message event in order
/// 4. Returns 200 OK once every reply succeeded
pub async fn line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, BotError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    info!(
        has_signature = !signature.is_empty(),
        body_length = body.len(),
        "line_webhook_received"
    );

    let http = state.http.clone();
    match handle_webhook(&state.config, signature, &body, |config| {
        LineClient::new(config, http)
    })
    .await
    {
        Ok(summary) => {
            info!(
                events = summary.events,
                replies = summary.replies,
                skipped = summary.skipped,
                "line_webhook_handled"
            );
            Ok(StatusCode::OK)
        }
        Err(e) => {
            error!(error_kind = e.kind(), error = %e, "line_webhook_failed");
            Err(e)
        }
    }
}
