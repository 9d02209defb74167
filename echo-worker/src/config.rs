//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup and handed to the webhook pipeline by
//! reference, so tests can build a `Config` directly without touching the
//! process environment.

use std::env;
use std::str::FromStr;
use tracing::warn;

/// Default origin of the LINE Messaging API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";

/// What the dispatcher does when a reply call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFailurePolicy {
    /// Stop at the first failed reply; later events are never attempted.
    #[default]
    Abort,
    /// Attempt every event and report all failures together.
    Continue,
}

impl FromStr for ReplyFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(format!("unknown reply failure policy: {other}")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// LINE channel secret, the HMAC key for `x-line-signature`
    pub channel_secret: String,

    /// Bearer token for the reply API
    pub channel_access_token: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Origin of the reply API (overridable for staging or local mocks)
    pub api_base_url: String,

    /// Outbound reply request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Behaviour when a reply call fails mid-batch
    pub reply_failure_policy: ReplyFailurePolicy,
}

impl Config {
    /// Build a config from explicit credentials, using defaults for the rest.
    pub fn new(channel_secret: impl Into<String>, channel_access_token: impl Into<String>) -> Self {
        Config {
            channel_secret: channel_secret.into(),
            channel_access_token: channel_access_token.into(),
            port: 8080,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: 8000,
            reply_failure_policy: ReplyFailurePolicy::Abort,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Missing credentials are kept empty rather than rejected here: an empty
    /// secret makes every signature check fail and an empty access token fails
    /// client construction, both on the first webhook.
    pub fn from_env() -> Self {
        let defaults = Config::new(
            env::var("CHANNEL_SECRET").unwrap_or_default(),
            env::var("CHANNEL_ACCESS_TOKEN").unwrap_or_default(),
        );

        Config {
            port: parse_or("PORT", defaults.port),

            api_base_url: env::var("LINE_API_BASE_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),

            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),

            reply_failure_policy: parse_or("REPLY_FAILURE_POLICY", defaults.reply_failure_policy),

            ..defaults
        }
    }

    /// Whether a non-blank channel secret is present.
    pub fn has_channel_secret(&self) -> bool {
        !self.channel_secret.trim().is_empty()
    }

    /// Whether a non-blank access token is present.
    pub fn has_access_token(&self) -> bool {
        !self.channel_access_token.trim().is_empty()
    }
}

/// Parse an environment variable, falling back to `default` when it is
/// unset or does not parse.
fn parse_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid config value, using default");
            default
        }
    }
}
