//! LINE webhook signature verification.
//!
//! LINE signs each request body with HMAC-SHA256 keyed by the channel secret
//! and sends the base64-encoded digest in the `x-line-signature` header.
//! Reference: https://developers.line.biz/en/docs/messaging-api/receiving-messages/#verifying-signatures

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify a LINE webhook signature.
///
/// # Arguments
///
/// * `channel_secret` - The channel secret shared with the LINE platform
/// * `signature` - The raw `x-line-signature` header value
/// * `body` - The request body exactly as received
///
/// # Returns
///
/// `true` only if `signature` is valid base64 and equals the HMAC-SHA256 of
/// `body`. A blank secret, a missing header, or undecodable base64 all
/// return `false`.
pub fn verify_signature(channel_secret: &str, signature: &str, body: &[u8]) -> bool {
    if channel_secret.is_empty() || signature.is_empty() {
        warn!(
            has_channel_secret = !channel_secret.is_empty(),
            has_signature = !signature.is_empty(),
            "line_signature_missing_fields"
        );
        return false;
    }

    let provided = match STANDARD.decode(signature.trim()) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(signature_length = signature.len(), "line_signature_not_base64");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("line_signature_invalid_key");
            return false;
        }
    };
    mac.update(body);

    // verify_slice compares in constant time
    let valid = mac.verify_slice(&provided).is_ok();

    if !valid {
        warn!(
            decoded_length = provided.len(),
            body_length = body.len(),
            "line_signature_mismatch"
        );
    }

    valid
}

#[cfg(test)]
pub(crate) fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).unwrap();
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}
