//! Authenticity checks shared by the provider decoders.
//!
//! GitHub signs the body with HMAC-SHA256; GitLab and Bitbucket echo a
//! shared token back in a header. Both comparisons run in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use trigger::{InvalidReason, WebhookRequest, WebhookSecret};

type HmacSha256 = Hmac<Sha256>;

/// Prefix GitHub puts in front of the hex digest in `X-Hub-Signature-256`.
pub const SHA256_PREFIX: &str = "sha256=";

fn keyed_mac(secret: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(secret).expect("HMAC can take any size key")
}

/// Computes the `X-Hub-Signature-256` header value for `body`.
pub fn sign_sha256(secret: &str, body: &[u8]) -> String {
    let mut mac = keyed_mac(secret.as_bytes());
    mac.update(body);
    format!("{SHA256_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a `sha256=<hex>` signature over `body`.
///
/// # Errors
///
/// Returns [`InvalidReason::MalformedSignature`] if the prefix or hex encoding
/// is wrong, and [`InvalidReason::SignatureMismatch`] if the digest differs.
pub fn verify_sha256(secret: &str, signature: &str, body: &[u8]) -> Result<(), InvalidReason> {
    let digest = signature
        .trim()
        .strip_prefix(SHA256_PREFIX)
        .ok_or_else(|| InvalidReason::MalformedSignature {
            detail: format!("expected '{SHA256_PREFIX}' prefix"),
        })?;
    let expected = hex::decode(digest).map_err(|e| InvalidReason::MalformedSignature {
        detail: e.to_string(),
    })?;

    let mut mac = keyed_mac(secret.as_bytes());
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| InvalidReason::SignatureMismatch)
}

/// Checks that header `name` carries exactly the configured secret.
///
/// Skipped when no secret is configured.
///
/// # Errors
///
/// Returns [`InvalidReason::MissingSignature`] if the header is absent and
/// [`InvalidReason::SignatureMismatch`] if it holds a different value.
pub fn verify_token(
    secret: &WebhookSecret,
    request: &WebhookRequest,
    name: &'static str,
) -> Result<(), InvalidReason> {
    if secret.is_empty() {
        return Ok(());
    }
    let token = request
        .header(name)
        .ok_or(InvalidReason::MissingSignature { header: name })?;

    if constant_time_eq(token.as_bytes(), secret.expose().as_bytes()) {
        Ok(())
    } else {
        Err(InvalidReason::SignatureMismatch)
    }
}

/// Compares two byte strings without short-circuiting on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
