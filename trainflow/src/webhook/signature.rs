//! Webhook signature verification.
//!
//! Requests carry an `X-Hub-Signature` header of the form
//! `sha1=<hex(HMAC-SHA1(raw_body, secret))>`, computed over the raw body
//! bytes, never a reserialized form. Verification is constant-time via
//! [`Mac::verify_slice`].

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// The header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Computes the signature header value for a request body.
///
/// Useful for clients, tooling, and tests exercising the server.
#[must_use]
pub fn sign(body: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(body);
    format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a provided signature against the raw body bytes.
///
/// Returns false on a missing header, a malformed value, or a mismatch.
/// Callers must reject the request before parsing the body.
#[must_use]
pub fn verify(body: &[u8], provided: Option<&str>, secret: &[u8]) -> bool {
    let Some(provided) = provided else {
        return false;
    };
    let Some(hex_sig) = provided.strip_prefix("sha1=") else {
        return false;
    };
    let Ok(sig_bytes) = hex::decode(hex_sig) else {
        return false;
    };
    let Ok(mut mac) = HmacSha1::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&sig_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret";

    #[test]
    fn test_sign_then_verify() {
        let body = br#"{"modelRunId":"abc123","modelType":"ner"}"#;
        let signature = sign(body, SECRET);
        assert!(signature.starts_with("sha1="));
        assert!(verify(body, Some(&signature), SECRET));
    }

    #[test]
    fn test_any_byte_change_fails() {
        let body = br#"{"modelRunId":"abc123","modelType":"ner"}"#;
        let signature = sign(body, SECRET);

        let mut tampered = body.to_vec();
        tampered[2] ^= 1;
        assert!(!verify(&tampered, Some(&signature), SECRET));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let body = b"payload";
        let signature = sign(body, SECRET);
        assert!(!verify(body, Some(&signature), b"other_secret"));
    }

    #[test]
    fn test_missing_or_malformed_header_fails() {
        let body = b"payload";
        assert!(!verify(body, None, SECRET));
        assert!(!verify(body, Some(""), SECRET));
        assert!(!verify(body, Some("sha256=deadbeef"), SECRET));
        assert!(!verify(body, Some("sha1=not-hex"), SECRET));

        // Valid digest without the scheme prefix is still rejected.
        let raw_hex = sign(body, SECRET).trim_start_matches("sha1=").to_string();
        assert!(!verify(body, Some(&raw_hex), SECRET));
    }

    #[test]
    fn test_empty_body_is_signable() {
        // HMAC-gated GET endpoints sign an empty message.
        let signature = sign(&[], SECRET);
        assert!(verify(&[], Some(&signature), SECRET));
        assert!(!verify(b"x", Some(&signature), SECRET));
    }
}
