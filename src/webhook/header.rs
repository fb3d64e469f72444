//! Parsing of the `t=<timestamp>,v0=<signature>` header.

use crate::webhook::Rejection;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// HTTP header carrying the signature on provider deliveries.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

const TIMESTAMP_PREFIX: &str = "t=";
const SIGNATURE_SEPARATOR: &str = ",v0=";

/// A parsed signature header.
///
/// Keeps the timestamp digits exactly as received: they are part of the
/// signed payload, so `t=0042` and `t=42` sign different bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureHeader {
    timestamp: String,
    timestamp_ms: u64,
    signature: String,
}

impl SignatureHeader {
    /// Create a header from its parts, with the timestamp in canonical
    /// decimal form.
    #[must_use]
    pub fn new(timestamp_ms: u64, signature: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp_ms.to_string(),
            timestamp_ms,
            signature: signature.into(),
        }
    }

    /// Signing time in Unix milliseconds.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Timestamp digits as they appeared in the header.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Base64 signature text, still encoded.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Parse a raw header value.
    ///
    /// The value must be exactly `t=<digits>,v0=<signature>`: both fields,
    /// in that order, with nothing before or after.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::MalformedHeader`] if the value does not match.
    pub fn parse(value: &str) -> Result<Self, Rejection> {
        let rest = value
            .strip_prefix(TIMESTAMP_PREFIX)
            .ok_or_else(|| malformed("missing t= field"))?;

        let (timestamp, signature) = rest
            .split_once(SIGNATURE_SEPARATOR)
            .ok_or_else(|| malformed("missing v0= field"))?;

        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("timestamp is not a decimal number"));
        }
        let timestamp_ms = timestamp
            .parse::<u64>()
            .map_err(|_| malformed("timestamp out of range"))?;

        if signature.is_empty() {
            return Err(malformed("empty signature"));
        }
        if signature.chars().any(char::is_whitespace) {
            return Err(malformed("whitespace in signature"));
        }

        Ok(Self {
            timestamp: timestamp.to_string(),
            timestamp_ms,
            signature: signature.to_string(),
        })
    }

    /// Bytes the provider signed: the literal timestamp text, a period, then
    /// the raw body exactly as received.
    #[must_use]
    pub fn signed_payload(&self, raw_body: &[u8]) -> Vec<u8> {
        let timestamp = self.timestamp.as_bytes();
        let mut payload = Vec::with_capacity(timestamp.len() + 1 + raw_body.len());
        payload.extend_from_slice(timestamp);
        payload.push(b'.');
        payload.extend_from_slice(raw_body);
        payload
    }

    /// First hash pass: SHA-256 of [`Self::signed_payload`].
    ///
    /// The RSA signature is made over this digest, and the signature
    /// primitive hashes it once more.
    #[must_use]
    pub fn signed_digest(&self, raw_body: &[u8]) -> [u8; 32] {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(self.signed_payload(raw_body)));
        digest
    }

    /// Decode the base64 signature.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Decoding`] if the signature is not valid base64.
    pub fn decode_signature(&self) -> Result<Vec<u8>, Rejection> {
        STANDARD
            .decode(&self.signature)
            .map_err(|e| Rejection::Decoding(format!("signature is not valid base64: {e}")))
    }
}

impl FromStr for SignatureHeader {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{TIMESTAMP_PREFIX}{}{SIGNATURE_SEPARATOR}{}",
            self.timestamp, self.signature
        )
    }
}

fn malformed(reason: &str) -> Rejection {
    Rejection::MalformedHeader(reason.to_string())
}
