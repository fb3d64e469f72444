//! Webhook signature verification.
//!
//! The provider signs every delivery with RSA and sends the result in a
//! `t=<timestamp_ms>,v0=<base64 signature>` header. Verification is a
//! two-pass scheme:
//!
//! ```text
//! raw body ──┐
//!            ▼
//! "<t>.<raw body>" ──SHA-256──▶ digest ──RSASSA-PKCS1-v1_5/SHA-256──▶ verify(v0)
//! ```
//!
//! The explicit SHA-256 pass is performed here; the signature primitive
//! hashes the digest a second time. Both are needed to match real
//! provider signatures.
//!
//! Before any cryptography runs, the header is parsed and the timestamp is
//! checked against the freshness window to reject replays.

mod clock;
mod header;
mod key;
mod signer;
mod verifier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use header::{SignatureHeader, SIGNATURE_HEADER};
pub use key::WebhookPublicKey;
pub use signer::WebhookSigner;
pub use verifier::{
    verify, verify_at, Rejection, VerificationOutcome, VerifiedDelivery, Verifier, VerifyOptions,
    DEFAULT_MAX_AGE, DEFAULT_MAX_FUTURE_SKEW,
};
