//! Integration tests replaying provider-style webhook deliveries.
//!
//! Fixtures under `tests/fixtures/` were produced with OpenSSL, independently
//! of this crate:
//!
//! ```text
//! printf '%s' "<t>.<body>" | openssl dgst -sha256 -binary \
//!     | openssl dgst -sha256 -sign webhook_test_key.pem | base64 -w0
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod cli;
mod fixtures;

use bridge_webhook::webhook::FixedClock;
use bridge_webhook::{Verifier, VerifyOptions, WebhookPublicKey};
use std::path::PathBuf;

/// Signing time of every fixture header.
pub const FIXTURE_TIMESTAMP_MS: i64 = 1_705_854_411_204;

/// Path of a file under `tests/fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Raw bytes of a fixture file.
pub fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("fixture should exist")
}

/// Fixture file as text.
pub fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

/// Verifier trusting the fixture key, with the clock frozen `offset_ms`
/// after the fixture signing time.
pub fn fixture_verifier(offset_ms: i64) -> Verifier {
    let key = WebhookPublicKey::from_file(&fixture_path("webhook_test_key.pub.pem")).unwrap();
    Verifier::new(key, VerifyOptions::default())
        .with_clock(FixedClock(FIXTURE_TIMESTAMP_MS + offset_ms))
}
