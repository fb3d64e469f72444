//! Fixture replay through the public API.

use super::{fixture_bytes, fixture_path, fixture_text, fixture_verifier};
use bridge_webhook::config::WebhookConfig;
use bridge_webhook::webhook::verify;
use bridge_webhook::{EventCategory, Error, Rejection, Verifier, VerifyOptions};

/// The documented "Hello World" delivery verifies with replay enabled.
#[test]
fn test_hello_world_fixture_replay() {
    let body = fixture_bytes("hello_world.json");
    assert_eq!(body, br#"{"message":"Hello World!"}"#);

    let outcome = verify(
        &body,
        &fixture_text("hello_world.signature"),
        &fixture_text("webhook_test_key.pub.pem"),
        &VerifyOptions::replay(),
    );
    assert!(outcome.is_ok(), "fixture should verify: {outcome:?}");
}

/// Same fixture without replay: the timestamp is long past.
#[test]
fn test_hello_world_fixture_is_stale_today() {
    let outcome = verify(
        &fixture_bytes("hello_world.json"),
        &fixture_text("hello_world.signature"),
        &fixture_text("webhook_test_key.pub.pem"),
        &VerifyOptions::default(),
    );
    assert!(matches!(outcome, Err(Rejection::StaleSignature { .. })));
}

/// Re-serializing the JSON changes the bytes and breaks the signature.
#[test]
fn test_reserialized_body_fails() {
    let verifier = fixture_verifier(1_000);
    let header = fixture_text("customer_updated.signature");
    let body = fixture_bytes("customer_updated.json");

    assert!(verifier.is_valid(&body, &header));

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let pretty = serde_json::to_vec_pretty(&value).unwrap();
    assert_eq!(
        verifier.verify(&pretty, &header),
        Err(Rejection::SignatureMismatch)
    );
}

/// A verified customer event is parsed into the envelope.
#[test]
fn test_verify_event() {
    let event = fixture_verifier(60_000)
        .verify_event(
            &fixture_bytes("customer_updated.json"),
            &fixture_text("customer_updated.signature"),
        )
        .unwrap();

    assert_eq!(event.category(), EventCategory::Customer);
    assert_eq!(event.event_type, "customer.updated");
    assert_eq!(event.event_object_id, "cust_9f2a1c");
}

/// A valid signature over a non-event body surfaces as an event error.
#[test]
fn test_verify_event_non_envelope() {
    let err = fixture_verifier(0)
        .verify_event(
            &fixture_bytes("hello_world.json"),
            &fixture_text("hello_world.signature"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Event(_)));
}

/// A stale delivery never gets parsed.
#[test]
fn test_verify_event_stale() {
    let err = fixture_verifier(600_001)
        .verify_event(
            &fixture_bytes("customer_updated.json"),
            &fixture_text("customer_updated.signature"),
        )
        .unwrap_err();
    assert!(matches!(
        err.rejection(),
        Some(Rejection::StaleSignature { .. })
    ));
}

/// Swapping signatures between fixtures fails.
#[test]
fn test_signature_bound_to_body() {
    let verifier = fixture_verifier(0);
    assert!(!verifier.is_valid(
        &fixture_bytes("customer_updated.json"),
        &fixture_text("hello_world.signature"),
    ));
}

/// Another key does not verify the fixture.
#[test]
fn test_untrusted_key() {
    let config = WebhookConfig {
        public_key_path: Some(fixture_path("other_key.pub.pem")),
        allow_replay: true,
        ..WebhookConfig::default()
    };
    let verifier = Verifier::from_config(&config).unwrap();
    assert_eq!(
        verifier.verify(
            &fixture_bytes("hello_world.json"),
            &fixture_text("hello_world.signature"),
        ),
        Err(Rejection::SignatureMismatch)
    );
}

/// PKCS#1 public key file works the same as SubjectPublicKeyInfo.
#[test]
fn test_pkcs1_public_key_from_config() {
    let config = WebhookConfig {
        public_key_path: Some(fixture_path("webhook_test_key.rsa.pub.pem")),
        allow_replay: true,
        ..WebhookConfig::default()
    };
    let verifier = Verifier::from_config(&config).unwrap();
    assert!(verifier.is_valid(
        &fixture_bytes("hello_world.json"),
        &fixture_text("hello_world.signature"),
    ));
}
