//! Authenticity and freshness gate for webhook deliveries.
//!
//! A delivery is accepted only when its signature header parses, its
//! timestamp is inside the freshness window, and the RSA signature verifies
//! over `SHA-256("<timestamp>.<raw body>")`.

use crate::config::WebhookConfig;
use crate::error::Result;
use crate::event::WebhookEvent;
use crate::webhook::clock::{Clock, SystemClock};
use crate::webhook::header::SignatureHeader;
use crate::webhook::key::WebhookPublicKey;
use rsa::pkcs1v15::Signature;
use rsa::signature::Verifier as _;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default freshness window (10 minutes).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_millis(600_000);

/// Default tolerance for timestamps ahead of the local clock (5 minutes).
pub const DEFAULT_MAX_FUTURE_SKEW: Duration = Duration::from_millis(300_000);

/// Why a delivery was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The signature header does not match `t=<timestamp>,v0=<signature>`.
    #[error("malformed signature header: {0}")]
    MalformedHeader(String),

    /// The timestamp is older than the freshness window.
    #[error("stale signature: {age_ms} ms old, limit {max_age_ms} ms")]
    StaleSignature {
        /// Age of the timestamp.
        age_ms: u64,
        /// Configured freshness window.
        max_age_ms: u64,
    },

    /// The timestamp is further in the future than the clock skew allowance.
    #[error("signature timestamp {skew_ms} ms in the future, limit {max_skew_ms} ms")]
    TimestampInFuture {
        /// How far ahead of the local clock the timestamp is.
        skew_ms: u64,
        /// Configured skew allowance.
        max_skew_ms: u64,
    },

    /// The signature does not verify for this body, timestamp and key.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The signature is not base64, or the public key is not a valid PEM.
    #[error("decoding error: {0}")]
    Decoding(String),
}

impl Rejection {
    /// True for deployment problems (bad key or encoding) as opposed to
    /// deliveries that look forged or replayed.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Decoding(_))
    }

    /// Short machine-readable reason, suitable for logs and metrics labels.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedHeader(_) => "malformed_header",
            Self::StaleSignature { .. } => "stale_signature",
            Self::TimestampInFuture { .. } => "timestamp_in_future",
            Self::SignatureMismatch => "signature_mismatch",
            Self::Decoding(_) => "decoding_error",
        }
    }
}

/// Options controlling the freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Maximum accepted age of the signature timestamp.
    pub max_age: Duration,
    /// Skip the freshness check entirely. Only for replaying captured fixtures.
    pub allow_replay: bool,
    /// Maximum accepted distance of a timestamp ahead of the local clock.
    /// `None` accepts any future timestamp.
    pub max_future_skew: Option<Duration>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            allow_replay: false,
            max_future_skew: Some(DEFAULT_MAX_FUTURE_SKEW),
        }
    }
}

impl VerifyOptions {
    /// Options for replaying captured deliveries: no freshness check.
    #[must_use]
    pub fn replay() -> Self {
        Self {
            allow_replay: true,
            ..Self::default()
        }
    }

    /// Set the freshness window.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set the future clock skew allowance.
    #[must_use]
    pub fn with_max_future_skew(mut self, skew: Option<Duration>) -> Self {
        self.max_future_skew = skew;
        self
    }
}

/// A delivery that passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedDelivery {
    /// Signing time from the header, Unix milliseconds.
    pub timestamp_ms: u64,
    /// Age at verification time. Negative when the sender's clock is ahead.
    pub age_ms: i64,
}

/// Result of a single verification.
pub type VerificationOutcome = std::result::Result<VerifiedDelivery, Rejection>;

/// Verify a delivery against a PEM public key using the system clock.
///
/// `raw_body` must be the request body exactly as received, before any JSON
/// parsing.
///
/// # Errors
///
/// Returns the [`Rejection`] describing the first failed check.
pub fn verify(
    raw_body: &[u8],
    signature_header: &str,
    public_key_pem: &str,
    options: &VerifyOptions,
) -> VerificationOutcome {
    verify_at(raw_body, signature_header, public_key_pem, options, &SystemClock)
}

/// Verify a delivery against a PEM public key using an explicit clock.
///
/// # Errors
///
/// Returns the [`Rejection`] describing the first failed check.
pub fn verify_at(
    raw_body: &[u8],
    signature_header: &str,
    public_key_pem: &str,
    options: &VerifyOptions,
    clock: &dyn Clock,
) -> VerificationOutcome {
    let outcome = evaluate(raw_body, signature_header, options, clock.now_ms(), || {
        WebhookPublicKey::from_pem(public_key_pem)
    });
    log_outcome(&outcome);
    outcome
}

/// Verifier holding a key loaded once at startup.
///
/// Cheap to share: every call only reads its inputs, the key and the clock.
#[derive(Clone)]
pub struct Verifier {
    key: WebhookPublicKey,
    options: VerifyOptions,
    clock: Arc<dyn Clock>,
}

impl Verifier {
    /// Create a verifier using the system clock.
    #[must_use]
    pub fn new(key: WebhookPublicKey, options: VerifyOptions) -> Self {
        Self {
            key,
            options,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build a verifier from the webhook section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no public key is configured or it cannot be loaded.
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        let key = config.load_public_key()?;
        let options = config.options();
        debug!(
            "Webhook verifier initialized (key_bits={}, max_age_ms={}, allow_replay={})",
            key.bits(),
            options.max_age.as_millis(),
            options.allow_replay
        );
        Ok(Self::new(key, options))
    }

    /// Replace the clock used for freshness checks.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The trusted public key.
    #[must_use]
    pub fn public_key(&self) -> &WebhookPublicKey {
        &self.key
    }

    /// The active options.
    #[must_use]
    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Verify a delivery.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] describing the first failed check.
    pub fn verify(&self, raw_body: &[u8], signature_header: &str) -> VerificationOutcome {
        let outcome = evaluate(
            raw_body,
            signature_header,
            &self.options,
            self.clock.now_ms(),
            || Ok(&self.key),
        );
        log_outcome(&outcome);
        outcome
    }

    /// Boolean form of [`Self::verify`].
    #[must_use]
    pub fn is_valid(&self, raw_body: &[u8], signature_header: &str) -> bool {
        self.verify(raw_body, signature_header).is_ok()
    }

    /// Verify a delivery, then parse its body as a provider event.
    ///
    /// The body is only parsed once the signature gate has passed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Rejected`] if verification fails, or
    /// [`crate::Error::Event`] if the verified body is not an event envelope.
    pub fn verify_event(&self, raw_body: &[u8], signature_header: &str) -> Result<WebhookEvent> {
        self.verify(raw_body, signature_header)?;
        WebhookEvent::from_slice(raw_body)
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn evaluate<K, F>(
    raw_body: &[u8],
    signature_header: &str,
    options: &VerifyOptions,
    now_ms: i64,
    load_key: F,
) -> VerificationOutcome
where
    K: Borrow<WebhookPublicKey>,
    F: FnOnce() -> std::result::Result<K, Rejection>,
{
    let header = SignatureHeader::parse(signature_header)?;
    let age_ms = check_freshness(&header, options, now_ms)?;
    let signature = header.decode_signature()?;
    let key = load_key()?;
    let key: &WebhookPublicKey = key.borrow();
    let digest = header.signed_digest(raw_body);

    let signature =
        Signature::try_from(signature.as_slice()).map_err(|_| Rejection::SignatureMismatch)?;
    key.verifying_key()
        .verify(&digest, &signature)
        .map_err(|_| Rejection::SignatureMismatch)?;

    debug!(
        timestamp_ms = header.timestamp_ms(),
        age_ms,
        digest = %hex::encode(digest),
        "Webhook signature verified"
    );

    Ok(VerifiedDelivery {
        timestamp_ms: header.timestamp_ms(),
        age_ms,
    })
}

fn check_freshness(
    header: &SignatureHeader,
    options: &VerifyOptions,
    now_ms: i64,
) -> std::result::Result<i64, Rejection> {
    let age = i128::from(now_ms) - i128::from(header.timestamp_ms());
    let age_ms = i64::try_from(age).unwrap_or(if age < 0 { i64::MIN } else { i64::MAX });

    if options.allow_replay {
        return Ok(age_ms);
    }

    let max_age_ms = duration_ms(options.max_age);
    if age > i128::from(max_age_ms) {
        return Err(Rejection::StaleSignature {
            age_ms: saturating_u64(age),
            max_age_ms,
        });
    }

    if let Some(skew) = options.max_future_skew {
        let max_skew_ms = duration_ms(skew);
        if -age > i128::from(max_skew_ms) {
            return Err(Rejection::TimestampInFuture {
                skew_ms: saturating_u64(-age),
                max_skew_ms,
            });
        }
    }

    Ok(age_ms)
}

fn log_outcome(outcome: &VerificationOutcome) {
    if let Err(rejection) = outcome {
        warn!(reason = rejection.reason(), "Webhook rejected: {rejection}");
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn saturating_u64(value: i128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
