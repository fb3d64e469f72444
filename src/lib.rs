//! # bridge-webhook
//!
//! Authenticity and freshness verification for Bridge.xyz webhook deliveries.
//!
//! Receivers hand over the raw request body, the signature header and a
//! trusted public key; the [`webhook::Verifier`] answers with a
//! [`webhook::VerifiedDelivery`] or a [`webhook::Rejection`]. Only after a
//! delivery passes should its body be parsed into a [`event::WebhookEvent`].
//!
//! ```rust,ignore
//! use bridge_webhook::{BridgeConfig, Verifier};
//!
//! let config = BridgeConfig::from_file("bridge.toml".as_ref())?;
//! let verifier = Verifier::from_config(&config.webhook)?;
//!
//! match verifier.verify(&raw_body, signature_header) {
//!     Ok(_) => { /* parse and process */ }
//!     Err(rejection) => { /* respond 4xx, do not touch the body */ }
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod webhook;

pub use config::{BridgeConfig, BridgeEnvironment, WebhookConfig};
pub use error::{Error, Result};
pub use event::{EventCategory, WebhookEvent};
pub use webhook::{
    Rejection, SignatureHeader, VerificationOutcome, VerifiedDelivery, Verifier, VerifyOptions,
    WebhookPublicKey, WebhookSigner,
};
