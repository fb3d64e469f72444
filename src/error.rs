//! Error types for bridge-webhook.

use crate::webhook::Rejection;
use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of a single verification pass.
///
/// A failed verification on its own is a [`Rejection`]; it only becomes an
/// `Error` when it is propagated through an operation that does more than
/// verify (loading keys, parsing a verified event).
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delivery was rejected by the signature gate.
    #[error("webhook rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The verified body is not a provider event envelope.
    #[error("invalid event payload: {0}")]
    Event(#[from] serde_json::Error),

    /// Producing a signature failed.
    #[error("signing error: {0}")]
    Signing(String),
}

impl Error {
    /// Returns the rejection if this error came from the signature gate.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}
