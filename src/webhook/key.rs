//! Provider public key handling.

use crate::error::Result;
use crate::webhook::Rejection;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::VerifyingKey;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha2::Sha256;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

const PKCS1_PUBLIC_KEY_LABEL: &str = "-----BEGIN RSA PUBLIC KEY-----";

/// RSA public key trusted to sign webhook deliveries.
///
/// Loaded once from configuration and shared read-only between verifications.
#[derive(Clone)]
pub struct WebhookPublicKey {
    key: RsaPublicKey,
    verifying_key: VerifyingKey<Sha256>,
}

impl WebhookPublicKey {
    /// Parse a PEM-encoded public key.
    ///
    /// Accepts SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`) and PKCS#1
    /// (`BEGIN RSA PUBLIC KEY`). Literal `\n` sequences, as left behind by
    /// single-line environment variables, are treated as newlines.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Decoding`] if the text is not a valid RSA public key.
    pub fn from_pem(pem: &str) -> std::result::Result<Self, Rejection> {
        let pem = pem.trim().replace("\\n", "\n");

        let key = if pem.starts_with(PKCS1_PUBLIC_KEY_LABEL) {
            RsaPublicKey::from_pkcs1_pem(&pem)
                .map_err(|e| Rejection::Decoding(format!("invalid PKCS#1 public key: {e}")))?
        } else {
            RsaPublicKey::from_public_key_pem(&pem)
                .map_err(|e| Rejection::Decoding(format!("invalid public key PEM: {e}")))?
        };

        Ok(Self::from_rsa(key))
    }

    /// Read and parse a PEM public key file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a valid key.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading webhook public key from {}", path.display());
        let pem = fs::read_to_string(path)?;
        Ok(Self::from_pem(&pem)?)
    }

    /// Wrap an already decoded RSA key.
    #[must_use]
    pub fn from_rsa(key: RsaPublicKey) -> Self {
        let verifying_key = VerifyingKey::<Sha256>::new(key.clone());
        Self { key, verifying_key }
    }

    /// Modulus size in bits.
    #[must_use]
    pub fn bits(&self) -> usize {
        self.key.size() * 8
    }

    /// Encode as SubjectPublicKeyInfo PEM.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Decoding`] if encoding fails.
    pub fn to_pem(&self) -> std::result::Result<String, Rejection> {
        self.key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Rejection::Decoding(format!("cannot encode public key: {e}")))
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey<Sha256> {
        &self.verifying_key
    }
}

impl fmt::Debug for WebhookPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookPublicKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl PartialEq for WebhookPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for WebhookPublicKey {}
