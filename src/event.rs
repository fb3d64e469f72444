//! Provider webhook event envelope.
//!
//! Only parse a body into an event after it passed
//! [`Verifier::verify`](crate::webhook::Verifier::verify).

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Envelope shared by every webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// API version that produced the event.
    pub api_version: String,
    /// Unique event id, stable across redeliveries.
    pub event_id: String,
    /// Category, e.g. `customer` or `transfer`.
    pub event_category: String,
    /// Fully qualified type, e.g. `customer.updated`.
    pub event_type: String,
    /// Id of the object the event is about.
    pub event_object_id: String,
    /// Status of the object after the event, if it has one.
    #[serde(default)]
    pub event_object_status: Option<String>,
    /// Snapshot of the object.
    #[serde(default)]
    pub event_object: Value,
    /// Changed fields as `[before, after]` pairs.
    #[serde(default)]
    pub event_object_changes: Option<Value>,
    /// When the provider created the event.
    pub event_created_at: DateTime<Utc>,
}

impl WebhookEvent {
    /// Parse a verified raw body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Event`] if the body is not an event envelope.
    pub fn from_slice(raw_body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(raw_body)?)
    }

    /// Parsed event category.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        EventCategory::from(self.event_category.as_str())
    }
}

/// Known event categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Customer created or updated.
    Customer,
    /// KYC link progress.
    KycLink,
    /// Funds drained from a liquidation address.
    LiquidationAddressDrain,
    /// Activity on a static memo.
    StaticMemoActivity,
    /// Transfer state change.
    Transfer,
    /// Deposit activity on a virtual account.
    VirtualAccountActivity,
    /// Card account change.
    CardAccount,
    /// Card authorization or transaction.
    CardTransaction,
    /// Posted card account transaction.
    PostedCardAccountTransaction,
    /// Card withdrawal.
    CardWithdrawal,
    /// External bank account change.
    ExternalAccount,
    /// Custodial wallet change.
    Wallet,
    /// Any category not listed above.
    Other(String),
}

impl EventCategory {
    /// Wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Customer => "customer",
            Self::KycLink => "kyc_link",
            Self::LiquidationAddressDrain => "liquidation_address.drain",
            Self::StaticMemoActivity => "static_memo.activity",
            Self::Transfer => "transfer",
            Self::VirtualAccountActivity => "virtual_account.activity",
            Self::CardAccount => "card_account",
            Self::CardTransaction => "card_transaction",
            Self::PostedCardAccountTransaction => "posted_card_account_transaction",
            Self::CardWithdrawal => "card_withdrawal",
            Self::ExternalAccount => "external_account",
            Self::Wallet => "wallet",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for EventCategory {
    fn from(name: &str) -> Self {
        match name {
            "customer" => Self::Customer,
            "kyc_link" => Self::KycLink,
            "liquidation_address.drain" => Self::LiquidationAddressDrain,
            "static_memo.activity" => Self::StaticMemoActivity,
            "transfer" => Self::Transfer,
            "virtual_account.activity" => Self::VirtualAccountActivity,
            "card_account" => Self::CardAccount,
            "card_transaction" => Self::CardTransaction,
            "posted_card_account_transaction" => Self::PostedCardAccountTransaction,
            "card_withdrawal" => Self::CardWithdrawal,
            "external_account" => Self::ExternalAccount,
            "wallet" => Self::Wallet,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
