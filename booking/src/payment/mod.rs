//! The payment boundary.
//!
//! The conversation requests a charge through the [`PaymentGateway`] trait
//! and receives exactly one outcome per request. Two interchangeable
//! bindings are provided: [`checkout::CheckoutGateway`] delegates to a
//! hosted checkout provider, [`direct::DirectGateway`] offers a static set
//! of payment methods and settles in-process. The gateway owns no
//! conversation data - it receives a [`PaymentRequest`] by value and
//! returns a [`PaymentReceipt`].

use crate::state::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

pub mod checkout;
pub mod direct;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A payment method label offered by a gateway
///
/// The set of valid labels is gateway-defined ([`PaymentGateway::methods`]);
/// the conversation treats them as opaque.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// Create a payment method label
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The method label
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PaymentMethod {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// Identifier of a settled transaction, as reported by the gateway
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap a gateway-issued transaction identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An outbound charge request
///
/// Amounts are in paise (minor currency units); `reference` is an opaque
/// label correlating the charge with the booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    /// Amount to charge
    pub amount: Money,
    /// ISO currency code, e.g. `INR`
    pub currency: String,
    /// Opaque booking reference
    pub reference: String,
    /// Merchant display name shown by the provider
    pub display_name: String,
    /// Short purchase description
    pub description: String,
    /// Theme color hint for hosted checkout surfaces
    pub theme: String,
}

/// A settled charge
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    /// Method the charge settled through
    pub method: PaymentMethod,
    /// Gateway-issued transaction identifier
    pub transaction_id: TransactionId,
}

/// Payment gateway failure modes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider refused the charge
    #[error("declined: {reason}")]
    Declined {
        /// Provider-reported decline reason
        reason: String,
    },

    /// The payment capability could not be invoked at all
    #[error("payment system unavailable: {reason}")]
    Unavailable {
        /// Why the gateway was unreachable
        reason: String,
    },

    /// No outcome arrived within the configured window
    #[error("payment timed out")]
    Timeout,
}

/// Abstraction over payment providers.
///
/// Exactly one outcome is delivered per [`charge`](PaymentGateway::charge)
/// call. An unreachable provider must resolve to
/// [`GatewayError::Unavailable`] rather than panic or hang - the
/// conversation surfaces it and allows a retry.
pub trait PaymentGateway: Send + Sync {
    /// Human-readable provider label, used in the payment prompt
    fn label(&self) -> &str;

    /// The payment methods this gateway accepts
    fn methods(&self) -> Vec<PaymentMethod>;

    /// Execute a charge
    fn charge(
        &self,
        request: PaymentRequest,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_render_reasons() {
        let declined = GatewayError::Declined {
            reason: "insufficient funds".to_string(),
        };
        assert!(declined.to_string().contains("insufficient funds"));

        let unavailable = GatewayError::Unavailable {
            reason: "checkout script not loaded".to_string(),
        };
        assert!(unavailable.to_string().contains("unavailable"));
    }

    #[test]
    fn payment_method_round_trips_label() {
        let method = PaymentMethod::from("UPI");
        assert_eq!(method.as_str(), "UPI");
        assert_eq!(method.to_string(), "UPI");
    }
}
