//! Direct payment gateway binding.
//!
//! The static-buttons binding: the conversation itself presents the
//! payment methods and the charge settles in-process.
//! Useful for development and demos; a production deployment would bind the
//! hosted checkout instead.

use super::{
    GatewayError, GatewayResult, PaymentGateway, PaymentMethod, PaymentReceipt, PaymentRequest,
    TransactionId,
};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// The static method set offered by the direct gateway
const METHODS: [&str; 3] = ["UPI", "Card", "Net Banking"];

/// Payment gateway settling charges in-process
#[derive(Clone, Debug)]
pub struct DirectGateway {
    processing_delay: Duration,
}

impl DirectGateway {
    /// Create a gateway with the default simulated processing delay
    #[must_use]
    pub const fn new() -> Self {
        Self {
            processing_delay: Duration::from_millis(100),
        }
    }

    /// Create a gateway with a custom processing delay
    #[must_use]
    pub const fn with_processing_delay(processing_delay: Duration) -> Self {
        Self { processing_delay }
    }
}

impl Default for DirectGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentGateway for DirectGateway {
    fn label(&self) -> &str {
        "UPI, Card or Net Banking"
    }

    fn methods(&self) -> Vec<PaymentMethod> {
        METHODS.iter().map(|&label| PaymentMethod::new(label)).collect()
    }

    fn charge(
        &self,
        request: PaymentRequest,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        let delay = self.processing_delay;
        let known = METHODS
            .iter()
            .any(|&label| label == method.as_str());

        Box::pin(async move {
            if !known {
                return Err(GatewayError::Declined {
                    reason: format!("unknown payment method {method}"),
                });
            }

            tokio::time::sleep(delay).await;

            let transaction_id = TransactionId::new(format!("txn_{}", uuid::Uuid::new_v4()));
            tracing::info!(
                amount_paise = request.amount.paise(),
                %method,
                %transaction_id,
                "direct charge settled"
            );

            Ok(PaymentReceipt {
                method,
                transaction_id,
            })
        })
    }
}
