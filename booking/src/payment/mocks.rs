//! Mock payment gateways for tests.

use super::{
    GatewayError, GatewayResult, PaymentGateway, PaymentMethod, PaymentReceipt, PaymentRequest,
    TransactionId,
};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

/// Scriptable payment gateway.
///
/// Outcomes are served from a queue in FIFO order; with an empty queue every
/// charge succeeds with a deterministic receipt. All received requests are
/// captured for assertions.
#[derive(Clone, Default)]
pub struct MockGateway {
    outcomes: Arc<Mutex<VecDeque<GatewayResult<PaymentReceipt>>>>,
    requests: Arc<Mutex<Vec<(PaymentRequest, PaymentMethod)>>>,
}

impl MockGateway {
    /// Create a gateway that succeeds on every charge
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next unscripted charge
    #[must_use]
    pub fn with_outcome(self, outcome: GatewayResult<PaymentReceipt>) -> Self {
        self.enqueue(outcome);
        self
    }

    /// Queue an outcome for the next unscripted charge
    pub fn enqueue(&self, outcome: GatewayResult<PaymentReceipt>) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    /// All charge requests received so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<(PaymentRequest, PaymentMethod)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PaymentGateway for MockGateway {
    fn label(&self) -> &str {
        "MockPay"
    }

    fn methods(&self) -> Vec<PaymentMethod> {
        vec![PaymentMethod::new("UPI"), PaymentMethod::new("Card")]
    }

    fn charge(
        &self,
        request: PaymentRequest,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((request, method.clone()));

        let scripted = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        Box::pin(async move {
            match scripted {
                Some(outcome) => outcome,
                None => Ok(PaymentReceipt {
                    method,
                    transaction_id: TransactionId::new("mock_txn"),
                }),
            }
        })
    }
}

/// A gateway whose charges never resolve.
///
/// Exists to exercise the payment timeout path.
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingGateway;

impl PendingGateway {
    /// Create a gateway that never answers
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PaymentGateway for PendingGateway {
    fn label(&self) -> &str {
        "PendingPay"
    }

    fn methods(&self) -> Vec<PaymentMethod> {
        vec![PaymentMethod::new("UPI")]
    }

    fn charge(
        &self,
        _request: PaymentRequest,
        _method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        Box::pin(std::future::pending())
    }
}

/// Convenience constructor for a declined outcome
#[must_use]
pub fn declined(reason: &str) -> GatewayResult<PaymentReceipt> {
    Err(GatewayError::Declined {
        reason: reason.to_string(),
    })
}

/// Convenience constructor for an unavailable outcome
#[must_use]
pub fn unavailable(reason: &str) -> GatewayResult<PaymentReceipt> {
    Err(GatewayError::Unavailable {
        reason: reason.to_string(),
    })
}

/// Convenience constructor for a successful receipt
#[must_use]
pub fn settled(method: &str, transaction_id: &str) -> GatewayResult<PaymentReceipt> {
    Ok(PaymentReceipt {
        method: PaymentMethod::new(method),
        transaction_id: TransactionId::new(transaction_id),
    })
}
