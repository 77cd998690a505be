//! Hosted checkout gateway binding.
//!
//! Binding for an external hosted checkout widget: the provider renders its
//! own payment surface, so this gateway offers a single method and forwards
//! the charge to the provider's order endpoint. When the provider is not
//! configured - the widget equivalent of the checkout script failing to
//! load - every charge resolves to [`GatewayError::Unavailable`] so the
//! conversation can surface it and keep the session alive.

use super::{
    GatewayError, GatewayResult, PaymentGateway, PaymentMethod, PaymentReceipt, PaymentRequest,
    TransactionId,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Provider label shown in the payment prompt
const PROVIDER: &str = "Razorpay";

/// Wire format of an order posted to the checkout provider
#[derive(Debug, Serialize)]
struct CheckoutOrder<'a> {
    key: &'a str,
    amount: u64,
    currency: &'a str,
    name: &'a str,
    description: &'a str,
    reference: &'a str,
    theme: CheckoutTheme<'a>,
}

#[derive(Debug, Serialize)]
struct CheckoutTheme<'a> {
    color: &'a str,
}

/// Wire format of the provider's acknowledgment
#[derive(Debug, Deserialize)]
struct CheckoutAck {
    id: String,
}

/// Payment gateway backed by a hosted checkout provider
#[derive(Clone, Debug)]
pub struct CheckoutGateway {
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

#[derive(Clone, Debug)]
struct Credentials {
    key_id: String,
    endpoint: reqwest::Url,
}

impl CheckoutGateway {
    /// Create a gateway bound to a provider endpoint
    #[must_use]
    pub fn new(key_id: impl Into<String>, endpoint: reqwest::Url) -> Self {
        Self {
            credentials: Some(Credentials {
                key_id: key_id.into(),
                endpoint,
            }),
            client: reqwest::Client::new(),
        }
    }

    /// Create a gateway whose provider never loaded
    ///
    /// Every charge resolves to [`GatewayError::Unavailable`].
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            credentials: None,
            client: reqwest::Client::new(),
        }
    }
}

impl PaymentGateway for CheckoutGateway {
    fn label(&self) -> &str {
        PROVIDER
    }

    fn methods(&self) -> Vec<PaymentMethod> {
        vec![PaymentMethod::new(PROVIDER)]
    }

    fn charge(
        &self,
        request: PaymentRequest,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        let credentials = self.credentials.clone();
        let client = self.client.clone();

        Box::pin(async move {
            let Some(credentials) = credentials else {
                return Err(GatewayError::Unavailable {
                    reason: "checkout provider is not configured".to_string(),
                });
            };

            let order = CheckoutOrder {
                key: &credentials.key_id,
                amount: request.amount.paise(),
                currency: &request.currency,
                name: &request.display_name,
                description: &request.description,
                reference: &request.reference,
                theme: CheckoutTheme {
                    color: &request.theme,
                },
            };

            tracing::info!(
                amount_paise = request.amount.paise(),
                currency = %request.currency,
                reference = %request.reference,
                "posting checkout order"
            );

            let response = client
                .post(credentials.endpoint.clone())
                .json(&order)
                .send()
                .await
                .map_err(|error| GatewayError::Unavailable {
                    reason: error.to_string(),
                })?;

            if !response.status().is_success() {
                return Err(GatewayError::Declined {
                    reason: format!("provider returned {}", response.status()),
                });
            }

            let ack: CheckoutAck =
                response
                    .json()
                    .await
                    .map_err(|error| GatewayError::Unavailable {
                        reason: format!("malformed provider response: {error}"),
                    })?;

            tracing::info!(transaction_id = %ack.id, "checkout order settled");

            Ok(PaymentReceipt {
                method,
                transaction_id: TransactionId::new(ack.id),
            })
        })
    }
}
