//! Booking configuration.
//!
//! `unit_price` is a fixed configuration constant, not conversation state.
//! Defaults suit the museum deployment (₹250 per ticket, INR, hosted
//! checkout theme); every field can be overridden through `MUSEUM_*`
//! environment variables.

use crate::state::{Language, Money};
use std::time::Duration;

/// Default per-ticket price in rupees
const DEFAULT_UNIT_PRICE_RUPEES: u64 = 250;

/// Default window for a charge to settle before it is treated as timed out
const DEFAULT_PAYMENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for one booking session
#[derive(Clone, Debug)]
pub struct BookingConfig {
    /// Fixed per-ticket price
    pub unit_price: Money,
    /// ISO currency code sent with payment requests
    pub currency: String,
    /// Merchant display name shown by payment providers
    pub display_name: String,
    /// Purchase description shown by payment providers
    pub description: String,
    /// Theme color hint for hosted checkout surfaces
    pub theme_color: String,
    /// Hosted checkout key id; `None` selects the direct gateway
    pub checkout_key_id: Option<String>,
    /// Hosted checkout order endpoint
    pub checkout_endpoint: Option<String>,
    /// How long to wait for a charge outcome before surfacing a timeout
    pub payment_timeout: Duration,
    /// Language the session starts in
    pub default_language: Language,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            unit_price: Money::from_rupees(DEFAULT_UNIT_PRICE_RUPEES),
            currency: "INR".to_string(),
            display_name: "Museum Ticket Booking".to_string(),
            description: "Museum Ticket Purchase".to_string(),
            theme_color: "#07a291db".to_string(),
            checkout_key_id: None,
            checkout_endpoint: None,
            payment_timeout: DEFAULT_PAYMENT_TIMEOUT,
            default_language: Language::En,
        }
    }
}

impl BookingConfig {
    /// Build a configuration from `MUSEUM_*` environment variables
    ///
    /// Unset variables keep their defaults; unparseable values are logged
    /// and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(rupees) = parsed_var::<u64>("MUSEUM_UNIT_PRICE") {
            match Money::checked_from_rupees(rupees) {
                Some(price) => config.unit_price = price,
                None => tracing::warn!(rupees, "MUSEUM_UNIT_PRICE overflows, keeping default"),
            }
        }
        if let Ok(currency) = std::env::var("MUSEUM_CURRENCY") {
            config.currency = currency;
        }
        if let Ok(key_id) = std::env::var("MUSEUM_CHECKOUT_KEY_ID") {
            config.checkout_key_id = Some(key_id);
        }
        if let Ok(endpoint) = std::env::var("MUSEUM_CHECKOUT_ENDPOINT") {
            config.checkout_endpoint = Some(endpoint);
        }
        if let Some(secs) = parsed_var::<u64>("MUSEUM_PAYMENT_TIMEOUT_SECS") {
            config.payment_timeout = Duration::from_secs(secs);
        }
        if let Ok(code) = std::env::var("MUSEUM_LANGUAGE") {
            match Language::parse(&code) {
                Some(language) => config.default_language = language,
                None => tracing::warn!(code, "MUSEUM_LANGUAGE is not a supported language code"),
            }
        }

        config
    }
}

/// Read and parse one environment variable, logging parse failures
fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name, raw, "ignoring unparseable environment variable");
            None
        }
    }
}
