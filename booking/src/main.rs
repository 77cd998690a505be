//! Terminal chat demo for the booking conversation.
//!
//! Runs the full conversation loop against a real store. Plain lines are
//! sent as user messages; a few slash commands cover the selections a chat
//! UI would render as controls:
//!
//! ```text
//! /lang <en|hi|bn>      switch language
//! /region <name>        select a region
//! /pay <method>         activate a payment method button
//! /quit                 leave
//! ```
//!
//! With `MUSEUM_CHECKOUT_KEY_ID` and `MUSEUM_CHECKOUT_ENDPOINT` set the
//! hosted checkout gateway is used; otherwise the direct gateway offers its
//! static methods.

use anyhow::Context;
use museum_chat_booking::payment::checkout::CheckoutGateway;
use museum_chat_booking::payment::direct::DirectGateway;
use museum_chat_booking::{
    BookingAction, BookingConfig, BookingEnvironment, BookingReducer, BookingState, Catalog,
    Language, MessageContent, PaymentGateway, PaymentMethod, Region, Sender,
};
use museum_chat_core::environment::SystemClock;
use museum_chat_runtime::Store;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Pick the payment gateway binding from configuration
fn gateway_from(config: &BookingConfig) -> anyhow::Result<Arc<dyn PaymentGateway>> {
    match (&config.checkout_key_id, &config.checkout_endpoint) {
        (Some(key_id), Some(endpoint)) => {
            let endpoint = reqwest::Url::parse(endpoint)
                .with_context(|| format!("invalid checkout endpoint {endpoint}"))?;
            Ok(Arc::new(CheckoutGateway::new(key_id.clone(), endpoint)))
        }
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!(
                "checkout key id and endpoint must both be set; falling back to direct payments"
            );
            Ok(Arc::new(DirectGateway::new()))
        }
        (None, None) => Ok(Arc::new(DirectGateway::new())),
    }
}

/// Print transcript entries appended since the last call
fn print_new_messages(messages: &[museum_chat_booking::Message], printed: &mut usize) {
    for message in &messages[*printed..] {
        match (&message.sender, &message.content) {
            (Sender::User, MessageContent::Text(text)) => println!("you: {text}"),
            (Sender::Bot, MessageContent::Text(text)) => println!("bot: {text}"),
            (_, MessageContent::PaymentPrompt { total, methods }) => {
                let labels: Vec<&str> = methods.iter().map(PaymentMethod::as_str).collect();
                println!(
                    "bot: [pay ₹{} - /pay {}]",
                    total.rupees(),
                    labels.join(" | /pay ")
                );
            }
        }
    }
    *printed = messages.len();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = BookingConfig::from_env();
    let gateway = gateway_from(&config)?;
    let payment_timeout = config.payment_timeout;
    let language = config.default_language;

    let environment = BookingEnvironment::new(
        gateway,
        Arc::new(SystemClock),
        Arc::new(Catalog::builtin()),
        config,
    );
    let store = Store::new(
        BookingState::with_language(language),
        BookingReducer::new(),
        environment,
    );

    let mut printed = 0;
    store.send(BookingAction::SessionStarted).await;
    let transcript = store.state(|s| s.transcript.snapshot().to_vec()).await;
    print_new_messages(&transcript, &mut printed);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if line == "/quit" {
            break;
        } else if let Some(code) = line.strip_prefix("/lang ") {
            match Language::parse(code) {
                Some(language) => {
                    store
                        .send(BookingAction::LanguageSelected { language })
                        .await;
                }
                None => println!("unknown language code {code:?} (en, hi, bn)"),
            }
        } else if let Some(label) = line.strip_prefix("/region ") {
            match Region::parse(label) {
                Some(region) => {
                    store.send(BookingAction::RegionSelected { region }).await;
                }
                None => println!("unknown region {label:?}"),
            }
        } else if let Some(label) = line.strip_prefix("/pay ") {
            let method = PaymentMethod::new(label.trim());
            // Block on the outcome: this is the demo's rendering choice,
            // not a constraint of the store.
            let outcome = store
                .send_and_wait_for(
                    BookingAction::PaymentMethodSelected { method },
                    |action| {
                        matches!(
                            action,
                            BookingAction::PaymentSucceeded { .. }
                                | BookingAction::PaymentFailed { .. }
                        )
                    },
                    payment_timeout + std::time::Duration::from_secs(5),
                )
                .await;
            if let Err(error) = outcome {
                tracing::warn!(%error, "no payment outcome arrived");
            }
        } else {
            store.send(BookingAction::UserMessage { text: line }).await;
        }

        let transcript = store.state(|s| s.transcript.snapshot().to_vec()).await;
        print_new_messages(&transcript, &mut printed);
    }

    Ok(())
}
