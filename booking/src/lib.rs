//! Museum ticket booking conversation.
//!
//! A conversational front-end that walks a user through buying museum
//! tickets: pick a quantity, confirm the computed total, pay. The logic is a
//! pure reducer over a small state machine:
//!
//! ```text
//! AwaitingTicketCount → AwaitingConfirmation → AwaitingPayment
//!        ↑__________________________________________|
//! ```
//!
//! Every invalid input re-prompts in place, so the user always has a way
//! forward; the only asynchronous boundary is the payment charge, modeled as
//! an effect whose outcome feeds back into the reducer.
//!
//! # Quick Start
//!
//! ```no_run
//! use museum_chat_booking::{
//!     BookingAction, BookingConfig, BookingEnvironment, BookingReducer, BookingState, Catalog,
//!     payment::direct::DirectGateway,
//! };
//! use museum_chat_core::environment::SystemClock;
//! use museum_chat_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = BookingConfig::default();
//! let env = BookingEnvironment::new(
//!     Arc::new(DirectGateway::new()),
//!     Arc::new(SystemClock),
//!     Arc::new(Catalog::builtin()),
//!     config,
//! );
//! let store = Store::new(BookingState::new(), BookingReducer::new(), env);
//!
//! store.send(BookingAction::SessionStarted).await;
//! store
//!     .send(BookingAction::UserMessage { text: "7".into() })
//!     .await;
//!
//! let total_messages = store.state(|s| s.transcript.len()).await;
//! # let _ = total_messages;
//! # }
//! ```

// Public modules
pub mod actions;
pub mod config;
pub mod error;
pub mod i18n;
pub mod payment;
pub mod reducer;
pub mod state;
pub mod transcript;

// Re-export commonly used types
pub use actions::{BookingAction, Confirmation};
pub use config::BookingConfig;
pub use error::BookingError;
pub use i18n::{Catalog, MessageKey, TemplateArg, TranslationError};
pub use payment::{
    GatewayError, PaymentGateway, PaymentMethod, PaymentReceipt, PaymentRequest, TransactionId,
};
pub use reducer::{BookingEnvironment, BookingReducer};
pub use state::{BookingState, Language, Money, Region, Step, TicketCount};
pub use transcript::{Message, MessageContent, Sender, Sequence, Transcript};
