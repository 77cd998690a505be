//! Error types for the booking conversation.

use crate::i18n::TranslationError;
use crate::payment::GatewayError;
use crate::state::TicketCount;
use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Error taxonomy for the booking conversation.
///
/// The first two variants are recoverable input errors: the conversation
/// re-prompts in place and nothing else changes. Translation errors are
/// deployment defects and are surfaced fail-fast. Payment errors are
/// surfaced to the user and leave the conversation in the payment step so
/// another attempt can be made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    /// User text is not an integer in `[1, 100]`.
    #[error(
        "Invalid ticket count {input:?}: enter a number between {min} and {max}",
        min = TicketCount::MIN,
        max = TicketCount::MAX
    )]
    InvalidTicketCount {
        /// The rejected input
        input: String,
    },

    /// User text is not a recognizable yes/no reply.
    #[error("Unrecognized confirmation reply {input:?}")]
    UnrecognizedConfirmation {
        /// The rejected input
        input: String,
    },

    /// Catalog lookup or template expansion failed.
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// The payment gateway reported a failure.
    #[error(transparent)]
    Payment(#[from] GatewayError),
}
