//! Inputs to the booking conversation.
//!
//! Actions unify direct user input (text, selections) with feedback from
//! completed effects (payment outcomes). The reducer is the only
//! interpreter; the rendering layer just constructs these.

use crate::error::BookingError;
use crate::payment::{GatewayError, PaymentMethod, TransactionId};
use crate::state::{Language, Region};

/// Everything that can happen to a booking conversation
#[derive(Clone, Debug, PartialEq)]
pub enum BookingAction {
    /// A fresh session opened; emit the greeting
    SessionStarted,

    /// The user submitted a line of text
    UserMessage {
        /// The raw text as typed
        text: String,
    },

    /// The user picked an interface language
    ///
    /// Orthogonal to the conversation step; affects catalog lookups only.
    LanguageSelected {
        /// The chosen language
        language: Language,
    },

    /// The user picked a region from the static list
    ///
    /// Orthogonal to the conversation step.
    RegionSelected {
        /// The chosen region
        region: Region,
    },

    /// The user activated a payment method button
    PaymentMethodSelected {
        /// The chosen method
        method: PaymentMethod,
    },

    /// Feedback: the gateway settled the charge
    PaymentSucceeded {
        /// Method the charge settled through
        method: PaymentMethod,
        /// Gateway-issued transaction identifier
        transaction_id: TransactionId,
    },

    /// Feedback: the gateway declined, was unreachable, or timed out
    PaymentFailed {
        /// Method that was attempted
        method: PaymentMethod,
        /// What went wrong
        error: GatewayError,
    },
}

/// A recognized yes/no confirmation reply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    /// Proceed to payment
    Yes,
    /// Cancel the booking in progress
    No,
}

impl Confirmation {
    /// Interpret user text as a confirmation reply (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::UnrecognizedConfirmation`] for anything but
    /// yes/no.
    pub fn parse(input: &str) -> Result<Self, BookingError> {
        let reply = input.trim();
        if reply.eq_ignore_ascii_case("yes") {
            Ok(Self::Yes)
        } else if reply.eq_ignore_ascii_case("no") {
            Ok(Self::No)
        } else {
            Err(BookingError::UnrecognizedConfirmation {
                input: input.to_string(),
            })
        }
    }
}
