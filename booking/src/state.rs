//! Conversation state types.
//!
//! The booking conversation is driven by a single [`Step`] value; everything
//! else in [`BookingState`] is either validated input (`tickets`), rendering
//! preferences (`language`, `region`) or the transcript the rendering layer
//! observes.

use crate::error::BookingError;
use crate::transcript::Transcript;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete phase of the booking conversation.
///
/// The machine is cyclic: a completed or canceled booking returns to
/// [`Step::AwaitingTicketCount`] so another booking can start in the same
/// session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Waiting for the user to type how many tickets they want
    #[default]
    AwaitingTicketCount,
    /// Waiting for a yes/no reply to the computed total
    AwaitingConfirmation,
    /// Waiting for a payment method selection and the charge outcome
    AwaitingPayment,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingTicketCount => write!(f, "awaiting-ticket-count"),
            Self::AwaitingConfirmation => write!(f, "awaiting-confirmation"),
            Self::AwaitingPayment => write!(f, "awaiting-payment"),
        }
    }
}

/// A validated number of tickets.
///
/// Constructible only through [`TicketCount::parse`], which enforces the
/// `[1, 100]` range, so holding a `TicketCount` is proof of validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TicketCount(u32);

impl TicketCount {
    /// Smallest bookable ticket count
    pub const MIN: u32 = 1;
    /// Largest bookable ticket count
    pub const MAX: u32 = 100;

    /// Parse user text into a ticket count.
    ///
    /// The whole trimmed input must be an integer; trailing garbage is
    /// rejected rather than truncated.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTicketCount`] when the input is not an
    /// integer or falls outside `[1, 100]`.
    pub fn parse(input: &str) -> Result<Self, BookingError> {
        let invalid = || BookingError::InvalidTicketCount {
            input: input.to_string(),
        };

        let value: u32 = input.trim().parse().map_err(|_| invalid())?;
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(invalid())
        }
    }

    /// The validated count
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TicketCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount of money in paise (minor currency units).
///
/// Totals shown to the user are whole rupees; the amount sent to a payment
/// gateway is paise. Keeping the minor unit internally makes both exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Create a `Money` value from paise
    #[must_use]
    pub const fn from_paise(paise: u64) -> Self {
        Self(paise)
    }

    /// Create a `Money` value from whole rupees
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (rupees × 100 > `u64::MAX`).
    /// Use [`Money::checked_from_rupees`] for a non-panicking conversion.
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_rupees(rupees: u64) -> Self {
        match rupees.checked_mul(100) {
            Some(paise) => Self(paise),
            None => panic!("Money::from_rupees overflow"),
        }
    }

    /// Create a `Money` value from whole rupees with overflow checking
    #[must_use]
    pub const fn checked_from_rupees(rupees: u64) -> Option<Self> {
        match rupees.checked_mul(100) {
            Some(paise) => Some(Self(paise)),
            None => None,
        }
    }

    /// The amount in paise
    #[must_use]
    pub const fn paise(self) -> u64 {
        self.0
    }

    /// The amount in whole rupees (rounded down)
    #[must_use]
    pub const fn rupees(self) -> u64 {
        self.0 / 100
    }

    /// Multiply by a count, saturating at the representable maximum
    #[must_use]
    pub const fn saturating_mul(self, count: u32) -> Self {
        Self(self.0.saturating_mul(count as u64))
    }

    /// Multiply by a count with overflow checking
    #[must_use]
    pub const fn checked_mul(self, count: u32) -> Option<Self> {
        match self.0.checked_mul(count as u64) {
            Some(paise) => Some(Self(paise)),
            None => None,
        }
    }
}

/// Supported interface languages.
///
/// Lookups never fall back across languages; every language carries a
/// complete catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English
    #[default]
    En,
    /// Hindi
    Hi,
    /// Bengali
    Bn,
}

impl Language {
    /// All supported languages
    pub const ALL: [Self; 3] = [Self::En, Self::Hi, Self::Bn];

    /// The ISO 639-1 code for this language
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Bn => "bn",
        }
    }

    /// Parse an ISO 639-1 code
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|language| language.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A selectable region (an Indian state).
///
/// Region selection only affects which greeting acknowledgment is shown; it
/// never gates a conversation step. Membership in [`Region::ALL`] is the
/// only validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Region(&'static str);

impl Region {
    /// The selectable region labels, as offered by the booking front-end
    pub const ALL: [&'static str; 28] = [
        "Andhra Pradesh",
        "Arunachal Pradesh",
        "Assam",
        "Bihar",
        "Chhattisgarh",
        "Goa",
        "Gujarat",
        "Haryana",
        "Himachal Pradesh",
        "Jharkhand",
        "Karnataka",
        "Kerala",
        "Madhya Pradesh",
        "Maharashtra",
        "Manipur",
        "Meghalaya",
        "Mizoram",
        "Nagaland",
        "Odisha",
        "Punjab",
        "Rajasthan",
        "Sikkim",
        "Tamil Nadu",
        "Telangana",
        "Tripura",
        "Uttar Pradesh",
        "Uttarakhand",
        "West Bengal",
    ];

    /// Look a label up in the region list (case-insensitive)
    ///
    /// Returns the canonical label on a match, `None` otherwise.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
            .map(|canonical| Self(canonical))
    }

    /// The canonical region label
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one booking conversation.
///
/// Exclusively owned by the reducer; readers observe it through store
/// snapshots. `step` is the only driver of input interpretation, and
/// `tickets` is `Some` exactly from a validated count until the cycle
/// completes or is canceled.
#[derive(Clone, Debug, Default)]
pub struct BookingState {
    /// Current conversation phase
    pub step: Step,
    /// Validated ticket count for the booking in progress
    pub tickets: Option<TicketCount>,
    /// Language used for catalog lookups
    pub language: Language,
    /// Selected region, if any
    pub region: Option<Region>,
    /// The append-only message log
    pub transcript: Transcript,
    /// Most recent error condition, if any
    ///
    /// Recoverable input errors and surfaced payment failures land here as
    /// well as in the transcript; translation failures land ONLY here (a
    /// missing translation is a deployment defect, never silently replaced).
    pub last_error: Option<BookingError>,
}

impl BookingState {
    /// Create the initial state for a fresh session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the initial state with a preselected language
    #[must_use]
    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }
}
