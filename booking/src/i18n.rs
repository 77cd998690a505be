//! Localized message catalog.
//!
//! Every user-facing line the bot emits is resolved through [`Catalog`]:
//! a `(language, key)` lookup followed by `{name}` placeholder substitution.
//! Lookups are strict in both directions - an absent key is
//! [`TranslationError::MissingKey`] (never a fall back to another language,
//! which would mask a mistranslation) and a template referencing an
//! unsupplied argument is [`TranslationError::MissingParam`]. Both are
//! deployment defects, not runtime conditions to recover from.
//!
//! Resolution is pure and the catalog is immutable after construction, so a
//! shared catalog is safe to use from concurrent sessions.

use crate::state::Language;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Keys of the bot's message templates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKey {
    /// Session-opening welcome
    Greeting,
    /// Ask for a ticket count (opens each booking cycle after the first)
    AskTickets,
    /// Rejected ticket count
    InvalidTickets,
    /// Echo the accepted count and computed total, ask for confirmation
    SelectedTickets,
    /// Re-prompt for a recognizable yes/no
    ConfirmBooking,
    /// Acknowledge cancellation
    BookingCanceled,
    /// Introduce the payment prompt
    PaymentOptions,
    /// Celebrate a completed payment
    PaymentSuccess,
    /// Surface a declined or timed-out charge
    PaymentFailed,
    /// Surface an unreachable payment system
    PaymentUnavailable,
    /// Acknowledge a region selection
    RegionSelected,
}

impl MessageKey {
    /// Every message key
    pub const ALL: [Self; 11] = [
        Self::Greeting,
        Self::AskTickets,
        Self::InvalidTickets,
        Self::SelectedTickets,
        Self::ConfirmBooking,
        Self::BookingCanceled,
        Self::PaymentOptions,
        Self::PaymentSuccess,
        Self::PaymentFailed,
        Self::PaymentUnavailable,
        Self::RegionSelected,
    ];

    /// The catalog name of this key
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::AskTickets => "askTickets",
            Self::InvalidTickets => "invalidTickets",
            Self::SelectedTickets => "selectedTickets",
            Self::ConfirmBooking => "confirmBooking",
            Self::BookingCanceled => "bookingCanceled",
            Self::PaymentOptions => "paymentOptions",
            Self::PaymentSuccess => "paymentSuccess",
            Self::PaymentFailed => "paymentFailed",
            Self::PaymentUnavailable => "paymentUnavailable",
            Self::RegionSelected => "selectState",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors in catalog resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// The catalog has no template for this key under this language
    #[error("No \"{key}\" translation for language \"{language}\"")]
    MissingKey {
        /// Language the lookup ran under
        language: Language,
        /// Key that was absent
        key: MessageKey,
    },

    /// The template references a placeholder the caller did not supply
    #[error("Template \"{key}\" references unsupplied parameter {{{name}}}")]
    MissingParam {
        /// Key of the template being expanded
        key: MessageKey,
        /// Name of the unsupplied placeholder
        name: String,
    },
}

/// A named value substituted into a template placeholder
#[derive(Clone, Debug)]
pub struct TemplateArg {
    name: &'static str,
    value: String,
}

impl TemplateArg {
    /// Construct an argument from a placeholder name and displayable value
    #[must_use]
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// The localized message catalog
#[derive(Clone, Debug)]
pub struct Catalog {
    templates: HashMap<(Language, MessageKey), String>,
}

impl Catalog {
    /// The complete built-in catalog covering every supported language
    #[must_use]
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        for (language, entries) in [
            (Language::En, EN),
            (Language::Hi, HI),
            (Language::Bn, BN),
        ] {
            for &(key, template) in entries {
                templates.insert((language, key), template.to_string());
            }
        }
        Self { templates }
    }

    /// Build a catalog from explicit entries (primarily for tests)
    #[must_use]
    pub fn from_entries<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Language, MessageKey, T)>,
        T: Into<String>,
    {
        Self {
            templates: entries
                .into_iter()
                .map(|(language, key, template)| ((language, key), template.into()))
                .collect(),
        }
    }

    /// Resolve a template and substitute its placeholders
    ///
    /// # Errors
    ///
    /// - [`TranslationError::MissingKey`] when the key has no template under
    ///   `language`; there is deliberately no cross-language fallback.
    /// - [`TranslationError::MissingParam`] when the template references a
    ///   placeholder absent from `args`. Unreferenced extra args are fine.
    pub fn resolve(
        &self,
        language: Language,
        key: MessageKey,
        args: &[TemplateArg],
    ) -> Result<String, TranslationError> {
        let template = self
            .templates
            .get(&(language, key))
            .ok_or(TranslationError::MissingKey { language, key })?;

        expand(template, key, args)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Substitute every `{name}` token in `template` from `args`
fn expand(template: &str, key: MessageKey, args: &[TemplateArg]) -> Result<String, TranslationError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('}') else {
            // A lone brace is literal text
            output.push('{');
            rest = after_open;
            continue;
        };

        let name = &after_open[..close];
        let arg = args.iter().find(|arg| arg.name == name).ok_or_else(|| {
            TranslationError::MissingParam {
                key,
                name: name.to_string(),
            }
        })?;
        output.push_str(&arg.value);
        rest = &after_open[close + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

const EN: &[(MessageKey, &str)] = &[
    (
        MessageKey::Greeting,
        "Hello! Welcome to the Museum Ticket Booking System. Please select your state from the dropdown and then say Hii",
    ),
    (
        MessageKey::AskTickets,
        "How many tickets would you like to purchase? (Enter a number between 1 and 100)",
    ),
    (
        MessageKey::InvalidTickets,
        "Please enter a valid number of tickets between 1 and 100.",
    ),
    (
        MessageKey::SelectedTickets,
        "You selected {tickets} tickets. The total cost is ₹{totalCost}. Would you like to confirm your booking? (yes/no)",
    ),
    (
        MessageKey::ConfirmBooking,
        "Please respond with \"yes\" or \"no\" to confirm your booking.",
    ),
    (
        MessageKey::BookingCanceled,
        "Booking canceled. If you would like to start again, please enter the number of tickets you want to book.",
    ),
    (
        MessageKey::PaymentOptions,
        "Please click the button below to pay ₹{totalCost} using {provider}:",
    ),
    (
        MessageKey::PaymentSuccess,
        "Payment successful using {method}. Thank you!",
    ),
    (
        MessageKey::PaymentFailed,
        "Payment failed: {reason}. Please try again.",
    ),
    (
        MessageKey::PaymentUnavailable,
        "Sorry, there was an error loading the payment system. Please try again later.",
    ),
    (
        MessageKey::RegionSelected,
        "You have selected {state}. Now, how many tickets would you like to purchase? (Enter a number between 1 and 100)",
    ),
];

const HI: &[(MessageKey, &str)] = &[
    (
        MessageKey::Greeting,
        "नमस्ते! संग्रहालय टिकट बुकिंग प्रणाली में आपका स्वागत है। कृपया ड्रॉपडाउन से अपना राज्य चुनें और फिर Hii लिखें",
    ),
    (
        MessageKey::AskTickets,
        "आप कितने टिकट खरीदना चाहेंगे? (1 से 100 के बीच एक संख्या दर्ज करें)",
    ),
    (
        MessageKey::InvalidTickets,
        "कृपया 1 और 100 के बीच टिकटों की एक मान्य संख्या दर्ज करें।",
    ),
    (
        MessageKey::SelectedTickets,
        "आपने {tickets} टिकट चुने हैं। कुल लागत ₹{totalCost} है। क्या आप अपनी बुकिंग की पुष्टि करना चाहेंगे? (yes/no)",
    ),
    (
        MessageKey::ConfirmBooking,
        "अपनी बुकिंग की पुष्टि के लिए कृपया \"yes\" या \"no\" में उत्तर दें।",
    ),
    (
        MessageKey::BookingCanceled,
        "बुकिंग रद्द कर दी गई। फिर से शुरू करने के लिए कृपया टिकटों की संख्या दर्ज करें।",
    ),
    (
        MessageKey::PaymentOptions,
        "कृपया {provider} का उपयोग करके ₹{totalCost} का भुगतान करने के लिए नीचे दिए गए बटन पर क्लिक करें:",
    ),
    (
        MessageKey::PaymentSuccess,
        "{method} के माध्यम से भुगतान सफल रहा। धन्यवाद!",
    ),
    (
        MessageKey::PaymentFailed,
        "भुगतान विफल रहा: {reason}। कृपया पुनः प्रयास करें।",
    ),
    (
        MessageKey::PaymentUnavailable,
        "क्षमा करें, भुगतान प्रणाली लोड करने में त्रुटि हुई। कृपया बाद में पुनः प्रयास करें।",
    ),
    (
        MessageKey::RegionSelected,
        "आपने {state} चुना है। अब, आप कितने टिकट खरीदना चाहेंगे? (1 से 100 के बीच एक संख्या दर्ज करें)",
    ),
];

const BN: &[(MessageKey, &str)] = &[
    (
        MessageKey::Greeting,
        "নমস্কার! মিউজিয়াম টিকিট বুকিং সিস্টেমে আপনাকে স্বাগতম। অনুগ্রহ করে ড্রপডাউন থেকে আপনার রাজ্য নির্বাচন করুন এবং তারপর Hii লিখুন",
    ),
    (
        MessageKey::AskTickets,
        "আপনি কতগুলি টিকিট কিনতে চান? (1 থেকে 100 এর মধ্যে একটি সংখ্যা লিখুন)",
    ),
    (
        MessageKey::InvalidTickets,
        "অনুগ্রহ করে 1 থেকে 100 এর মধ্যে একটি বৈধ টিকিট সংখ্যা লিখুন।",
    ),
    (
        MessageKey::SelectedTickets,
        "আপনি {tickets}টি টিকিট নির্বাচন করেছেন। মোট খরচ ₹{totalCost}। আপনি কি আপনার বুকিং নিশ্চিত করতে চান? (yes/no)",
    ),
    (
        MessageKey::ConfirmBooking,
        "আপনার বুকিং নিশ্চিত করতে অনুগ্রহ করে \"yes\" বা \"no\" লিখুন।",
    ),
    (
        MessageKey::BookingCanceled,
        "বুকিং বাতিল করা হয়েছে। আবার শুরু করতে অনুগ্রহ করে টিকিটের সংখ্যা লিখুন।",
    ),
    (
        MessageKey::PaymentOptions,
        "অনুগ্রহ করে {provider} ব্যবহার করে ₹{totalCost} পরিশোধ করতে নিচের বোতামে ক্লিক করুন:",
    ),
    (
        MessageKey::PaymentSuccess,
        "{method} এর মাধ্যমে পেমেন্ট সফল হয়েছে। ধন্যবাদ!",
    ),
    (
        MessageKey::PaymentFailed,
        "পেমেন্ট ব্যর্থ হয়েছে: {reason}। অনুগ্রহ করে আবার চেষ্টা করুন।",
    ),
    (
        MessageKey::PaymentUnavailable,
        "দুঃখিত, পেমেন্ট সিস্টেম লোড করতে সমস্যা হয়েছে। অনুগ্রহ করে পরে আবার চেষ্টা করুন।",
    ),
    (
        MessageKey::RegionSelected,
        "আপনি {state} নির্বাচন করেছেন। এখন, আপনি কতগুলি টিকিট কিনতে চান? (1 থেকে 100 এর মধ্যে একটি সংখ্যা লিখুন)",
    ),
];
