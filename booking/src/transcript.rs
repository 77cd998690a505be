//! The append-only conversation transcript.
//!
//! Both the reducer (writer) and the rendering layer (reader) observe the
//! same ordered log. The API surface enforces the log's contract: entries
//! can be appended and read, never edited or removed, and sequence numbers
//! strictly increase.

use crate::payment::PaymentMethod;
use crate::state::Money;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Position of a message in the transcript.
///
/// Sequences start at 0 and increase by exactly 1 per appended message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Sequence(u64);

impl Sequence {
    /// The sequence of the first message in a transcript
    pub const INITIAL: Self = Self(0);

    /// The raw sequence number
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The next sequence (current + 1)
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Sender {
    /// The person booking tickets
    User,
    /// The booking assistant
    Bot,
}

/// What a message displays.
///
/// Most messages are localized text; once a booking is confirmed the bot
/// appends a structured prompt that the rendering layer turns into payment
/// buttons.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MessageContent {
    /// Plain (already localized) text
    Text(String),
    /// Interactive payment prompt
    PaymentPrompt {
        /// Amount the selected method will be charged
        total: Money,
        /// Methods the active gateway accepts
        methods: Vec<PaymentMethod>,
    },
}

impl MessageContent {
    /// The text of this message, if it is plain text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::PaymentPrompt { .. } => None,
        }
    }
}

/// One transcript entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Message author
    pub sender: Sender,
    /// Displayable content
    pub content: MessageContent,
    /// Position in the transcript
    pub sequence: Sequence,
    /// When the message was appended
    pub at: DateTime<Utc>,
}

/// The ordered, append-only message log of one session.
///
/// A new session starts with an empty transcript; nothing is erasable within
/// a session.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Transcript {
    entries: Vec<Message>,
    next: Sequence,
}

impl Transcript {
    /// Create an empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, returning its sequence
    pub fn append(&mut self, sender: Sender, content: MessageContent, at: DateTime<Utc>) -> Sequence {
        let sequence = self.next;
        self.entries.push(Message {
            sender,
            content,
            sequence,
            at,
        });
        self.next = sequence.next();
        sequence
    }

    /// The full ordered message sequence
    #[must_use]
    pub fn snapshot(&self) -> &[Message] {
        &self.entries
    }

    /// The most recent message, if any
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Number of messages in the transcript
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> MessageContent {
        MessageContent::Text(value.to_string())
    }

    #[test]
    fn sequences_increase_strictly() {
        let mut transcript = Transcript::new();
        let at = DateTime::UNIX_EPOCH;

        let first = transcript.append(Sender::Bot, text("hello"), at);
        let second = transcript.append(Sender::User, text("7"), at);
        let third = transcript.append(Sender::Bot, text("confirmed"), at);

        assert_eq!(first, Sequence::INITIAL);
        assert!(first < second && second < third);
        assert_eq!(third.value(), 2);
    }

    #[test]
    fn snapshot_preserves_order() {
        let mut transcript = Transcript::new();
        let at = DateTime::UNIX_EPOCH;
        transcript.append(Sender::Bot, text("one"), at);
        transcript.append(Sender::User, text("two"), at);

        let snapshot = transcript.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].content.as_text(), Some("one"));
        assert_eq!(snapshot[1].content.as_text(), Some("two"));
        assert_eq!(transcript.last().map(|m| m.sender), Some(Sender::User));
    }

    #[test]
    fn empty_transcript_reports_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
        assert!(transcript.last().is_none());
    }
}
