//! Content classification for the text following a timestamp.
//!
//! Given `Alice: <attached: IMG-20230102-WA0001.jpg>` the classifier works out
//! that `Alice` is the sender, the body references an image, and the message
//! is therefore an attachment with no caption.

use std::sync::LazyLock;

use regex::RegexSet;
use tracing::trace;

use crate::config::ParseConfig;
use crate::message::{Attachment, MessageKind};

use super::attachment::{detect_attachment, strip_attachments};

/// Phrases that mark an authorless line as a system event.
const SYSTEM_PATTERNS: &[&str] = &[
    // Encryption and security
    r"(?i)messages and calls are end-to-end encrypted",
    r"(?i)messages to this chat and calls are now secured",
    r"(?i)security code changed",
    r"(?i)your security code with .+ changed",
    // Group lifecycle and subject
    r"(?i)created group",
    r"(?i)changed the subject",
    r"(?i)changed this group",
    r"(?i)changed the group",
    r"(?i)deleted this group's icon",
    // Membership
    r"(?i)added you",
    r"(?i)you were added",
    r"(?i)\badded\b",
    r"(?i)removed ",
    r"(?i)left$",
    r"(?i)joined using this group",
    r"(?i)changed their phone number",
    r"(?i)now an admin",
    // Disappearing messages
    r"(?i)disappeared messages",
    r"(?i)turned on disappearing messages",
    r"(?i)turned off disappearing messages",
    // Deleted and pending messages
    r"(?i)waiting for this message",
    r"(?i)this message was deleted",
    r"(?i)you deleted this message",
    // Calls
    r"(?i)missed .+ call",
];

static SYSTEM_SET: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(SYSTEM_PATTERNS).expect("system patterns are valid"));

/// Returns `true` if `text` reads like a system event.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::classify::is_system_event;
///
/// assert!(is_system_event("Messages and calls are end-to-end encrypted."));
/// assert!(is_system_event("Missed voice call"));
/// assert!(!is_system_event("See you tomorrow"));
/// ```
pub fn is_system_event(text: &str) -> bool {
    SYSTEM_SET.is_match(text)
}

/// The classifier's verdict on one timestamped line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    /// Sender, if one could be split off.
    pub sender: Option<String>,
    /// Body text, or caption for attachments. Trimmed.
    pub text: String,
    /// Resolved content class.
    pub kind: MessageKind,
    /// Referenced file, present iff `kind` is `Attachment`.
    pub attachment: Option<Attachment>,
}

/// Splits sender from body and decides the message kind.
#[derive(Debug, Clone, Copy)]
pub struct ContentClassifier {
    sender_search_window: usize,
    max_sender_len: usize,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::from_config(&ParseConfig::default())
    }
}

impl ContentClassifier {
    /// Creates a classifier with default heuristics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a classifier using the sender heuristics from `config`.
    pub fn from_config(config: &ParseConfig) -> Self {
        Self {
            sender_search_window: config.sender_search_window,
            max_sender_len: config.max_sender_len,
        }
    }

    /// Splits `rest` into an optional sender and the body.
    ///
    /// The first `": "` must start within the search window and the trimmed
    /// name before it must be 1 to `max_sender_len` characters with no
    /// newline. Otherwise the whole of `rest` is the body.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatlog::parsing::classify::ContentClassifier;
    ///
    /// let classifier = ContentClassifier::new();
    /// assert_eq!(classifier.split_sender("Alice: Hi: there"), (Some("Alice"), "Hi: there"));
    /// assert_eq!(classifier.split_sender("Alice joined"), (None, "Alice joined"));
    /// ```
    pub fn split_sender<'a>(&self, rest: &'a str) -> (Option<&'a str>, &'a str) {
        let Some(colon) = rest.find(": ") else {
            return (None, rest);
        };

        let offset = rest[..colon].chars().count();
        if offset == 0 || offset >= self.sender_search_window {
            return (None, rest);
        }

        let candidate = rest[..colon].trim();
        let len = candidate.chars().count();
        if len == 0 || len > self.max_sender_len || candidate.contains('\n') {
            return (None, rest);
        }

        (Some(candidate), &rest[colon + 2..])
    }

    /// Classifies the text following a recognized timestamp.
    ///
    /// Resolution order: attachment, then system phrase (authorless lines
    /// only), then authored text. An authorless line that matches nothing is
    /// still a system message.
    pub fn classify(&self, rest: &str) -> Classified {
        let (sender, body) = self.split_sender(rest);
        let body = body.trim();
        let marker = trim_direction_marks(body);

        if let Some(filename) = detect_attachment(marker) {
            return Classified {
                sender: sender.map(str::to_string),
                text: strip_attachments(marker),
                kind: MessageKind::Attachment,
                attachment: Some(Attachment::from_filename(filename)),
            };
        }

        let kind = match sender {
            Some(_) => MessageKind::Text,
            None => {
                if !is_system_event(body) {
                    trace!(body, "authorless line matched no system phrase");
                }
                MessageKind::System
            }
        };

        Classified {
            sender: sender.map(str::to_string),
            text: body.to_string(),
            kind,
            attachment: None,
        }
    }
}

/// Trims the left-to-right marks iOS exports put around attachment markers.
fn trim_direction_marks(body: &str) -> &str {
    body.trim_matches(|c: char| c.is_whitespace() || c == '\u{200e}')
}
