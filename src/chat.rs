//! Chat assembly: the final message list, participants and title.
//!
//! The assembler runs once, after segmentation. It does not decide message
//! direction (self vs. other); that depends on a viewer identity chosen by the
//! presentation layer.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TITLE;
use crate::error::ChatlogError;
use crate::message::{Message, MessageKind};
use crate::parsing::segment::LineEnding;

static CHAT_WITH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:whatsapp\s+)?chat\s+with\s+(.+)").expect("title pattern is valid")
});

/// A fully parsed transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedChat {
    /// Every emitted message, in order.
    pub messages: Vec<Message>,

    /// Title derived from the originating file name.
    pub title: String,

    /// Distinct senders in first-seen order.
    pub participants: Vec<String>,

    /// Line break that followed each message but the last.
    #[serde(default)]
    pub line_breaks: Vec<LineEnding>,
}

impl ParsedChat {
    /// Joins every message's `raw` field with the line break that followed it.
    ///
    /// For any input this reproduces the text that was parsed. A missing
    /// break entry falls back to `\n`.
    pub fn reconstruct(&self) -> String {
        let mut text = String::new();
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                let ending = self.line_breaks.get(i - 1).copied().unwrap_or_default();
                text.push_str(ending.as_str());
            }
            text.push_str(&message.raw);
        }
        text
    }

    /// Computes summary statistics.
    pub fn stats(&self) -> ChatStats {
        ChatStats::from_chat(self)
    }

    /// Messages with a given `date_key`, in order.
    pub fn messages_on<'a>(&'a self, date_key: &'a str) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages
            .iter()
            .filter(move |m| m.date_key() == Some(date_key))
    }
}

/// Terminal result of one parse run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParseOutcome {
    /// The scan completed.
    Success(ParsedChat),
    /// The scan hit an internal fault. No partial messages are kept.
    Failure {
        /// Human-readable diagnostic.
        message: String,
    },
}

impl ParseOutcome {
    /// Creates a failure outcome.
    pub fn failure(message: impl Into<String>) -> Self {
        ParseOutcome::Failure {
            message: message.into(),
        }
    }

    /// Returns `true` for a successful outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success(_))
    }

    /// Returns the parsed chat, if the scan succeeded.
    pub fn chat(&self) -> Option<&ParsedChat> {
        match self {
            ParseOutcome::Success(chat) => Some(chat),
            ParseOutcome::Failure { .. } => None,
        }
    }

    /// Returns the failure diagnostic, if the scan failed.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            ParseOutcome::Success(_) => None,
            ParseOutcome::Failure { message } => Some(message),
        }
    }

    /// Converts into a `Result`, mapping failure to [`ChatlogError::ParseFailed`].
    pub fn into_result(self) -> crate::Result<ParsedChat> {
        match self {
            ParseOutcome::Success(chat) => Ok(chat),
            ParseOutcome::Failure { message } => Err(ChatlogError::parse_failed(message)),
        }
    }
}

/// Builds the final [`ParsedChat`] from segmented messages.
#[derive(Debug, Clone)]
pub struct ChatAssembler {
    default_title: String,
}

impl Default for ChatAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl ChatAssembler {
    /// Creates an assembler with the given fallback title.
    pub fn new(default_title: impl Into<String>) -> Self {
        Self {
            default_title: default_title.into(),
        }
    }

    /// Bundles messages with their participants and derived title.
    pub fn assemble(&self, messages: Vec<Message>, line_breaks: Vec<LineEnding>, file_name: &str) -> ParsedChat {
        let participants = collect_participants(&messages);
        let title = derive_title(file_name, &self.default_title);
        ParsedChat {
            messages,
            title,
            participants,
            line_breaks,
        }
    }
}

/// Collects distinct non-null senders in first-seen order.
pub fn collect_participants(messages: &[Message]) -> Vec<String> {
    let mut seen = HashSet::new();
    messages
        .iter()
        .filter_map(|m| m.sender())
        .filter(|sender| seen.insert(*sender))
        .map(str::to_string)
        .collect()
}

/// Derives a chat title from the file it came from.
///
/// Directories and a trailing extension are dropped; a `Chat with <name>`
/// stem yields `<name>`.
///
/// # Example
///
/// ```rust
/// use chatlog::chat::derive_title;
///
/// assert_eq!(derive_title("WhatsApp Chat with John Doe.txt", "WhatsApp Chat"), "John Doe");
/// assert_eq!(derive_title("family.txt", "WhatsApp Chat"), "family");
/// assert_eq!(derive_title(".txt", "WhatsApp Chat"), "WhatsApp Chat");
/// ```
pub fn derive_title(file_name: &str, default_title: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = strip_extension(base).trim();

    let title = CHAT_WITH
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map_or(stem, |m| m.as_str().trim());

    if title.is_empty() {
        default_title.to_string()
    } else {
        title.to_string()
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => stem,
        _ => name,
    }
}

/// Summary numbers for a parsed chat.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStats {
    /// Number of emitted messages.
    pub total_messages: usize,
    /// Distinct senders in first-seen order.
    pub participants: Vec<String>,
    /// `date_key` of the first timestamped message.
    pub first_date: Option<String>,
    /// `date_key` of the last timestamped message.
    pub last_date: Option<String>,
    /// Number of attachment messages.
    pub media_count: usize,
}

impl ChatStats {
    /// Computes statistics for `chat`.
    pub fn from_chat(chat: &ParsedChat) -> Self {
        let dated = || chat.messages.iter().filter_map(|m| m.date_key());
        Self {
            total_messages: chat.messages.len(),
            participants: chat.participants.clone(),
            first_date: dated().next().map(str::to_string),
            last_date: dated().next_back().map(str::to_string),
            media_count: chat
                .messages
                .iter()
                .filter(|m| m.kind == MessageKind::Attachment)
                .count(),
        }
    }
}
