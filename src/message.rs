//! Typed chat messages produced by the transcript scan.
//!
//! A [`Message`] is one record of the exported conversation: a timestamped
//! line plus any continuation lines that followed it, or a preamble line seen
//! before the first timestamp.
//!
//! # Examples
//!
//! ```
//! use chatlog::message::{Message, MessageKind};
//! use chrono::NaiveDate;
//!
//! let when = NaiveDate::from_ymd_opt(2023, 1, 2)
//!     .unwrap()
//!     .and_hms_opt(9, 41, 0)
//!     .unwrap();
//!
//! let msg = Message::new(0, MessageKind::Text, "Hello there", "raw line")
//!     .with_sender("Alice")
//!     .with_datetime(when);
//!
//! assert_eq!(msg.date_key(), Some("2023-01-02"));
//! assert_eq!(msg.time_label().as_deref(), Some("9:41 AM"));
//! ```
//!
//! ## Serialization
//!
//! Field names are camelCase so the records can be handed to a presentation
//! layer unchanged. Optional fields are omitted when absent.
//!
//! ```
//! use chatlog::message::{Message, MessageKind};
//!
//! let msg = Message::preamble(0, "Chat history");
//! let json = serde_json::to_string(&msg)?;
//!
//! assert!(!json.contains("dateKey"));
//! assert!(json.contains("\"kind\":\"system\""));
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::parsing::attachment::{guess_mime, media_key};

/// The three content classes a message can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Authored text.
    Text,
    /// Authorless metadata: encryption notices, membership changes, preamble lines.
    System,
    /// A reference to a media or document file.
    Attachment,
}

impl MessageKind {
    /// Returns the lowercase wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::System => "system",
            MessageKind::Attachment => "attachment",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file referenced from a message body.
///
/// The parser never touches attachment bytes. It only records the filename
/// as written in the transcript and a MIME type guessed from its extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    /// Filename exactly as captured from the body.
    pub filename: String,
    /// MIME type guessed from the extension (`application/octet-stream` if unknown).
    pub mime: String,
}

impl Attachment {
    /// Creates an attachment, guessing the MIME type from the filename.
    pub fn from_filename(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let mime = guess_mime(&filename).to_string();
        Self { filename, mime }
    }

    /// Key under which a media index should look this file up.
    pub fn media_key(&self) -> String {
        media_key(&self.filename)
    }
}

/// One emitted chat record.
///
/// | Field | Description |
/// |-------|-------------|
/// | `id` | Zero-based, contiguous, in emission order |
/// | `datetime` | Wall-clock time from the transcript, if recognized |
/// | `date_key` | `YYYY-MM-DD`, present iff `datetime` is |
/// | `sender` | Display name; `None` for authorless lines |
/// | `kind` | [`MessageKind`] |
/// | `text` | Body, or caption for attachments |
/// | `attachment` | Present iff `kind` is [`MessageKind::Attachment`] |
/// | `raw` | The original line(s), joined by the input's line separator |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Position in emission order.
    pub id: u64,

    /// Wall-clock time as written in the transcript.
    ///
    /// Exports carry no zone information, so this is kept as a local
    /// calendar date and clock time. Use [`Message::local_datetime`] to pin
    /// it to the machine's time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<NaiveDateTime>,

    /// Canonical `YYYY-MM-DD` grouping key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_key: Option<String>,

    /// Display name of the author.
    #[serde(default)]
    pub sender: Option<String>,

    /// Content class.
    pub kind: MessageKind,

    /// Message body. Multi-line bodies are joined with `\n`.
    pub text: String,

    /// Referenced file, for attachment messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,

    /// Original transcript line(s).
    pub raw: String,
}

impl Message {
    /// Creates a message with no timestamp, sender or attachment.
    pub fn new(id: u64, kind: MessageKind, text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            id,
            datetime: None,
            date_key: None,
            sender: None,
            kind,
            text: text.into(),
            attachment: None,
            raw: raw.into(),
        }
    }

    /// Creates the system record emitted for a line seen before any timestamp.
    pub fn preamble(id: u64, line: &str) -> Self {
        Self::new(id, MessageKind::System, line, line)
    }

    /// Sets the timestamp and derives the matching `date_key`.
    #[must_use]
    pub fn with_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.date_key = Some(date_key_for(&datetime));
        self.datetime = Some(datetime);
        self
    }

    /// Sets the sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Attaches a file and marks the message as [`MessageKind::Attachment`].
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.kind = MessageKind::Attachment;
        self.attachment = Some(attachment);
        self
    }

    /// Returns the sender name, if any.
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Returns the `YYYY-MM-DD` grouping key, if the message is timestamped.
    pub fn date_key(&self) -> Option<&str> {
        self.date_key.as_deref()
    }

    /// Returns `true` for system messages.
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    /// Returns `true` for attachment messages.
    pub fn is_attachment(&self) -> bool {
        self.kind == MessageKind::Attachment
    }

    /// Formats the clock time as `9:41 PM`.
    pub fn time_label(&self) -> Option<String> {
        self.datetime.map(|dt| dt.format("%-I:%M %p").to_string())
    }

    /// Resolves the wall-clock timestamp against the local time zone.
    ///
    /// Ambiguous times (clocks going back) resolve to the earlier instant.
    /// Times that fall into a gap (clocks going forward) are shifted forward
    /// by an hour.
    pub fn local_datetime(&self) -> Option<DateTime<Local>> {
        let naive = self.datetime?;
        match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => Local
                .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest(),
        }
    }
}

/// Formats a timestamp as a `YYYY-MM-DD` grouping key.
pub fn date_key_for(datetime: &NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d").to_string()
}
