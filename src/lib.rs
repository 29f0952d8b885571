//! # chatlog
//!
//! A Rust library for turning exported WhatsApp chat transcripts into typed,
//! ordered messages.
//!
//! ## Overview
//!
//! A transcript is one large text file where every message starts with a
//! timestamp in one of several regional conventions, bodies may wrap over
//! many lines, and media shows up as filename markers. chatlog scans it once,
//! front to back, and produces:
//!
//! - an ordered list of [`Message`]s, each classified as text, system event
//!   or attachment, with the original lines kept verbatim in `raw`
//! - the participants, in the order they first spoke
//! - a title derived from the export's file name
//!
//! No input line is ever dropped: joining every message's `raw` field with
//! the line break recorded after it gives back the input exactly, even when
//! `\r\n` and `\n` are mixed.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatlog::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let text = "\
//! 1/2/23, 9:41 AM - Messages and calls are end-to-end encrypted.
//! 1/2/23, 9:41 AM - Alice: Hello there
//! how are you?
//! 1/2/23, 9:45 PM - Bob: <attached: IMG-20230102-WA0001.jpg>";
//!
//!     let chat = parse_transcript(text, "WhatsApp Chat with Bob.txt").into_result()?;
//!
//!     assert_eq!(chat.title, "Bob");
//!     assert_eq!(chat.participants, vec!["Alice", "Bob"]);
//!     assert_eq!(chat.messages[0].kind, MessageKind::System);
//!     assert_eq!(chat.messages[1].text, "Hello there\nhow are you?");
//!     assert_eq!(chat.messages[2].attachment.as_ref().unwrap().mime, "image/jpeg");
//!     assert_eq!(chat.reconstruct(), text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`TranscriptParser`], the single-pass driver, and [`parse_transcript`]
//! - [`parsing`] - building blocks: timestamp grammars, content classification, segmentation
//! - [`chat`] - [`ParsedChat`], [`ParseOutcome`], participants, title and [`ChatStats`]
//! - [`message`] - [`Message`], [`MessageKind`], [`Attachment`]
//! - [`progress`] - [`ProgressSnapshot`] and progress callbacks
//! - [`detect`] - finding and loading the transcript inside an export folder
//! - [`worker`] - background parsing with a progress stream (`async` feature)
//! - [`core`] - output writers (CSV, JSON, JSONL)
//! - [`format`] - [`OutputFormat`](format::OutputFormat) selection
//! - [`config`] - [`ParseConfig`]
//! - [`error`] - [`ChatlogError`] and [`Result`]
//! - [`prelude`] - convenient re-exports

pub mod chat;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod detect;
pub mod error;
pub mod format;
pub mod message;
pub mod parser;
pub mod parsing;
pub mod progress;
#[cfg(feature = "async")]
pub mod worker;

// Re-export the main types at the crate root for convenience
pub use chat::{ChatStats, ParseOutcome, ParsedChat};
pub use config::ParseConfig;
pub use error::{ChatlogError, Result};
pub use message::{Attachment, Message, MessageKind};
pub use parser::{TranscriptParser, parse_transcript};
pub use progress::{ProgressCallback, ProgressSnapshot};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatlog::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chat::{ChatStats, ParseOutcome, ParsedChat};
    pub use crate::config::ParseConfig;
    pub use crate::error::{ChatlogError, Result};
    pub use crate::message::{Attachment, Message, MessageKind};
    pub use crate::parser::{TranscriptParser, parse_transcript};
    pub use crate::progress::{ProgressCallback, ProgressSnapshot, no_progress};

    pub use crate::detect::{FileEntry, detect_chat_file, load_transcript};

    pub use crate::core::models::OutputConfig;
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    #[cfg(feature = "async")]
    pub use crate::worker::{CancelToken, ParseHandle, spawn_parse};
}
