//! Transcript parsing building blocks.
//!
//! - [`timestamp`] - recognizes the five regional timestamp grammars
//! - [`classify`] - splits sender from body and picks the message kind
//! - [`attachment`] - attachment markers and MIME guessing
//! - [`segment`] - the line-by-line state machine that emits messages
//!
//! Most callers want [`TranscriptParser`](crate::parser::TranscriptParser),
//! which drives these pieces and assembles the final chat.

pub mod attachment;
pub mod classify;
pub mod segment;
pub mod timestamp;

pub use attachment::{detect_attachment, guess_mime, media_key};
pub use classify::{Classified, ContentClassifier, is_system_event};
pub use segment::{Line, LineEnding, SegmentState, Segmenter, split_lines};
pub use timestamp::{RecognizedTimestamp, TimestampFormat, TimestampRecognizer, looks_like_timestamp};
