//! Transcript parser: one forward pass from raw text to a [`ParseOutcome`].
//!
//! [`TranscriptParser`] drives the timestamp recognizer, content classifier
//! and segmenter over every line, reports progress, and assembles the final
//! chat. It is the outer boundary of a run: any panic inside the scan is
//! caught here and turned into [`ParseOutcome::Failure`], so callers always
//! get exactly one outcome.
//!
//! # Example
//!
//! ```rust
//! use chatlog::parser::TranscriptParser;
//!
//! let text = "1/2/23, 9:41 AM - Alice: Hello there\n1/2/23, 9:42 AM - Bob: Hi!";
//! let outcome = TranscriptParser::new().parse_str(text, "WhatsApp Chat with Bob.txt");
//!
//! let chat = outcome.chat().unwrap();
//! assert_eq!(chat.title, "Bob");
//! assert_eq!(chat.participants, vec!["Alice", "Bob"]);
//! assert_eq!(chat.messages.len(), 2);
//! ```

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use tracing::{debug, warn};

use crate::chat::{ChatAssembler, ParseOutcome, ParsedChat};
use crate::config::ParseConfig;
use crate::detect::read_transcript;
use crate::error::Result;
use crate::parsing::classify::ContentClassifier;
use crate::parsing::segment::{SegmentState, Segmenter, split_lines};
use crate::parsing::timestamp::TimestampRecognizer;
use crate::progress::{ProgressCallback, ProgressReporter, no_progress};

/// Marker for a scan abandoned at the caller's request.
struct Stopped;

/// Parser for exported chat transcripts.
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    config: ParseConfig,
}

impl TranscriptParser {
    /// Creates a parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParseConfig) -> Self {
        Self { config }
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parses `text`, deriving the title from `file_name`.
    pub fn parse_str(&self, text: &str, file_name: &str) -> ParseOutcome {
        self.parse_with_progress(text, file_name, &no_progress())
    }

    /// Parses `text`, pushing progress snapshots to `progress`.
    ///
    /// The final 100% snapshot is delivered before this returns.
    pub fn parse_with_progress(&self, text: &str, file_name: &str, progress: &ProgressCallback) -> ParseOutcome {
        self.parse_cancellable(text, file_name, progress, &|| false)
            .unwrap_or_else(|| ParseOutcome::failure("Parsing failed: scan stopped without a stop request"))
    }

    /// Parses `text`, checking `should_stop` before every line.
    ///
    /// Returns `None` if the scan was abandoned; no snapshot or partial
    /// result follows a stop.
    pub fn parse_cancellable(
        &self,
        text: &str,
        file_name: &str,
        progress: &ProgressCallback,
        should_stop: &dyn Fn() -> bool,
    ) -> Option<ParseOutcome> {
        debug!(file_name, bytes = text.len(), "parse started");

        let result = catch_unwind(AssertUnwindSafe(|| self.scan(text, file_name, progress, should_stop)));

        match result {
            Ok(Ok(chat)) => {
                debug!(
                    messages = chat.messages.len(),
                    participants = chat.participants.len(),
                    "parse finished"
                );
                Some(ParseOutcome::Success(chat))
            }
            Ok(Err(Stopped)) => {
                debug!(file_name, "parse abandoned");
                None
            }
            Err(payload) => {
                let message = format!("Parsing failed: {}", panic_message(payload.as_ref()));
                warn!(file_name, %message, "parse failed");
                Some(ParseOutcome::failure(message))
            }
        }
    }

    /// Reads and parses a transcript file.
    ///
    /// The file name becomes the title source. Only reading can fail; an
    /// empty file parses to an empty chat.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParseOutcome> {
        let path = path.as_ref();
        let text = read_transcript(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.parse_str(&text, &file_name))
    }

    fn scan(
        &self,
        text: &str,
        file_name: &str,
        progress: &ProgressCallback,
        should_stop: &dyn Fn() -> bool,
    ) -> std::result::Result<ParsedChat, Stopped> {
        let lines = split_lines(text);
        let reporter = ProgressReporter::new(lines.len(), self.config.progress_interval, progress);

        let mut segmenter = Segmenter::new(
            TimestampRecognizer::with_day_first_fallback(self.config.day_first_fallback),
            ContentClassifier::from_config(&self.config),
        );
        let mut state = SegmentState::Idle;

        for (index, line) in lines.into_iter().enumerate() {
            if should_stop() {
                return Err(Stopped);
            }
            reporter.observe(index);
            state = segmenter.step(state, line);
        }

        let (messages, line_breaks) = segmenter.finish(state);
        let chat = ChatAssembler::new(self.config.default_title.clone()).assemble(messages, line_breaks, file_name);
        reporter.finish();
        Ok(chat)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}

/// Parses `text` with default configuration.
///
/// # Example
///
/// ```rust
/// use chatlog::parse_transcript;
///
/// let outcome = parse_transcript("", "_chat.txt");
/// assert!(outcome.chat().unwrap().messages.is_empty());
/// ```
pub fn parse_transcript(text: &str, file_name: &str) -> ParseOutcome {
    TranscriptParser::new().parse_str(text, file_name)
}
