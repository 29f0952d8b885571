//! Unified error types for chatlog.
//!
//! This module provides a single [`ChatlogError`] enum for everything that can
//! go wrong *around* the parser: reading files, picking the chat transcript
//! out of an export folder, writing output, and driving the background worker.
//!
//! The transcript scan itself never returns an error. Malformed timestamps,
//! empty input and preamble text are all handled inline, and an internal fault
//! during a scan is reported as [`ParseOutcome::Failure`](crate::ParseOutcome::Failure).
//! Use [`ParseOutcome::into_result`](crate::ParseOutcome::into_result) to turn
//! that into a [`ChatlogError::ParseFailed`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlog operations.
///
/// # Example
///
/// ```rust
/// use chatlog::error::Result;
/// use chatlog::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlogError>;

/// The error type for all chatlog operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlogError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file or export folder doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No chat transcript was found among the candidate files.
    #[error("No chat transcript found among {candidates} file(s)")]
    NoChatFile {
        /// How many files were inspected
        candidates: usize,
    },

    /// The selected chat transcript contains nothing but whitespace.
    #[error("Chat transcript is empty{}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    EmptyTranscript {
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// A transcript scan finished with a failure outcome.
    #[error("{message}")]
    ParseFailed {
        /// The diagnostic carried by the failure outcome
        message: String,
    },

    /// The caller abandoned a background parse before it produced an outcome.
    #[error("Parse was cancelled before it completed")]
    Cancelled,

    /// The background parse task ended without delivering an outcome.
    #[error("Parse worker failed: {0}")]
    Worker(String),

    /// An input or option had an unexpected shape.
    #[error("Invalid {what}: {message}")]
    InvalidFormat {
        /// What was being interpreted (e.g. "output")
        what: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    ///
    /// Occurs when a transcript is not valid UTF-8 or output conversion fails.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl From<std::string::FromUtf8Error> for ChatlogError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatlogError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlogError {
    /// Creates an empty-transcript error.
    pub fn empty_transcript(path: Option<PathBuf>) -> Self {
        ChatlogError::EmptyTranscript { path }
    }

    /// Creates a parse-failure error from a failure outcome's message.
    pub fn parse_failed(message: impl Into<String>) -> Self {
        ChatlogError::ParseFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(what: &'static str, message: impl Into<String>) -> Self {
        ChatlogError::InvalidFormat {
            what,
            message: message.into(),
        }
    }

    /// Creates a UTF-8 error with context.
    pub fn utf8(context: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        ChatlogError::Utf8 {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlogError::Io(_))
    }

    /// Returns `true` if no chat transcript could be located.
    pub fn is_no_chat_file(&self) -> bool {
        matches!(self, ChatlogError::NoChatFile { .. })
    }

    /// Returns `true` if the transcript was empty.
    pub fn is_empty_transcript(&self) -> bool {
        matches!(self, ChatlogError::EmptyTranscript { .. })
    }

    /// Returns `true` if a scan produced a failure outcome.
    pub fn is_parse_failed(&self) -> bool {
        matches!(self, ChatlogError::ParseFailed { .. })
    }

    /// Returns `true` if a background parse was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatlogError::Cancelled)
    }
}
