//! Configuration types for the transcript parser and import helpers.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::ParseConfig;
//! use chatlog::parser::TranscriptParser;
//!
//! let config = ParseConfig::new()
//!     .with_progress_interval(500)
//!     .with_day_first_fallback(true);
//!
//! let parser = TranscriptParser::with_config(config);
//! ```

use serde::{Deserialize, Serialize};

/// Default number of lines between progress snapshots.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 2000;

/// Default title when none can be derived from the file name.
pub const DEFAULT_TITLE: &str = "WhatsApp Chat";

/// Configuration for a transcript scan.
///
/// # Example
///
/// ```rust
/// use chatlog::config::ParseConfig;
///
/// let config = ParseConfig::default();
/// assert_eq!(config.progress_interval, 2000);
/// assert_eq!(config.sender_search_window, 60);
/// assert!(!config.day_first_fallback);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Lines between progress snapshots; `0` disables periodic snapshots (default: 2000)
    pub progress_interval: usize,

    /// The `": "` separating a sender from the body must start before this
    /// character offset (default: 60)
    pub sender_search_window: usize,

    /// Longest accepted sender name, in characters (default: 49)
    pub max_sender_len: usize,

    /// Title used when the file name yields nothing (default: "WhatsApp Chat")
    pub default_title: String,

    /// Keep trying later grammars when a structurally matching timestamp
    /// carries an impossible date (default: false)
    ///
    /// With this off, `31/12/2023, 21:41 - …` matches the US grammar first,
    /// fails validation (month 31) and is treated as a continuation line.
    /// With it on, the day-first slash grammar gets a chance at the line.
    pub day_first_fallback: bool,

    /// Lines sampled when scoring candidate chat files (default: 50)
    pub detection_sample_lines: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            sender_search_window: 60,
            max_sender_len: 49,
            default_title: DEFAULT_TITLE.to_string(),
            day_first_fallback: false,
            detection_sample_lines: 50,
        }
    }
}

impl ParseConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of lines between progress snapshots.
    #[must_use]
    pub fn with_progress_interval(mut self, lines: usize) -> Self {
        self.progress_interval = lines;
        self
    }

    /// Sets the sender search window.
    #[must_use]
    pub fn with_sender_search_window(mut self, chars: usize) -> Self {
        self.sender_search_window = chars;
        self
    }

    /// Sets the longest accepted sender name.
    #[must_use]
    pub fn with_max_sender_len(mut self, chars: usize) -> Self {
        self.max_sender_len = chars;
        self
    }

    /// Sets the fallback title.
    #[must_use]
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Enables or disables the day-first grammar fallback.
    #[must_use]
    pub fn with_day_first_fallback(mut self, enabled: bool) -> Self {
        self.day_first_fallback = enabled;
        self
    }

    /// Sets how many lines are sampled when scoring candidate chat files.
    #[must_use]
    pub fn with_detection_sample_lines(mut self, lines: usize) -> Self {
        self.detection_sample_lines = lines;
        self
    }
}
