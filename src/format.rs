//! Output format selection.
//!
//! [`OutputFormat`] names a writer from [`core::output`](crate::core::output)
//! and can be picked by name or by the output file's extension. The writers
//! themselves are feature-gated; asking for a format whose feature is off is
//! an [`InvalidFormat`](crate::ChatlogError::InvalidFormat) error.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "json-output")]
//! # fn example() -> chatlog::Result<()> {
//! use chatlog::core::models::OutputConfig;
//! use chatlog::format::{OutputFormat, to_format_string};
//! use chatlog::parse_transcript;
//!
//! let chat = parse_transcript("1/2/23, 9:41 AM - Alice: Hello!", "_chat.txt").into_result()?;
//!
//! let format = OutputFormat::from_path("alice.jsonl")?;
//! let jsonl = to_format_string(&chat, format, &OutputConfig::new())?;
//! assert_eq!(jsonl.lines().count(), 1);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chat::ParsedChat;
use crate::core::models::OutputConfig;
use crate::error::{ChatlogError, Result};

/// Serialized form of a parsed chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// One JSON document: title, participants, stats and messages
    #[default]
    Json,

    /// One JSON object per message per line
    Jsonl,

    /// Semicolon-delimited rows, one per message
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Jsonl, OutputFormat::Csv]
    }

    /// Cargo feature that provides the writer for this format.
    pub fn required_feature(self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
            OutputFormat::Csv => "csv-output",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatlog::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/chat.NDJSON").unwrap(), OutputFormat::Jsonl);
    /// assert!(OutputFormat::from_path("chat.txt").is_err());
    /// ```
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
        ext.parse().map_err(|_| {
            ChatlogError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: json, jsonl, csv"),
            )
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Jsonl => "JSONL",
            OutputFormat::Csv => "CSV",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: '{s}'. Expected one of: json, jsonl, ndjson, csv")),
        }
    }
}

fn missing_feature(format: OutputFormat) -> ChatlogError {
    ChatlogError::invalid_format(
        "output",
        format!(
            "Output format {format} requires the '{}' feature to be enabled",
            format.required_feature()
        ),
    )
}

/// Writes a parsed chat to `path` in the given format.
#[allow(unused_variables)]
pub fn write_to_format(chat: &ParsedChat, path: &str, format: OutputFormat, config: &OutputConfig) -> Result<()> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(chat, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(chat, path, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(chat, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Renders a parsed chat to a string in the given format.
#[allow(unused_variables)]
pub fn to_format_string(chat: &ParsedChat, format: OutputFormat, config: &OutputConfig) -> Result<String> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(chat, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(chat, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(chat, config),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}
