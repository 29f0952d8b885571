//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter, one row per message - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON document with title, participants, stats and messages - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one message per line - requires `json-output` feature
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatlog::Result<()> {
//! use chatlog::core::output::{to_csv, write_json, write_jsonl};
//! use chatlog::core::models::OutputConfig;
//! use chatlog::parse_transcript;
//!
//! let chat = parse_transcript("1/2/23, 9:41 AM - Alice: Hello!", "_chat.txt").into_result()?;
//! let config = OutputConfig::new().with_raw();
//!
//! write_json(&chat, "output.json", &config)?;
//! write_jsonl(&chat, "output.jsonl", &config)?;
//!
//! let csv_string = to_csv(&chat, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
