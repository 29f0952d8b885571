//! Output layer for parsed chats.
//!
//! This module contains:
//! - [`models`] - Output configuration and the serialized message shape
//! - [`output`] - Format writers (CSV, JSON, JSONL)

pub mod models;
pub mod output;

pub use models::OutputConfig;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
