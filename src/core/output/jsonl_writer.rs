//! JSON Lines (JSONL) output writer.
//!
//! One message per line, which suits line-oriented tools and large chats.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::chat::ParsedChat;
use crate::core::models::{OutputConfig, OutputMessage};
use crate::error::Result;

/// Writes a parsed chat's messages to JSONL (JSON Lines) format.
///
/// # Format
/// ```text
/// {"id":0,"datetime":"2023-01-02T09:41:00","dateKey":"2023-01-02","sender":"Alice","kind":"text","text":"Hello"}
/// {"id":1,"datetime":"2023-01-02T09:42:00","dateKey":"2023-01-02","sender":"Bob","kind":"text","text":"Hi"}
/// ```
pub fn write_jsonl(chat: &ParsedChat, output_path: &str, config: &OutputConfig) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for msg in config.select(&chat.messages) {
        serde_json::to_writer(&mut writer, &OutputMessage::from_message(msg, config))?;
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts a parsed chat's messages to a JSONL string.
pub fn to_jsonl(chat: &ParsedChat, config: &OutputConfig) -> Result<String> {
    let mut output = String::new();

    for msg in config.select(&chat.messages) {
        output.push_str(&serde_json::to_string(&OutputMessage::from_message(msg, config))?);
        output.push('\n');
    }

    Ok(output)
}
