//! CSV output writer.

use std::fs::File;
use std::io::Write;

use crate::chat::ParsedChat;
use crate::core::models::{DATETIME_FORMAT, OutputConfig};
use crate::error::Result;
use crate::message::Message;

/// Writes a parsed chat's messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `ID`, `DateKey`, `Time`, `Sender`, `Kind`, `Text`, `Attachment`,
///   plus `Raw` when [`OutputConfig::include_raw`] is set
/// - Encoding: UTF-8
pub fn write_csv(chat: &ParsedChat, output_path: &str, config: &OutputConfig) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(file, chat, config)
}

/// Converts a parsed chat's messages to a CSV string.
pub fn to_csv(chat: &ParsedChat, config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, chat, config)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_records<W: Write>(sink: W, chat: &ParsedChat, config: &OutputConfig) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);

    writer.write_record(build_header(config))?;
    for msg in config.select(&chat.messages) {
        writer.write_record(build_record(msg, config))?;
    }

    writer.flush()?;
    Ok(())
}

/// Build CSV header based on output configuration.
fn build_header(config: &OutputConfig) -> Vec<&'static str> {
    let mut header = vec!["ID", "DateKey", "Time", "Sender", "Kind", "Text", "Attachment"];
    if config.include_raw {
        header.push("Raw");
    }
    header
}

/// Build CSV record for a single message.
fn build_record(msg: &Message, config: &OutputConfig) -> Vec<String> {
    let mut record = vec![
        msg.id.to_string(),
        msg.date_key().unwrap_or_default().to_string(),
        msg.datetime
            .map(|dt| dt.format(DATETIME_FORMAT).to_string())
            .unwrap_or_default(),
        msg.sender().unwrap_or_default().to_string(),
        msg.kind.to_string(),
        msg.text.clone(),
        msg.attachment
            .as_ref()
            .map(|a| a.filename.clone())
            .unwrap_or_default(),
    ];
    if config.include_raw {
        record.push(msg.raw.clone());
    }
    record
}
