//! JSON output writer.

use std::fs::File;
use std::io::Write;

use serde::Serialize;

use crate::chat::{ChatStats, ParsedChat};
use crate::core::models::{OutputConfig, OutputMessage};
use crate::error::Result;

/// Whole-chat document written by [`write_json`].
#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    participants: &'a [String],
    stats: ChatStats,
    messages: Vec<OutputMessage<'a>>,
}

/// Writes a parsed chat to a JSON file.
///
/// # Format
/// ```json
/// {
///   "title": "Bob",
///   "participants": ["Alice", "Bob"],
///   "stats": {"totalMessages": 2, "...": "..."},
///   "messages": [{"id": 0, "sender": "Alice", "kind": "text", "text": "Hello"}]
/// }
/// ```
pub fn write_json(chat: &ParsedChat, output_path: &str, config: &OutputConfig) -> Result<()> {
    let json = to_json(chat, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts a parsed chat to a pretty-printed JSON document.
///
/// Same format as `write_json`, but returns a String instead of writing to file.
pub fn to_json(chat: &ParsedChat, config: &OutputConfig) -> Result<String> {
    let document = JsonDocument {
        title: &chat.title,
        participants: &chat.participants,
        stats: chat.stats(),
        messages: config
            .select(&chat.messages)
            .map(|m| OutputMessage::from_message(m, config))
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_transcript;
    use std::io::Read;
    use tempfile::NamedTempFile;

    fn sample() -> ParsedChat {
        parse_transcript(
            "Exported chat\n1/2/23, 9:41 AM - Alice: Hello\n1/2/23, 9:42 AM - Bob: <attached: IMG-20230102-WA0001.jpg>",
            "WhatsApp Chat with Bob.txt",
        )
        .into_result()
        .unwrap()
    }

    #[test]
    fn test_to_json_document() {
        let json = to_json(&sample(), &OutputConfig::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Bob");
        assert_eq!(value["participants"], serde_json::json!(["Alice", "Bob"]));
        assert_eq!(value["stats"]["totalMessages"], 3);
        assert_eq!(value["stats"]["mediaCount"], 1);
        assert_eq!(value["messages"][1]["datetime"], "2023-01-02T09:41:00");
        assert_eq!(value["messages"][1]["dateKey"], "2023-01-02");
        assert_eq!(value["messages"][2]["attachment"]["mime"], "image/jpeg");
        assert!(value["messages"][1].get("raw").is_none());
    }

    #[test]
    fn test_to_json_without_system() {
        let json = to_json(&sample(), &OutputConfig::new().without_system()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
        // Stats describe the whole chat, not the filtered view.
        assert_eq!(value["stats"]["totalMessages"], 3);
    }

    #[test]
    fn test_write_json_with_raw() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        write_json(&sample(), path, &OutputConfig::new().with_raw()).unwrap();

        let mut content = String::new();
        std::fs::File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        assert!(content.contains(r#""raw": "1/2/23, 9:41 AM - Alice: Hello""#));
    }
}
