//! Integration tests for the transcript parser through the public API.

use std::fs;
use std::sync::{Arc, Mutex};

use chatlog::parsing::timestamp::TimestampFormat;
use chatlog::prelude::*;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tempfile::tempdir;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn parse(text: &str) -> ParsedChat {
    parse_transcript(text, "_chat.txt").into_result().unwrap()
}

fn recording() -> (ProgressCallback, Arc<Mutex<Vec<ProgressSnapshot>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Arc::new(move |s| sink.lock().unwrap().push(s));
    (callback, seen)
}

// =========================================================================
// Message scenarios
// =========================================================================

#[test]
fn test_plain_text_message() {
    let chat = parse("1/2/23, 9:41 AM - Alice: Hello there");
    let msg = &chat.messages[0];

    assert_eq!(msg.id, 0);
    assert_eq!(msg.kind, MessageKind::Text);
    assert_eq!(msg.sender(), Some("Alice"));
    assert_eq!(msg.datetime, Some(at(2023, 1, 2, 9, 41, 0)));
    assert_eq!(msg.date_key(), Some("2023-01-02"));
    assert_eq!(msg.text, "Hello there");
    assert_eq!(msg.raw, "1/2/23, 9:41 AM - Alice: Hello there");
}

#[test]
fn test_continuation_joins_body() {
    let chat = parse("1/2/23, 9:41 AM - Alice: Hello\nthis continues");
    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.messages[0].text, "Hello\nthis continues");
}

#[test]
fn test_encryption_notice_is_system() {
    let chat = parse(
        "1/2/23, 9:40 AM - Messages and calls are end-to-end encrypted. No one outside of this chat, not even WhatsApp, can read or listen to them.",
    );
    let msg = &chat.messages[0];
    assert_eq!(msg.kind, MessageKind::System);
    assert!(msg.sender.is_none());
    assert!(chat.participants.is_empty());
}

#[test]
fn test_attachment_from_bob() {
    let chat = parse("1/2/23, 9:42 AM - Bob: <attached: IMG-20230102-WA0001.jpg>");
    let msg = &chat.messages[0];
    assert_eq!(msg.kind, MessageKind::Attachment);
    assert_eq!(msg.sender(), Some("Bob"));

    let attachment = msg.attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "IMG-20230102-WA0001.jpg");
    assert_eq!(attachment.mime, "image/jpeg");
    assert_eq!(attachment.media_key(), "img-20230102-wa0001.jpg");
}

#[test]
fn test_twelve_hour_conversion() {
    let chat = parse(
        "1/2/23, 9:41 PM - A: x\n1/2/23, 12:05 AM - A: y\n1/2/23, 12:05 PM - A: z\n1/2/23, 9:41 AM - A: w",
    );
    let hours: Vec<u32> = chat
        .messages
        .iter()
        .map(|m| m.datetime.unwrap().hour())
        .collect();
    assert_eq!(hours, vec![21, 0, 12, 9]);
    assert!(chat.messages.iter().all(|m| m.date_key() == Some("2023-01-02")));
}

#[test]
fn test_every_grammar_recognized() {
    let text = "\
12/31/23, 9:41 PM - A: us
31.12.23, 21:41 - B: dot
[31/12/2023, 21:41:07] C: bracketed
2023-12-31, 21:41 - D: iso";
    let chat = parse(text);

    assert_eq!(chat.messages.len(), 4);
    assert_eq!(chat.participants, vec!["A", "B", "C", "D"]);
    for msg in &chat.messages {
        assert_eq!(msg.date_key(), Some("2023-12-31"), "{}", msg.raw);
    }
    assert_eq!(chat.messages[2].datetime, Some(at(2023, 12, 31, 21, 41, 7)));
}

#[test]
fn test_grammar_examples_match_their_format() {
    let recognizer = chatlog::parsing::TimestampRecognizer::with_day_first_fallback(true);
    for format in TimestampFormat::all() {
        let line = format!("{}Alice: hi", format.example());
        let recognized = recognizer.recognize(&line).unwrap();
        assert_eq!(recognized.format, *format, "{line}");
        assert_eq!(recognized.remainder, "Alice: hi");
    }
}

#[test]
fn test_mixed_transcript_no_loss() {
    let text = "\
Chat history export
1/2/23, 9:40 AM - Messages and calls are end-to-end encrypted.
1/2/23, 9:41 AM - Alice created group \"Trip\"
1/2/23, 9:41 AM - Alice: Hello there

paragraph two
1/2/23, 9:42 AM - Bob: IMG-20230102-WA0001.jpg (file attached)
sunset!
1/3/23, 8:00 AM - Carol: 13/45/23, nonsense line that looks like a date
45/45/45, 9:00 AM - not a timestamp
1/3/23, 8:01 AM - Bob left";
    let chat = parse(text);

    assert_eq!(chat.reconstruct(), text);
    assert_eq!(chat.participants, vec!["Alice", "Bob", "Carol"]);

    let kinds: Vec<MessageKind> = chat.messages.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MessageKind::System,
            MessageKind::System,
            MessageKind::System,
            MessageKind::Text,
            MessageKind::Attachment,
            MessageKind::Text,
            MessageKind::System,
        ]
    );
    assert_eq!(chat.messages[3].text, "Hello there\n\nparagraph two");
    // Empty caption, then the continuation line.
    assert_eq!(chat.messages[4].text, "\nsunset!");
    assert!(chat.messages[5].text.ends_with("\n45/45/45, 9:00 AM - not a timestamp"));

    for (i, msg) in chat.messages.iter().enumerate() {
        assert_eq!(msg.id, i as u64);
    }
}

#[test]
fn test_crlf_transcript_round_trips() {
    let text = "1/2/23, 9:41 AM - Alice: one\r\ntwo\r\n\r\n1/2/23, 9:42 AM - Bob: three\r\n";
    let chat = parse(text);
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.messages[0].text, "one\ntwo\n");
    assert_eq!(chat.reconstruct(), text);
}

#[test]
fn test_no_timestamps_still_succeeds() {
    let chat = parse("grocery list\nmilk\neggs");
    assert_eq!(chat.messages.len(), 3);
    assert!(chat.messages.iter().all(|m| m.is_system() && m.datetime.is_none()));
    assert!(chat.participants.is_empty());
}

// =========================================================================
// Title
// =========================================================================

#[test]
fn test_titles() {
    let cases = [
        ("WhatsApp Chat with John Doe.txt", "John Doe"),
        ("Chat with Family.txt", "Family"),
        ("/tmp/exports/Team.txt", "Team"),
        ("", "WhatsApp Chat"),
    ];
    for (file_name, expected) in cases {
        let outcome = parse_transcript("1/2/23, 9:41 AM - A: hi", file_name);
        assert_eq!(outcome.chat().unwrap().title, expected, "{file_name}");
    }
}

// =========================================================================
// Progress
// =========================================================================

#[test]
fn test_progress_on_fifty_thousand_lines() {
    let text: String = (0..50_000)
        .map(|i| format!("1/2/23, 9:{:02} AM - User{}: message {}", i % 60, i % 7, i))
        .collect::<Vec<_>>()
        .join("\n");

    let (callback, seen) = recording();
    let outcome = TranscriptParser::new().parse_with_progress(&text, "_chat.txt", &callback);
    let chat = outcome.into_result().unwrap();
    assert_eq!(chat.messages.len(), 50_000);

    let seen = seen.lock().unwrap();
    let processed: Vec<usize> = seen.iter().map(|s| s.lines_processed).collect();
    let mut expected: Vec<usize> = (1..=24).map(|k| k * 2000).collect();
    expected.push(50_000);
    assert_eq!(processed, expected);

    assert_eq!(seen[0].percent, 4);
    assert_eq!(seen[23].percent, 96);
    assert!(seen.iter().all(|s| s.total_lines == 50_000));
    assert!(seen.last().unwrap().is_complete());
}

#[test]
fn test_progress_interval_config() {
    let text = vec!["line"; 10].join("\n");
    let (callback, seen) = recording();
    let parser = TranscriptParser::with_config(ParseConfig::new().with_progress_interval(4));
    parser.parse_with_progress(&text, "x.txt", &callback);

    let processed: Vec<usize> = seen.lock().unwrap().iter().map(|s| s.lines_processed).collect();
    assert_eq!(processed, vec![4, 8, 10]);
}

#[test]
fn test_progress_does_not_change_result() {
    let text = "1/2/23, 9:41 AM - Alice: a\nb\n1/2/23, 9:42 AM - Bob: c";
    let (callback, _) = recording();
    let with = TranscriptParser::new().parse_with_progress(text, "x.txt", &callback);
    let without = parse_transcript(text, "x.txt");
    assert_eq!(with, without);
}

// =========================================================================
// Files
// =========================================================================

#[test]
fn test_parse_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("WhatsApp Chat with Bob.txt");
    fs::write(&path, "\u{feff}1/2/23, 9:41 AM - Bob: hi\n1/2/23, 9:42 AM - Alice: hey").unwrap();

    let chat = TranscriptParser::new()
        .parse_file(&path)
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(chat.title, "Bob");
    assert_eq!(chat.participants, vec!["Bob", "Alice"]);
    assert!(chat.messages[0].raw.starts_with("1/2/23"));
}

#[test]
fn test_parse_file_missing() {
    let err = TranscriptParser::new()
        .parse_file("/definitely/not/here/_chat.txt")
        .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_export_folder_flow() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("IMG-20230102-WA0001.jpg"), b"\xff\xd8").unwrap();
    fs::write(dir.path().join("readme.txt"), "not a chat").unwrap();
    fs::write(
        dir.path().join("_chat.txt"),
        "[02/01/2023, 09:41:00] Alice: \u{200e}<attached: IMG-20230102-WA0001.jpg>",
    )
    .unwrap();

    let (entry, text) = chatlog::detect::load_export(dir.path(), 50).unwrap();
    assert_eq!(entry.name, "_chat.txt");

    let chat = parse_transcript(&text, &entry.name).into_result().unwrap();
    let msg = &chat.messages[0];
    assert_eq!(msg.kind, MessageKind::Attachment);
    assert_eq!(msg.date_key(), Some("2023-01-02"));
    assert_eq!(chat.stats().media_count, 1);
}
