//! Message segmentation.
//!
//! The segmenter walks the transcript one line at a time and decides where
//! one message ends and the next begins. It holds at most one unfinished
//! message, passed in and handed back as a [`SegmentState`] value on every
//! [`Segmenter::step`].
//!
//! Every input line ends up in exactly one emitted message's `raw` field with
//! its own line break kept, and the break between consecutive messages is
//! recorded, so interleaving the two gives back the input.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::message::Message;

use super::classify::ContentClassifier;
use super::timestamp::{RecognizedTimestamp, TimestampRecognizer};

/// Line break that ends one transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Returns the separator string.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// One transcript line, without its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line content.
    pub content: &'a str,
    /// Break between the previous line and this one; `None` for the first line.
    pub preceded_by: Option<LineEnding>,
}

impl<'a> Line<'a> {
    /// A line with no preceding break.
    pub fn first(content: &'a str) -> Self {
        Self {
            content,
            preceded_by: None,
        }
    }

    /// A line following a break.
    pub fn after(ending: LineEnding, content: &'a str) -> Self {
        Self {
            content,
            preceded_by: Some(ending),
        }
    }
}

/// Splits `text` on every `\n`, recording per line whether the break was `\r\n`.
///
/// Empty input has no lines. A `\r` not followed by `\n` stays in the content.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::segment::{LineEnding, split_lines};
///
/// let lines = split_lines("a\r\nb\nc");
/// let contents: Vec<&str> = lines.iter().map(|l| l.content).collect();
/// assert_eq!(contents, vec!["a", "b", "c"]);
/// assert_eq!(lines[1].preceded_by, Some(LineEnding::CrLf));
/// assert_eq!(lines[2].preceded_by, Some(LineEnding::Lf));
/// ```
pub fn split_lines(text: &str) -> Vec<Line<'_>> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut pieces = text.split('\n').peekable();
    let mut lines = Vec::new();
    let mut preceded_by = None;
    while let Some(piece) = pieces.next() {
        let (content, ending) = match piece.strip_suffix('\r') {
            Some(content) if pieces.peek().is_some() => (content, LineEnding::CrLf),
            _ => (piece, LineEnding::Lf),
        };
        lines.push(Line {
            content,
            preceded_by,
        });
        preceded_by = Some(ending);
    }
    lines
}

/// Scan state threaded through [`Segmenter::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SegmentState {
    /// No message open yet (only before the first timestamp).
    #[default]
    Idle,
    /// Accumulating continuation lines into this message.
    Open(Message),
}

/// Single-pass line segmenter.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::segment::{SegmentState, Segmenter, split_lines};
///
/// let mut segmenter = Segmenter::new(Default::default(), Default::default());
/// let mut state = SegmentState::Idle;
/// for line in split_lines("1/2/23, 9:41 AM - Alice: Hello\r\nthis continues") {
///     state = segmenter.step(state, line);
/// }
/// let (messages, breaks) = segmenter.finish(state);
///
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].text, "Hello\nthis continues");
/// assert_eq!(messages[0].raw, "1/2/23, 9:41 AM - Alice: Hello\r\nthis continues");
/// assert!(breaks.is_empty());
/// ```
#[derive(Debug)]
pub struct Segmenter {
    recognizer: TimestampRecognizer,
    classifier: ContentClassifier,
    emitted: Vec<Message>,
    breaks: Vec<LineEnding>,
}

impl Segmenter {
    /// Creates a segmenter.
    pub fn new(recognizer: TimestampRecognizer, classifier: ContentClassifier) -> Self {
        Self {
            recognizer,
            classifier,
            emitted: Vec::new(),
            breaks: Vec::new(),
        }
    }

    /// Consumes one line and returns the next state.
    pub fn step(&mut self, state: SegmentState, line: Line<'_>) -> SegmentState {
        let content = line.content;
        if content.trim().is_empty() {
            return match state {
                SegmentState::Open(mut message) => {
                    message.text.push('\n');
                    append_raw(&mut message, line);
                    SegmentState::Open(message)
                }
                SegmentState::Idle => {
                    self.emit_preamble(line);
                    SegmentState::Idle
                }
            };
        }

        if let Some(timestamp) = self.recognizer.recognize(content) {
            if let SegmentState::Open(message) = state {
                self.emit(message);
            }
            self.record_break(line);
            return SegmentState::Open(self.open(timestamp, content));
        }

        match state {
            SegmentState::Open(mut message) => {
                message.text.push('\n');
                message.text.push_str(content);
                append_raw(&mut message, line);
                SegmentState::Open(message)
            }
            SegmentState::Idle => {
                self.emit_preamble(line);
                SegmentState::Idle
            }
        }
    }

    /// Flushes any open message and returns everything emitted, in order,
    /// along with the break that followed each message but the last.
    pub fn finish(mut self, state: SegmentState) -> (Vec<Message>, Vec<LineEnding>) {
        if let SegmentState::Open(message) = state {
            self.emit(message);
        }
        (self.emitted, self.breaks)
    }

    fn next_id(&self) -> u64 {
        self.emitted.len() as u64
    }

    fn open(&self, timestamp: RecognizedTimestamp<'_>, line: &str) -> Message {
        let classified = self.classifier.classify(timestamp.remainder);

        let mut message = Message::new(self.next_id(), classified.kind, classified.text, line)
            .with_datetime(timestamp.datetime);
        message.sender = classified.sender;
        message.attachment = classified.attachment;
        message
    }

    // Called whenever `line` starts a new message.
    fn record_break(&mut self, line: Line<'_>) {
        if let Some(ending) = line.preceded_by {
            self.breaks.push(ending);
        }
    }

    fn emit_preamble(&mut self, line: Line<'_>) {
        self.record_break(line);
        let message = Message::preamble(self.next_id(), line.content);
        self.emit(message);
    }

    fn emit(&mut self, message: Message) {
        trace!(id = message.id, kind = %message.kind, "message flushed");
        self.emitted.push(message);
    }
}

fn append_raw(message: &mut Message, line: Line<'_>) {
    message
        .raw
        .push_str(line.preceded_by.unwrap_or_default().as_str());
    message.raw.push_str(line.content);
}
