//! Output-side views of parsed messages.

#[cfg(feature = "json-output")]
use serde::Serialize;

#[cfg(feature = "json-output")]
use crate::message::Attachment;
use crate::message::{Message, MessageKind};

/// Timestamp layout used by every writer.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Configuration for output format.
/// Controls which messages and fields are written.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Include each message's original transcript lines
    pub include_raw: bool,
    /// Include system messages (preamble, notices, membership changes)
    pub include_system: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_raw: false,
            include_system: true,
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_raw(mut self) -> Self {
        self.include_raw = true;
        self
    }

    #[must_use]
    pub fn without_system(mut self) -> Self {
        self.include_system = false;
        self
    }

    /// Messages this configuration lets through, in order.
    pub fn select<'a>(&self, messages: &'a [Message]) -> impl Iterator<Item = &'a Message> + 'a {
        let include_system = self.include_system;
        messages
            .iter()
            .filter(move |m| include_system || m.kind != MessageKind::System)
    }
}

/// Borrowed message shape shared by the JSON writers.
#[cfg(feature = "json-output")]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OutputMessage<'a> {
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_key: Option<&'a str>,
    sender: Option<&'a str>,
    kind: MessageKind,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<&'a Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<&'a str>,
}

#[cfg(feature = "json-output")]
impl<'a> OutputMessage<'a> {
    pub(crate) fn from_message(msg: &'a Message, config: &OutputConfig) -> Self {
        Self {
            id: msg.id,
            datetime: msg.datetime.map(|dt| dt.format(DATETIME_FORMAT).to_string()),
            date_key: msg.date_key(),
            sender: msg.sender(),
            kind: msg.kind,
            text: &msg.text,
            attachment: msg.attachment.as_ref(),
            raw: config.include_raw.then_some(msg.raw.as_str()),
        }
    }
}
