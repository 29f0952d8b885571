//! Command-line interface definition using clap.
//!
//! [`Args`] is the argument structure for the `chatlog` binary. It also knows
//! how to turn itself into the library's [`ParseConfig`] and [`OutputConfig`],
//! so the binary stays a thin driver.

use clap::Parser;

use crate::config::ParseConfig;
use crate::core::models::OutputConfig;
use crate::format::OutputFormat;

/// Default output path; its extension follows `--format`.
pub const DEFAULT_OUTPUT: &str = "parsed_chat.json";

/// Parse exported WhatsApp chat transcripts into structured messages.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlog")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlog \"WhatsApp Chat with Bob.txt\"
    chatlog _chat.txt -o chat.csv -f csv
    chatlog ./unzipped-export --format jsonl --no-system
    chatlog export.txt --title-from \"WhatsApp Chat with Bob.txt\" --day-first")]
pub struct Args {
    /// Transcript file, or a folder holding an unpacked export
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Output format: json, jsonl (ndjson) or csv
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Derive the chat title from this file name instead of the input's
    #[arg(long, value_name = "NAME")]
    pub title_from: Option<String>,

    /// Retry day-first grammars when a month-first date is impossible
    #[arg(long)]
    pub day_first: bool,

    /// Print progress snapshots to stderr
    #[arg(long)]
    pub progress: bool,

    /// Include each message's original transcript lines in the output
    #[arg(long)]
    pub raw: bool,

    /// Leave system messages out of the output
    #[arg(long)]
    pub no_system: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parser settings implied by the flags.
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig::new().with_day_first_fallback(self.day_first)
    }

    /// Writer settings implied by the flags.
    pub fn output_config(&self) -> OutputConfig {
        let mut config = OutputConfig::new();
        if self.raw {
            config = config.with_raw();
        }
        if self.no_system {
            config = config.without_system();
        }
        config
    }

    /// Output path, with the default's extension matched to the format.
    pub fn output_path(&self) -> String {
        if self.output != DEFAULT_OUTPUT {
            return self.output.clone();
        }
        format!("parsed_chat.{}", self.format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chatlog").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let parsed = args(&["_chat.txt"]);
        assert_eq!(parsed.input, "_chat.txt");
        assert_eq!(parsed.format, OutputFormat::Json);
        assert_eq!(parsed.output_path(), "parsed_chat.json");
        assert!(!parsed.parse_config().day_first_fallback);
        assert!(parsed.output_config().include_system);
        assert_eq!(parsed.verbose, 0);
    }

    #[test]
    fn test_format_adjusts_default_output() {
        assert_eq!(args(&["x.txt", "-f", "csv"]).output_path(), "parsed_chat.csv");
        assert_eq!(args(&["x.txt", "-f", "ndjson"]).output_path(), "parsed_chat.jsonl");
        assert_eq!(args(&["x.txt", "-f", "csv", "-o", "mine.txt"]).output_path(), "mine.txt");
    }

    #[test]
    fn test_flags() {
        let parsed = args(&["x.txt", "--day-first", "--raw", "--no-system", "-vv", "--title-from", "Chat with Al.txt"]);
        assert!(parsed.parse_config().day_first_fallback);
        assert!(parsed.output_config().include_raw);
        assert!(!parsed.output_config().include_system);
        assert_eq!(parsed.verbose, 2);
        assert_eq!(parsed.title_from.as_deref(), Some("Chat with Al.txt"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = Args::try_parse_from(["chatlog", "x.txt", "-f", "xml"]);
        assert!(result.is_err());
    }
}
