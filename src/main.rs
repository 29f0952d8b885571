//! # chatlog CLI
//!
//! Command-line interface for the chatlog library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use chatlog::ChatlogError;
use chatlog::cli::Args;
use chatlog::config::ParseConfig;
use chatlog::detect::{load_export, load_transcript};
use chatlog::format::write_to_format;
use chatlog::parser::TranscriptParser;
use chatlog::progress::{no_progress, stderr_progress};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: &Args) -> Result<(), ChatlogError> {
    let total_start = Instant::now();
    let config = args.parse_config();
    let output_path = args.output_path();

    println!("💬 chatlog v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", args.format);

    let (file_name, text) = load_input(&args.input, &config)?;
    if file_name != args.input {
        println!("🔎 Chat:    {}", file_name);
    }
    println!();

    let title_source = args.title_from.clone().unwrap_or(file_name);
    let parser = TranscriptParser::with_config(config);
    let progress = if args.progress {
        stderr_progress()
    } else {
        no_progress()
    };

    println!("⏳ Parsing transcript...");
    let parse_start = Instant::now();
    let chat = parser
        .parse_with_progress(&text, &title_source, &progress)
        .into_result()?;
    let parse_time = parse_start.elapsed();
    println!(
        "   Found {} messages ({:.2}s)",
        chat.messages.len(),
        parse_time.as_secs_f64()
    );

    println!("💾 Writing {}...", args.format);
    let write_start = Instant::now();
    write_to_format(&chat, &output_path, args.format, &args.output_config())?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    let stats = chat.stats();
    println!();
    println!("📊 Summary:");
    println!("   Title:        {}", chat.title);
    println!("   Messages:     {}", stats.total_messages);
    println!("   Participants: {}", stats.participants.join(", "));
    println!("   Attachments:  {}", stats.media_count);
    if let (Some(first), Some(last)) = (&stats.first_date, &stats.last_date) {
        println!("   Dates:        {} → {}", first, last);
    }

    let total_time = total_start.elapsed();
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let lines = text.lines().count();
    println!(
        "   Throughput:  {:.0} lines/sec",
        lines as f64 / total_time.as_secs_f64().max(f64::EPSILON)
    );

    Ok(())
}

/// Reads the transcript, picking it out of a folder if needed.
///
/// Returns the chosen file's name alongside its text.
fn load_input(input: &str, config: &ParseConfig) -> Result<(String, String), ChatlogError> {
    let path = Path::new(input);
    if path.is_dir() {
        let (entry, text) = load_export(path, config.detection_sample_lines)?;
        debug!(chat = %entry.path.display(), "using detected chat file");
        return Ok((entry.name, text));
    }

    let text = load_transcript(path)?;
    Ok((input.to_string(), text))
}
