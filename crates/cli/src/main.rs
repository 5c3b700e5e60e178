//! CLI speed reader: extract text from a document and pace it to the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use rsvp_core::{
    FileKind, PacingScheduler, Phase, PlaybackEvent, RawDocument, WordSequence,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

/// Play a document back a few words at a time at a fixed reading rate.
#[derive(Parser, Debug)]
#[command(name = "rsvp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file (.txt, .md, .docx, .pdf, .doc); reads plain text from
    /// stdin when omitted
    input: Option<PathBuf>,

    /// Reading rate in words per minute
    #[arg(short, long, default_value = "300")]
    wpm: u32,

    /// Number of consecutive words shown per tick
    #[arg(short = 'n', long, default_value = "1")]
    words_at_a_time: usize,

    /// Start playback at this word index
    #[arg(long, default_value = "0")]
    start_at: usize,

    /// Print the extracted text and exit
    #[arg(short, long)]
    text_only: bool,

    /// Print an extraction report as JSON and exit
    #[arg(short, long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Extraction summary for `--json`.
#[derive(Debug, Serialize)]
struct ExtractionReport {
    /// Input filename, or "stdin".
    filename: String,
    /// Kind the input was classified as.
    kind: &'static str,
    /// Characters of extracted text.
    char_count: usize,
    /// Words after tokenization.
    word_count: usize,
    /// The extracted text itself.
    text: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let (document, filename) = load_document(&args)?;

    if args.verbose {
        eprintln!(
            "Processing: {} ({} bytes, kind {})",
            filename,
            document.bytes.len(),
            document.kind.as_str()
        );
    }

    let mut progress = |message: &str| log::info!("{}", message);
    let text = rsvp_extract::extract(&document, &mut progress);
    let words = WordSequence::from_text(&text);

    if args.verbose {
        eprintln!("  Extracted {} words", words.len());
    }

    if args.json {
        let report = ExtractionReport {
            filename,
            kind: document.kind.as_str(),
            char_count: text.chars().count(),
            word_count: words.len(),
            text,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.text_only {
        println!("{}", text);
        return Ok(());
    }

    run_playback(words, &args)
}

/// Read the input file, or stdin as pasted plain text when none is given.
fn load_document(args: &Args) -> Result<(RawDocument, String)> {
    match &args.input {
        Some(path) => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            // Extension first; fall back to magic bytes for extensionless
            // downloads, then to plain text.
            let kind = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(FileKind::from_extension)
                .or_else(|| FileKind::from_magic(&bytes))
                .unwrap_or(FileKind::Plain);

            Ok((RawDocument::new(bytes, kind), filename))
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read stdin")?;
            Ok((RawDocument::new(buffer, FileKind::Plain), "stdin".to_string()))
        }
    }
}

/// Drive the scheduler against the wall clock and render each tick.
fn run_playback(words: WordSequence, args: &Args) -> Result<()> {
    if words.is_empty() {
        eprintln!("Nothing to read.");
        return Ok(());
    }

    let mut scheduler = PacingScheduler::new();
    scheduler.load(words);

    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u64;

    scheduler.set_rate(args.wpm, now_ms());
    scheduler.set_group_size(args.words_at_a_time, now_ms());
    if args.start_at > 0 {
        scheduler.seek(args.start_at as i64);
    }
    scheduler.play(now_ms());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&mut out, &scheduler)?;

    while scheduler.phase() == Phase::Running {
        if let Some(wait_ms) = scheduler.next_tick_in_ms(now_ms()) {
            if wait_ms > 0 {
                thread::sleep(Duration::from_millis(wait_ms));
            }
        }

        for event in scheduler.poll(now_ms()) {
            match event {
                PlaybackEvent::Tick { .. } => render(&mut out, &scheduler)?,
                PlaybackEvent::Finished => {
                    writeln!(out)?;
                    writeln!(
                        out,
                        "Done: {} words at {} wpm.",
                        scheduler.len(),
                        scheduler.rate_per_minute()
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Rewrite the current line with progress and the visible window.
fn render(out: &mut impl Write, scheduler: &PacingScheduler) -> Result<()> {
    let percent = (scheduler.progress_fraction() * 100.0).round() as u32;
    write!(out, "\r\x1b[K[{:>3}%] {}", percent, scheduler.visible_words())?;
    out.flush()?;
    Ok(())
}
