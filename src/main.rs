//! `wav-marker INPUT LABELS OUTPUT`
//!
//! Progress notes go to stdout; skipped label lines and errors go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, Level, LevelFilter};
use std::io::{self, Write};
use std::path::PathBuf;
use wav_marker::{add_markers, labels, Options};

/// Embed the labels of an Audacity label file into a WAVE file as cue
/// points, the way podcast chapter markers are stored.
#[derive(Parser)]
#[command(name = "wav-marker", version)]
struct Cli {
    /// WAVE file to read (PCM or IEEE float)
    input: PathBuf,

    /// Label file as exported by Audacity: start, end and label separated
    /// by tabs, one per line
    labels: PathBuf,

    /// Where to write the marked up WAVE file
    output: PathBuf,

    /// Log chunk offsets and sizes as well
    #[arg(short, long)]
    verbose: bool,

    /// Only report skipped labels and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Skip labels starting later than this
    #[arg(long, value_name = "SECONDS", default_value_t = labels::MAX_START_SECONDS)]
    max_start: f64,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            // the target is stdout; warnings and errors bypass it
            if record.level() <= Level::Warn {
                writeln!(io::stderr(), "{}", record.args())
            } else {
                writeln!(buf, "{}", record.args())
            }
        })
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    debug!(
        "input = {}, labels = {}, output = {}",
        cli.input.display(),
        cli.labels.display(),
        cli.output.display()
    );

    let options = Options {
        max_start_seconds: cli.max_start,
        ..Options::default()
    };
    let summary = add_markers(&cli.input, &cli.labels, &cli.output, &options)
        .with_context(|| {
            format!("failed to add markers to {}", cli.input.display())
        })?;

    debug!(
        "{} cue(s), {} skipped line(s), {} other chunk(s), riff size {}",
        summary.cues,
        summary.skipped_lines,
        summary.preserved_chunks,
        summary.riff_size
    );

    Ok(())
}
