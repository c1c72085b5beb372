//! Command-line interface for csvdelta

use crate::data::ReadOptions;
use crate::record::WidthPolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "csvdelta")]
#[command(about = "Capture inserted, updated and deleted rows between two CSV snapshots")]
#[command(version)]
pub struct Cli {
    /// Older snapshot (the reference that gets indexed)
    pub older: PathBuf,

    /// Newer snapshot
    pub newer: PathBuf,

    /// Output prefix; writes <PREFIX>_new.csv, <PREFIX>_updated.csv and <PREFIX>_deleted.csv
    pub output_prefix: PathBuf,

    /// Field delimiter (single ASCII character)
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Text that denotes a missing field, e.g. "NULL"
    #[arg(long)]
    pub null_value: Option<String>,

    /// Fail on rows whose field count differs from the header
    #[arg(long)]
    pub strict: bool,

    /// Disable progress spinners
    #[arg(long)]
    pub no_progress: bool,

    /// Quiet output (machine-readable)
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Output summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            delimiter: self.delimiter,
            null_value: self.null_value.clone(),
        }
    }

    pub fn width_policy(&self) -> WidthPolicy {
        if self.strict {
            WidthPolicy::Strict
        } else {
            WidthPolicy::Lenient
        }
    }

    /// Spinners only make sense for the human-readable summary
    pub fn show_progress(&self) -> bool {
        !(self.no_progress || self.quiet || self.json)
    }

    /// Default log filter: `debug` with `--verbose`, `warn` when stdout is
    /// machine-readable, `info` otherwise
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet || self.json {
            "warn"
        } else {
            "info"
        }
    }
}

/// Validate that the delimiter is exactly one ASCII character
fn parse_delimiter(s: &str) -> Result<u8, String> {
    if s == "\\t" || s == "tab" {
        return Ok(b'\t');
    }

    let bytes = s.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() {
        return Err(format!(
            "Invalid delimiter: '{}'. Must be a single ASCII character.",
            s
        ));
    }

    if bytes[0] == b'"' || bytes[0] == b'\n' || bytes[0] == b'\r' {
        return Err(format!("Delimiter cannot be '{}'", s.escape_default()));
    }

    Ok(bytes[0])
}
