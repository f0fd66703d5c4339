use std::path::PathBuf;

use clap::Parser;
use spreadsheet_engine::NumericKind;

/// Numeric spreadsheet engine: build or load a table, apply one batch of
/// cell edits, and report the outcome.
#[derive(Parser, Debug)]
#[command(version = env!("VERSION"), term_width = 80)]
pub struct Cli {
    /// number of columns for a freshly built table
    #[arg(long, default_value_t = 10)]
    pub columns: usize,

    /// number of rows for a freshly built table
    #[arg(long, default_value_t = 10)]
    pub rows: usize,

    /// numeric type the table is built over
    #[arg(long, value_enum, default_value_t = NumericKind::Int)]
    pub r#type: NumericKind,

    /// load the table from a JSON file instead of building a fresh one
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// file containing a JSON object of {cell-id: expression-text} edits
    /// (stdin if omitted)
    #[arg(long)]
    pub edits: Option<PathBuf>,

    /// print the resulting table as canonical JSON instead of the
    /// per-cell outcome report
    #[arg(long)]
    pub dump: bool,
}
