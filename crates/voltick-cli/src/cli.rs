//! CLI argument definitions for voltick.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `summary` | Most recent vs. average prior volume, one row per symbol |
//! | `raw` | Every feed row, cleaned and sorted for display |
//! | `symbols` | `All` followed by the distinct symbols |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--source` | public screener CSV | Feed path or URL (`VOLTICK_SOURCE`) |
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat load warnings as failures |
//! | `--timeout-ms` | `10000` | HTTP request timeout in ms |
//! | `--delimiter` | `,` | Feed field delimiter |
//!
//! # Examples
//!
//! ```bash
//! voltick summary --format table
//! voltick raw --symbol AAPL --pretty
//! voltick --source ./stocks.csv symbols
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Volume comparison for scraped stock-screener snapshots.
#[derive(Debug, Parser)]
#[command(
    name = "voltick",
    author,
    version,
    about = "Volume comparison for scraped stock-screener snapshots",
    long_about = "voltick reads a delimited screener feed of (Symbol, Date, AM/PM, Volume) rows \
and compares each symbol's most recent volume with the average of its prior observations.\n\
\n\
Use 'voltick <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Feed location: a local path or an http(s) URL.
    #[arg(long, global = true, env = "VOLTICK_SOURCE")]
    pub source: Option<String>,

    /// Output format for results.
    ///
    /// - json: Single JSON envelope (default)
    /// - ndjson: Metadata line, then one line per row
    /// - table: Aligned text columns
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat load warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// HTTP request timeout in milliseconds [default: 10000].
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Feed field delimiter: one ASCII character, or `tab` [default: ,].
    #[arg(long, global = true)]
    pub delimiter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare each symbol's most recent volume with its prior average.
    ///
    /// # Examples
    ///
    ///   voltick summary
    ///   voltick summary --format table
    Summary,

    /// Show the raw rows, newest first.
    ///
    /// # Examples
    ///
    ///   voltick raw
    ///   voltick raw --symbol AAPL
    Raw(RawArgs),

    /// List `All` followed by every distinct symbol.
    Symbols,
}

/// Arguments for the `raw` command.
#[derive(Debug, Args)]
pub struct RawArgs {
    /// Only rows for this symbol; `All` or omitted shows every symbol.
    #[arg(long)]
    pub symbol: Option<String>,
}
