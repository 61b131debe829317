//! CLI argument definitions for the character-sheet generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "scheda",
    version,
    about = "Generate printable character-sheet documents from a workbook",
    long_about = "Resolve a workbook of sparse field-overlay rows into one\n\
                  nested document per character, stamped with a content-hash\n\
                  driven semantic version and archived as JSON for the\n\
                  templating/PDF stages."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log verbosity: -v debug, -vv trace, -q errors only.
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// ANSI color handling (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Exact log level, taking precedence over -v/-q.
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log format: pretty or compact for humans, json for machines.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build every character document from a workbook.
    Build(BuildArgs),

    /// List the sheets a workbook holds and how each participates.
    Sheets(SheetsArgs),
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Workbook directory with one CSV file per sheet
    /// (default: from config, then ./workbook).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: Option<PathBuf>,

    /// Run configuration file (default: ./scheda.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output directory for documents and the manifest.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Version cache file.
    #[arg(long = "cache", value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Root folder asset references resolve under.
    #[arg(long = "assets-root", value_name = "DIR")]
    pub assets_root: Option<String>,

    /// Resolve everything and print the summary without writing documents
    /// or advancing versions.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SheetsArgs {
    /// Workbook directory with one CSV file per sheet.
    #[arg(value_name = "WORKBOOK")]
    pub workbook: Option<PathBuf>,

    /// Run configuration file (default: ./scheda.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
