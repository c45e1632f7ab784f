//! CLI argument definitions for the `unify` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "unify",
    version,
    about = "Merge per-country user and login datasets into unified tables",
    long_about = "Merge per-country user and login CSV datasets into unified `users` and\n\
                  `logins` tables.\n\n\
                  Each source is described by a JSON mapping file listed in a TOML\n\
                  pipeline manifest. Records are normalized, validated and stored in SQLite."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include raw record values (personal data) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load, normalize, merge and store every configured source.
    Run(RunArgs),

    /// Resolve every source mapping and report field coverage.
    Check {
        /// Pipeline manifest (TOML).
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },

    /// Print the canonical schema of the output tables.
    Schema,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Pipeline manifest (TOML).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// SQLite database to write (overrides the manifest).
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Normalize, merge and audit without writing to the database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write every rejection report to this JSON file.
    #[arg(long = "rejections", value_name = "PATH")]
    pub rejections: Option<PathBuf>,
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
