//! CLI argument definitions for the LAC validator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use lac_cli::ingest::{parse_assignment, parse_table_arg};
use lac_report::DEFAULT_ENTITY_KEY;
use lac_rules::RuleSetVersion;

#[derive(Parser)]
#[command(
    name = "lac-validator",
    version,
    about = "Validate SSDA903 looked-after children returns",
    long_about = "Validate SSDA903 looked-after children returns.\n\n\
                  Runs a versioned rule catalog over CSV extracts of the Header,\n\
                  Episodes, Reviews and social-worker tables and reports every\n\
                  flagged row by rule code and child."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// List the rules of a rule set.
    List(ListArgs),

    /// Run a rule set against a set of tables.
    Run(RunArgs),

    /// Run one rule against a set of tables.
    Rule(RuleArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Rule set version tag.
    #[arg(long = "ruleset", short = 'r', default_value_t = RuleSetVersion::default().tag().to_string())]
    pub ruleset: String,
}

/// Table, metadata and output options shared by `run` and `rule`.
#[derive(Args)]
pub struct InputArgs {
    /// Rule set version tag.
    #[arg(long = "ruleset", short = 'r', default_value_t = RuleSetVersion::default().tag().to_string())]
    pub ruleset: String,

    /// Table to validate, as NAME=PATH (repeatable).
    #[arg(
        long = "table",
        short = 't',
        value_name = "NAME=PATH",
        value_parser = parse_table_arg,
        required = true
    )]
    pub tables: Vec<(String, PathBuf)>,

    /// Metadata entry, as KEY=VALUE (repeatable).
    #[arg(long = "metadata", short = 'm', value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub metadata: Vec<(String, String)>,

    /// Postcode reference CSV (column `pcd`, or the first column).
    #[arg(long = "postcodes", value_name = "PATH")]
    pub postcodes: Option<PathBuf>,

    /// Column used to group flagged rows by entity.
    #[arg(long = "entity-key", default_value = DEFAULT_ENTITY_KEY)]
    pub entity_key: String,

    /// Output format for the report.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Flagged rows to list before truncating (table output only).
    #[arg(long = "max-rows", value_name = "N", default_value_t = lac_cli::render::DEFAULT_ISSUE_LIMIT)]
    pub max_rows: usize,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only run these codes (repeatable or comma-separated).
    #[arg(long = "select", short = 's', value_name = "CODE", value_delimiter = ',')]
    pub select: Vec<String>,

    /// Worker threads (default: available parallelism).
    #[arg(long = "workers", short = 'j', value_name = "N")]
    pub workers: Option<usize>,

    /// Stop after this many rules fail.
    #[arg(long = "max-failures", value_name = "N")]
    pub max_failures: Option<usize>,

    /// Stop starting new rules after this many seconds.
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Args)]
pub struct RuleArgs {
    /// Rule code to run.
    #[arg(value_name = "CODE")]
    pub code: String,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
