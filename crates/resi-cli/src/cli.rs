//! CLI argument definitions for the resident importer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use resi_cli::config::DEFAULT_ENV_FILE;
use resi_cli::pipeline::ColumnOverride;
use resi_model::ResidentStatus;
use resi_import::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_LOGS_DIR, DEFAULT_MAX_RETRIES, DEFAULT_TABLE,
};

#[derive(Parser)]
#[command(
    name = "resi",
    version,
    about = "Bulk-import residents from an Excel or CSV spreadsheet",
    long_about = "Bulk-import residents from an Excel or CSV spreadsheet.\n\n\
                  Columns are mapped to resident fields by header, rows are validated,\n\
                  and valid records are inserted in batches with retry and resume.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub import: ImportArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
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

    /// Allow resident values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read, map, validate and import a spreadsheet (the default).
    Import(ImportArgs),

    /// Read, map and validate without importing anything.
    Preview(PreviewArgs),

    /// List the resident fields columns can map to.
    Fields,

    /// Write a CSV import template with sample residents.
    Template(TemplateArgs),
}

#[derive(Args, Clone)]
pub struct ImportArgs {
    /// Spreadsheet to import (.xlsx, .xlsm, .xls, .ods or .csv).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Records per bulk insert.
    #[arg(long = "batch-size", value_name = "N", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Bulk retries per batch before falling back to single inserts.
    #[arg(long = "max-retries", value_name = "N", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Backoff step in milliseconds; retry n waits n times this.
    #[arg(long = "backoff-ms", value_name = "MS", default_value_t = 1000)]
    pub backoff_ms: u64,

    /// Pause between batches in milliseconds.
    #[arg(long = "delay-ms", value_name = "MS", default_value_t = 200)]
    pub delay_ms: u64,

    /// Directory for the progress snapshot and error log.
    #[arg(long = "logs-dir", value_name = "DIR", default_value = DEFAULT_LOGS_DIR)]
    pub logs_dir: PathBuf,

    /// Destination table.
    #[arg(long = "table", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Resume from an earlier run's progress without waiting.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,

    /// Discard an earlier run's progress and start over.
    #[arg(long = "no-resume", conflicts_with = "yes")]
    pub no_resume: bool,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Spreadsheet to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// How many validation messages to list.
    #[arg(long = "messages", value_name = "N", default_value_t = 10)]
    pub messages: usize,
}

#[derive(Args)]
pub struct TemplateArgs {
    /// Output file (.csv).
    #[arg(value_name = "OUT", default_value = "mau_import_cu_dan.csv")]
    pub out: PathBuf,
}

#[derive(Args, Clone)]
pub struct MappingArgs {
    /// Env file holding backend credentials and the optional assist key.
    #[arg(long = "env-file", value_name = "PATH", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// API key for assisted column mapping (defaults to GEMINI_API_KEY).
    #[arg(long = "gemini-key", value_name = "KEY")]
    pub gemini_key: Option<String>,

    /// Model used for assisted column mapping.
    #[arg(long = "gemini-model", value_name = "MODEL")]
    pub gemini_model: Option<String>,

    /// Force a column's field, e.g. --map "Số ĐT=phoneNumber" or "Ghi chú=none".
    #[arg(long = "map", value_name = "HEADER=FIELD", value_parser = clap::value_parser!(ColumnOverride))]
    pub overrides: Vec<ColumnOverride>,

    /// Keep names and addresses exactly as typed.
    #[arg(long = "keep-case")]
    pub keep_case: bool,

    /// Status given to imported residents: active or pending_approval.
    #[arg(
        long = "status",
        value_name = "STATUS",
        default_value = "active",
        value_parser = clap::value_parser!(ResidentStatus)
    )]
    pub status: ResidentStatus,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_active() {
        let cli = Cli::try_parse_from(["resi", "danh_sach.xlsx"]).unwrap();
        assert_eq!(cli.import.mapping.status, ResidentStatus::Active);
    }

    #[test]
    fn status_flag_accepts_pending_approval() {
        let cli = Cli::try_parse_from(["resi", "preview", "a.csv", "--status", "pending_approval"])
            .unwrap();
        let Some(Command::Preview(args)) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.mapping.status, ResidentStatus::PendingApproval);
        assert!(Cli::try_parse_from(["resi", "a.csv", "--status", "archived"]).is_err());
    }
}
