//! CLI argument definitions for `study-bulk`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "study-bulk",
    version,
    about = "Bulk task import - derive the CSV schema, validate, and upload",
    long_about = "Create many evaluation tasks at once from an artifact archive and a CSV mapping file.\n\n\
                  The CSV columns are derived from the study's evaluation criteria.\n\
                  Use `preview` or `template` to see the expected layout, `validate` to check a file,\n\
                  and `upload` to submit both files to the study service."
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

    /// Study service base URL (overrides the settings file).
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Client settings JSON file.
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the CSV column schema for a study.
    Schema(StudyArgs),

    /// Print the header with example rows.
    Preview(PreviewArgs),

    /// Explain what each criterion answer column accepts.
    Criteria(StudyArgs),

    /// Write a CSV template with example rows.
    Template(TemplateArgs),

    /// Check a CSV mapping file (and optionally its archive) without uploading.
    Validate(ValidateArgs),

    /// Validate and upload an artifact archive with its CSV mapping file.
    Upload(UploadArgs),

    /// Browse a study's artifact folders.
    Folders(FoldersArgs),
}

/// Where the study configuration comes from.
#[derive(Args, Clone)]
#[group(required = true, multiple = false)]
pub struct StudySource {
    /// Study configuration JSON file (offline).
    #[arg(long = "study-file", value_name = "PATH")]
    pub study_file: Option<PathBuf>,

    /// Study id; the configuration is fetched from the study service.
    #[arg(long = "study", value_name = "ID")]
    pub study: Option<String>,
}

#[derive(Args)]
pub struct StudyArgs {
    #[command(flatten)]
    pub source: StudySource,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: StudySource,

    /// Show three numbered example rows instead of one.
    #[arg(long = "expanded")]
    pub expanded: bool,
}

#[derive(Args)]
pub struct TemplateArgs {
    #[command(flatten)]
    pub source: StudySource,

    /// Template file to write.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Number of example rows.
    #[arg(long = "rows", default_value_t = 1)]
    pub rows: usize,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: StudySource,

    /// CSV mapping file.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: PathBuf,

    /// Artifact archive to cross-check referenced filenames against.
    #[arg(long = "archive", value_name = "PATH")]
    pub archive: Option<PathBuf>,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Study id to upload into.
    #[arg(long = "study", value_name = "ID")]
    pub study: String,

    /// CSV mapping file.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Artifact ZIP archive.
    #[arg(long = "archive", value_name = "PATH")]
    pub archive: Option<PathBuf>,

    /// Submit without checking the files locally first.
    ///
    /// The server still validates the whole import.
    #[arg(long = "skip-validation")]
    pub skip_validation: bool,
}

#[derive(Args)]
pub struct FoldersArgs {
    /// Study id.
    #[arg(long = "study", value_name = "ID")]
    pub study: String,

    /// Folder names to descend into, separated by `/`.
    #[arg(long = "path", value_name = "A/B")]
    pub path: Option<String>,
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
