//! CLI argument definitions for the courseware tools.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use courseware_cli::edit::EditOp;

#[derive(Parser)]
#[command(
    name = "courseware",
    version,
    about = "Courseware tools - edit lecture documents and take quizzes",
    long_about = "Edit lecture content stored in the block text format and run quiz attempts.\n\n\
                  Documents are plain text: one block per line, '#' headings, '-' list items,\n\
                  and '![alt](url)' images. Quizzes are JSON question sets."
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

    /// Settings file (TOML). Defaults apply when absent.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

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
    /// Work with lecture documents.
    #[command(subcommand)]
    Doc(DocCommand),

    /// Work with quizzes and ratings.
    #[command(subcommand)]
    Quiz(QuizCommand),
}

#[derive(Subcommand)]
pub enum DocCommand {
    /// Rewrite a document in canonical form.
    Fmt(FmtArgs),

    /// List the blocks of a document.
    Blocks {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Apply one structural edit and save the document.
    Edit(EditArgs),
}

#[derive(Args)]
pub struct FmtArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Overwrite the file instead of printing to stdout.
    #[arg(long = "write", short = 'w')]
    pub write: bool,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Course the lecture belongs to (used for image uploads).
    #[arg(long = "course", default_value = "")]
    pub course: String,

    /// Lecture identifier (used for image uploads).
    #[arg(long = "lecture", default_value = "")]
    pub lecture: String,

    #[command(subcommand)]
    pub op: EditOp,
}

#[derive(Subcommand)]
pub enum QuizCommand {
    /// Show a quiz, its availability and its questions.
    Inspect(InspectArgs),

    /// Take a quiz interactively.
    Take(TakeArgs),

    /// Summarize course ratings.
    Ratings {
        #[arg(value_name = "RATINGS_JSON")]
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct InspectArgs {
    /// Question set file named `<quiz-id>.json`.
    #[arg(value_name = "QUIZ_JSON")]
    pub file: PathBuf,

    /// Check availability at this instant (RFC 3339) instead of now.
    #[arg(long = "at", value_name = "TIMESTAMP")]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct TakeArgs {
    /// Question set file named `<quiz-id>.json`.
    #[arg(value_name = "QUIZ_JSON")]
    pub file: PathBuf,

    /// Directory for auto-save snapshots and the submission
    /// (overrides `paths.output_dir`).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not write auto-save snapshots.
    #[arg(long = "no-autosave")]
    pub no_autosave: bool,
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
