//! Courseware CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use courseware_cli::config::load_config;
use courseware_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, DocCommand, LogFormatArg, LogLevelArg, QuizCommand};
use crate::commands::{
    run_doc_blocks, run_doc_edit, run_doc_fmt, run_quiz_inspect, run_quiz_ratings, run_quiz_take,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let result = match &cli.command {
        Command::Doc(DocCommand::Fmt(args)) => run_doc_fmt(args),
        Command::Doc(DocCommand::Blocks { file }) => run_doc_blocks(file),
        Command::Doc(DocCommand::Edit(args)) => run_doc_edit(args, &config),
        Command::Quiz(QuizCommand::Inspect(args)) => run_quiz_inspect(args),
        Command::Quiz(QuizCommand::Take(args)) => run_quiz_take(args, &config).map(drop),
        Command::Quiz(QuizCommand::Ratings { file }) => run_quiz_ratings(file),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
