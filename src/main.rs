// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod batching;
mod errors;
mod file_utils;
mod providers;
mod retry;
mod translation_service;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// reqtrans - AI-powered requirements translation
///
/// Translates a text file of software requirements (one per line) to
/// Vietnamese in batches, with retry and resume support.
#[derive(Parser, Debug)]
#[command(name = "reqtrans")]
#[command(version = "0.1.0")]
#[command(about = "Batch-translate requirement files with an LLM")]
#[command(long_about = "reqtrans reads a requirements file (one requirement per line), translates it
to Vietnamese in fixed-size batches via the OpenAI API, and writes the output
file after every batch so an interrupted run can be resumed.

EXAMPLES:
    reqtrans --in_txt reqs.txt --out_txt reqs.vi.txt
    reqtrans --in_txt reqs.txt --out_txt reqs.vi.txt --resume
    reqtrans --in_txt reqs.txt --out_txt reqs.vi.txt -m gpt-4o --batch_size 50

CONFIGURATION:
    Defaults are stored in conf.json. If the config file doesn't exist, a
    default one is created automatically. The API key is taken from the
    config file or the OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    /// Input .txt file, one requirement per line
    #[arg(long = "in_txt", value_name = "PATH")]
    in_txt: PathBuf,

    /// Output Vietnamese .txt file, one translated line per input line
    #[arg(long = "out_txt", value_name = "PATH")]
    out_txt: PathBuf,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Lines per API call
    #[arg(short, long = "batch_size")]
    batch_size: Option<usize>,

    /// Resume if out_txt already has some lines
    #[arg(short, long)]
    resume: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    let mut config = Config::from_file_or_default(&cli.config_path)?;

    // Apply command line overrides
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(cmd_log_level) = cli.log_level {
        config.log_level = cmd_log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate()?;

    let controller = Controller::new(config)?;
    controller.run(&cli.in_txt, &cli.out_txt, cli.resume).await?;

    info!("Done.");
    Ok(())
}
