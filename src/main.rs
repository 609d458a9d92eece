// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::Path;

use crate::app_config::Config;
use app_controller::Controller;
use extraction::ExtractionRequest;

mod app_config;
mod app_controller;
mod dictionary;
mod errors;
mod extraction;
mod length_override;
mod matching;
mod report;
mod sheet;
mod text_normalizer;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the enrichment pipeline over the working sheet (default command)
    Run(RunArgs),

    /// Extract attribute terms from a sheet of free-text comments
    Extract(ExtractArgs),

    /// Generate shell completions for mdprep
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Input sheet with one comment per row
    #[arg(value_name = "INPUT_SHEET")]
    input_sheet: String,

    /// Column holding the free-text comments
    #[arg(long, default_value = "Internal Comments")]
    comments_column: String,

    /// Column holding the item code
    #[arg(long, default_value = "Item")]
    code_column: String,

    /// Where the report sheet is written
    #[arg(short, long, default_value = "sheets/extraction_report.csv")]
    output: String,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// mdprep - Master Data Preparation Pipeline
///
/// Enriches spreadsheets of item codes with material, norm, size-dimension,
/// product-group, unit and translation attributes by matching each item's
/// free-text narrative against controlled vocabularies.
#[derive(Parser, Debug)]
#[command(name = "mdprep")]
#[command(version = "1.0.0")]
#[command(about = "Master-data sheet enrichment pipeline")]
#[command(long_about = "mdprep fills the attribute columns of a working sheet by matching each
item's narrative against controlled vocabularies, then writes a JSON run
report describing every stage.

EXAMPLES:
    mdprep                                      # Run the pipeline with conf.json
    mdprep run -c custom.json                   # Run with a different config
    mdprep --log-level debug                    # Run with debug logging
    mdprep extract comments.csv -o report.csv   # Mine terms from a comment sheet
    mdprep completions bash > mdprep.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

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
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }

    // @returns: Marker for log level
    fn marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✖ ",
            Level::Warn => "⚠ ",
            Level::Info => " ",
            Level::Debug => "• ",
            Level::Trace => "· ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let marker = Self::marker_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "mdprep", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Extract(args)) => run_extract(args),
        Some(Commands::Run(args)) => run_pipeline(args),
        None => {
            // Default behavior without a subcommand
            run_pipeline(RunArgs {
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
        }
    }
}

/// Load the configuration, creating a default file when none exists, and
/// apply the command-line log level on top.
fn load_config(config_path: &str, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(log_level) = cli_log_level {
        config.log_level = log_level.into();
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    Ok(config)
}

fn run_pipeline(options: RunArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level)?;
    let controller = Controller::with_config(config)?;
    controller.run()
}

fn run_extract(options: ExtractArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level)?;
    let request = ExtractionRequest {
        input_sheet: options.input_sheet,
        comments_column: options.comments_column,
        code_column: options.code_column,
        output_sheet: options.output,
    };
    extraction::run(&config, &request)?;
    Ok(())
}
