// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::{Controller, ConvertRequest};
use crate::table_exporter::ExportFormat;

mod app_config;
mod app_controller;
mod delimited_reader;
mod errors;
mod file_utils;
mod phrase;
mod script;
mod table_exporter;
mod text_normalizer;
mod timecode;

/// CLI Wrapper for ExportFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliExportFormat {
    Csv,
    Tsv,
    Html,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli_format: CliExportFormat) -> Self {
        match cli_format {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Tsv => ExportFormat::Tsv,
            CliExportFormat::Html => ExportFormat::Html,
        }
    }
}

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
    /// Convert a subtitle script or re-imported table (default command)
    #[command(alias = "convert")]
    Convert(ConvertArgs),

    /// Generate shell completions for dubtab
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input subtitle script (.ass/.ssa/.srt) or exported table (.csv)
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file path (derived from the input when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, value_enum, default_value = "csv")]
    format: CliExportFormat,

    /// Frame rate for timecode frame counts
    #[arg(long)]
    fps: Option<f64>,

    /// Signed start offset in ms (sub-second part counts frames)
    #[arg(long, allow_hyphen_values = true)]
    start_offset: Option<i64>,

    /// Max silence gap in ms for merging same-speaker cues (<=0 disables)
    #[arg(short, long, allow_hyphen_values = true)]
    join_interval: Option<i64>,

    /// Only export phrases of this speaker/style (repeatable, case-insensitive)
    #[arg(short = 'a', long = "speaker")]
    speakers: Vec<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// dubtab - dubbing tables from subtitle scripts
///
/// Converts SSA/ASS/SRT dialogue scripts into dubbing-studio tables
/// (CSV, TSV, HTML) and re-imports previously exported CSV tables.
#[derive(Parser, Debug)]
#[command(name = "dubtab")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle script to dubbing table converter")]
#[command(long_about = "dubtab converts timed dialogue scripts into dubbing-studio tables.

EXAMPLES:
    dubtab episode.ass                          # CSV table with default config
    dubtab -F tsv episode.ass                   # Legacy two-column TSV cue sheet
    dubtab -F html --fps 23.976 episode.srt     # Self-contained HTML view
    dubtab -a Alice -a Bob episode.ass          # Only these speakers
    dubtab --start-offset -1 episode.ass        # Shift timecodes back one frame
    dubtab edited.csv -f                        # Re-save an edited table
    dubtab completions bash > dubtab.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle script (.ass/.ssa/.srt) or exported table (.csv)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file path (derived from the input when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, value_enum, default_value = "csv")]
    format: CliExportFormat,

    /// Frame rate for timecode frame counts
    #[arg(long)]
    fps: Option<f64>,

    /// Signed start offset in ms (sub-second part counts frames)
    #[arg(long, allow_hyphen_values = true)]
    start_offset: Option<i64>,

    /// Max silence gap in ms for merging same-speaker cues (<=0 disables)
    #[arg(short, long, allow_hyphen_values = true)]
    join_interval: Option<i64>,

    /// Only export phrases of this speaker/style (repeatable, case-insensitive)
    #[arg(short = 'a', long = "speaker")]
    speakers: Vec<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

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
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
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

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dubtab", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let convert_args = ConvertArgs {
                input_path,
                output: cli.output,
                format: cli.format,
                fps: cli.fps,
                start_offset: cli.start_offset,
                join_interval: cli.join_interval,
                speakers: cli.speakers,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args)
        }
    }
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(fps) = options.fps {
        config.fps = fps;
    }

    if let Some(start_offset) = options.start_offset {
        config.start_offset_ms = start_offset;
    }

    if let Some(join_interval) = options.join_interval {
        config.join_interval_ms = join_interval;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the conversion
    let controller = Controller::with_config(config)?;

    controller.run(&ConvertRequest {
        input: options.input_path,
        output: options.output,
        format: options.format.into(),
        speakers: options.speakers,
        force_overwrite: options.force_overwrite,
    })
}
