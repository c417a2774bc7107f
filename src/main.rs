// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use clap::{Parser, ValueEnum};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use docs_translate::app_config::{Config, ConfigOverrides, LogLevel};
use docs_translate::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Translate a Markdown documentation tree with a hosted language model
#[derive(Parser, Debug)]
#[command(name = "docs-translate")]
#[command(version)]
#[command(about = "Translate Markdown documentation with a hosted language model")]
#[command(long_about = "docs-translate mirrors every Markdown file of a documentation tree into one
sibling folder per target language and translates it, leaving code blocks untouched.

EXAMPLES:
    docs-translate                              # Translate docs/ into every configured language
    docs-translate -l ja                        # Only Japanese
    docs-translate --force                      # Retranslate even up-to-date files
    docs-translate --dry-run                    # List the files that would be translated

CONFIGURATION:
    Settings are read from translate-docs.json when it exists; built-in defaults
    apply otherwise. The provider is configured through the environment (a .env
    file is honored):
        AZURE_OPENAI_ENDPOINT_URL      endpoint URL
        AZURE_OPENAI_API_KEY           API key
        AZURE_OPENAI_DEPLOYMENT_NAME   deployment name (default: o3)
        AZURE_OPENAI_API_VERSION       API version (default: 2025-01-01-preview)")]
struct CommandLineOptions {
    /// Configuration file path
    #[arg(short, long, default_value = "translate-docs.json")]
    config: PathBuf,

    /// Root of the documentation tree
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Only translate into these language codes (repeatable)
    #[arg(short, long = "language", value_name = "CODE")]
    languages: Vec<String>,

    /// Translate every file, ignoring timestamps
    #[arg(short, long)]
    force: bool,

    /// Report what would be translated without calling the model
    #[arg(long)]
    dry_run: bool,

    /// Set logging level
    #[arg(long, value_enum)]
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

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with the most verbose level; the effective
    // level is set through set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let options = CommandLineOptions::parse();
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    // A missing .env is not an error
    dotenv::dotenv().ok();

    let config = load_config(&options)?;
    log::set_max_level(level_filter(&config.log_level));

    let controller = if options.dry_run {
        Controller::dry_run(config)
    } else {
        Controller::with_config(config).context("Failed to set up the translation provider")?
    };

    let summary = controller.force_overwrite(options.force).run().await?;

    if !summary.is_success() {
        for (target, message) in &summary.failures {
            warn!("  {}: {}", target.display(), message);
        }
        return Err(anyhow!("{} translation job(s) failed", summary.failures.len()));
    }

    if options.dry_run {
        info!("{} file(s) would be translated.", summary.planned);
    } else {
        info!("Translation completed.");
    }

    Ok(())
}

/// Load the config file when present, then apply environment and CLI overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let overrides = ConfigOverrides {
        source_dir: options.source_dir.clone(),
        languages: options.languages.clone(),
        log_level: options.log_level.clone().map(LogLevel::from),
    };

    Config::load_layered(&options.config, |key| std::env::var(key).ok(), &overrides)
        .context("Configuration validation failed")
}
