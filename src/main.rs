// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::{Config, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod catalog;
mod errors;
mod file_utils;
mod language_utils;
mod markdown;
mod providers;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    OpenAI,
    LMStudio,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show translation coverage for a document without calling any provider
    Stats {
        /// Source markdown file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Catalog (.po) path; defaults to the input path with a .po extension
        #[arg(short, long)]
        po_path: Option<PathBuf>,

        /// Print the full markdown report instead of the summary line
        #[arg(short, long)]
        report: bool,
    },

    /// Generate shell completions for yamtwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// YAMTwAI - Yet Another Markdown Translator with AI
///
/// Translates markdown documents with AI providers while tracking every
/// block in a gettext PO catalog, so unchanged text is never retranslated.
#[derive(Parser, Debug)]
#[command(name = "yamtwai")]
#[command(author = "YAMTwAI Team")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered incremental markdown translation")]
#[command(long_about = "YAMTwAI segments markdown documents into blocks, tracks them in gettext PO
catalogs, and translates only what changed using AI providers.

EXAMPLES:
    yamtwai README.md                          # Translate using default config
    yamtwai -t ko README.md                    # Translate to Korean
    yamtwai -p openai -m gpt-4o README.md      # Use specific provider and model
    yamtwai docs/ -o docs-ko/ --po-dir po/     # Process a directory tree
    yamtwai --inplace README.md                # Refine a document in place
    yamtwai stats README.ko.md                 # Show coverage, no API calls
    yamtwai completions bash > yamtwai.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. Missing files fall back to the
    per-user config directory and then to built-in defaults.

SUPPORTED PROVIDERS:
    ollama    - Local Ollama server (default: llama3.2:3b)
    openai    - OpenAI API (requires API key)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)
    mock      - Offline mock provider (testing and dry runs)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input markdown file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file (single file) or directory (directory mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Catalog (.po) file path (single file mode)
    #[arg(long)]
    po_path: Option<PathBuf>,

    /// Catalog directory (directory mode; defaults to the output directory)
    #[arg(long)]
    po_dir: Option<PathBuf>,

    /// Rewrite the source document in place (refinement workflow)
    #[arg(short, long)]
    inplace: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

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
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");

            let mut stderr = std::io::stderr();
            let _ = match record.level() {
                Level::Error => writeln!(stderr, "\x1B[1;31m{} {}\x1B[0m", now, record.args()),
                Level::Warn => writeln!(stderr, "\x1B[1;33m{} {}\x1B[0m", now, record.args()),
                Level::Info => writeln!(stderr, "{} {}", now, record.args()),
                _ => writeln!(stderr, "\x1B[2m{} {}\x1B[0m", now, record.args()),
            };
        }
    }

    fn flush(&self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut options = CommandLineOptions::parse();

    // Subcommands that need no configuration
    if let Some(Commands::Completions { shell }) = &options.command {
        let shell = *shell;
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "yamtwai", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_default(&options.config_path)
        .with_context(|| format!("Failed to load configuration from {}", options.config_path))?;

    // CLI overrides
    if let Some(provider) = options.provider.clone() {
        config.provider.provider_type = provider.into();
    }
    if let Some(model) = options.model.clone() {
        config.provider.model = model;
    }
    if let Some(source_language) = options.source_language.clone() {
        config.source_language = source_language;
    }
    if let Some(target_language) = options.target_language.clone() {
        config.target_language = target_language;
    }
    if let Some(log_level) = options.log_level.clone() {
        config.log_level = log_level.into();
    }

    CustomLogger::init(config.log_level.to_level_filter())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    let controller = Controller::with_config(config)?;

    match options.command.take() {
        Some(Commands::Stats { input_path, po_path, report }) => {
            run_stats(&controller, input_path, po_path, report)
        }
        Some(Commands::Completions { .. }) => unreachable!("handled above"),
        None => {
            let input_path = options
                .input_path
                .take()
                .context("No input path given; see --help for usage")?;
            run_translate(&controller, input_path, options).await
        }
    }
}

/// Run the translate workflow for a file or a directory
async fn run_translate(
    controller: &Controller,
    input_path: PathBuf,
    options: CommandLineOptions,
) -> Result<()> {
    if input_path.is_dir() {
        let target_dir = options
            .output
            .clone()
            .unwrap_or_else(|| input_path.clone());
        let po_dir = options.po_dir.clone().unwrap_or_else(|| target_dir.clone());

        let report = controller
            .run_directory(&input_path, &target_dir, &po_dir, options.inplace)
            .await?;

        info!(
            "Directory done: {} translated, {} up to date, {} failed",
            report.files_processed, report.files_skipped, report.files_failed
        );
        if report.files_failed > 0 {
            error!("{} files failed; see log above", report.files_failed);
            std::process::exit(1);
        }
        Ok(())
    } else {
        let output = if options.inplace {
            Some(input_path.clone())
        } else {
            options.output.clone()
        };

        let report = controller
            .run_file(&input_path, output, options.po_path.clone(), options.inplace)
            .await?;

        info!(
            "Done: {} blocks, {} translated, {} failed, {} skipped — coverage {:.1}%",
            report.blocks_count,
            report.stats.translated,
            report.stats.failed,
            report.stats.skipped,
            report.coverage.coverage_percentage
        );
        info!("Output: {}", report.target_path.display());
        info!("Catalog: {}", report.po_path.display());
        if report.stats.failed > 0 {
            error!("{} units failed and remain pending; rerun to retry them", report.stats.failed);
            std::process::exit(1);
        }
        Ok(())
    }
}

/// Show coverage statistics or the full report for one document
fn run_stats(
    controller: &Controller,
    input_path: PathBuf,
    po_path: Option<PathBuf>,
    full_report: bool,
) -> Result<()> {
    let po_path = po_path.unwrap_or_else(|| input_path.with_extension("po"));

    if full_report {
        let report = controller.export_report(&input_path, &po_path)?;
        println!("{}", report);
        return Ok(());
    }

    let (coverage, stats) = controller.translation_stats(&input_path, &po_path)?;
    println!(
        "{}: {}/{} blocks translated ({:.1}%), {} fuzzy, {} untranslated",
        input_path.display(),
        coverage.translated_blocks,
        coverage.translatable_blocks,
        coverage.coverage_percentage,
        coverage.fuzzy_blocks,
        coverage.untranslated_blocks
    );
    println!(
        "Catalog: {} entries — {} complete, {} new, {} stale",
        stats.total, stats.complete, stats.pending_new, stats.pending_stale
    );
    Ok(())
}
