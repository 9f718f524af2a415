pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod loader;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractionConfig, FormatChoice, LimitsConfig, OutputConfig};
pub use error::{LeadExtractorError, Result, UserFriendlyError};

// Core functionality re-exports
pub use batch::{
    AggregateResult, BatchOptions, BatchOrchestrator, BatchOutcome, BatchProgress, CategoryCounts,
    ExtractionResult, Limits,
};
pub use exporter::{export, ExportFormat};
pub use extractor::{extract_emails, extract_phones, ClassifiedPhone, PhoneCategory, PhoneClassifier};
pub use loader::{DocumentLoader, TextLoader};
pub use scanner::{FileKind, InputCollector, InputFile, InputSource};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface: collect inputs, run a batch, export the results.
pub struct LeadExtractor {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl LeadExtractor {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// No signal handler, no progress bars.
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Resolves the CLI selection into an ordered file list.
    pub fn collect_inputs(&self, paths: &[PathBuf], dir: Option<&Path>) -> Result<(Vec<InputFile>, InputSource)> {
        let (files, source) = match dir {
            Some(dir) => (InputCollector::walk_directory(dir)?, InputSource::Directory),
            None => (InputCollector::from_paths(paths.iter().cloned()), InputSource::Files),
        };

        if files.is_empty() {
            return Err(LeadExtractorError::NoInputFiles);
        }

        Ok((files, source))
    }

    /// Runs the batch with a progress bar and prints the summary. A Ctrl+C
    /// stops between files and still returns the partial outcome.
    pub async fn run_batch(&self, files: Vec<InputFile>, source: InputSource) -> Result<BatchOutcome> {
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .start_operation(&format!("Extracting contacts from {} files", files.len()));

        let orchestrator = BatchOrchestrator::new(self.config.batch_options())
            .with_shutdown(self.shutdown.clone());

        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &BatchProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let outcome = orchestrator
            .run_batch(files, source, Some(&progress_callback))
            .await;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Read {} files", outcome.files_processed),
            outcome.duration,
        );

        if let (true, Some(limits)) = (outcome.limits_applied, self.config.limits()) {
            self.output_formatter.warning(&limits.notice());
        }
        self.output_formatter.print_batch_summary(&outcome);

        Ok(outcome)
    }

    /// Writes the outcome to `destination`. On failure the outcome is left
    /// untouched so the caller can still report counts.
    pub fn export(&self, outcome: &BatchOutcome, destination: &Path) -> Result<Vec<PathBuf>> {
        let format = self.config.output.format.resolve(destination);
        let spinner = self.progress_manager.create_spinner("Saving results");

        let result = exporter::export(&outcome.aggregate, destination, format);
        spinner.finish_and_clear();

        let paths = result?;
        self.output_formatter.print_saved(&paths);
        Ok(paths)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &LeadExtractorError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Reads `paths` with default settings and no terminal output.
pub async fn extract_simple<P: AsRef<Path>>(paths: &[P]) -> BatchOutcome {
    let files = InputCollector::from_paths(paths.iter().map(|p| p.as_ref().to_path_buf()));
    BatchOrchestrator::new(BatchOptions::default())
        .run_batch(files, InputSource::Files, None)
        .await
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
