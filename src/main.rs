use clap::Parser;
use lead_extractor::{
    BatchOutcome, Cli, InputFile, LeadExtractor, LeadExtractorError, OutputFormatter, OutputMode,
    UserFriendlyError,
};
use std::fs::OpenOptions;
use std::process;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    // Dropping the guard flushes the log file
    let _log_guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    if !cli.has_inputs() {
        let error = LeadExtractorError::NoInputFiles;
        print_startup_error(&error);
        return exit_code_for_error(&error);
    }

    let extractor = match LeadExtractor::from_cli(&cli) {
        Ok(extractor) => extractor,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    let (files, source) = match extractor.collect_inputs(&cli.paths, cli.dir.as_deref()) {
        Ok(selection) => selection,
        Err(e) => {
            extractor.handle_error(&e);
            return exit_code_for_error(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cli, &extractor, &files);
    }

    let outcome = match extractor.run_batch(files, source).await {
        Ok(outcome) => outcome,
        Err(e) => {
            extractor.handle_error(&e);
            return exit_code_for_error(&e);
        }
    };

    if let Some(ref destination) = cli.output {
        if let Err(e) = extractor.export(&outcome, destination) {
            extractor.handle_error(&e);
            return exit_code_for_error(&e);
        }
    }

    exit_code_for_outcome(&outcome)
}

fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>, LeadExtractorError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(cli.verbosity_level())));

    let (file_layer, guard) = match cli.log_file {
        Some(ref path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn default_log_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "lead_extractor=warn",
        1 => "lead_extractor=info",
        2 => "lead_extractor=debug",
        _ => "lead_extractor=trace",
    }
}

fn exit_code_for_error(error: &LeadExtractorError) -> i32 {
    match error {
        LeadExtractorError::Cancelled => 130, // Interrupted (SIGINT)
        LeadExtractorError::Save { .. } => 3,
        LeadExtractorError::NoInputFiles | LeadExtractorError::InvalidPath { .. } => 4,
        _ => 1,
    }
}

fn exit_code_for_outcome(outcome: &BatchOutcome) -> i32 {
    if outcome.cancelled {
        130
    } else if outcome.has_file_errors() {
        2 // Finished, some files could not be read
    } else {
        0
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "lead-extractor.toml".to_string());

    match LeadExtractor::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  lead-extractor <files>... --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, extractor: &LeadExtractor, files: &[InputFile]) -> i32 {
    let formatter = extractor.output_formatter();
    let config = extractor.config();
    let options = config.batch_options();

    println!("DRY RUN - no files will be read");
    println!();
    println!("Files ({}):", files.len());
    for file in files {
        let kind = match file.kind {
            Some(kind) if options.extensions.contains(&file.extension) => kind.label(),
            _ => "unsupported",
        };
        println!("  {} [{}]", file.display_path(), kind);
    }

    println!();
    println!(
        "  Strip country code: {} ({})",
        config.extraction.strip_country_code, config.extraction.country_code
    );
    println!("  Timeout per file: {} seconds", config.extraction.load_timeout);
    match config.limits() {
        Some(limits) => println!(
            "  Limits: {} files, {} emails, {} phones",
            limits.max_files, limits.max_emails, limits.max_phones
        ),
        None => println!("  Limits: none"),
    }

    match cli.output {
        Some(ref destination) => println!(
            "  Output: {} ({:?})",
            destination.display(),
            config.output.format.resolve(destination)
        ),
        None => println!("  Output: summary only"),
    }

    formatter.info("Run without --dry-run to extract");
    0
}

fn print_startup_error(error: &LeadExtractorError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_extractor::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "lead-extractor",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[extraction]"));
    }

    #[test]
    fn test_dry_run_mode() {
        let extractor = LeadExtractor::new_for_test(Config::default(), OutputMode::Plain, 0, true);
        let cli = Cli::try_parse_from(["lead-extractor", "a.txt", "b.odt", "--dry-run"]).unwrap();
        let files = vec![InputFile::new("a.txt"), InputFile::new("b.odt")];

        assert_eq!(handle_dry_run(&cli, &extractor, &files), 0);
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(exit_code_for_error(&LeadExtractorError::Cancelled), 130);
        assert_eq!(exit_code_for_error(&LeadExtractorError::NoInputFiles), 4);
        assert_eq!(
            exit_code_for_error(&LeadExtractorError::save("out.xlsx", "denied")),
            3
        );
        assert_eq!(
            exit_code_for_error(&LeadExtractorError::Config {
                message: "bad".to_string()
            }),
            1
        );
    }

    #[test]
    fn test_outcome_exit_codes() {
        let mut outcome = BatchOutcome::default();
        assert_eq!(exit_code_for_outcome(&outcome), 0);

        outcome.aggregate.errors.push("Limits applied: 100 emails, 100 phones, 3 files.".to_string());
        assert_eq!(exit_code_for_outcome(&outcome), 0);

        outcome.aggregate.errors.push("Unsupported file: a.odt".to_string());
        assert_eq!(exit_code_for_outcome(&outcome), 2);

        outcome.cancelled = true;
        assert_eq!(exit_code_for_outcome(&outcome), 130);
    }

    #[test]
    fn test_default_log_directive() {
        assert_eq!(default_log_directive(0), "lead_extractor=warn");
        assert_eq!(default_log_directive(2), "lead_extractor=debug");
        assert_eq!(default_log_directive(9), "lead_extractor=trace");
    }
}
