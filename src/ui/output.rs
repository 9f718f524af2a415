use crate::batch::BatchOutcome;
use crate::error::{LeadExtractorError, UserFriendlyError};
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &LeadExtractorError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// Category counts, then the per-file breakdown (verbose) and the error
    /// list. JSON mode prints the whole outcome instead.
    pub fn print_batch_summary(&self, outcome: &BatchOutcome) {
        match self.mode {
            OutputMode::Json => self.print_json_outcome(outcome),
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(outcome),
            OutputMode::Plain => self.print_plain_summary(outcome),
        }
    }

    pub fn print_saved(&self, paths: &[PathBuf]) {
        if paths.is_empty() {
            self.warning("Nothing was extracted, no output written");
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "saved",
                "paths": paths,
            })),
            _ => {
                for path in paths {
                    self.success(&format!("Data saved to {}", path.display()));
                }
            }
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (&CHECKMARK, style(message).green().bold()),
                MessageType::Error => (&CROSS, style(message).red().bold()),
                MessageType::Warning => (&WARNING, style(message).yellow().bold()),
                MessageType::Info => (&INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_json_outcome(&self, outcome: &BatchOutcome) {
        let summary = serde_json::json!({
            "type": "summary",
            "counts": outcome.counts(),
            "files_requested": outcome.files_requested,
            "files_processed": outcome.files_processed,
            "limits_applied": outcome.limits_applied,
            "cancelled": outcome.cancelled,
            "duration_ms": outcome.duration.as_millis() as u64,
            "per_file_email_counts": outcome.per_file_email_counts,
            "per_file_phone_counts": outcome.per_file_phone_counts,
            "results": outcome.aggregate,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, outcome: &BatchOutcome) {
        println!();
        println!("{}", "─".repeat(40));

        if self.use_colors {
            println!("{} {}", style("Extraction completed!").green().bold(), CHECKMARK);
        } else {
            println!("✓ Extraction completed!");
        }
        println!();

        for (label, count) in outcome.counts().rows() {
            let value = if self.use_colors {
                style(count).cyan().bold().to_string()
            } else {
                count.to_string()
            };
            println!("  {:<16}{}", label, value);
        }

        println!();
        println!(
            "  Files processed: {}/{} in {}",
            outcome.files_processed,
            outcome.files_requested,
            format_duration(outcome.duration)
        );

        if self.verbose_level >= 1 {
            self.print_per_file_counts(outcome);
        }

        if !outcome.aggregate.errors.is_empty() {
            println!();
            println!("  Issues encountered:");
            for error in &outcome.aggregate.errors {
                println!("    - {}", error);
            }
        }

        println!("{}", "─".repeat(40));
    }

    fn print_per_file_counts(&self, outcome: &BatchOutcome) {
        if outcome.per_file_email_counts.is_empty() && outcome.per_file_phone_counts.is_empty() {
            return;
        }

        println!();
        println!("  Per file (emails / phone matches):");
        for (file, emails, phones) in per_file_rows(outcome) {
            println!("    {}: {} / {}", file, emails, phones);
        }
    }

    fn print_plain_summary(&self, outcome: &BatchOutcome) {
        println!("COMPLETED: Extraction");
        for (label, count) in outcome.counts().rows() {
            println!("{}: {}", label, count);
        }
        println!(
            "Files processed: {}/{}",
            outcome.files_processed, outcome.files_requested
        );
        if self.verbose_level >= 1 {
            for (file, emails, phones) in per_file_rows(outcome) {
                println!("FILE: {} emails={} phones={}", file, emails, phones);
            }
        }
        for error in &outcome.aggregate.errors {
            println!("ISSUE: {}", error);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

/// Filenames from either per-file map with both counts, zero when absent.
fn per_file_rows(outcome: &BatchOutcome) -> Vec<(&str, usize, usize)> {
    let mut files: Vec<&str> = outcome
        .per_file_email_counts
        .keys()
        .chain(outcome.per_file_phone_counts.keys())
        .map(String::as_str)
        .collect();
    files.sort_unstable();
    files.dedup();

    files
        .into_iter()
        .map(|file| {
            (
                file,
                outcome.per_file_email_counts.get(file).copied().unwrap_or(0),
                outcome.per_file_phone_counts.get(file).copied().unwrap_or(0),
            )
        })
        .collect()
}
