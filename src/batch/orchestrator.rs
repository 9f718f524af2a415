use crate::batch::{AggregateResult, BatchOutcome, BatchProgress, ExtractionResult, Limits};
use crate::error::{LeadExtractorError, Result};
use crate::extractor::PhoneClassifier;
use crate::loader::{DocumentLoader, TextLoader};
use crate::scanner::{FileKind, InputFile, InputSource};
use crate::ui::GracefulShutdown;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub strip_country_code: bool,
    pub country_code: String,
    pub load_timeout: Duration,
    pub limits: Option<Limits>,
    /// Lowercase extensions, without the dot, that the batch will read.
    pub extensions: Vec<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            strip_country_code: true,
            country_code: "+91".to_string(),
            load_timeout: Duration::from_secs(25),
            limits: Some(Limits::free_tier()),
            extensions: FileKind::SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

pub struct BatchOrchestrator {
    options: BatchOptions,
    loader: Arc<dyn DocumentLoader>,
    classifier: PhoneClassifier,
    shutdown: Option<GracefulShutdown>,
}

impl BatchOrchestrator {
    pub fn new(options: BatchOptions) -> Self {
        let classifier = PhoneClassifier::new(options.strip_country_code, options.country_code.clone());

        Self {
            options,
            loader: Arc::new(TextLoader::new()),
            classifier,
            shutdown: None,
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Processes `files` one at a time, in order. Per-file failures are
    /// recorded in the aggregate's errors and never stop the batch.
    pub async fn run_batch(
        &self,
        mut files: Vec<InputFile>,
        source: InputSource,
        progress_callback: Option<&dyn Fn(&BatchProgress)>,
    ) -> BatchOutcome {
        let start = Instant::now();
        let files_requested = files.len();

        if let (Some(limits), InputSource::Files) = (&self.options.limits, source) {
            if files.len() > limits.max_files {
                debug!(
                    "Selecting first {} of {} files",
                    limits.max_files,
                    files.len()
                );
                files.truncate(limits.max_files);
            }
        }

        let mut aggregate = AggregateResult::new();
        let mut per_file_email_counts = BTreeMap::new();
        let mut per_file_phone_counts = BTreeMap::new();
        let mut progress = BatchProgress::new(files.len());
        let mut cancelled = false;

        for file in &files {
            if self.shutdown.as_ref().is_some_and(|s| !s.is_running()) {
                warn!("Batch cancelled after {} files", progress.files_processed);
                aggregate.errors.push(LeadExtractorError::Cancelled.to_string());
                cancelled = true;
                break;
            }

            let result = self.process_file(file).await;

            if !result.emails.is_empty() {
                *per_file_email_counts.entry(file.filename.clone()).or_insert(0) +=
                    result.emails.len();
            }
            if !result.phones.is_empty() {
                *per_file_phone_counts.entry(file.filename.clone()).or_insert(0) +=
                    result.phones.len();
            }

            aggregate.merge(result, &self.classifier);

            progress.update_file(file.filename.clone());
            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        let limits_applied = self
            .options
            .limits
            .as_ref()
            .is_some_and(|limits| limits.apply(&mut aggregate, files_requested));

        let counts = aggregate.counts();
        info!(
            "Extraction completed with {} emails, {} mobiles, {} landlines, {} invalid",
            counts.emails, counts.mobiles, counts.landlines, counts.invalid_phones
        );

        BatchOutcome {
            aggregate,
            per_file_email_counts,
            per_file_phone_counts,
            files_requested,
            files_processed: progress.files_processed,
            limits_applied,
            cancelled,
            duration: start.elapsed(),
        }
    }

    /// Load, extract and report one file.
    pub async fn process_file(&self, file: &InputFile) -> ExtractionResult {
        if !self.is_supported(file) {
            warn!(
                "Unsupported file: {} (extension: .{})",
                file.display_path(),
                file.extension
            );
            return ExtractionResult::failed(
                LeadExtractorError::UnsupportedFormat {
                    path: file.display_path(),
                    extension: file.extension.clone(),
                }
                .to_string(),
            );
        }

        match self.load_with_timeout(file).await {
            Ok(text) => {
                let result = ExtractionResult::from_text(&text);
                debug!(
                    "{}: {} emails, {} phone candidates",
                    file.filename,
                    result.emails.len(),
                    result.phones.len()
                );
                result
            }
            Err(e) => {
                error!("{}", e);
                ExtractionResult::failed(e.to_string())
            }
        }
    }

    fn is_supported(&self, file: &InputFile) -> bool {
        file.kind.is_some() && self.options.extensions.contains(&file.extension)
    }

    /// Runs the loader on a blocking worker bounded by the time budget. On
    /// timeout the worker is detached: it may keep running, but its result
    /// is never read.
    async fn load_with_timeout(&self, file: &InputFile) -> Result<String> {
        let loader = Arc::clone(&self.loader);
        let path = file.path.clone();
        let handle = task::spawn_blocking(move || loader.try_load(&path));

        match tokio::time::timeout(self.options.load_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(LeadExtractorError::LoadFailure {
                path: file.display_path(),
                message: format!("reader task failed: {}", join_error),
            }),
            Err(_) => Err(LeadExtractorError::LoadTimeout {
                path: file.display_path(),
                seconds: self.options.load_timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::InputCollector;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn options_without_limits() -> BatchOptions {
        BatchOptions {
            limits: None,
            ..BatchOptions::default()
        }
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Fails or stalls on chosen file names, otherwise reads the file.
    struct ScriptedLoader {
        fail_on: Option<&'static str>,
        stall_on: Option<&'static str>,
    }

    impl DocumentLoader for ScriptedLoader {
        fn try_load(&self, path: &Path) -> Result<String> {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if Some(name) == self.fail_on {
                return Err(LeadExtractorError::LoadFailure {
                    path: path.display().to_string(),
                    message: "simulated parser crash".to_string(),
                });
            }
            if Some(name) == self.stall_on {
                std::thread::sleep(Duration::from_millis(500));
            }
            TextLoader::new().try_load(path)
        }
    }

    #[tokio::test]
    async fn test_batch_aggregates_across_files() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_file(temp_dir.path(), "a.txt", "asha@example.in +91 9876543210");
        let b = write_file(temp_dir.path(), "b.csv", "name,phone\nOffice,022-12345678\nasha@example.in");

        let orchestrator = BatchOrchestrator::new(options_without_limits());
        let outcome = orchestrator
            .run_batch(InputCollector::from_paths(vec![a, b]), InputSource::Files, None)
            .await;

        assert_eq!(outcome.aggregate.emails, vec!["asha@example.in", "asha@example.in"]);
        assert!(outcome.aggregate.mobiles.contains("9876543210"));
        assert!(outcome.aggregate.landlines.contains("02212345678"));
        assert!(outcome.aggregate.errors.is_empty());
        assert_eq!(outcome.files_processed, 2);
        assert_eq!(outcome.per_file_email_counts.get("a.txt"), Some(&1));
        assert_eq!(outcome.per_file_phone_counts.get("b.csv"), Some(&1));
        assert!(!outcome.limits_applied);
    }

    #[tokio::test]
    async fn test_failing_file_is_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(temp_dir.path(), "one.txt", "one@example.com"),
            write_file(temp_dir.path(), "two.txt", "two@example.com"),
            write_file(temp_dir.path(), "three.txt", "three@example.com"),
        ];

        let orchestrator = BatchOrchestrator::new(options_without_limits()).with_loader(Arc::new(
            ScriptedLoader {
                fail_on: Some("two.txt"),
                stall_on: None,
            },
        ));
        let outcome = orchestrator
            .run_batch(InputCollector::from_paths(paths), InputSource::Files, None)
            .await;

        assert_eq!(
            outcome.aggregate.emails,
            vec!["one@example.com", "three@example.com"]
        );
        assert_eq!(outcome.aggregate.errors.len(), 1);
        assert!(outcome.aggregate.errors[0].contains("two.txt"));
        assert!(outcome.aggregate.errors[0].starts_with("Error processing"));
        assert_eq!(outcome.files_processed, 3);
    }

    #[tokio::test]
    async fn test_slow_file_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(temp_dir.path(), "slow.txt", "slow@example.com"),
            write_file(temp_dir.path(), "fast.txt", "fast@example.com"),
        ];

        let options = BatchOptions {
            load_timeout: Duration::from_millis(50),
            ..options_without_limits()
        };
        let orchestrator = BatchOrchestrator::new(options).with_loader(Arc::new(ScriptedLoader {
            fail_on: None,
            stall_on: Some("slow.txt"),
        }));
        let outcome = orchestrator
            .run_batch(InputCollector::from_paths(paths), InputSource::Files, None)
            .await;

        assert_eq!(outcome.aggregate.emails, vec!["fast@example.com"]);
        assert_eq!(outcome.aggregate.errors.len(), 1);
        assert!(outcome.aggregate.errors[0].starts_with("Timeout: "));
        assert!(outcome.aggregate.errors[0].contains("slow.txt"));
    }

    #[tokio::test]
    async fn test_unsupported_file_is_skipped_with_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(temp_dir.path(), "photo.png", "x@example.com"),
            write_file(temp_dir.path(), "notes.txt", "y@example.com"),
        ];

        let outcome = BatchOrchestrator::new(options_without_limits())
            .run_batch(InputCollector::from_paths(paths), InputSource::Files, None)
            .await;

        assert_eq!(outcome.aggregate.emails, vec!["y@example.com"]);
        assert_eq!(outcome.aggregate.errors.len(), 1);
        assert!(outcome.aggregate.errors[0].starts_with("Unsupported file:"));
    }

    #[tokio::test]
    async fn test_disabled_extension_is_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(temp_dir.path(), "page.html", "<p>z@example.com</p>");

        let options = BatchOptions {
            extensions: vec!["txt".to_string()],
            ..options_without_limits()
        };
        let outcome = BatchOrchestrator::new(options)
            .run_batch(InputCollector::from_paths(vec![path]), InputSource::Files, None)
            .await;

        assert!(outcome.aggregate.emails.is_empty());
        assert_eq!(outcome.aggregate.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_explicit_list_truncated_to_file_limit() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<_> = (0..5)
            .map(|i| write_file(temp_dir.path(), &format!("f{}.txt", i), &format!("u{}@example.com", i)))
            .collect();

        let outcome = BatchOrchestrator::new(BatchOptions::default())
            .run_batch(InputCollector::from_paths(paths), InputSource::Files, None)
            .await;

        assert_eq!(outcome.files_requested, 5);
        assert_eq!(outcome.files_processed, 3);
        assert_eq!(
            outcome.aggregate.emails,
            vec!["u0@example.com", "u1@example.com", "u2@example.com"]
        );
        assert!(outcome.limits_applied);
        assert_eq!(
            outcome
                .aggregate
                .errors
                .iter()
                .filter(|e| e.starts_with(Limits::NOTICE_PREFIX))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_directory_source_processes_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<_> = (0..4)
            .map(|i| write_file(temp_dir.path(), &format!("f{}.txt", i), &format!("u{}@example.com", i)))
            .collect();

        let outcome = BatchOrchestrator::new(BatchOptions::default())
            .run_batch(InputCollector::from_paths(paths), InputSource::Directory, None)
            .await;

        assert_eq!(outcome.files_processed, 4);
        assert_eq!(outcome.aggregate.emails.len(), 4);
        assert!(outcome.limits_applied);
    }

    #[tokio::test]
    async fn test_email_limit_applied_after_batch() {
        let temp_dir = TempDir::new().unwrap();
        let content: Vec<String> = (0..150).map(|i| format!("user{}@example.com", i)).collect();
        let path = write_file(temp_dir.path(), "many.txt", &content.join("\n"));

        let outcome = BatchOrchestrator::new(BatchOptions::default())
            .run_batch(InputCollector::from_paths(vec![path]), InputSource::Files, None)
            .await;

        assert_eq!(outcome.aggregate.emails.len(), 100);
        assert_eq!(outcome.aggregate.emails[99], "user99@example.com");
        assert_eq!(outcome.aggregate.errors.len(), 1);
        assert!(outcome.aggregate.errors[0].starts_with(Limits::NOTICE_PREFIX));
    }

    #[tokio::test]
    async fn test_progress_reported_after_each_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(temp_dir.path(), "a.txt", ""),
            write_file(temp_dir.path(), "b.txt", ""),
        ];

        let seen = Mutex::new(Vec::new());
        let callback = |progress: &BatchProgress| {
            seen.lock().unwrap().push(progress.fraction());
        };

        BatchOrchestrator::new(options_without_limits())
            .run_batch(InputCollector::from_paths(paths), InputSource::Files, Some(&callback))
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_shutdown_stops_between_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(temp_dir.path(), "a.txt", "a@example.com");

        let shutdown = GracefulShutdown::new_for_test();
        shutdown.request_shutdown();

        let outcome = BatchOrchestrator::new(options_without_limits())
            .with_shutdown(shutdown)
            .run_batch(InputCollector::from_paths(vec![path]), InputSource::Files, None)
            .await;

        assert!(outcome.cancelled);
        assert_eq!(outcome.files_processed, 0);
        assert!(outcome.aggregate.emails.is_empty());
    }
}
