use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl BatchProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_file(&mut self, filename: String) {
        self.files_processed += 1;
        self.current_file = Some(filename);
    }

    /// `current / total`, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.files_processed as f64 / self.total_files as f64
        }
    }

    pub fn percentage(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let rate = self.files_processed as f64 / elapsed.as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 && rate.is_finite() {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_tracking() {
        let mut progress = BatchProgress::new(4);
        assert_eq!(progress.percentage(), 0.0);

        progress.update_file("a.txt".to_string());
        assert_eq!(progress.fraction(), 0.25);
        assert_eq!(progress.current_file.as_deref(), Some("a.txt"));

        progress.update_file("b.txt".to_string());
        assert_eq!(progress.percentage(), 50.0);
    }

    #[test]
    fn test_empty_batch() {
        let progress = BatchProgress::new(0);
        assert_eq!(progress.fraction(), 0.0);
        assert_eq!(progress.estimated_remaining(), Duration::from_secs(0));
    }
}
