use crate::batch::{BatchOptions, Limits};
use crate::error::{LeadExtractorError, Result};
use crate::exporter::ExportFormat;
use crate::scanner::FileKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub strip_country_code: bool,
    pub country_code: String,
    /// Per-file load budget in seconds.
    pub load_timeout: u64,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub enabled: bool,
    pub max_files: usize,
    pub max_emails: usize,
    pub max_phones: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: FormatChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatChoice {
    Auto,
    Workbook,
    Delimited,
}

impl FormatChoice {
    pub fn resolve(&self, destination: &Path) -> ExportFormat {
        match self {
            FormatChoice::Auto => ExportFormat::from_destination(destination),
            FormatChoice::Workbook => ExportFormat::Workbook,
            FormatChoice::Delimited => ExportFormat::Delimited,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strip_country_code: true,
            country_code: "+91".to_string(),
            load_timeout: 25,
            extensions: FileKind::SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let tier = Limits::free_tier();
        Self {
            enabled: true,
            max_files: tier.max_files,
            max_emails: tier.max_emails,
            max_phones: tier.max_phones,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: FormatChoice::Auto,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LeadExtractorError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| LeadExtractorError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| LeadExtractorError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["lead-extractor.toml", ".lead-extractor.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if cli_args.keep_country_code {
            self.extraction.strip_country_code = false;
        }

        if let Some(ref code) = cli_args.country_code {
            self.extraction.country_code = code.trim().to_string();
        }

        if let Some(timeout) = cli_args.timeout {
            self.extraction.load_timeout = timeout;
        }

        if cli_args.no_limits {
            self.limits.enabled = false;
        }

        if let Some(format) = cli_args.format {
            self.output.format = format;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| LeadExtractorError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| LeadExtractorError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.extensions.is_empty() {
            return Err(LeadExtractorError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if let Some(unknown) = self
            .extraction
            .extensions
            .iter()
            .find(|ext| FileKind::from_extension(ext).is_none())
        {
            return Err(LeadExtractorError::Config {
                message: format!("No reader available for extension: {}", unknown),
            });
        }

        if self.extraction.load_timeout == 0 {
            return Err(LeadExtractorError::Config {
                message: "Load timeout must be greater than 0".to_string(),
            });
        }

        if self.extraction.strip_country_code && self.extraction.country_code.is_empty() {
            return Err(LeadExtractorError::Config {
                message: "Country code must not be empty when stripping is enabled".to_string(),
            });
        }

        if self.limits.enabled
            && (self.limits.max_files == 0
                || self.limits.max_emails == 0
                || self.limits.max_phones == 0)
        {
            return Err(LeadExtractorError::Config {
                message: "Limits must be greater than 0 when enabled".to_string(),
            });
        }

        // max_phones is split evenly across the three phone categories
        if self.limits.enabled && self.limits.max_phones < 3 {
            return Err(LeadExtractorError::Config {
                message: "max_phones must be at least 3 when limits are enabled".to_string(),
            });
        }

        Ok(())
    }

    pub fn load_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.extraction.load_timeout)
    }

    pub fn limits(&self) -> Option<Limits> {
        if self.limits.enabled {
            Some(Limits {
                max_files: self.limits.max_files,
                max_emails: self.limits.max_emails,
                max_phones: self.limits.max_phones,
            })
        } else {
            None
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            strip_country_code: self.extraction.strip_country_code,
            country_code: self.extraction.country_code.clone(),
            load_timeout: self.load_timeout_duration(),
            limits: self.limits(),
            extensions: self
                .extraction
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub keep_country_code: bool,
    pub country_code: Option<String>,
    pub timeout: Option<u64>,
    pub no_limits: bool,
    pub format: Option<FormatChoice>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_country_code(mut self, keep: bool) -> Self {
        self.keep_country_code = keep;
        self
    }

    pub fn with_country_code(mut self, code: Option<String>) -> Self {
        self.country_code = code;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_no_limits(mut self, no_limits: bool) -> Self {
        self.no_limits = no_limits;
        self
    }

    pub fn with_format(mut self, format: Option<FormatChoice>) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.extraction.strip_country_code);
        assert_eq!(config.extraction.country_code, "+91");
        assert_eq!(config.extraction.load_timeout, 25);
        assert_eq!(config.extraction.extensions.len(), 8);
        assert_eq!(config.limits.max_files, 3);
        assert_eq!(config.limits.max_emails, 100);
        assert_eq!(config.limits.max_phones, 100);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.extraction.extensions = vec!["odt".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.extraction.load_timeout = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.limits.max_emails = 0;
        assert!(config.validate().is_err());
        config.limits.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_phone_limit_covers_every_category() {
        let mut config = Config::default();
        config.limits.max_phones = 2;
        assert!(matches!(
            config.validate(),
            Err(LeadExtractorError::Config { .. })
        ));

        config.limits.max_phones = 3;
        assert!(config.validate().is_ok());

        config.limits.max_phones = 1;
        config.limits.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.extraction.load_timeout = 40;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.extraction.load_timeout, 40);
        assert_eq!(loaded_config.output.format, FormatChoice::Auto);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[limits]\nenabled = false\n").unwrap();
        assert!(!config.limits.enabled);
        assert_eq!(config.limits.max_files, 3);
        assert_eq!(config.extraction.country_code, "+91");
        assert!(config.limits().is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_keep_country_code(true)
            .with_timeout(Some(5))
            .with_no_limits(true)
            .with_format(Some(FormatChoice::Delimited));

        config.merge_with_cli_args(&overrides);

        assert!(!config.extraction.strip_country_code);
        assert_eq!(config.load_timeout_duration(), Duration::from_secs(5));
        assert!(config.limits().is_none());
        assert_eq!(config.output.format, FormatChoice::Delimited);
    }

    #[test]
    fn test_batch_options_from_config() {
        let options = Config::default().batch_options();
        assert!(options.strip_country_code);
        assert_eq!(options.load_timeout, Duration::from_secs(25));
        assert_eq!(options.limits, Some(Limits::free_tier()));
        assert!(options.extensions.contains(&"xlsm".to_string()));
    }

    #[test]
    fn test_format_choice_resolution() {
        assert_eq!(
            FormatChoice::Auto.resolve(Path::new("out.xlsx")),
            ExportFormat::Workbook
        );
        assert_eq!(
            FormatChoice::Auto.resolve(Path::new("out.csv")),
            ExportFormat::Delimited
        );
        assert_eq!(
            FormatChoice::Workbook.resolve(Path::new("out.csv")),
            ExportFormat::Workbook
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[extraction]"));
        assert!(sample.contains("[limits]"));
        assert!(sample.contains("[output]"));
    }
}
