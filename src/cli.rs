use crate::config::{CliOverrides, Config, FormatChoice};
use crate::error::Result;
use crate::scanner::InputSource;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lead-extractor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract email addresses and phone numbers from documents")]
#[command(
    long_about = "Lead Extractor reads text, CSV, PDF, Word, Excel and HTML files, collects \
                  every email address and phone number it finds, sorts phones into mobiles, \
                  landlines and invalid numbers, and saves the results to a workbook or a \
                  set of CSV files."
)]
#[command(after_help = "EXAMPLES:\n  \
    lead-extractor contacts.pdf brochure.docx -o leads.xlsx\n  \
    lead-extractor --dir ./inbox -o leads.csv --no-limits\n  \
    lead-extractor sheet.xlsx --keep-country-code --output-format json\n  \
    lead-extractor --generate-config --config lead-extractor.toml")]
pub struct Cli {
    /// Files to read
    #[arg(conflicts_with = "dir")]
    pub paths: Vec<PathBuf>,

    /// Read every file under this directory instead
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Destination (.xlsx writes a workbook, anything else a CSV bundle)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(long, value_enum)]
    pub format: Option<ExportChoice>,

    /// Keep the leading country code on phone numbers
    #[arg(long)]
    pub keep_country_code: bool,

    /// Country code stripped from phone numbers
    #[arg(long, value_name = "CODE", allow_hyphen_values = true)]
    pub country_code: Option<String>,

    /// Per-file read budget in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Disable file, email and phone limits
    #[arg(long)]
    pub no_limits: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Append log lines to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Show what would be read without reading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportChoice {
    /// Pick from the destination extension
    Auto,
    /// Single .xlsx workbook
    Workbook,
    /// One CSV file per category
    Delimited,
}

impl From<ExportChoice> for FormatChoice {
    fn from(choice: ExportChoice) -> Self {
        match choice {
            ExportChoice::Auto => FormatChoice::Auto,
            ExportChoice::Workbook => FormatChoice::Workbook,
            ExportChoice::Delimited => FormatChoice::Delimited,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_keep_country_code(self.keep_country_code)
            .with_country_code(self.country_code.clone())
            .with_timeout(self.timeout)
            .with_no_limits(self.no_limits)
            .with_format(self.format.map(FormatChoice::from))
    }

    pub fn input_source(&self) -> InputSource {
        if self.dir.is_some() {
            InputSource::Directory
        } else {
            InputSource::Files
        }
    }

    pub fn has_inputs(&self) -> bool {
        self.dir.is_some() || !self.paths.is_empty()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_list() {
        let cli = Cli::try_parse_from([
            "lead-extractor",
            "a.pdf",
            "b.docx",
            "-o",
            "out.xlsx",
            "--keep-country-code",
            "--timeout",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.paths, vec![PathBuf::from("a.pdf"), PathBuf::from("b.docx")]);
        assert_eq!(cli.output, Some(PathBuf::from("out.xlsx")));
        assert_eq!(cli.input_source(), InputSource::Files);
        assert!(cli.has_inputs());

        let overrides = cli.create_cli_overrides();
        assert!(overrides.keep_country_code);
        assert_eq!(overrides.timeout, Some(10));
        assert!(overrides.format.is_none());
    }

    #[test]
    fn test_dir_conflicts_with_paths() {
        let result = Cli::try_parse_from(["lead-extractor", "a.txt", "--dir", "inbox"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["lead-extractor", "--dir", "inbox", "--no-limits"]).unwrap();
        assert_eq!(cli.input_source(), InputSource::Directory);
        assert!(cli.create_cli_overrides().no_limits);
    }

    #[test]
    fn test_format_and_country_code() {
        let cli = Cli::try_parse_from([
            "lead-extractor",
            "a.txt",
            "--format",
            "delimited",
            "--country-code",
            "+44",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.format, Some(FormatChoice::Delimited));
        assert_eq!(overrides.country_code.as_deref(), Some("+44"));
    }

    #[test]
    fn test_quiet_overrides_verbosity() {
        let cli = Cli::try_parse_from(["lead-extractor", "-q", "a.txt"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::try_parse_from(["lead-extractor", "-vv", "a.txt"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);
    }

    #[test]
    fn test_no_inputs() {
        let cli = Cli::try_parse_from(["lead-extractor", "--dry-run"]).unwrap();
        assert!(!cli.has_inputs());
    }
}
