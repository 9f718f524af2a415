use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadExtractorError {
    #[error("Unsupported file: {path}")]
    UnsupportedFormat { path: String, extension: String },

    #[error("Timeout: {path}")]
    LoadTimeout { path: String, seconds: u64 },

    #[error("Error processing {path}: {message}")]
    LoadFailure { path: String, message: String },

    #[error("Failed to save {path}: {message}")]
    Save { path: String, message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("No input files to process")]
    NoInputFiles,

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl LeadExtractorError {
    pub fn save<P: AsRef<std::path::Path>, E: std::fmt::Display>(path: P, error: E) -> Self {
        LeadExtractorError::Save {
            path: path.as_ref().display().to_string(),
            message: error.to_string(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for LeadExtractorError {
    fn user_message(&self) -> String {
        match self {
            LeadExtractorError::UnsupportedFormat { path, extension } => {
                if extension.is_empty() {
                    format!("Unsupported file (no extension): {}", path)
                } else {
                    format!("Unsupported file type .{}: {}", extension, path)
                }
            }
            LeadExtractorError::LoadTimeout { path, seconds } => {
                format!("Reading {} took longer than {} seconds", path, seconds)
            }
            LeadExtractorError::LoadFailure { path, message } => {
                format!("Could not read {}: {}", path, message)
            }
            LeadExtractorError::Save { path, message } => {
                format!("Could not save results to {}: {}", path, message)
            }
            LeadExtractorError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            LeadExtractorError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            LeadExtractorError::NoInputFiles => "No input files were given".to_string(),
            LeadExtractorError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            LeadExtractorError::UnsupportedFormat { .. } => Some(
                "Supported formats are .txt, .csv, .pdf, .docx, .xlsx, .xlsm, .html and .htm.".to_string()
            ),
            LeadExtractorError::LoadTimeout { .. } => Some(
                "Increase the per-file time budget with --timeout or split the document.".to_string()
            ),
            LeadExtractorError::Save { .. } => Some(
                "Check that the destination directory exists, is writable, and that the file is not open in another program.".to_string()
            ),
            LeadExtractorError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            LeadExtractorError::InvalidPath { .. } => Some(
                "Make sure the path exists and points to a directory when using --dir.".to_string()
            ),
            LeadExtractorError::NoInputFiles => Some(
                "Pass one or more files, or a folder with --dir.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for LeadExtractorError {
    fn from(error: toml::de::Error) -> Self {
        LeadExtractorError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadExtractorError>;
