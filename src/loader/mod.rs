//! Converts supported documents into plain text.
//!
//! Each reader returns `anyhow::Result` with context attached; the loader
//! boundary turns those into [`LeadExtractorError::LoadFailure`] so every
//! failure names the file it came from.

pub mod docx;
pub mod html;
pub mod pdf;
pub mod plain;
pub mod spreadsheet;

use crate::error::{LeadExtractorError, Result};
use crate::scanner::FileKind;
use std::path::Path;
use tracing::{debug, error, warn};

/// Something that can turn a file into text. The orchestrator runs it on a
/// blocking worker, so implementations must be shareable across threads.
pub trait DocumentLoader: Send + Sync {
    fn try_load(&self, path: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextLoader;

impl TextLoader {
    pub fn new() -> Self {
        Self
    }

    /// Lenient variant: never fails, degrading to empty text.
    pub fn load(&self, path: &Path) -> String {
        match self.try_load(path) {
            Ok(text) => text,
            Err(LeadExtractorError::UnsupportedFormat { extension, .. }) => {
                warn!("Unsupported file extension: .{}", extension);
                String::new()
            }
            Err(e) => {
                error!("Error reading file {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}

impl DocumentLoader for TextLoader {
    fn try_load(&self, path: &Path) -> Result<String> {
        let kind = FileKind::from_path(path).ok_or_else(|| LeadExtractorError::UnsupportedFormat {
            path: path.display().to_string(),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase(),
        })?;

        debug!("Loading {} as {}", path.display(), kind.label());

        let text = match kind {
            FileKind::PlainText => plain::read_text(path),
            FileKind::Pdf => pdf::read_pdf(path),
            FileKind::Docx => docx::read_docx(path),
            FileKind::Spreadsheet => spreadsheet::read_workbook(path),
            FileKind::Html => html::read_html(path),
        }
        .map_err(|e| LeadExtractorError::LoadFailure {
            path: path.display().to_string(),
            message: format!("{:#}", e),
        })?;

        debug!("Loaded {} characters from {}", text.len(), path.display());
        Ok(text)
    }
}
