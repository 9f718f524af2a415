use serde::{Deserialize, Serialize};
use std::path::Path;

/// Decoding strategy for an input file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    PlainText,
    Pdf,
    Docx,
    Spreadsheet,
    Html,
}

impl FileKind {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 8] =
        ["txt", "csv", "pdf", "docx", "xlsx", "xlsm", "html", "htm"];

    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "txt" | "csv" => Some(FileKind::PlainText),
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "xlsx" | "xlsm" => Some(FileKind::Spreadsheet),
            "html" | "htm" => Some(FileKind::Html),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::PlainText => "text",
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Spreadsheet => "spreadsheet",
            FileKind::Html => "html",
        }
    }
}
