use crate::error::{LeadExtractorError, Result};
use crate::scanner::FileKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// How the batch's file list was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    Files,
    Directory,
}

#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub kind: Option<FileKind>,
}

impl InputFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let kind = FileKind::from_extension(&extension);

        Self {
            path,
            filename,
            extension,
            kind,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct InputCollector;

impl InputCollector {
    /// Explicit selection, order preserved.
    pub fn from_paths<I, P>(paths: I) -> Vec<InputFile>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().map(InputFile::new).collect()
    }

    /// Every file below `root`, whatever its extension.
    pub fn walk_directory<P: AsRef<Path>>(root: P) -> Result<Vec<InputFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(LeadExtractorError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(LeadExtractorError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root_path).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry under {}: {}", root_path.display(), err);
                    continue;
                }
            };

            if entry.file_type().is_file() {
                files.push(InputFile::new(entry.into_path()));
            }
        }

        Ok(files)
    }
}
