pub mod delimited;
pub mod workbook;

use crate::batch::AggregateResult;
use crate::error::{LeadExtractorError, Result};
use crate::extractor::PhoneCategory;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// One `.xlsx` workbook, one sheet per category.
    Workbook,
    /// One delimited file per category next to the destination.
    Delimited,
}

impl ExportFormat {
    pub fn from_destination(destination: &Path) -> Self {
        match destination
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("xlsx") => ExportFormat::Workbook,
            _ => ExportFormat::Delimited,
        }
    }
}

/// One exported category: sheet name, header, file suffix and rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category<'a> {
    pub sheet: &'static str,
    pub header: &'static str,
    pub suffix: &'static str,
    pub rows: Vec<&'a str>,
}

/// Non-empty categories in export order.
pub fn categories(aggregate: &AggregateResult) -> Vec<Category<'_>> {
    let phones = |category: PhoneCategory| {
        aggregate
            .phones(category)
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
    };

    let all = [
        ("Emails", "Email", "emails", aggregate.emails.iter().map(String::as_str).collect::<Vec<_>>()),
        (PhoneCategory::Mobile.label(), "Number", "mobiles", phones(PhoneCategory::Mobile)),
        (PhoneCategory::Landline.label(), "Number", "landlines", phones(PhoneCategory::Landline)),
        (PhoneCategory::Invalid.label(), "Number", "invalid_phones", phones(PhoneCategory::Invalid)),
        ("Errors", "Error", "errors", aggregate.errors.iter().map(String::as_str).collect::<Vec<_>>()),
    ];

    all.into_iter()
        .filter(|(_, _, _, rows)| !rows.is_empty())
        .map(|(sheet, header, suffix, rows)| Category {
            sheet,
            header,
            suffix,
            rows,
        })
        .collect()
}

/// Writes `aggregate` to `destination` and returns the files written. An
/// empty aggregate writes nothing. Failures come back as
/// [`LeadExtractorError::Save`]; the aggregate itself is never consumed.
pub fn export(
    aggregate: &AggregateResult,
    destination: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    if destination.file_name().is_none() {
        return Err(LeadExtractorError::save(
            destination,
            "destination has no file name",
        ));
    }

    if aggregate.is_empty() {
        info!("Nothing to export");
        return Ok(Vec::new());
    }

    let result = match format {
        ExportFormat::Workbook => workbook::write_workbook(aggregate, destination).map(|p| vec![p]),
        ExportFormat::Delimited => delimited::write_delimited(aggregate, destination),
    };

    match &result {
        Ok(paths) => info!("Data saved to {} file(s) at {}", paths.len(), destination.display()),
        Err(e) => error!("Save failed: {}", e),
    }

    result
}

/// `base.xlsx` + `emails` -> `base_emails.csv`. Only the stem is kept.
pub fn delimited_path(destination: &Path, suffix: &str) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    destination.with_file_name(format!("{}_{}.csv", stem, suffix))
}
