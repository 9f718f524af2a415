use super::{categories, delimited_path};
use crate::batch::AggregateResult;
use crate::error::{LeadExtractorError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes one single-column file per non-empty category.
pub fn write_delimited(aggregate: &AggregateResult, destination: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for category in categories(aggregate) {
        let path = delimited_path(destination, category.suffix);
        let save_error = |e: csv::Error| LeadExtractorError::save(&path, e);

        let mut writer = csv::Writer::from_path(&path).map_err(save_error)?;
        writer.write_record([category.header]).map_err(save_error)?;
        for value in &category.rows {
            writer.write_record([*value]).map_err(save_error)?;
        }
        writer
            .flush()
            .map_err(|e| LeadExtractorError::save(&path, e))?;

        debug!("Wrote {} rows to {}", category.rows.len(), path.display());
        written.push(path);
    }

    Ok(written)
}
