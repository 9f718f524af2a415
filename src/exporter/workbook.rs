use super::categories;
use crate::batch::AggregateResult;
use crate::error::{LeadExtractorError, Result};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn write_workbook(aggregate: &AggregateResult, destination: &Path) -> Result<PathBuf> {
    let save_error = |e: rust_xlsxwriter::XlsxError| LeadExtractorError::save(destination, e);
    let mut workbook = Workbook::new();

    for category in categories(aggregate) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(category.sheet).map_err(save_error)?;
        sheet.write_string(0, 0, category.header).map_err(save_error)?;

        for (index, value) in category.rows.iter().enumerate() {
            let row = u32::try_from(index + 1)
                .map_err(|e| LeadExtractorError::save(destination, e))?;
            sheet.write_string(row, 0, *value).map_err(save_error)?;
        }

        debug!("Sheet {}: {} rows", category.sheet, category.rows.len());
    }

    workbook.save(destination).map_err(save_error)?;
    Ok(destination.to_path_buf())
}
