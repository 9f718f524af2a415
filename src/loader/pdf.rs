use anyhow::{anyhow, Context};
use std::path::Path;

/// Concatenates the text of every page in page order. Pages without a text
/// layer come back empty and add nothing.
pub fn read_pdf(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    // pdf-extract panics on some malformed fonts instead of returning an error
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| anyhow!("PDF parser panicked"))?
        .map_err(|e| anyhow!("PDF parsing failed: {}", e))?;

    Ok(pages.concat())
}
