use anyhow::Context;
use std::path::Path;

/// Reads `.txt`/`.csv` as UTF-8, replacing undecodable bytes.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
