use anyhow::Context;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Every row of every sheet as `[Sheet N] cell cell ...`, skipping empty cells.
pub fn read_workbook(path: &Path) -> anyhow::Result<String> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening workbook {}", path.display()))?;

    let mut text = String::new();

    for (index, name) in workbook.sheet_names().into_iter().enumerate() {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("reading sheet {}", name))?;

        for row in range.rows() {
            let cells: Vec<String> = row
                .iter()
                .filter(|cell| !is_blank(cell))
                .map(|cell| cell.to_string())
                .collect();

            text.push_str(&format!("[Sheet {}] {}\n", index + 1, cells.join(" ")));
        }
    }

    Ok(text)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}
