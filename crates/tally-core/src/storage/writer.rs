//! Writer for saved sheets.

use crate::error::{Result, TallyError};
use crate::sheet::Sheet;
use std::fs;
use std::path::Path;

/// Write a sheet to a save file.
pub fn write_sheet(path: &Path, sheet: &Sheet) -> Result<()> {
    let content = write_sheet_content(sheet)?;
    fs::write(path, content)?;
    Ok(())
}

/// One `ID:contents` line per non-empty cell, in sheet order.
pub fn write_sheet_content(sheet: &Sheet) -> Result<String> {
    let mut out = String::new();
    for (id, cell) in sheet.cells() {
        if cell.contents().contains(['\n', '\r']) {
            return Err(TallyError::MultilineContents(id.clone()));
        }
        out.push_str(id.as_str());
        out.push(':');
        out.push_str(cell.contents());
        out.push('\n');
    }
    Ok(out)
}
