//! Loader for saved sheets.

use crate::error::{Result, TallyError};
use crate::sheet::Sheet;
use log::debug;
use std::fs;
use std::path::Path;

/// Load a sheet from a save file.
pub fn parse_sheet(path: &Path) -> Result<Sheet> {
    let content = fs::read_to_string(path)?;
    parse_sheet_content(&content)
}

/// Rebuild a sheet by replaying every record in order.
///
/// Any bad record fails the whole load; no partial sheet is returned.
pub fn parse_sheet_content(content: &str) -> Result<Sheet> {
    let mut sheet = Sheet::new();

    for (line_num, line) in content.lines().enumerate() {
        // Skip empty lines and comments
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        // Parse "ID:contents" format
        let Some((id, contents)) = line.split_once(':') else {
            return Err(TallyError::Parse {
                line: line_num + 1,
                message: "Expected 'ID:contents' format".to_string(),
            });
        };

        sheet
            .set_cell(id.trim(), contents)
            .map_err(|e| TallyError::Parse {
                line: line_num + 1,
                message: e.to_string(),
            })?;
    }

    debug!("loaded {} cell(s)", sheet.len());
    Ok(sheet)
}
