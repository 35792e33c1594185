use super::Sheet;
use crate::error::Result;
use crate::storage::{parse_sheet, parse_sheet_content, write_sheet, write_sheet_content};
use std::path::Path;

impl Sheet {
    /// Serialize to the save format.
    pub fn to_save_string(&self) -> Result<String> {
        write_sheet_content(self)
    }

    /// Build a new sheet from the save format.
    pub fn from_save_string(content: &str) -> Result<Sheet> {
        parse_sheet_content(content)
    }

    /// Save to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_sheet(path, self)
    }

    /// Load from a file. The current sheet is untouched; callers replace it
    /// only when loading succeeds.
    pub fn load(path: &Path) -> Result<Sheet> {
        parse_sheet(path)
    }
}
