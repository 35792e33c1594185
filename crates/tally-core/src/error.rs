//! Error types for Tally core.

use thiserror::Error;

use tally_engine::engine::{CellId, CycleError, InvalidCellId, SyntaxError};

/// Errors that can occur while editing, saving or loading a sheet.
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidCellId),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    CycleDetected(#[from] CycleError),

    #[error("Contents of {0} span multiple lines and cannot be saved")]
    MultilineContents(CellId),
}

pub type Result<T> = std::result::Result<T, TallyError>;
