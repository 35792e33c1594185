//! Error types raised by the engine.
//!
//! Evaluation failures are not here: they never leave a [`Cell`](super::Cell)
//! and only show up as its error flag.

use thiserror::Error;

use super::CellId;

/// A cell identifier that does not match `^[A-Z]+[1-9][0-9]*$`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid cell identifier: '{0}'")]
pub struct InvalidCellId(pub String);

/// Formula text that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error at position {position}: {message}")]
pub struct SyntaxError {
    pub message: String,
    /// Character offset into the formula body (after the `=` marker).
    pub position: usize,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

/// An edit that would have closed a dependency cycle.
///
/// `cycle` starts and ends with the cell whose edit was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependency detected: {}", join_path(.cycle))]
pub struct CycleError {
    pub cycle: Vec<CellId>,
}

fn join_path(path: &[CellId]) -> String {
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_message_lists_path() {
        let cycle = ["A1", "B1", "A1"]
            .iter()
            .map(|s| CellId::parse(s).unwrap())
            .collect();
        let err = CycleError { cycle };
        assert_eq!(
            err.to_string(),
            "Circular dependency detected: A1 -> B1 -> A1"
        );
    }

    #[test]
    fn test_syntax_error_message() {
        let err = SyntaxError::new("Unexpected character: '?'", 3);
        assert_eq!(
            err.to_string(),
            "Syntax error at position 3: Unexpected character: '?'"
        );
    }
}
