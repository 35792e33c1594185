//! Cell data structures.
//!
//! - [`CellKind`] - What a cell holds: number, text, or formula
//! - [`Cell`] - Raw contents, the parsed content, and the cached evaluation result
//!
//! A cell's contents never change after construction; an edit replaces the
//! whole cell. Only a formula's cached value changes, and only through
//! [`Cell::evaluate`].

use log::trace;
use std::collections::HashSet;
use std::fmt;

use super::ast::FormulaNode;
use super::error::SyntaxError;
use super::format::format_number;
use super::parser::parse_formula;
use super::CellId;

/// Prefix that marks cell input as a formula.
pub const FORMULA_MARKER: char = '=';

/// Display text of a formula that could not be evaluated.
pub const ERROR_DISPLAY: &str = "ERROR";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Number,
    Text,
    Formula,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellKind::Number => "number",
            CellKind::Text => "string",
            CellKind::Formula => "formula",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum CellType {
    Number(f64),
    Text,
    Formula(FormulaNode),
}

/// Why a formula could not produce a value. Never leaves this module.
#[derive(Debug)]
enum EvalFailure {
    Blank(CellId),
    Text(CellId),
    Error(CellId),
}

impl fmt::Display for EvalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalFailure::Blank(id) => write!(f, "{} is blank", id),
            EvalFailure::Text(id) => write!(f, "{} holds text", id),
            EvalFailure::Error(id) => write!(f, "{} is in error", id),
        }
    }
}

/// A cell in the sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    contents: String,
    cell_type: CellType,
    /// Last evaluation result. `None` on a formula means it is in error.
    value: Option<f64>,
}

impl Cell {
    /// Parse user input and create the appropriate kind of cell.
    /// - Empty string or whitespace -> `None`
    /// - Numeric literal -> Number
    /// - Starts with '=' -> Formula (a syntax error aborts construction)
    /// - Otherwise -> Text
    ///
    /// A new formula cell is in error until it is first evaluated.
    pub fn from_input(input: &str) -> Result<Option<Cell>, SyntaxError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if let Some(n) = parse_number(trimmed) {
            return Ok(Some(Cell {
                contents: trimmed.to_string(),
                cell_type: CellType::Number(n),
                value: Some(n),
            }));
        }

        if let Some(body) = trimmed.strip_prefix(FORMULA_MARKER) {
            let root = parse_formula(body)?;
            return Ok(Some(Cell {
                contents: trimmed.to_string(),
                cell_type: CellType::Formula(root),
                value: None,
            }));
        }

        Ok(Some(Cell {
            contents: trimmed.to_string(),
            cell_type: CellType::Text,
            value: None,
        }))
    }

    pub fn kind(&self) -> CellKind {
        match self.cell_type {
            CellType::Number(_) => CellKind::Number,
            CellType::Text => CellKind::Text,
            CellType::Formula(_) => CellKind::Formula,
        }
    }

    /// The trimmed text the cell was created from (formulas keep their `=`).
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Only formula cells can be in error.
    pub fn is_error(&self) -> bool {
        matches!(self.cell_type, CellType::Formula(_)) && self.value.is_none()
    }

    pub fn display_text(&self) -> String {
        match self.cell_type {
            CellType::Text => self.contents.clone(),
            CellType::Number(n) => format_number(n),
            CellType::Formula(_) => match self.value {
                Some(v) => format_number(v),
                None => ERROR_DISPLAY.to_string(),
            },
        }
    }

    pub fn numeric_value(&self) -> Option<f64> {
        self.value
    }

    /// The parsed tree of a formula cell.
    pub fn formula(&self) -> Option<&FormulaNode> {
        match &self.cell_type {
            CellType::Formula(root) => Some(root),
            _ => None,
        }
    }

    /// Cells this one reads from: every reference in the formula, empty otherwise.
    pub fn upstream_references(&self) -> HashSet<CellId> {
        match &self.cell_type {
            CellType::Formula(root) => root.references(),
            _ => HashSet::new(),
        }
    }

    /// Recompute a formula's value from the cells `lookup` resolves.
    ///
    /// Numbers and text are left alone. A formula whose references include a
    /// blank, text, or erroring cell goes into the error state; this never
    /// fails outward.
    pub fn evaluate<'a, F>(&mut self, lookup: F)
    where
        F: Fn(&CellId) -> Option<&'a Cell>,
    {
        let CellType::Formula(root) = &self.cell_type else {
            return;
        };

        let resolve = |id: &CellId| -> Result<f64, EvalFailure> {
            let Some(cell) = lookup(id) else {
                return Err(EvalFailure::Blank(id.clone()));
            };
            match cell.kind() {
                CellKind::Text => Err(EvalFailure::Text(id.clone())),
                _ => cell
                    .numeric_value()
                    .ok_or_else(|| EvalFailure::Error(id.clone())),
            }
        };

        self.value = match root.eval(&resolve) {
            Ok(v) => Some(v),
            Err(failure) => {
                trace!("formula '{}' cannot be evaluated: {}", self.contents, failure);
                None
            }
        };
    }
}

/// Accept only plain decimal literals so words like "inf" or "NaN" stay text.
fn parse_number(text: &str) -> Option<f64> {
    let numeric_chars = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !numeric_chars {
        return None;
    }
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn id(s: &str) -> CellId {
        CellId::parse(s).unwrap()
    }

    fn make(input: &str) -> Cell {
        Cell::from_input(input).unwrap().unwrap()
    }

    fn evaluated(input: &str, cells: &HashMap<CellId, Cell>) -> Cell {
        let mut cell = make(input);
        cell.evaluate(|r| cells.get(r));
        cell
    }

    #[test]
    fn test_blank_input_yields_no_cell() {
        assert_eq!(Cell::from_input(""), Ok(None));
        assert_eq!(Cell::from_input("  \t "), Ok(None));
    }

    #[test]
    fn test_number_cell() {
        let cell = make("  5 ");
        assert_eq!(cell.kind(), CellKind::Number);
        assert_eq!(cell.contents(), "5");
        assert_eq!(cell.display_text(), "5.0");
        assert_eq!(cell.numeric_value(), Some(5.0));
        assert!(!cell.is_error());
        assert!(cell.upstream_references().is_empty());

        assert_eq!(make("-1.5e2").numeric_value(), Some(-150.0));
    }

    #[test]
    fn test_text_cell() {
        let cell = make("hello world");
        assert_eq!(cell.kind(), CellKind::Text);
        assert_eq!(cell.display_text(), "hello world");
        assert_eq!(cell.numeric_value(), None);
        assert!(!cell.is_error());

        for word in ["inf", "NaN", "infinity", "1-", "e"] {
            assert_eq!(make(word).kind(), CellKind::Text, "{word}");
        }
    }

    #[test]
    fn test_new_formula_starts_in_error() {
        let cell = make("=1+2");
        assert_eq!(cell.kind(), CellKind::Formula);
        assert!(cell.is_error());
        assert_eq!(cell.display_text(), "ERROR");
        assert_eq!(cell.numeric_value(), None);
        assert_eq!(cell.contents(), "=1+2");
    }

    #[test]
    fn test_formula_syntax_error_aborts_construction() {
        let err = Cell::from_input("=1 ++ 2").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(Cell::from_input("=").is_err());
    }

    #[test]
    fn test_evaluate_literal_formula() {
        let cell = evaluated("=2+3*4", &HashMap::new());
        assert!(!cell.is_error());
        assert_eq!(cell.display_text(), "14.0");
        assert_eq!(cell.numeric_value(), Some(14.0));
    }

    #[test]
    fn test_evaluate_with_references() {
        let mut cells = HashMap::new();
        cells.insert(id("A1"), make("5"));
        cells.insert(id("A2"), evaluated("=A1*2", &cells));

        let cell = evaluated("=A1 + A2 / 4", &cells);
        assert_eq!(cell.numeric_value(), Some(7.5));
    }

    #[test]
    fn test_unusable_references_set_error() {
        let mut cells = HashMap::new();
        cells.insert(id("A1"), make("hello"));
        // Never evaluated, so still in error.
        cells.insert(id("A3"), make("=1"));

        assert!(evaluated("=A1", &cells).is_error());
        assert!(evaluated("=B9 + 1", &cells).is_error());
        assert!(evaluated("=A3", &cells).is_error());
    }

    #[test]
    fn test_error_clears_once_inputs_are_usable() {
        let mut cells = HashMap::new();
        let mut cell = make("=A1+1");
        cell.evaluate(|r| cells.get(r));
        assert!(cell.is_error());

        cells.insert(id("A1"), make("41"));
        cell.evaluate(|r| cells.get(r));
        assert!(!cell.is_error());
        assert_eq!(cell.display_text(), "42.0");
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut cells = HashMap::new();
        cells.insert(id("A1"), make("3"));
        let mut cell = make("=A1/7");
        cell.evaluate(|r| cells.get(r));
        let first = (cell.numeric_value(), cell.is_error());
        cell.evaluate(|r| cells.get(r));
        assert_eq!((cell.numeric_value(), cell.is_error()), first);
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        let cell = evaluated("=1/0", &HashMap::new());
        assert!(!cell.is_error());
        assert_eq!(cell.numeric_value(), Some(f64::INFINITY));
    }

    #[test]
    fn test_upstream_references_of_formula() {
        let cell = make("=A1 + B2 * A1");
        let refs = cell.upstream_references();
        assert_eq!(refs.len(), 2);
        assert!(refs.contains(&id("A1")));
        assert!(refs.contains(&id("B2")));
    }

    #[test]
    fn test_evaluate_ignores_non_formulas() {
        let mut cell = make("12");
        cell.evaluate(|_| None);
        assert_eq!(cell.numeric_value(), Some(12.0));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CellKind::Number.to_string(), "number");
        assert_eq!(CellKind::Text.to_string(), "string");
        assert_eq!(CellKind::Formula.to_string(), "formula");
    }
}
