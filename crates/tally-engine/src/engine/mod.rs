//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`CellId`] - Validated cell identifiers (A1 notation) and sheet ordering
//! - [`FormulaNode`], [`parse_formula`] - Formula trees and the parser producing them
//! - [`Cell`], [`CellKind`] - Cell contents and cached evaluation state
//! - [`DependencyGraph`] - Upstream/downstream links with cycle rejection
//! - [`detect_cycle`] - Circular dependency detection
//! - [`format_number`] - Format values for display

mod ast;
mod cell;
mod cell_id;
mod cycle;
mod deps;
mod error;
mod format;
mod parser;

pub use ast::{BinaryOp, FormulaNode};
pub use cell::{Cell, CellKind, ERROR_DISPLAY, FORMULA_MARKER};
pub use cell_id::CellId;
pub use cycle::detect_cycle;
pub use deps::DependencyGraph;
pub use error::{CycleError, InvalidCellId, SyntaxError};
pub use format::format_number;
pub use parser::{MAX_NESTING_DEPTH, parse_formula};
