use std::collections::HashMap;

use tally_engine::engine::{Cell, CellId, DependencyGraph};

/// A sheet of cells and the links between them.
///
/// The cell map and the graph are only ever changed together, through the
/// edit operations, so every formula's recorded upstream links match the
/// references in its formula.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub(crate) cells: HashMap<CellId, Cell>,
    pub(crate) graph: DependencyGraph,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, id: &CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Display text of a cell, or "" if it is empty.
    pub fn cell_display(&self, id: &CellId) -> String {
        self.cells
            .get(id)
            .map(Cell::display_text)
            .unwrap_or_default()
    }

    /// Raw contents of a cell, or "" if it is empty.
    pub fn cell_contents(&self, id: &CellId) -> &str {
        self.cells.get(id).map(Cell::contents).unwrap_or("")
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Non-empty cells in sheet order (row-major).
    pub fn cells(&self) -> Vec<(&CellId, &Cell)> {
        let mut cells: Vec<_> = self.cells.iter().collect();
        cells.sort_by(|(a, _), (b, _)| a.natural_cmp(b));
        cells
    }
}
