use log::debug;
use std::collections::{HashMap, HashSet};

use super::Sheet;
use crate::error::Result;
use tally_engine::engine::{Cell, CellId};

fn parse_id(id: &str) -> Result<CellId> {
    Ok(id.parse::<CellId>()?)
}

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// Blank contents clear the cell. A bad identifier, a formula syntax
    /// error or a dependency cycle fails the edit and leaves the sheet as it
    /// was.
    pub fn set_cell(&mut self, id: &str, contents: &str) -> Result<()> {
        let cell_id = parse_id(id)?;
        let Some(cell) = Cell::from_input(contents)? else {
            self.remove(&cell_id);
            return Ok(());
        };

        self.graph.add(&cell_id, cell.upstream_references())?;
        debug!("set {} to {:?} ({})", cell_id, cell.contents(), cell.kind());
        self.cells.insert(cell_id.clone(), cell);
        self.evaluate(&cell_id);
        self.propagate(&cell_id);
        Ok(())
    }

    /// Clear the specified cell. Cells that read it are re-evaluated.
    pub fn delete_cell(&mut self, id: &str) -> Result<()> {
        let cell_id = parse_id(id)?;
        self.remove(&cell_id);
        Ok(())
    }

    fn remove(&mut self, cell_id: &CellId) {
        if self.cells.remove(cell_id).is_none() {
            return;
        }
        debug!("deleted {}", cell_id);
        self.graph.remove(cell_id);
        self.propagate(cell_id);
    }

    /// Re-evaluate one cell against the rest of the sheet.
    fn evaluate(&mut self, cell_id: &CellId) {
        // A formula never reads itself, so it can be taken out while it evaluates.
        if let Some(mut cell) = self.cells.remove(cell_id) {
            cell.evaluate(|r| self.cells.get(r));
            self.cells.insert(cell_id.clone(), cell);
        }
    }

    /// Re-evaluate every cell downstream of `origin`, each exactly once and
    /// only after all of its changed upstream cells.
    fn propagate(&mut self, origin: &CellId) {
        let affected = self.collect_downstream(origin);
        if affected.is_empty() {
            return;
        }
        debug!("propagating change in {} to {} cell(s)", origin, affected.len());

        // Kahn's algorithm restricted to the affected cells.
        let mut pending: HashMap<&CellId, usize> = affected
            .iter()
            .map(|id| {
                let changed_inputs = self
                    .graph
                    .upstream_of(id)
                    .filter(|up| affected.contains(*up))
                    .count();
                (id, changed_inputs)
            })
            .collect();
        let mut ready: Vec<CellId> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| (*id).clone())
            .collect();

        let mut order = Vec::with_capacity(affected.len());
        while let Some(id) = ready.pop() {
            for reader in self.graph.downstream_of(&id) {
                if let Some(count) = pending.get_mut(reader) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(reader.clone());
                    }
                }
            }
            order.push(id);
        }

        for id in &order {
            self.evaluate(id);
        }
    }

    /// All cells reachable from `origin` through downstream links, excluding `origin`.
    fn collect_downstream(&self, origin: &CellId) -> HashSet<CellId> {
        let mut seen = HashSet::new();
        let mut to_process = vec![origin];
        while let Some(id) = to_process.pop() {
            for reader in self.graph.downstream_of(id) {
                if seen.insert(reader.clone()) {
                    to_process.push(reader);
                }
            }
        }
        seen
    }
}
