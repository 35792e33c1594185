//! tally_engine - Spreadsheet engine: formulas, cells and the dependency graph.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use std::collections::HashMap;

    fn id(s: &str) -> CellId {
        CellId::parse(s).unwrap()
    }

    /// Install `input` at `name` the way a sheet would: record links, then evaluate.
    fn put(
        cells: &mut HashMap<CellId, Cell>,
        graph: &mut DependencyGraph,
        name: &str,
        input: &str,
    ) -> Result<(), CycleError> {
        let mut cell = Cell::from_input(input).unwrap().unwrap();
        graph.add(&id(name), cell.upstream_references())?;
        cell.evaluate(|r| cells.get(r));
        cells.insert(id(name), cell);
        Ok(())
    }

    #[test]
    fn test_formula_chain_through_graph() {
        let mut cells = HashMap::new();
        let mut graph = DependencyGraph::new();
        put(&mut cells, &mut graph, "A1", "5").unwrap();
        put(&mut cells, &mut graph, "B1", "=A1*2").unwrap();
        put(&mut cells, &mut graph, "C1", "=B1+A1").unwrap();

        assert_eq!(cells[&id("B1")].display_text(), "10.0");
        assert_eq!(cells[&id("C1")].display_text(), "15.0");

        let readers: Vec<&CellId> = graph.downstream_of(&id("B1")).collect();
        assert_eq!(readers, vec![&id("C1")]);
    }

    #[test]
    fn test_cycle_leaves_cells_untouched() {
        let mut cells = HashMap::new();
        let mut graph = DependencyGraph::new();
        put(&mut cells, &mut graph, "A1", "=B1").unwrap();
        let err = put(&mut cells, &mut graph, "B1", "=A1").unwrap_err();
        assert_eq!(err.cycle, vec![id("B1"), id("A1"), id("B1")]);
        assert!(!cells.contains_key(&id("B1")));
        assert!(cells[&id("A1")].is_error());
    }

    #[test]
    fn test_formula_tree_from_cell() {
        let cell = Cell::from_input("=-(A1+2)").unwrap().unwrap();
        let tree = cell.formula().unwrap().tree();
        assert_eq!(tree, "negate\n  +\n    A1\n    2\n");
    }
}
