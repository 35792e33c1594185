//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).
//! The search runs right after the new edges are installed, so any cycle
//! necessarily passes through the edited cell.

use std::collections::{HashMap, HashSet};

use super::CellId;

/// Detect a cycle through `start` by following `upstream` links depth-first.
///
/// Returns the cycle path, beginning and ending with `start`, or None.
pub fn detect_cycle(
    start: &CellId,
    upstream: &HashMap<CellId, HashSet<CellId>>,
) -> Option<Vec<CellId>> {
    let neighbours = |id: &CellId| upstream.get(id).into_iter().flatten();

    let mut path = vec![start.clone()];
    let mut frames = vec![neighbours(start)];
    // Cells whose whole upstream closure was searched without reaching `start`.
    let mut exhausted: HashSet<CellId> = HashSet::new();

    while let Some(frame) = frames.last_mut() {
        let Some(next) = frame.next() else {
            frames.pop();
            if let Some(done) = path.pop() {
                exhausted.insert(done);
            }
            continue;
        };

        if next == start {
            path.push(next.clone());
            return Some(path);
        }
        if exhausted.contains(next) {
            continue;
        }

        path.push(next.clone());
        frames.push(neighbours(next));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CellId {
        CellId::parse(s).unwrap()
    }

    fn links(edges: &[(&str, &str)]) -> HashMap<CellId, HashSet<CellId>> {
        let mut upstream: HashMap<CellId, HashSet<CellId>> = HashMap::new();
        for (from, to) in edges {
            upstream.entry(id(from)).or_default().insert(id(to));
        }
        upstream
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let upstream = links(&[("A1", "B1"), ("B1", "C1")]);
        assert_eq!(detect_cycle(&id("A1"), &upstream), None);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let upstream = links(&[("A1", "A1")]);
        assert_eq!(
            detect_cycle(&id("A1"), &upstream),
            Some(vec![id("A1"), id("A1")])
        );
    }

    #[test]
    fn test_reports_full_path() {
        let upstream = links(&[("A1", "B1"), ("B1", "C1"), ("C1", "A1")]);
        assert_eq!(
            detect_cycle(&id("A1"), &upstream),
            Some(vec![id("A1"), id("B1"), id("C1"), id("A1")])
        );
    }

    #[test]
    fn test_cycle_not_through_start_branch() {
        // D1 has a dead-end branch and a branch that loops back.
        let upstream = links(&[("D1", "E1"), ("D1", "F1"), ("E1", "G1"), ("F1", "D1")]);
        let cycle = detect_cycle(&id("D1"), &upstream).unwrap();
        assert_eq!(cycle, vec![id("D1"), id("F1"), id("D1")]);
    }

    #[test]
    fn test_wide_diamonds_terminate() {
        // 40 stacked diamonds would take 2^40 steps without memoization.
        let mut upstream: HashMap<CellId, HashSet<CellId>> = HashMap::new();
        for level in 1..=40 {
            let top = id(&format!("A{}", level));
            let left = id(&format!("B{}", level));
            let right = id(&format!("C{}", level));
            let bottom = id(&format!("A{}", level + 1));
            upstream.insert(top, [left.clone(), right.clone()].into_iter().collect());
            upstream.insert(left, [bottom.clone()].into_iter().collect());
            upstream.insert(right, [bottom].into_iter().collect());
        }
        assert_eq!(detect_cycle(&id("A1"), &upstream), None);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut upstream: HashMap<CellId, HashSet<CellId>> = HashMap::new();
        for row in 1..100_000 {
            upstream.insert(
                id(&format!("A{}", row)),
                [id(&format!("A{}", row + 1))].into_iter().collect(),
            );
        }
        upstream.insert(id("A100000"), [id("A1")].into_iter().collect());
        let cycle = detect_cycle(&id("A1"), &upstream).unwrap();
        assert_eq!(cycle.len(), 100_001);
        assert_eq!(cycle.first(), cycle.last());
    }
}
