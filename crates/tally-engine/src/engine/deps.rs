//! Dependency graph between cells.
//!
//! Tracks, for every formula cell, the cells it reads (`upstream`) and, for
//! every referenced cell, the formulas that read it (`downstream`).
//!
//! # Invariants
//!
//! 1. The maps are exact inverses: `b ∈ upstream[a]` iff `a ∈ downstream[b]`.
//! 2. No empty sets are stored.
//! 3. The upstream relation is acyclic. [`DependencyGraph::add`] restores the
//!    previous state before reporting a cycle, so no caller ever sees one.

use log::debug;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::cycle::detect_cycle;
use super::error::CycleError;
use super::CellId;

#[derive(Default, Debug, Clone, PartialEq)]
pub struct DependencyGraph {
    /// Formula cell -> cells it references.
    upstream: HashMap<CellId, HashSet<CellId>>,
    /// Referenced cell -> formula cells that reference it.
    downstream: HashMap<CellId, HashSet<CellId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells that `id` reads from.
    pub fn upstream_of(&self, id: &CellId) -> impl Iterator<Item = &CellId> + '_ {
        self.upstream.get(id).into_iter().flatten()
    }

    /// Cells that read from `id`.
    pub fn downstream_of(&self, id: &CellId) -> impl Iterator<Item = &CellId> + '_ {
        self.downstream.get(id).into_iter().flatten()
    }

    pub fn upstream_links(&self) -> &HashMap<CellId, HashSet<CellId>> {
        &self.upstream
    }

    pub fn downstream_links(&self) -> &HashMap<CellId, HashSet<CellId>> {
        &self.downstream
    }

    /// Number of cells with recorded dependencies.
    pub fn len(&self) -> usize {
        self.upstream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upstream.is_empty()
    }

    /// Replace the upstream links of `id`.
    ///
    /// An empty set removes `id` from the graph. If the new links would close
    /// a cycle the graph is left exactly as it was and the cycle is returned.
    pub fn add(&mut self, id: &CellId, upstream: HashSet<CellId>) -> Result<(), CycleError> {
        if upstream.is_empty() {
            self.remove(id);
            return Ok(());
        }

        let previous = self.detach(id);
        self.attach(id, upstream);

        if let Some(cycle) = detect_cycle(id, &self.upstream) {
            self.detach(id);
            if let Some(previous) = previous {
                self.attach(id, previous);
            }
            let err = CycleError { cycle };
            debug!("rejected links for {}: {}", id, err);
            return Err(err);
        }

        debug!("recorded {} upstream link(s) for {}", self.upstream[id].len(), id);
        Ok(())
    }

    /// Drop the upstream links of `id`. Cells that read `id` keep their links.
    pub fn remove(&mut self, id: &CellId) {
        if self.detach(id).is_some() {
            debug!("removed upstream links of {}", id);
        }
    }

    fn detach(&mut self, id: &CellId) -> Option<HashSet<CellId>> {
        let old = self.upstream.remove(id)?;
        for source in &old {
            if let Some(readers) = self.downstream.get_mut(source) {
                readers.remove(id);
                if readers.is_empty() {
                    self.downstream.remove(source);
                }
            }
        }
        Some(old)
    }

    fn attach(&mut self, id: &CellId, upstream: HashSet<CellId>) {
        for source in &upstream {
            self.downstream
                .entry(source.clone())
                .or_default()
                .insert(id.clone());
        }
        self.upstream.insert(id.clone(), upstream);
    }

    /// Whether the two maps mirror each other and hold no empty sets.
    pub fn is_consistent(&self) -> bool {
        let mirrored = |from: &HashMap<CellId, HashSet<CellId>>,
                        to: &HashMap<CellId, HashSet<CellId>>| {
            from.iter().all(|(a, set)| {
                !set.is_empty()
                    && set
                        .iter()
                        .all(|b| to.get(b).is_some_and(|back| back.contains(a)))
            })
        };
        mirrored(&self.upstream, &self.downstream) && mirrored(&self.downstream, &self.upstream)
    }
}

fn write_links(
    f: &mut fmt::Formatter<'_>,
    links: &HashMap<CellId, HashSet<CellId>>,
) -> fmt::Result {
    let mut keys: Vec<&CellId> = links.keys().collect();
    keys.sort_by(|a, b| a.natural_cmp(b));
    for key in keys {
        let mut neighbours: Vec<&CellId> = links[key].iter().collect();
        neighbours.sort_by(|a, b| a.natural_cmp(b));
        let joined = neighbours
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "{:>4} : [{}]", key, joined)?;
    }
    Ok(())
}

/// Upstream then downstream adjacency, keys and neighbours in sheet order.
impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Upstream Links:")?;
        write_links(f, &self.upstream)?;
        writeln!(f, "Downstream Links:")?;
        write_links(f, &self.downstream)
    }
}
