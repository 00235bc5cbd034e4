//! The mutable topology store: one distance matrix, one next-hop matrix.
//!
//! # Invariants
//!
//! - `distance(n, n) == 0` and `next_hop(n, n) == Local` for every node
//! - a cell at `Infinite` distance has next hop `Unreachable`
//! - a finite cell's next hop is a direct neighbor of the row's node
//!
//! [`TopologyStore::relax`] is the only mutation and preserves all three as
//! long as callers pass a `next_hop` that is adjacent to `node`.

use crate::distance::Distance;
use crate::error::{Result, TopologyError};
use crate::links::{Adjacency, LinkTable};
use crate::node::{NodeIndex, NodeSet};

/// Where a node forwards traffic for a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NextHop {
    /// The destination is the node itself
    Local,
    /// Forward to this direct neighbor
    Via(NodeIndex),
    /// No route known
    Unreachable,
}

impl NextHop {
    /// The neighbor, if this is a forwarding entry.
    pub fn neighbor(&self) -> Option<NodeIndex> {
        match self {
            NextHop::Via(m) => Some(*m),
            NextHop::Local | NextHop::Unreachable => None,
        }
    }
}

/// One cell of the routing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub distance: Distance,
    pub next_hop: NextHop,
}

/// Both matrices, row-major over `(node, destination)`.
///
/// This is also the frozen snapshot type: a `RoutingTables` value never
/// shares storage with the store it was copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingTables {
    size: usize,
    distances: Vec<Distance>,
    next_hops: Vec<NextHop>,
}

impl RoutingTables {
    /// Seed tables from direct links.
    fn seed(adjacency: &Adjacency) -> Self {
        let size = adjacency.size();
        let mut distances = vec![Distance::Infinite; size * size];
        let mut next_hops = vec![NextHop::Unreachable; size * size];

        for n in 0..size {
            for d in 0..size {
                let cell = n * size + d;
                if n == d {
                    distances[cell] = Distance::ZERO;
                    next_hops[cell] = NextHop::Local;
                } else if let Some(cost) = adjacency.cost(NodeIndex(n), NodeIndex(d)) {
                    distances[cell] = Distance::Finite(cost);
                    next_hops[cell] = NextHop::Via(NodeIndex(d));
                }
            }
        }

        Self {
            size,
            distances,
            next_hops,
        }
    }

    /// Number of nodes per side.
    pub fn size(&self) -> usize {
        self.size
    }

    fn cell(&self, node: NodeIndex, destination: NodeIndex) -> usize {
        node.0 * self.size + destination.0
    }

    pub fn distance(&self, node: NodeIndex, destination: NodeIndex) -> Distance {
        self.distances[self.cell(node, destination)]
    }

    pub fn next_hop(&self, node: NodeIndex, destination: NodeIndex) -> NextHop {
        self.next_hops[self.cell(node, destination)]
    }

    pub fn route(&self, node: NodeIndex, destination: NodeIndex) -> Route {
        let cell = self.cell(node, destination);
        Route {
            distance: self.distances[cell],
            next_hop: self.next_hops[cell],
        }
    }

    /// One node's full routing table, indexed by destination.
    pub fn row(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, Route)> + '_ {
        (0..self.size).map(move |d| (NodeIndex(d), self.route(node, NodeIndex(d))))
    }
}

/// Owns the authoritative routing state for a single simulation run.
#[derive(Debug, Clone)]
pub struct TopologyStore {
    nodes: NodeSet,
    adjacency: Adjacency,
    tables: RoutingTables,
}

impl TopologyStore {
    /// Build the initial state from direct links.
    ///
    /// Self cells start at 0 with next hop `Local`, adjacent cells at the link
    /// cost via the neighbor itself, everything else `Infinite`/`Unreachable`.
    pub fn initialize(nodes: NodeSet, links: &LinkTable) -> Result<Self> {
        let adjacency = Adjacency::resolve(&nodes, links)?;
        let tables = RoutingTables::seed(&adjacency);

        tracing::debug!(
            nodes = nodes.len(),
            links = adjacency.link_count(),
            "topology store initialized"
        );

        Ok(Self {
            nodes,
            adjacency,
            tables,
        })
    }

    /// Rebuild a store from previously captured parts.
    pub fn restore(nodes: NodeSet, adjacency: Adjacency, tables: RoutingTables) -> Result<Self> {
        for actual in [adjacency.size(), tables.size()] {
            if actual != nodes.len() {
                return Err(TopologyError::DimensionMismatch {
                    expected: nodes.len(),
                    actual,
                });
            }
        }

        Ok(Self {
            nodes,
            adjacency,
            tables,
        })
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Neighbors of `node` with their direct cost, in declaration order.
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, i64)> + '_ {
        self.adjacency.neighbors(node)
    }

    /// Current route for one `(node, destination)` pair.
    pub fn get(&self, node: NodeIndex, destination: NodeIndex) -> Route {
        self.tables.route(node, destination)
    }

    /// Current distance for one `(node, destination)` pair.
    pub fn distance(&self, node: NodeIndex, destination: NodeIndex) -> Distance {
        self.tables.distance(node, destination)
    }

    /// Apply `candidate` if it strictly improves `(node, destination)`.
    ///
    /// Distance and next hop change together or not at all. Self cells are
    /// never touched, even by a negative candidate.
    pub fn relax(
        &mut self,
        node: NodeIndex,
        destination: NodeIndex,
        candidate: Distance,
        next_hop: NodeIndex,
    ) -> bool {
        if node == destination {
            return false;
        }

        let cell = self.tables.cell(node, destination);
        if candidate >= self.tables.distances[cell] {
            return false;
        }

        self.tables.distances[cell] = candidate;
        self.tables.next_hops[cell] = NextHop::Via(next_hop);
        true
    }

    /// Independent copy of both matrices.
    pub fn snapshot(&self) -> RoutingTables {
        self.tables.clone()
    }

    /// Borrow the live tables without copying.
    pub fn tables(&self) -> &RoutingTables {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> TopologyStore {
        let nodes = NodeSet::new(["X", "Y", "Z"]).unwrap();
        let links = LinkTable::new()
            .link("X", "Y", 4)
            .link("Y", "Z", 1)
            .link("X", "Z", 50);
        TopologyStore::initialize(nodes, &links).unwrap()
    }

    const X: NodeIndex = NodeIndex(0);
    const Y: NodeIndex = NodeIndex(1);
    const Z: NodeIndex = NodeIndex(2);

    #[test]
    fn initial_state_mirrors_links() {
        let store = triangle();
        assert_eq!(
            store.get(X, X),
            Route { distance: Distance::ZERO, next_hop: NextHop::Local }
        );
        assert_eq!(
            store.get(X, Z),
            Route { distance: Distance::Finite(50), next_hop: NextHop::Via(Z) }
        );
        assert_eq!(store.get(Z, Y).distance, Distance::Finite(1));
    }

    #[test]
    fn non_adjacent_pairs_start_unreachable() {
        let nodes = NodeSet::new(["A", "B", "C"]).unwrap();
        let links = LinkTable::new().link("A", "B", 2).link("B", "C", 3);
        let store = TopologyStore::initialize(nodes, &links).unwrap();

        let a = NodeIndex(0);
        let c = NodeIndex(2);
        assert_eq!(
            store.get(a, c),
            Route { distance: Distance::Infinite, next_hop: NextHop::Unreachable }
        );
    }

    #[test]
    fn relax_applies_strict_improvement() {
        let mut store = triangle();
        assert!(store.relax(X, Z, Distance::Finite(5), Y));
        assert_eq!(
            store.get(X, Z),
            Route { distance: Distance::Finite(5), next_hop: NextHop::Via(Y) }
        );
    }

    #[test]
    fn relax_rejects_equal_or_worse() {
        let mut store = triangle();
        assert!(!store.relax(X, Y, Distance::Finite(4), Z));
        assert!(!store.relax(X, Y, Distance::Finite(9), Z));
        assert!(!store.relax(X, Y, Distance::Infinite, Z));
        assert_eq!(store.get(X, Y).next_hop, NextHop::Via(Y));
    }

    #[test]
    fn relax_never_touches_self_cell() {
        let mut store = triangle();
        assert!(!store.relax(Y, Y, Distance::Finite(-10), X));
        assert_eq!(store.get(Y, Y).distance, Distance::ZERO);
        assert_eq!(store.get(Y, Y).next_hop, NextHop::Local);
    }

    #[test]
    fn snapshot_is_independent() {
        let mut store = triangle();
        let before = store.snapshot();
        store.relax(X, Z, Distance::Finite(5), Y);

        assert_eq!(before.distance(X, Z), Distance::Finite(50));
        assert_eq!(store.snapshot().distance(X, Z), Distance::Finite(5));
    }

    #[test]
    fn restore_checks_dimensions() {
        let store = triangle();
        let two = NodeSet::new(["X", "Y"]).unwrap();
        let err = TopologyStore::restore(two, store.adjacency().clone(), store.snapshot())
            .unwrap_err();
        assert_eq!(err, TopologyError::DimensionMismatch { expected: 2, actual: 3 });
    }

    #[test]
    fn row_lists_every_destination() {
        let store = triangle();
        let row: Vec<_> = store.tables().row(Y).collect();
        assert_eq!(row.len(), 3);
        assert_eq!(row[1].1.next_hop, NextHop::Local);
    }
}
