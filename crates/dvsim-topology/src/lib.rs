//! dvsim Topology Store
//!
//! The authoritative routing state of a small, static network: one distance
//! matrix and one next-hop matrix over a fixed, ordered node set.
//!
//! # Model
//!
//! - **Nodes** are declared up front; declaration order is iteration order
//! - **Links** carry a direct cost per directed pair; absence means "not a neighbor"
//! - **Distances** are finite costs or [`Distance::Infinite`]
//! - **Next hops** are a direct neighbor, [`NextHop::Local`] or [`NextHop::Unreachable`]
//!
//! The store is seeded from the links and then only ever changed through
//! [`TopologyStore::relax`], which applies strict improvements and nothing else.
//!
//! ```
//! use dvsim_topology::{Distance, LinkTable, NodeSet, TopologyStore};
//!
//! let nodes = NodeSet::new(["X", "Y", "Z"]).unwrap();
//! let links = LinkTable::new().link("X", "Y", 4).link("Y", "Z", 1).link("X", "Z", 50);
//! let store = TopologyStore::initialize(nodes, &links).unwrap();
//!
//! let x = store.nodes().index_of("X").unwrap();
//! let z = store.nodes().index_of("Z").unwrap();
//! assert_eq!(store.get(x, z).distance, Distance::Finite(50));
//! ```

mod distance;
mod error;
mod links;
mod node;
mod store;

pub use distance::Distance;
pub use error::{Result, TopologyError};
pub use links::{Adjacency, Link, LinkTable};
pub use node::{NodeId, NodeIndex, NodeSet};
pub use store::{NextHop, Route, RoutingTables, TopologyStore};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(len: usize) -> (NodeSet, LinkTable) {
        let names: Vec<String> = (0..len).map(|i| format!("n{}", i)).collect();
        let mut links = LinkTable::new();
        for pair in names.windows(2) {
            links = links.link(pair[0].as_str(), pair[1].as_str(), 1);
        }
        (NodeSet::new(names).unwrap(), links)
    }

    #[test]
    fn line_topology_seeds_only_neighbors() {
        let (nodes, links) = line(4);
        let store = TopologyStore::initialize(nodes, &links).unwrap();

        let first = NodeIndex(0);
        assert!(store.get(first, NodeIndex(1)).distance.is_finite());
        assert!(!store.get(first, NodeIndex(2)).distance.is_finite());
        assert_eq!(store.neighbors(NodeIndex(1)).count(), 2);
    }

    proptest! {
        #[test]
        fn relax_never_increases_distance(
            len in 2usize..6,
            node in 0usize..6,
            dest in 0usize..6,
            candidate in -20i64..20,
        ) {
            let (nodes, links) = line(len);
            let mut store = TopologyStore::initialize(nodes, &links).unwrap();
            let n = NodeIndex(node % len);
            let d = NodeIndex(dest % len);
            let before = store.get(n, d).distance;

            let applied = store.relax(n, d, Distance::Finite(candidate), NodeIndex(0));
            let after = store.get(n, d).distance;

            prop_assert!(after <= before);
            prop_assert_eq!(applied, after < before);
            prop_assert_eq!(store.get(n, n).distance, Distance::ZERO);
        }
    }
}
