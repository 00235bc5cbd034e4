//! Direct-link costs: the input link table and the resolved adjacency matrix.

use std::collections::HashMap;

use crate::error::{Result, TopologyError};
use crate::node::{NodeId, NodeIndex, NodeSet};

/// A single directed link entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub cost: i64,
}

/// Link table given to [`TopologyStore::initialize`](crate::TopologyStore::initialize).
///
/// A node `m` is a neighbor of `n` exactly when the table holds a cost for
/// `(n, m)`. Pairs without an entry are unreachable until relaxation finds a
/// path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<Link>,
}

impl LinkTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symmetric link: `a -> b` and `b -> a` at the same cost.
    pub fn link(mut self, a: impl Into<NodeId>, b: impl Into<NodeId>, cost: i64) -> Self {
        let a = a.into();
        let b = b.into();
        self.links.push(Link {
            from: a.clone(),
            to: b.clone(),
            cost,
        });
        self.links.push(Link { from: b, to: a, cost });
        self
    }

    /// Add a one-way link `from -> to`.
    pub fn directed(mut self, from: impl Into<NodeId>, to: impl Into<NodeId>, cost: i64) -> Self {
        self.links.push(Link {
            from: from.into(),
            to: to.into(),
            cost,
        });
        self
    }

    /// Append an already-built directed entry.
    pub fn push(&mut self, link: Link) {
        self.links.push(link);
    }

    /// All directed entries in insertion order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Resolved direct-link cost matrix over a [`NodeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adjacency {
    size: usize,
    costs: Vec<Option<i64>>,
}

impl Adjacency {
    /// Resolve a link table against a node set.
    ///
    /// Fails on unknown endpoints, self-links and conflicting duplicates.
    /// Repeating an entry with the same cost is accepted.
    pub fn resolve(nodes: &NodeSet, table: &LinkTable) -> Result<Self> {
        let size = nodes.len();
        let mut costs = vec![None; size * size];
        let mut seen: HashMap<(NodeIndex, NodeIndex), i64> = HashMap::new();

        for link in table.links() {
            let from = nodes
                .index_of(link.from.as_str())
                .ok_or_else(|| TopologyError::UnknownNode(link.from.clone()))?;
            let to = nodes
                .index_of(link.to.as_str())
                .ok_or_else(|| TopologyError::UnknownNode(link.to.clone()))?;

            if from == to {
                return Err(TopologyError::SelfLink(link.from.clone()));
            }

            if let Some(&existing) = seen.get(&(from, to)) {
                if existing != link.cost {
                    return Err(TopologyError::ConflictingLink {
                        from: link.from.clone(),
                        to: link.to.clone(),
                        first: existing,
                        second: link.cost,
                    });
                }
                continue;
            }

            if link.cost < 0 {
                tracing::warn!(
                    from = %link.from,
                    to = %link.to,
                    cost = link.cost,
                    "negative link cost; convergence is not guaranteed"
                );
            }

            seen.insert((from, to), link.cost);
            costs[from.0 * size + to.0] = Some(link.cost);
        }

        Ok(Self { size, costs })
    }

    /// Number of nodes the matrix spans.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Direct cost of `from -> to`, if the two are adjacent.
    pub fn cost(&self, from: NodeIndex, to: NodeIndex) -> Option<i64> {
        self.costs[from.0 * self.size + to.0]
    }

    /// Whether `to` is a direct neighbor of `from`.
    pub fn is_adjacent(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.cost(from, to).is_some()
    }

    /// Neighbors of `node` with their link cost, in declaration order.
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, i64)> + '_ {
        let row = &self.costs[node.0 * self.size..(node.0 + 1) * self.size];
        row.iter()
            .enumerate()
            .filter_map(|(m, cost)| cost.map(|c| (NodeIndex(m), c)))
    }

    /// Total number of directed links.
    pub fn link_count(&self) -> usize {
        self.costs.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz() -> NodeSet {
        NodeSet::new(["X", "Y", "Z"]).unwrap()
    }

    #[test]
    fn symmetric_link_adds_both_directions() {
        let table = LinkTable::new().link("X", "Y", 4);
        assert_eq!(table.len(), 2);

        let adj = Adjacency::resolve(&xyz(), &table).unwrap();
        assert_eq!(adj.cost(NodeIndex(0), NodeIndex(1)), Some(4));
        assert_eq!(adj.cost(NodeIndex(1), NodeIndex(0)), Some(4));
        assert_eq!(adj.cost(NodeIndex(0), NodeIndex(2)), None);
    }

    #[test]
    fn directed_link_is_one_way() {
        let adj = Adjacency::resolve(&xyz(), &LinkTable::new().directed("X", "Z", 7)).unwrap();
        assert!(adj.is_adjacent(NodeIndex(0), NodeIndex(2)));
        assert!(!adj.is_adjacent(NodeIndex(2), NodeIndex(0)));
        assert_eq!(adj.link_count(), 1);
    }

    #[test]
    fn neighbors_follow_declaration_order() {
        let table = LinkTable::new().link("Y", "Z", 1).link("Y", "X", 4);
        let adj = Adjacency::resolve(&xyz(), &table).unwrap();
        let neighbors: Vec<_> = adj.neighbors(NodeIndex(1)).collect();
        assert_eq!(neighbors, vec![(NodeIndex(0), 4), (NodeIndex(2), 1)]);
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let err = Adjacency::resolve(&xyz(), &LinkTable::new().link("X", "Q", 1)).unwrap_err();
        assert_eq!(err, TopologyError::UnknownNode(NodeId::new("Q")));
    }

    #[test]
    fn self_link_rejected() {
        let err = Adjacency::resolve(&xyz(), &LinkTable::new().directed("Y", "Y", 1)).unwrap_err();
        assert_eq!(err, TopologyError::SelfLink(NodeId::new("Y")));
    }

    #[test]
    fn conflicting_duplicate_rejected() {
        let table = LinkTable::new().directed("X", "Y", 4).directed("X", "Y", 5);
        let err = Adjacency::resolve(&xyz(), &table).unwrap_err();
        assert!(matches!(err, TopologyError::ConflictingLink { first: 4, second: 5, .. }));
    }

    #[test]
    fn identical_duplicate_accepted() {
        let table = LinkTable::new().link("X", "Y", 4).directed("X", "Y", 4);
        let adj = Adjacency::resolve(&xyz(), &table).unwrap();
        assert_eq!(adj.link_count(), 2);
    }
}
