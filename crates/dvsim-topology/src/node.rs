//! Node identity and the fixed, ordered node set.
//!
//! The order in which nodes are declared is the order every relaxation loop
//! walks them in. Two runs over the same declaration produce the same history.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TopologyError};

/// Name of a node in the simulated network (e.g. `"X"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(String);

impl NodeId {
    /// Create a node identifier from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The node's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Position of a node within its [`NodeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeIndex(pub usize);

impl NodeIndex {
    /// Raw index value.
    pub const fn value(self) -> usize {
        self.0
    }
}

/// The fixed set of nodes, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, NodeIndex>,
}

impl NodeSet {
    /// Build a node set. Rejects an empty set and repeated names.
    pub fn new<I, N>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        let mut set = Self {
            ids: Vec::new(),
            index: HashMap::new(),
        };

        for id in ids {
            let id = id.into();
            if set.index.contains_key(&id) {
                return Err(TopologyError::DuplicateNode(id));
            }
            set.index.insert(id.clone(), NodeIndex(set.ids.len()));
            set.ids.push(id);
        }

        if set.ids.is_empty() {
            return Err(TopologyError::EmptyTopology);
        }

        Ok(set)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Look up a node's index by name.
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Name of the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this set.
    pub fn id(&self, index: NodeIndex) -> &NodeId {
        &self.ids[index.0]
    }

    /// All names, in declaration order.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// All indices, in declaration order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + Clone {
        (0..self.ids.len()).map(NodeIndex)
    }

    /// Whether `index` belongs to this set.
    pub fn contains(&self, index: NodeIndex) -> bool {
        index.0 < self.ids.len()
    }
}

// Lets `HashMap<NodeId, _>::get` take a plain `&str`.
impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// A node set travels as its list of names; the index is rebuilt on load.
#[cfg(feature = "serde")]
impl serde::Serialize for NodeSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.ids.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NodeSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let ids = Vec::<NodeId>::deserialize(deserializer)?;
        NodeSet::new(ids).map_err(serde::de::Error::custom)
    }
}
