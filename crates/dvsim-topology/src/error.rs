//! Error types for dvsim-topology.

use thiserror::Error;

use crate::node::NodeId;

/// Result type for topology construction.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Ways an input topology can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The node set is empty
    #[error("topology has no nodes")]
    EmptyTopology,

    /// A node name was declared twice
    #[error("node {0} declared more than once")]
    DuplicateNode(NodeId),

    /// A link refers to a node outside the node set
    #[error("link refers to unknown node {0}")]
    UnknownNode(NodeId),

    /// A link connects a node to itself
    #[error("self-link on node {0}")]
    SelfLink(NodeId),

    /// The same directed link was given two different costs
    #[error("link {from} -> {to} given conflicting costs {first} and {second}")]
    ConflictingLink {
        from: NodeId,
        to: NodeId,
        first: i64,
        second: i64,
    },

    /// A snapshot or adjacency does not match the node set it is paired with
    #[error("dimension mismatch: node set has {expected} nodes, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
