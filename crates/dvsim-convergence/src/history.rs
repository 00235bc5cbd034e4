//! Iteration snapshots and the history a run produces.

use dvsim_topology::{Adjacency, NodeId, NodeIndex, NodeSet, Route, RoutingTables, TopologyError};

use crate::check::HistoryViolation;
use crate::event::RelaxationEvent;

/// Frozen routing state after one productive round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationSnapshot {
    /// 0 for the initial state, otherwise the round that produced it
    pub iteration: usize,
    /// Both matrices at the end of the round
    pub tables: RoutingTables,
    /// Events of the round, in the order they were applied
    pub events: Vec<RelaxationEvent>,
}

impl IterationSnapshot {
    /// Route for one pair in this snapshot.
    pub fn route(&self, node: NodeIndex, destination: NodeIndex) -> Route {
        self.tables.route(node, destination)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// A round produced no events. `rounds` counts that empty round too.
    Converged { rounds: usize },
    /// The round cap was reached while rounds were still producing events.
    Capped { rounds: usize },
}

impl Outcome {
    /// Rounds executed, including a final empty round on convergence.
    pub fn rounds(&self) -> usize {
        match self {
            Outcome::Converged { rounds } | Outcome::Capped { rounds } => *rounds,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Outcome::Converged { .. })
    }
}

/// Ordered snapshots of a finished run, starting with iteration 0.
///
/// Never empty. Deserialization goes through [`History::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct History {
    nodes: NodeSet,
    adjacency: Adjacency,
    snapshots: Vec<IterationSnapshot>,
    outcome: Outcome,
}

impl History {
    pub(crate) fn new(
        nodes: NodeSet,
        adjacency: Adjacency,
        snapshots: Vec<IterationSnapshot>,
        outcome: Outcome,
    ) -> Self {
        debug_assert!(!snapshots.is_empty());
        Self {
            nodes,
            adjacency,
            snapshots,
            outcome,
        }
    }

    /// Reassemble a history, checking that it has an initial snapshot and
    /// that every matrix matches the node set.
    pub fn from_parts(
        nodes: NodeSet,
        adjacency: Adjacency,
        snapshots: Vec<IterationSnapshot>,
        outcome: Outcome,
    ) -> Result<Self, HistoryViolation> {
        if snapshots.is_empty() {
            return Err(HistoryViolation::Empty);
        }

        let sizes = std::iter::once(adjacency.size()).chain(snapshots.iter().map(|s| s.tables.size()));
        for actual in sizes {
            if actual != nodes.len() {
                return Err(TopologyError::DimensionMismatch {
                    expected: nodes.len(),
                    actual,
                }
                .into());
            }
        }

        Ok(Self::new(nodes, adjacency, snapshots, outcome))
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    /// Direct-link costs the run was built from.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn snapshots(&self) -> &[IterationSnapshot] {
        &self.snapshots
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Number of snapshots (initial state included).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the initial snapshot is always present.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The initial snapshot.
    pub fn initial(&self) -> &IterationSnapshot {
        &self.snapshots[0]
    }

    /// The last recorded snapshot (the converged state, if the run converged).
    pub fn last(&self) -> &IterationSnapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn get(&self, iteration: usize) -> Option<&IterationSnapshot> {
        self.snapshots.get(iteration)
    }

    /// Total relaxation events across all rounds.
    pub fn event_count(&self) -> usize {
        self.snapshots.iter().map(|s| s.events.len()).sum()
    }

    /// Final route between two named nodes.
    pub fn final_route(&self, node: &str, destination: &str) -> Option<Route> {
        let n = self.nodes.index_of(node)?;
        let d = self.nodes.index_of(destination)?;
        Some(self.last().route(n, d))
    }

    /// Name of a node index, for display.
    pub fn name(&self, index: NodeIndex) -> &NodeId {
        self.nodes.id(index)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for History {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Parts {
            nodes: NodeSet,
            adjacency: Adjacency,
            snapshots: Vec<IterationSnapshot>,
            outcome: Outcome,
        }

        let parts = Parts::deserialize(deserializer)?;
        History::from_parts(parts.nodes, parts.adjacency, parts.snapshots, parts.outcome)
            .map_err(serde::de::Error::custom)
    }
}
