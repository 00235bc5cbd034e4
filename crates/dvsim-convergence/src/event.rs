//! Relaxation events: one record per strict improvement.

use dvsim_topology::{Distance, NodeIndex};

/// A single applied relaxation.
///
/// `new_distance == via_cost + via_distance` and `new_distance < old_distance`
/// hold for every event the engine emits. `via` is the node whose vector
/// produced the improvement; `next_hop` is the neighbor `node` already used to
/// reach `via`, and becomes the new next hop for `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelaxationEvent {
    /// Node whose table changed
    pub node: NodeIndex,
    /// Destination whose entry changed
    pub destination: NodeIndex,
    /// Distance before the update
    pub old_distance: Distance,
    /// Distance after the update
    pub new_distance: Distance,
    /// Node the improved path goes through
    pub via: NodeIndex,
    /// Direct neighbor the route now forwards to
    pub next_hop: NodeIndex,
    /// `node`'s distance to `via` when the event was produced
    pub via_cost: i64,
    /// `via`'s distance to `destination` when the event was produced
    pub via_distance: Distance,
}

impl RelaxationEvent {
    /// Size of the improvement, when both ends are finite.
    pub fn improvement(&self) -> Option<i64> {
        match (self.old_distance, self.new_distance) {
            (Distance::Finite(old), Distance::Finite(new)) => Some(old.saturating_sub(new)),
            _ => None,
        }
    }
}
