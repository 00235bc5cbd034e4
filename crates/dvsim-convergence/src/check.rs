//! History invariants, checked after the fact.
//!
//! A history produced by [`ConvergenceEngine`](crate::ConvergenceEngine) over
//! non-negative link costs satisfies every check here. Negative costs void
//! the monotone-descent argument for the fixed point but not the others.

use dvsim_topology::{Distance, NextHop, NodeIndex, TopologyError, TopologyStore};
use thiserror::Error;

use crate::engine::relax_round;
use crate::history::History;

/// A broken history invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryViolation {
    /// A distance grew between consecutive snapshots
    #[error("distance {node:?} -> {destination:?} grew from {before} to {after} at iteration {iteration}")]
    NotMonotonic {
        iteration: usize,
        node: NodeIndex,
        destination: NodeIndex,
        before: Distance,
        after: Distance,
    },

    /// A self cell is not (0, Local)
    #[error("self route of {node:?} corrupted at iteration {iteration}")]
    SelfRoute { iteration: usize, node: NodeIndex },

    /// An event's numbers do not add up
    #[error("inconsistent event #{index} at iteration {iteration}")]
    InconsistentEvent { iteration: usize, index: usize },

    /// A finite route's next hop is not a direct neighbor
    #[error("route {node:?} -> {destination:?} at iteration {iteration} has non-adjacent next hop")]
    NonAdjacentNextHop {
        iteration: usize,
        node: NodeIndex,
        destination: NodeIndex,
    },

    /// The history claims convergence but another round still relaxes
    #[error("converged state is not a fixed point: {events} further relaxations")]
    NotFixedPoint { events: usize },

    /// The history has no initial snapshot
    #[error("history has no snapshots")]
    Empty,

    /// The final tables cannot be paired with the history's node set
    #[error("malformed history: {0}")]
    Malformed(#[from] TopologyError),
}

/// Every distance is non-increasing from one snapshot to the next.
pub fn check_monotonic(history: &History) -> Result<(), HistoryViolation> {
    for pair in history.snapshots().windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        for n in history.nodes().indices() {
            for d in history.nodes().indices() {
                let before = earlier.tables.distance(n, d);
                let after = later.tables.distance(n, d);
                if after > before {
                    return Err(HistoryViolation::NotMonotonic {
                        iteration: later.iteration,
                        node: n,
                        destination: d,
                        before,
                        after,
                    });
                }
            }
        }
    }
    Ok(())
}

/// `distance(n, n) == 0` and `next_hop(n, n) == Local` in every snapshot.
pub fn check_self_routes(history: &History) -> Result<(), HistoryViolation> {
    for snapshot in history.snapshots() {
        for n in history.nodes().indices() {
            let route = snapshot.route(n, n);
            if route.distance != Distance::ZERO || route.next_hop != NextHop::Local {
                return Err(HistoryViolation::SelfRoute {
                    iteration: snapshot.iteration,
                    node: n,
                });
            }
        }
    }
    Ok(())
}

/// Every event is a strict improvement equal to `via_cost + via_distance`,
/// its next hop is a direct neighbor, and the initial snapshot has no events.
pub fn check_event_consistency(history: &History) -> Result<(), HistoryViolation> {
    for snapshot in history.snapshots() {
        for (index, event) in snapshot.events.iter().enumerate() {
            let inconsistent = || HistoryViolation::InconsistentEvent {
                iteration: snapshot.iteration,
                index,
            };

            if snapshot.iteration == 0 || event.via == event.node {
                return Err(inconsistent());
            }
            if !history.adjacency().is_adjacent(event.node, event.next_hop) {
                return Err(inconsistent());
            }
            if event.new_distance != event.via_distance + event.via_cost {
                return Err(inconsistent());
            }
            if event.new_distance >= event.old_distance {
                return Err(inconsistent());
            }
        }
    }
    Ok(())
}

/// Finite routes forward to a direct neighbor; infinite ones have no next hop.
pub fn check_next_hop_adjacency(history: &History) -> Result<(), HistoryViolation> {
    for snapshot in history.snapshots() {
        for n in history.nodes().indices() {
            for d in history.nodes().indices() {
                if n == d {
                    continue;
                }
                let route = snapshot.route(n, d);
                let ok = match (route.distance, route.next_hop) {
                    (Distance::Finite(_), NextHop::Via(m)) => history.adjacency().is_adjacent(n, m),
                    (Distance::Infinite, NextHop::Unreachable) => true,
                    _ => false,
                };
                if !ok {
                    return Err(HistoryViolation::NonAdjacentNextHop {
                        iteration: snapshot.iteration,
                        node: n,
                        destination: d,
                    });
                }
            }
        }
    }
    Ok(())
}

/// For a converged history, one more round over the final state changes nothing.
///
/// A capped history passes trivially.
pub fn check_fixed_point(history: &History) -> Result<(), HistoryViolation> {
    if !history.outcome().is_converged() {
        return Ok(());
    }

    let mut store = TopologyStore::restore(
        history.nodes().clone(),
        history.adjacency().clone(),
        history.last().tables.clone(),
    )?;

    let events = relax_round(&mut store).len();
    if events > 0 {
        return Err(HistoryViolation::NotFixedPoint { events });
    }
    Ok(())
}

/// Run every check.
pub fn check_history(history: &History) -> Result<(), HistoryViolation> {
    check_self_routes(history)?;
    check_monotonic(history)?;
    check_event_consistency(history)?;
    check_next_hop_adjacency(history)?;
    check_fixed_point(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{simulate, EngineConfig};
    use dvsim_topology::{LinkTable, NodeSet};

    fn triangle_history() -> History {
        let nodes = NodeSet::new(["X", "Y", "Z"]).unwrap();
        let links = LinkTable::new()
            .link("X", "Y", 4)
            .link("Y", "Z", 1)
            .link("X", "Z", 50);
        simulate(nodes, &links, EngineConfig::default()).unwrap()
    }

    #[test]
    fn engine_history_passes_all_checks() {
        assert_eq!(check_history(&triangle_history()), Ok(()));
    }

    #[test]
    fn tampered_event_detected() {
        let history = triangle_history();
        let mut snapshots = history.snapshots().to_vec();
        snapshots[1].events[0].new_distance = Distance::Finite(6);
        let tampered = History::new(
            history.nodes().clone(),
            history.adjacency().clone(),
            snapshots,
            history.outcome(),
        );

        assert_eq!(
            check_event_consistency(&tampered),
            Err(HistoryViolation::InconsistentEvent { iteration: 1, index: 0 })
        );
    }

    #[test]
    fn event_forwarding_past_neighbors_detected() {
        let nodes = NodeSet::new(["A", "B", "C", "D"]).unwrap();
        let links = LinkTable::new().link("A", "B", 1).link("B", "C", 1).link("C", "D", 1);
        let history = simulate(nodes, &links, EngineConfig::default()).unwrap();
        assert_eq!(check_event_consistency(&history), Ok(()));

        // A -> D: point the next hop at D itself, which A has no link to.
        let mut snapshots = history.snapshots().to_vec();
        snapshots[1].events[1].next_hop = snapshots[1].events[1].destination;
        let tampered = History::new(
            history.nodes().clone(),
            history.adjacency().clone(),
            snapshots,
            history.outcome(),
        );

        assert_eq!(
            check_event_consistency(&tampered),
            Err(HistoryViolation::InconsistentEvent { iteration: 1, index: 1 })
        );
    }

    #[test]
    fn reversed_history_is_not_monotonic() {
        let history = triangle_history();
        let mut snapshots = history.snapshots().to_vec();
        snapshots.reverse();
        let reversed = History::new(
            history.nodes().clone(),
            history.adjacency().clone(),
            snapshots,
            history.outcome(),
        );

        assert!(matches!(
            check_monotonic(&reversed),
            Err(HistoryViolation::NotMonotonic { .. })
        ));
    }

    #[test]
    fn initial_state_as_converged_is_not_a_fixed_point() {
        let history = triangle_history();
        let premature = History::new(
            history.nodes().clone(),
            history.adjacency().clone(),
            vec![history.initial().clone()],
            history.outcome(),
        );

        assert_eq!(
            check_fixed_point(&premature),
            Err(HistoryViolation::NotFixedPoint { events: 2 })
        );
    }
}
