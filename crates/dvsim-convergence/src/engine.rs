//! The convergence engine: Bellman-Ford rounds over a topology store.
//!
//! # Round rule
//!
//! For every node `n`, every other node `m` that `n` currently reaches, every
//! destination `d != n`, all in declaration order:
//!
//! ```text
//! candidate = distance(n, m) + distance(m, d)
//! if candidate < distance(n, d): relax (n, d), inheriting next_hop(n, m)
//! ```
//!
//! Relaxation is applied in place, so a pair visited later in a round sees
//! improvements made earlier in the same round, including routes to `m` that
//! `n` itself learned a moment ago. Changing that order changes the history.
//!
//! # States
//!
//! `Running` until a round produces no events (`Converged`) or `max_rounds`
//! rounds have run (`Capped`). Both terminal states are sticky.

use dvsim_topology::{Distance, LinkTable, NextHop, NodeSet, Route, TopologyError, TopologyStore};
use thiserror::Error;

use crate::config::{ConfigError, EngineConfig};
use crate::event::RelaxationEvent;
use crate::history::{History, IterationSnapshot, Outcome};

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// More rounds may change the tables
    Running,
    /// The last round changed nothing
    Converged,
    /// Stopped by the round cap while still changing
    Capped,
}

impl EngineState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EngineState::Running)
    }
}

/// Run one relaxation round over `store`, returning the events in order.
pub fn relax_round(store: &mut TopologyStore) -> Vec<RelaxationEvent> {
    let mut events = Vec::new();
    let nodes: Vec<_> = store.nodes().indices().collect();

    for &n in &nodes {
        for &m in &nodes {
            if m == n {
                continue;
            }

            // Routes through `m` start with whatever `n` uses to reach `m`.
            // Relaxing (n, m) itself cannot happen below, since distance(m, m) is 0.
            let (via_cost, next_hop) = match store.get(n, m) {
                Route {
                    distance: Distance::Finite(cost),
                    next_hop: NextHop::Via(hop),
                } => (cost, hop),
                _ => continue,
            };

            for &d in &nodes {
                if d == n {
                    continue;
                }

                let via_distance = store.distance(m, d);
                let candidate = via_distance + via_cost;
                let old_distance = store.distance(n, d);

                if store.relax(n, d, candidate, next_hop) {
                    tracing::trace!(
                        node = %store.nodes().id(n),
                        destination = %store.nodes().id(d),
                        via = %store.nodes().id(m),
                        next_hop = %store.nodes().id(next_hop),
                        old = %old_distance,
                        new = %candidate,
                        "relaxed"
                    );
                    events.push(RelaxationEvent {
                        node: n,
                        destination: d,
                        old_distance,
                        new_distance: candidate,
                        via: m,
                        next_hop,
                        via_cost,
                        via_distance,
                    });
                }
            }
        }
    }

    events
}

/// Drives a [`TopologyStore`] to a fixed point and records every productive round.
#[derive(Debug)]
pub struct ConvergenceEngine {
    config: EngineConfig,
    store: TopologyStore,
    state: EngineState,
    rounds: usize,
    snapshots: Vec<IterationSnapshot>,
}

impl ConvergenceEngine {
    /// Take ownership of a store. Records iteration 0 immediately.
    pub fn new(store: TopologyStore, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let initial = IterationSnapshot {
            iteration: 0,
            tables: store.snapshot(),
            events: Vec::new(),
        };

        Ok(Self {
            config,
            store,
            state: EngineState::Running,
            rounds: 0,
            snapshots: vec![initial],
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The live store. Read-only: the engine is its only writer.
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Rounds executed so far, productive or not.
    pub fn rounds_executed(&self) -> usize {
        self.rounds
    }

    /// Snapshots recorded so far.
    pub fn snapshots(&self) -> &[IterationSnapshot] {
        &self.snapshots
    }

    /// Execute one round. Does nothing once the engine is terminal.
    pub fn step(&mut self) -> EngineState {
        if self.state.is_terminal() {
            return self.state;
        }

        self.rounds += 1;
        let events = relax_round(&mut self.store);

        if events.is_empty() {
            self.state = EngineState::Converged;
            tracing::info!(rounds = self.rounds, "routing tables converged");
            return self.state;
        }

        tracing::debug!(round = self.rounds, events = events.len(), "round produced updates");
        self.snapshots.push(IterationSnapshot {
            iteration: self.rounds,
            tables: self.store.snapshot(),
            events,
        });

        if self.rounds >= self.config.max_rounds {
            self.state = EngineState::Capped;
            tracing::warn!(
                max_rounds = self.config.max_rounds,
                "round cap reached before convergence"
            );
        }

        self.state
    }

    /// Step until the engine is terminal.
    pub fn run_to_completion(&mut self) -> EngineState {
        while !self.state.is_terminal() {
            self.step();
        }
        self.state
    }

    /// Finish the run and hand over its history.
    pub fn run(mut self) -> History {
        let outcome = match self.run_to_completion() {
            EngineState::Converged => Outcome::Converged {
                rounds: self.rounds,
            },
            EngineState::Capped | EngineState::Running => Outcome::Capped {
                rounds: self.rounds,
            },
        };

        History::new(
            self.store.nodes().clone(),
            self.store.adjacency().clone(),
            self.snapshots,
            outcome,
        )
    }
}

/// Failure to set up a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulateError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Build a store, run it to completion and return the history.
pub fn simulate(
    nodes: NodeSet,
    links: &LinkTable,
    config: EngineConfig,
) -> Result<History, SimulateError> {
    let store = TopologyStore::initialize(nodes, links)?;
    Ok(ConvergenceEngine::new(store, config)?.run())
}
