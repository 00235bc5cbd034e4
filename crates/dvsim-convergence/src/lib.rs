//! Distance-Vector Convergence
//!
//! Bellman-Ford relaxation over a static topology, round by round, until the
//! routing tables stop changing.
//!
//! # Core Loop
//!
//! 1. Record the initial tables as iteration 0
//! 2. Relax every `(node, neighbor, destination)` triple in declaration order
//! 3. If anything changed, freeze the tables and the round's events as the next snapshot
//! 4. Stop on the first round with no change, or after `max_rounds` rounds
//!
//! # Termination
//!
//! Each cell only ever decreases and is bounded below by the true shortest
//! path, so with non-negative costs the tables settle within `nodes - 1`
//! productive rounds. The round cap only matters for inputs outside that
//! contract (negative cycles).
//!
//! ```
//! use dvsim_convergence::{simulate, EngineConfig, Outcome};
//! use dvsim_topology::{Distance, LinkTable, NextHop, NodeSet};
//!
//! let nodes = NodeSet::new(["X", "Y", "Z"]).unwrap();
//! let links = LinkTable::new().link("X", "Y", 4).link("Y", "Z", 1).link("X", "Z", 50);
//! let history = simulate(nodes, &links, EngineConfig::default()).unwrap();
//!
//! assert_eq!(history.outcome(), Outcome::Converged { rounds: 2 });
//! let route = history.final_route("X", "Z").unwrap();
//! assert_eq!(route.distance, Distance::Finite(5));
//! assert_eq!(route.next_hop, NextHop::Via(history.nodes().index_of("Y").unwrap()));
//! ```

mod config;
mod engine;
mod event;
mod history;

pub mod check;

pub use check::{check_history, HistoryViolation};
pub use config::{ConfigError, EngineConfig, DEFAULT_MAX_ROUNDS};
pub use engine::{relax_round, simulate, ConvergenceEngine, EngineState, SimulateError};
pub use event::RelaxationEvent;
pub use history::{History, IterationSnapshot, Outcome};
