//! Error types for dvsim-vis.

use dvsim_convergence::{ConfigError, HistoryViolation};
use dvsim_topology::TopologyError;
use thiserror::Error;

/// Result type for dvsim-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, running or presenting a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file could not be parsed
    #[error("Scenario parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scenario describes a malformed topology
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Engine configuration rejected
    #[error("Engine config error: {0}")]
    Config(#[from] ConfigError),

    /// A produced history failed verification
    #[error("History verification failed: {0}")]
    Violation(#[from] HistoryViolation),

    /// Bad command line argument or environment variable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested iteration is not in the history
    #[error("Iteration {requested} out of range (history has {available} snapshots)")]
    IterationOutOfRange { requested: usize, available: usize },
}
