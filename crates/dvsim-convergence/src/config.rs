//! Engine configuration.

use thiserror::Error;

/// Default upper bound on executed relaxation rounds.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Configuration for a [`ConvergenceEngine`](crate::ConvergenceEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Upper bound on executed rounds before the run is forced to stop.
    ///
    /// A run that is still changing after this many rounds ends `Capped`.
    /// The history then holds `max_rounds + 1` snapshots.
    pub max_rounds: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl EngineConfig {
    /// Config with an explicit round cap.
    pub const fn with_max_rounds(max_rounds: usize) -> Self {
        Self { max_rounds }
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(())
    }
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_rounds` must allow at least one round
    #[error("max_rounds must be at least 1")]
    ZeroRounds,
}
