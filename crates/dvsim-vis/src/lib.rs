//! dvsim Presentation
//!
//! Everything around the convergence core that touches files, the
//! environment or a terminal.
//!
//! # Architecture
//!
//! - **Scenario**: JSON topology files and the built-in reference triangle
//! - **Config**: environment defaults plus command line overrides
//! - **Render**: grid routing tables, update log, outcome line, JSON
//! - **Playback**: step and seek through the recorded snapshots
//!
//! # Usage
//!
//! ```
//! use dvsim_vis::{render_report, Scenario};
//! use dvsim_convergence::EngineConfig;
//!
//! let scenario = Scenario::reference_triangle();
//! let history = scenario.run(EngineConfig::default()).unwrap();
//! let report = render_report(&scenario, &history);
//! assert!(report.contains("Node X updated distance to Z from 50 to 5 (via Y)"));
//! ```

mod config;
mod error;
mod playback;
mod render;
mod scenario;

pub use config::{OutputFormat, SimConfig};
pub use error::{Error, Result};
pub use playback::{Playback, PlaybackStatus};
pub use render::{
    describe_event, render_json, render_outcome, render_report, render_routing_table,
    render_snapshot, render_topology,
};
pub use scenario::{LinkSpec, Scenario, ScenarioMeta};
