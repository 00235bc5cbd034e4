//! Scenario files: a topology plus optional engine settings, as JSON.
//!
//! ```json
//! {
//!   "meta": { "name": "Triangle", "description": "..." },
//!   "nodes": ["X", "Y", "Z"],
//!   "links": [
//!     { "from": "X", "to": "Y", "cost": 4 },
//!     { "from": "Y", "to": "Z", "cost": 1, "directed": true }
//!   ],
//!   "max_rounds": 10
//! }
//! ```
//!
//! Links are symmetric unless `directed` is set.

use std::path::Path;

use dvsim_convergence::{ConvergenceEngine, EngineConfig, History};
use dvsim_topology::{LinkTable, NodeSet, TopologyStore};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Descriptive metadata, shown in the report header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One link as written in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub from: String,
    pub to: String,
    pub cost: i64,
    #[serde(default)]
    pub directed: bool,
}

/// A complete simulation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub meta: ScenarioMeta,
    pub nodes: Vec<String>,
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub max_rounds: Option<usize>,
}

impl Scenario {
    /// Three routers, one expensive direct link that a two-hop path beats.
    pub fn reference_triangle() -> Self {
        let link = |from: &str, to: &str, cost| LinkSpec {
            from: from.to_string(),
            to: to.to_string(),
            cost,
            directed: false,
        };

        Self {
            meta: ScenarioMeta {
                name: Some("Reference triangle".to_string()),
                description: Some(
                    "X-Y costs 4, Y-Z costs 1, X-Z costs 50: X should learn to reach Z via Y."
                        .to_string(),
                ),
            },
            nodes: vec!["X".to_string(), "Y".to_string(), "Z".to_string()],
            links: vec![link("X", "Y", 4), link("Y", "Z", 1), link("X", "Z", 50)],
            max_rounds: None,
        }
    }

    /// Parse a scenario from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let scenario = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), nodes = scenario.nodes.len(), "scenario loaded");
        Ok(scenario)
    }

    /// Display name: the meta name, or a generic fallback.
    pub fn title(&self) -> &str {
        self.meta.name.as_deref().unwrap_or("Unnamed scenario")
    }

    pub fn node_set(&self) -> Result<NodeSet> {
        Ok(NodeSet::new(self.nodes.iter().cloned())?)
    }

    pub fn link_table(&self) -> LinkTable {
        self.links.iter().fold(LinkTable::new(), |table, spec| {
            if spec.directed {
                table.directed(spec.from.as_str(), spec.to.as_str(), spec.cost)
            } else {
                table.link(spec.from.as_str(), spec.to.as_str(), spec.cost)
            }
        })
    }

    /// Engine settings: `max_rounds` from the override, then the file, then the default.
    pub fn engine_config(&self, max_rounds: Option<usize>) -> EngineConfig {
        match max_rounds.or(self.max_rounds) {
            Some(rounds) => EngineConfig::with_max_rounds(rounds),
            None => EngineConfig::default(),
        }
    }

    /// Build the store and run it to completion.
    pub fn run(&self, config: EngineConfig) -> Result<History> {
        let store = TopologyStore::initialize(self.node_set()?, &self.link_table())?;
        let engine = ConvergenceEngine::new(store, config)?;
        tracing::info!(
            scenario = self.title(),
            max_rounds = config.max_rounds,
            "running simulation"
        );
        Ok(engine.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use dvsim_topology::{Distance, TopologyError};
    use std::io::Write;

    #[test]
    fn reference_triangle_converges_to_two_hop_route() {
        let history = Scenario::reference_triangle()
            .run(EngineConfig::default())
            .unwrap();
        assert_eq!(
            history.final_route("X", "Z").unwrap().distance,
            Distance::Finite(5)
        );
    }

    #[test]
    fn parses_minimal_file() {
        let scenario = Scenario::from_json(
            r#"{ "nodes": ["A", "B"], "links": [{ "from": "A", "to": "B", "cost": 3 }] }"#,
        )
        .unwrap();

        assert_eq!(scenario.meta, ScenarioMeta::default());
        assert_eq!(scenario.max_rounds, None);
        assert!(!scenario.links[0].directed);
        assert_eq!(scenario.link_table().len(), 2);
        assert_eq!(scenario.title(), "Unnamed scenario");
    }

    #[test]
    fn directed_links_add_one_entry() {
        let scenario = Scenario::from_json(
            r#"{ "nodes": ["A", "B"],
                 "links": [{ "from": "A", "to": "B", "cost": 3, "directed": true }] }"#,
        )
        .unwrap();
        assert_eq!(scenario.link_table().len(), 1);
    }

    #[test]
    fn max_rounds_precedence() {
        let mut scenario = Scenario::reference_triangle();
        assert_eq!(scenario.engine_config(None).max_rounds, 10);

        scenario.max_rounds = Some(4);
        assert_eq!(scenario.engine_config(None).max_rounds, 4);
        assert_eq!(scenario.engine_config(Some(7)).max_rounds, 7);
    }

    #[test]
    fn unknown_link_endpoint_is_reported() {
        let scenario = Scenario::from_json(
            r#"{ "nodes": ["A"], "links": [{ "from": "A", "to": "B", "cost": 1 }] }"#,
        )
        .unwrap();
        let err = scenario.run(EngineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Topology(TopologyError::UnknownNode(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = Scenario::from_json("{ nodes: }").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&Scenario::reference_triangle()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = Scenario::load(file.path()).unwrap();
        assert_eq!(loaded, Scenario::reference_triangle());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Scenario::load(Path::new("/nonexistent/dvsim/scenario.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
