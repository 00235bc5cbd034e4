//! Runtime configuration for the `dvsim` binary.
//!
//! Environment variables provide defaults; command line arguments override them.
//!
//! | Variable           | Meaning                                   |
//! |--------------------|-------------------------------------------|
//! | `DVSIM_SCENARIO`   | scenario file (default: built-in triangle)|
//! | `DVSIM_MAX_ROUNDS` | round cap override                        |
//! | `DVSIM_FORMAT`     | `text` or `json`                          |

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Routing tables and update log
    #[default]
    Text,
    /// The history as JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidArgument(format!("unknown format {:?}", other))),
        }
    }
}

/// Settings for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimConfig {
    /// Scenario file; `None` runs the built-in reference triangle
    pub scenario: Option<PathBuf>,
    /// Round cap override
    pub max_rounds: Option<usize>,
    /// Output format
    pub format: OutputFormat,
    /// Show only this iteration
    pub iteration: Option<usize>,
    /// Check history invariants before printing
    pub verify: bool,
}

impl SimConfig {
    /// Read defaults from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read defaults through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            scenario: lookup("DVSIM_SCENARIO").map(PathBuf::from),
            ..Self::default()
        };

        if let Some(rounds) = lookup("DVSIM_MAX_ROUNDS") {
            config.max_rounds = Some(parse_count("DVSIM_MAX_ROUNDS", &rounds)?);
        }
        if let Some(format) = lookup("DVSIM_FORMAT") {
            config.format = format.parse()?;
        }

        Ok(config)
    }

    /// Apply command line arguments (program name already stripped).
    pub fn apply_args<I>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--max-rounds" => {
                    let value = next_value(&mut args, "--max-rounds")?;
                    self.max_rounds = Some(parse_count("--max-rounds", &value)?);
                }
                "--format" => {
                    self.format = next_value(&mut args, "--format")?.parse()?;
                }
                "--iteration" => {
                    let value = next_value(&mut args, "--iteration")?;
                    self.iteration = Some(parse_count("--iteration", &value)?);
                }
                "--verify" => self.verify = true,
                flag if flag.starts_with("--") => {
                    return Err(Error::InvalidArgument(format!("unknown option {}", flag)));
                }
                path => {
                    if self.scenario.is_some() && path != "-" {
                        tracing::debug!(path, "scenario path overrides environment");
                    }
                    self.scenario = Some(PathBuf::from(path));
                }
            }
        }

        Ok(self)
    }
}

fn next_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| Error::InvalidArgument(format!("{} needs a value", flag)))
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("{} must be a non-negative integer, got {:?}", name, value)))
}
