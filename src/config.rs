//! Analysis configuration, loadable from a TOML file.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::ExploreConfig;
use crate::net::structure::Tokens;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalysisConfig {
    /// Cap on markings visited by reachability and state-space runs.
    #[serde(default = "default_state_limit")]
    pub state_limit: Option<usize>,
    /// Step budget for token-game plays.
    #[serde(default = "default_step_budget")]
    pub step_budget: usize,
    /// Bound used when building nets without an explicit one.
    #[serde(default = "default_bound")]
    pub default_bound: Tokens,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            state_limit: default_state_limit(),
            step_budget: default_step_budget(),
            default_bound: default_bound(),
        }
    }
}

fn default_state_limit() -> Option<usize> {
    Some(10_000)
}

fn default_step_budget() -> usize {
    100
}

fn default_bound() -> Tokens {
    1
}

impl AnalysisConfig {
    /// Loads the config, falling back to defaults when the file is absent.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config: AnalysisConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path:?}"))?;
        Ok(config)
    }

    pub fn explore(&self) -> ExploreConfig {
        ExploreConfig {
            state_limit: self.state_limit,
        }
    }
}
