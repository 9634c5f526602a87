//! arena.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArenaConfig {
    #[serde(default)]
    pub tournament: TournamentConfig,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Games to play for each ordered pair of bots. Also the number of
    /// priority levels the scheduler maintains; fixed for the lifetime of
    /// a scheduling run.
    #[serde(default = "default_num_rounds")]
    pub num_rounds: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

fn default_num_rounds() -> usize {
    5
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            num_rounds: default_num_rounds(),
        }
    }
}

impl ArenaConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ArenaConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
