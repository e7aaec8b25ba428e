use anyhow::{Context, Result};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Seconds;

/// User-supplied time data and dependency declarations, as read from the
/// JSON config file. Structural validation happens in `Catalog::build`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Star id -> recorded completion times in seconds. An empty list
    /// means the star has not been attempted.
    #[serde(default)]
    pub times: HashMap<String, Vec<Seconds>>,
    /// 100 coin star id -> times plus the regular star it is combined with.
    #[serde(default)]
    pub hundred_coin_times: HashMap<String, HundredCoinEntry>,
    /// Star id -> stars that must be collected before it.
    #[serde(default)]
    pub prerequisites: HashMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HundredCoinEntry {
    pub times: Vec<Seconds>,
    pub combined_with: String,
}

impl UserConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file at {}", path.display()))?;
        let config: UserConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("unable to parse config file at {}", path.display()))?;
        Ok(config)
    }
}
