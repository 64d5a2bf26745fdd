//! Ban list configuration.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Ban list configuration (`[bans]` table).
#[derive(Debug, Clone, Deserialize)]
pub struct BanConfig {
    /// Length in seconds of bans created by a kick-ban (default: 0, permanent).
    #[serde(default)]
    pub duration: u32,
    /// File the ban list is loaded from at startup and saved to at shutdown.
    #[serde(default = "default_ban_file")]
    pub file: PathBuf,
    /// Seconds between prune passes (default: 1).
    #[serde(default = "default_prune_interval")]
    pub prune_interval: u64,
}

impl Default for BanConfig {
    fn default() -> Self {
        Self {
            duration: 0,
            file: default_ban_file(),
            prune_interval: default_prune_interval(),
        }
    }
}

impl BanConfig {
    /// Prune timer period, never shorter than one second.
    pub fn prune_period(&self) -> Duration {
        Duration::from_secs(self.prune_interval.max(1))
    }
}

fn default_ban_file() -> PathBuf {
    PathBuf::from("bans.json")
}

fn default_prune_interval() -> u64 {
    1
}
