//! Runtime settings
//!
//! Storage keys, RNG seeding and (native only) the data directory.

use serde::{Deserialize, Serialize};

use crate::consts::{LEADERBOARD_KEY, SESSION_KEY};

/// Environment variable overriding the RNG seed
pub const SEED_ENV: &str = "TILE_MERGE_SEED";
/// Environment variable overriding the native data directory
pub const DATA_DIR_ENV: &str = "TILE_MERGE_DATA_DIR";

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Storage key for the live session record
    pub session_key: String,
    /// Storage key for the leaderboard record
    pub leaderboard_key: String,
    /// Fixed RNG seed (None = fresh entropy each run)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Directory for the native file store
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    ".tile-merge".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_key: SESSION_KEY.to_string(),
            leaderboard_key: LEADERBOARD_KEY.to_string(),
            seed: None,
            data_dir: default_data_dir(),
        }
    }
}

impl Settings {
    /// Default settings with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Apply overrides from a variable lookup; bad values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("Ignoring invalid {}={:?}", SEED_ENV, raw),
            }
        }
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = dir;
            }
        }
    }

    /// Default settings overridden from the process environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(|name| std::env::var(name).ok());
        settings
    }

    /// Seed to use for this session
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(crate::platform::entropy_seed)
    }
}
