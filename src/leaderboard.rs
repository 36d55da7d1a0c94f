//! Score leaderboard
//!
//! Persisted under its own storage key, keeps the top 10 results.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PLAYER_NAME, MAX_LEADERBOARD, MAX_NAME_LEN};
use crate::persistence::{self, KeyValueStore, StorageError};

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    /// Player name
    #[serde(default)]
    pub name: String,
    /// Final score
    #[serde(default)]
    pub score: u64,
    /// Local time the record was saved
    #[serde(default)]
    pub date: String,
}

/// Ranked list of records, highest score first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardRecord>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wrap an existing list, restoring order and size bounds
    pub fn from_records(mut entries: Vec<LeaderboardRecord>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_LEADERBOARD);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardRecord] {
        &self.entries
    }

    pub fn into_records(self) -> Vec<LeaderboardRecord> {
        self.entries
    }

    /// Check if a score would make the list
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_LEADERBOARD {
            return true;
        }
        // Ties go below existing entries, so only a strictly higher score gets in
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a record, keeping descending order and the size cap
    /// Returns the rank achieved (1-indexed) or None if it fell off the end
    pub fn add_record(&mut self, name: &str, score: u64, date: String) -> Option<usize> {
        let record = LeaderboardRecord {
            name: normalize_name(name),
            score,
            date,
        };

        // Insert after any equal scores so ties keep insertion order
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record);
        self.entries.truncate(MAX_LEADERBOARD);

        (pos < MAX_LEADERBOARD).then_some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn best_score(&self) -> u64 {
        best_score(&self.entries)
    }

    /// Load from storage; missing or malformed data is an empty board
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Self {
        let entries = persistence::load_leaderboard(store, key);
        if entries.is_empty() {
            log::info!("No leaderboard found, starting fresh");
        } else {
            log::info!("Loaded {} leaderboard records", entries.len());
        }
        Self { entries }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore, key: &str) -> Result<(), StorageError> {
        persistence::save_leaderboard(store, key, &self.entries)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Highest score in the list, 0 when empty
pub fn best_score(records: &[LeaderboardRecord]) -> u64 {
    records.iter().map(|r| r.score).max().unwrap_or(0)
}

/// Trim, cap length and fall back to the default name when blank
fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_PLAYER_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}
