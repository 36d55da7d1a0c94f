//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock timestamps (leaderboard dates)
//! - Seed entropy

/// Timestamp format for leaderboard records
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, formatted for display
///
/// On wasm32 chrono reads the browser clock and timezone.
pub fn local_timestamp() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Fresh seed from the OS (crypto.getRandomValues on the web)
pub fn entropy_seed() -> u64 {
    rand::random()
}
