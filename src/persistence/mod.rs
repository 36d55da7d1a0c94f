//! Save/load of session and leaderboard records
//!
//! Features:
//! - Pluggable key-value backends (memory, files, LocalStorage)
//! - Lenient decoding: malformed records read as absent
//! - Explicit `StorageError` results; callers decide whether to ignore them

pub mod error;
pub mod records;
pub mod store;

pub use error::StorageError;
pub use records::{
    RestoredSession, load_leaderboard, load_session, save_leaderboard, save_session,
};
pub use store::{KeyValueStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;
