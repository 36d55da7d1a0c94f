//! Session and leaderboard record codecs
//!
//! Session record:
//! `{ "board": int[4][4], "score": int, "gameOver": bool,
//!    "lastUndo": { "board": int[4][4], "score": int } | null }`
//!
//! Leaderboard record: `[{ "name": string, "score": int, "date": string }]`
//!
//! Reads are lenient: anything malformed is treated as absent. A usable
//! board is the only hard requirement of a session; `score` and `gameOver`
//! of the wrong type fall back to numeric and truthy readings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::StorageError;
use super::store::KeyValueStore;
use crate::consts::MAX_LEADERBOARD;
use crate::leaderboard::LeaderboardRecord;
use crate::sim::{Board, GameState, Snapshot};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecordOut {
    board: Vec<Vec<u32>>,
    score: u64,
    game_over: bool,
    last_undo: Option<UndoRecordOut>,
}

#[derive(Debug, Serialize)]
struct UndoRecordOut {
    board: Vec<Vec<u32>>,
    score: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecordIn {
    #[serde(default)]
    board: Option<Vec<Vec<u32>>>,
    #[serde(default)]
    score: Option<Value>,
    #[serde(default)]
    game_over: Option<Value>,
    /// Decoded separately so a bad undo entry doesn't sink the session
    #[serde(default)]
    last_undo: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UndoRecordIn {
    board: Vec<Vec<u32>>,
    #[serde(default)]
    score: Option<Value>,
}

/// Non-negative whole score, 0 for anything else
fn lenient_score(value: Option<&Value>) -> u64 {
    let Some(n) = value.and_then(Value::as_number) else {
        return 0;
    };
    match (n.as_u64(), n.as_f64()) {
        (Some(v), _) => v,
        (None, Some(f)) if f.is_finite() && f > 0.0 => f.floor() as u64,
        _ => 0,
    }
}

/// Loose truthiness: zero, empty strings and null are false
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// A session read back from storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoredSession {
    pub state: GameState,
    /// At most one undo level survives a restart
    pub last_undo: Option<Snapshot>,
}

/// Encode the session plus its most recent undo snapshot
pub fn encode_session(state: &GameState, history_top: Option<&Snapshot>) -> Result<String, StorageError> {
    let record = SessionRecordOut {
        board: state.board.to_nested(),
        score: state.score,
        game_over: state.is_over,
        last_undo: history_top.map(|s| UndoRecordOut {
            board: s.board.to_nested(),
            score: s.score,
        }),
    };
    Ok(serde_json::to_string(&record)?)
}

/// Decode a session record, `None` if it is unusable
pub fn decode_session(raw: &str) -> Option<RestoredSession> {
    let record: SessionRecordIn = serde_json::from_str(raw).ok()?;
    let board = Board::from_nested(record.board.as_deref()?)?;

    let last_undo = record
        .last_undo
        .and_then(|v| serde_json::from_value::<UndoRecordIn>(v).ok())
        .and_then(|u| {
            Board::from_nested(&u.board).map(|board| Snapshot {
                board,
                score: lenient_score(u.score.as_ref()),
            })
        });

    Some(RestoredSession {
        state: GameState {
            board,
            score: lenient_score(record.score.as_ref()),
            is_over: truthy(record.game_over.as_ref()),
        },
        last_undo,
    })
}

pub fn save_session(
    store: &mut dyn KeyValueStore,
    key: &str,
    state: &GameState,
    history_top: Option<&Snapshot>,
) -> Result<(), StorageError> {
    let json = encode_session(state, history_top)?;
    store.set_item(key, &json)
}

/// Load the persisted session; corrupt or missing data yields `None`
pub fn load_session(store: &dyn KeyValueStore, key: &str) -> Option<RestoredSession> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Session read failed: {}", e);
            return None;
        }
    };

    let restored = decode_session(&raw);
    if restored.is_none() {
        log::info!("Discarding malformed session record");
    }
    restored
}

pub fn save_leaderboard(
    store: &mut dyn KeyValueStore,
    key: &str,
    records: &[LeaderboardRecord],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(records)?;
    store.set_item(key, &json)
}

/// Decode a leaderboard list, sorted descending and capped
///
/// Entries that aren't records are skipped; a non-array yields an empty list.
pub fn decode_leaderboard(raw: &str) -> Vec<LeaderboardRecord> {
    let Ok(items) = serde_json::from_str::<Vec<Value>>(raw) else {
        return Vec::new();
    };

    let mut records: Vec<LeaderboardRecord> = items
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    // Stable: equal scores keep stored order
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records.truncate(MAX_LEADERBOARD);
    records
}

pub fn load_leaderboard(store: &dyn KeyValueStore, key: &str) -> Vec<LeaderboardRecord> {
    match store.get_item(key) {
        Ok(Some(raw)) => decode_leaderboard(&raw),
        Ok(None) => Vec::new(),
        Err(e) => {
            log::warn!("Leaderboard read failed: {}", e);
            Vec::new()
        }
    }
}
