//! Browser bindings
//!
//! Exposes the session to the page script. Rendering, input wiring and
//! overlays stay in JavaScript; they call these methods and re-render from
//! the query surface.

use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::persistence::{KeyValueStore, LocalStorage, MemoryStore};
use crate::settings::Settings;
use crate::sim::{Direction, MoveResult};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<Box<dyn KeyValueStore>>,
}

#[wasm_bindgen]
impl WebGame {
    /// Resume from LocalStorage, or play unsaved if it's unavailable
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{} - progress will not be saved", e);
                Box::new(MemoryStore::new())
            }
        };
        WebGame {
            game: Game::new(store, Settings::default()),
        }
    }

    #[wasm_bindgen(js_name = startNewGame)]
    pub fn start_new_game(&mut self) {
        self.game.start_new_game();
    }

    /// Direction is one of "up", "down", "left", "right"
    ///
    /// Returns the move result as JSON; unknown directions are a no-op.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, direction: &str) -> String {
        let result = match Direction::from_str(direction) {
            Some(dir) => self.game.apply_move(dir),
            None => MoveResult::unmoved(),
        };
        serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn undo(&mut self) -> bool {
        self.game.undo()
    }

    /// Save the finished game's score; false if not allowed
    #[wasm_bindgen(js_name = submitScore)]
    pub fn submit_score(&mut self, name: &str) -> bool {
        self.game.submit_score(name).is_some()
    }

    #[wasm_bindgen(js_name = addLeaderboardRecord)]
    pub fn add_leaderboard_record(&mut self, name: &str, score: f64) {
        self.game.add_leaderboard_record(name, score.max(0.0) as u64);
    }

    /// Row-major board, 16 cells
    pub fn board(&self) -> Vec<u32> {
        self.game.board().to_flat()
    }

    pub fn score(&self) -> f64 {
        self.game.score() as f64
    }

    #[wasm_bindgen(js_name = bestScore)]
    pub fn best_score(&self) -> f64 {
        self.game.best_score() as f64
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.game.can_undo()
    }

    #[wasm_bindgen(js_name = canSubmitScore)]
    pub fn can_submit_score(&self) -> bool {
        self.game.can_submit_score()
    }

    /// Leaderboard as a JSON array of `{name, score, date}`
    #[wasm_bindgen(js_name = leaderboardJson)]
    pub fn leaderboard_json(&self) -> String {
        serde_json::to_string(self.game.leaderboard()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
