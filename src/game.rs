//! Game session: the single owner of all mutable game state
//!
//! A move runs engine → score → history → spawn → terminal check → save.
//! Storage failures are logged and otherwise ignored; the in-memory state
//! stays authoritative for the life of the process.

use rand_pcg::Pcg32;

use crate::consts::{MOVE_SPAWN_MAX, MOVE_SPAWN_MIN, NEW_GAME_SPAWN_MAX, NEW_GAME_SPAWN_MIN};
use crate::leaderboard::{Leaderboard, LeaderboardRecord};
use crate::persistence::{self, KeyValueStore, StorageError, records};
use crate::platform;
use crate::settings::Settings;
use crate::sim::{
    self, Board, Direction, GameState, MoveResult, RngState, UndoHistory, has_moves_available,
    spawn_count, spawn_tiles,
};

pub struct Game<S: KeyValueStore> {
    state: GameState,
    history: UndoHistory,
    rng: Pcg32,
    store: S,
    settings: Settings,
    leaderboard: Leaderboard,
    best_score: u64,
    /// The finished game's score was already recorded
    score_submitted: bool,
}

impl<S: KeyValueStore> Game<S> {
    /// Resume the persisted session, or start a fresh one
    pub fn new(store: S, settings: Settings) -> Self {
        let seed = settings.resolve_seed();
        log::info!("Session seed: {}", seed);

        let leaderboard = Leaderboard::load(&store, &settings.leaderboard_key);
        let mut game = Self {
            state: GameState::new(),
            history: UndoHistory::new(),
            rng: RngState::new(seed).to_rng(),
            best_score: leaderboard.best_score(),
            leaderboard,
            store,
            settings,
            score_submitted: false,
        };

        match persistence::load_session(&game.store, &game.settings.session_key) {
            Some(restored) => {
                game.state = restored.state;
                if let Some(snapshot) = restored.last_undo {
                    game.history.push(snapshot);
                }
                // A game that was already over when saved can't be submitted again
                game.score_submitted = game.state.is_over;
                log::info!(
                    "Restored session (score {}, over: {})",
                    game.state.score,
                    game.state.is_over
                );
            }
            None => game.start_new_game(),
        }

        game
    }

    /// Clear the board and spawn 1-3 starting tiles
    pub fn start_new_game(&mut self) {
        self.state.reset();
        self.history.clear();
        self.score_submitted = false;

        let count = spawn_count(&mut self.rng, NEW_GAME_SPAWN_MIN, NEW_GAME_SPAWN_MAX);
        spawn_tiles(&mut self.state.board, count, &mut self.rng);
        log::info!("Started new game with {} tiles", count);

        self.persist();
    }

    /// Slide all tiles toward `direction`
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        if self.state.is_over {
            return MoveResult::unmoved();
        }

        let before = self.state.snapshot();
        let outcome = sim::apply_move(&self.state.board, direction);
        if !outcome.moved {
            log::debug!("Move {} blocked", direction.as_str());
            return MoveResult::unmoved();
        }

        self.state.board = outcome.board;
        self.state.score += outcome.score_gained;
        self.history.push(before);

        let count = spawn_count(&mut self.rng, MOVE_SPAWN_MIN, MOVE_SPAWN_MAX);
        let spawned = spawn_tiles(&mut self.state.board, count, &mut self.rng);

        if !has_moves_available(&self.state.board) {
            self.state.is_over = true;
            log::info!("Game over with score {}", self.state.score);
        }

        log::debug!(
            "Move {}: +{} (score {}), spawned {}",
            direction.as_str(),
            outcome.score_gained,
            self.state.score,
            spawned.len()
        );

        self.persist();

        MoveResult {
            moved: true,
            score_gained: outcome.score_gained,
            spawned,
            game_over: self.state.is_over,
        }
    }

    /// Step back one move; false if there is nothing to undo
    pub fn undo(&mut self) -> bool {
        if self.state.is_over {
            return false;
        }
        let Some(snapshot) = self.history.pop() else {
            return false;
        };

        self.state.restore(&snapshot);
        self.persist();
        true
    }

    /// Record the finished game's score under `name`
    ///
    /// Only allowed once per finished game; returns None otherwise.
    pub fn submit_score(&mut self, name: &str) -> Option<Vec<LeaderboardRecord>> {
        if !self.state.is_over || self.score_submitted {
            return None;
        }
        self.score_submitted = true;
        Some(self.add_leaderboard_record(name, self.state.score))
    }

    /// Add a record stamped with the current local time
    pub fn add_leaderboard_record(&mut self, name: &str, score: u64) -> Vec<LeaderboardRecord> {
        self.refresh_leaderboard();

        if let Some(rank) = self
            .leaderboard
            .add_record(name, score, platform::local_timestamp())
        {
            log::info!("New leaderboard entry at rank {}", rank);
        }
        if let Err(e) = self
            .leaderboard
            .save(&mut self.store, &self.settings.leaderboard_key)
        {
            log::warn!("Leaderboard save failed: {}", e);
        }

        if score > self.best_score {
            self.best_score = score;
        }
        self.leaderboard.entries().to_vec()
    }

    /// Write the session now, reporting failure to the caller
    pub fn save(&mut self) -> Result<(), StorageError> {
        persistence::save_session(
            &mut self.store,
            &self.settings.session_key,
            &self.state,
            self.history.top(),
        )
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            log::warn!("Session save failed: {}", e);
        }
    }

    // Pick up the stored list; keep the in-memory copy if storage can't be read
    fn refresh_leaderboard(&mut self) {
        match self.store.get_item(&self.settings.leaderboard_key) {
            Ok(Some(raw)) => {
                self.leaderboard = Leaderboard::from_records(records::decode_leaderboard(&raw));
            }
            Ok(None) => {}
            Err(e) => log::warn!("Leaderboard read failed: {}", e),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }

    pub fn can_undo(&self) -> bool {
        !self.state.is_over && !self.history.is_empty()
    }

    /// Whether the end-of-game score form should be offered
    pub fn can_submit_score(&self) -> bool {
        self.state.is_over && !self.score_submitted
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn max_tile(&self) -> u32 {
        self.state.board.max_tile()
    }

    pub fn leaderboard(&self) -> &[LeaderboardRecord] {
        self.leaderboard.entries()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::HISTORY_DEPTH;
    use crate::persistence::MemoryStore;
    use crate::sim::Position;

    /// Store whose writes always fail
    #[derive(Default)]
    struct FullStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for FullStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "QuotaExceededError".to_string(),
            })
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    fn new_game(seed: u64) -> Game<MemoryStore> {
        Game::new(MemoryStore::new(), Settings::with_seed(seed))
    }

    /// Two 2s in the top-left row, nothing else
    fn set_simple_board(game: &mut Game<MemoryStore>) {
        game.state = GameState {
            board: Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]),
            score: 0,
            is_over: false,
        };
        game.history.clear();
    }

    #[test]
    fn test_new_game_initial_tiles() {
        for seed in 0..50 {
            let game = new_game(seed);
            let tiles = 16 - game.board().empty_cells().len();
            assert!((1..=3).contains(&tiles), "seed {} spawned {}", seed, tiles);
            assert_eq!(game.score(), 0);
            assert!(!game.is_over());
            assert!(!game.can_undo());
        }
    }

    #[test]
    fn test_new_game_is_persisted() {
        let game = new_game(1);
        let board = *game.board();
        let store = game.into_store();
        let restored = persistence::load_session(&store, "gameState2048").unwrap();
        assert_eq!(restored.state.board, board);
        assert!(restored.last_undo.is_none());
    }

    #[test]
    fn test_move_scores_spawns_and_records_history() {
        let mut game = new_game(2);
        set_simple_board(&mut game);

        let result = game.apply_move(Direction::Left);
        assert!(result.moved);
        assert_eq!(result.score_gained, 4);
        assert_eq!(game.score(), 4);
        assert!((1..=2).contains(&result.spawned.len()));
        assert_eq!(game.board().get(Position::new(0, 0)), Some(4));
        assert_eq!(game.history_len(), 1);
        assert!(game.can_undo());

        for pos in &result.spawned {
            assert!(matches!(game.board().get(*pos), Some(2) | Some(4)));
            assert_ne!(*pos, Position::new(0, 0));
        }
    }

    #[test]
    fn test_blocked_move_changes_nothing() {
        let mut game = new_game(3);
        set_simple_board(&mut game);
        game.state.board = Board::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = game.state;

        let result = game.apply_move(Direction::Left);
        assert_eq!(result, MoveResult::unmoved());
        assert_eq!(game.state, before);
        assert_eq!(game.history_len(), 0);
    }

    #[test]
    fn test_undo_restores_exact_snapshot() {
        let mut game = new_game(4);
        set_simple_board(&mut game);
        let before = game.state;

        assert!(game.apply_move(Direction::Left).moved);
        assert!(game.undo());
        assert_eq!(game.state, before);
        assert!(!game.undo());
        assert_eq!(game.state, before);
    }

    #[test]
    fn test_undo_depth_bounded() {
        let mut game = new_game(5);
        let mut states = vec![game.state];

        let mut moves = 0;
        while moves < HISTORY_DEPTH + 5 && !game.is_over() {
            let moved = Direction::ALL.iter().any(|&d| game.apply_move(d).moved);
            if !moved {
                break;
            }
            states.push(game.state);
            moves += 1;
        }
        assert_eq!(moves, HISTORY_DEPTH + 5, "game ended too early for this seed");
        assert_eq!(game.history_len(), HISTORY_DEPTH);

        let mut undone = 0;
        while game.undo() {
            undone += 1;
            assert_eq!(game.state.board, states[states.len() - 1 - undone].board);
        }
        assert_eq!(undone, HISTORY_DEPTH);
        // Earliest retained state is 20 moves back, not the start
        assert_eq!(game.state.board, states[states.len() - 1 - HISTORY_DEPTH].board);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_plays_to_game_over() {
        let mut game = new_game(6);
        for _ in 0..100_000 {
            if game.is_over() {
                break;
            }
            let moved = Direction::ALL.iter().any(|&d| game.apply_move(d).moved);
            assert!(moved || game.is_over());
        }
        assert!(game.is_over());
        assert!(!has_moves_available(game.board()));

        // Terminal: moves and undo are no-ops
        let state = game.state;
        for dir in Direction::ALL {
            assert!(!game.apply_move(dir).moved);
        }
        assert!(!game.undo());
        assert!(!game.can_undo());
        assert_eq!(game.state, state);
    }

    #[test]
    fn test_new_game_resets() {
        let mut game = new_game(7);
        set_simple_board(&mut game);
        game.apply_move(Direction::Left);
        game.state.is_over = true;

        game.start_new_game();
        assert_eq!(game.score(), 0);
        assert!(!game.is_over());
        assert_eq!(game.history_len(), 0);
    }

    #[test]
    fn test_resume_keeps_one_undo_level() {
        let mut game = new_game(8);
        set_simple_board(&mut game);
        game.apply_move(Direction::Left);
        game.apply_move(Direction::Right);
        game.apply_move(Direction::Up);
        let state = game.state;
        assert!(game.history_len() >= 2);

        let store = game.into_store();
        let mut resumed = Game::new(store, Settings::with_seed(9));
        assert_eq!(resumed.state, state);
        assert_eq!(resumed.history_len(), 1);
        assert!(resumed.undo());
        assert!(!resumed.undo());
    }

    #[test]
    fn test_corrupt_session_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set_item("gameState2048", "{\"board\": 5}").unwrap();
        let game = Game::new(store, Settings::with_seed(10));
        assert_eq!(game.score(), 0);
        assert!(!game.board().empty_cells().is_empty());
        // The fresh game overwrote the corrupt record
        assert!(persistence::load_session(game.store(), "gameState2048").is_some());
    }

    #[test]
    fn test_oversized_stored_tiles_start_fresh() {
        let mut store = MemoryStore::new();
        let raw = r#"{"board": [[2147483648,2147483648,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]],
                      "score": 0, "gameOver": false}"#;
        store.set_item("gameState2048", raw).unwrap();

        let mut game = Game::new(store, Settings::with_seed(11));
        assert_eq!(game.score(), 0);
        assert!(game.max_tile() <= 4);
        for dir in Direction::ALL {
            game.apply_move(dir);
        }
        assert!(game.board().is_well_formed());
    }

    #[test]
    fn test_storage_failure_does_not_interrupt_play() {
        let mut game = Game::new(FullStore::default(), Settings::with_seed(11));
        assert!(game.save().is_err());

        let mut moved_any = false;
        for dir in Direction::ALL {
            moved_any |= game.apply_move(dir).moved;
        }
        assert!(moved_any);
        assert!(game.undo());

        let records = game.add_leaderboard_record("ann", 64);
        assert_eq!(records.len(), 1);
        assert_eq!(game.best_score(), 64);
        assert_eq!(game.leaderboard().len(), 1);
    }

    #[test]
    fn test_submit_score_once_after_game_over() {
        let mut game = new_game(12);
        assert!(game.submit_score("early").is_none());

        game.state.score = 1234;
        game.state.is_over = true;
        assert!(game.can_submit_score());

        let records = game.submit_score("").unwrap();
        assert_eq!(records[0].name, "Anonymous");
        assert_eq!(records[0].score, 1234);
        assert_eq!(game.best_score(), 1234);

        assert!(game.submit_score("again").is_none());
        assert!(!game.can_submit_score());
    }

    #[test]
    fn test_restored_finished_game_cannot_submit() {
        let mut game = new_game(13);
        game.state.is_over = true;
        game.state.score = 500;
        game.save().unwrap();

        let resumed = Game::new(game.into_store(), Settings::with_seed(14));
        assert!(resumed.is_over());
        assert!(!resumed.can_submit_score());
    }

    #[test]
    fn test_best_score_from_stored_leaderboard() {
        let mut game = new_game(15);
        game.add_leaderboard_record("a", 300);
        game.add_leaderboard_record("b", 100);

        let resumed = Game::new(game.into_store(), Settings::with_seed(16));
        assert_eq!(resumed.best_score(), 300);
        assert_eq!(resumed.leaderboard().len(), 2);
        assert_eq!(resumed.leaderboard()[0].name, "a");
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = new_game(77);
        let mut b = new_game(77);
        assert_eq!(a.board(), b.board());
        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            assert_eq!(a.apply_move(dir), b.apply_move(dir));
        }
        assert_eq!(a.state(), b.state());
    }
}
