//! Tile Merge entry point
//!
//! The web build is driven from JavaScript through `tile_merge::web`.
//! Natively this runs a headless autoplayer against a file-backed store,
//! so a session can be resumed across runs.
//!
//! Usage: `tile-merge [play [MAX_MOVES] [NAME] | show | leaderboard | new]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let settings = tile_merge::Settings::from_env();
    let store = match tile_merge::persistence::FileStore::open(&settings.data_dir) {
        Ok(store) => Box::new(store) as Box<dyn tile_merge::KeyValueStore>,
        Err(e) => {
            log::warn!("{} - falling back to in-memory storage", e);
            Box::new(tile_merge::MemoryStore::new())
        }
    };
    let mut game = tile_merge::Game::new(store, settings);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("play") => {
            let max_moves = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(usize::MAX);
            let name = args.get(2).map(String::as_str).unwrap_or("");
            native::autoplay(&mut game, max_moves, name);
        }
        Some("show") => native::print_game(&game),
        Some("leaderboard") => native::print_leaderboard(game.leaderboard()),
        Some("new") => {
            game.start_new_game();
            native::print_game(&game);
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: tile-merge [play [MAX_MOVES] [NAME] | show | leaderboard | new]");
            std::process::exit(2);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is tile_merge::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use tile_merge::sim::{self, Direction};
    use tile_merge::{Game, KeyValueStore, LeaderboardRecord};

    /// Greedy autoplayer: take the direction with the largest immediate gain
    pub fn autoplay<S: KeyValueStore>(game: &mut Game<S>, max_moves: usize, name: &str) {
        if game.is_over() {
            log::info!("Saved game is over, starting a new one");
            game.start_new_game();
        }

        let mut moves = 0;
        while moves < max_moves && !game.is_over() {
            let Some(dir) = pick_direction(game.board()) else {
                break;
            };
            let result = game.apply_move(dir);
            if result.moved {
                moves += 1;
            }
        }

        println!("Played {} moves", moves);
        print_game(game);

        if game.is_over() {
            if let Some(records) = game.submit_score(name) {
                println!();
                print_leaderboard(&records);
            }
        }
    }

    fn pick_direction(board: &sim::Board) -> Option<Direction> {
        Direction::ALL
            .iter()
            .map(|&dir| (dir, sim::apply_move(board, dir)))
            .filter(|(_, outcome)| outcome.moved)
            .max_by_key(|(_, outcome)| (outcome.score_gained, outcome.board.empty_cells().len()))
            .map(|(dir, _)| dir)
    }

    pub fn print_game<S: KeyValueStore>(game: &Game<S>) {
        println!(
            "Score: {}  Best: {}{}",
            game.score(),
            game.best_score(),
            if game.is_over() { "  (game over)" } else { "" }
        );
        for row in game.board().rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { ".".to_string() } else { v.to_string() })
                .map(|s| format!("{:>5}", s))
                .collect();
            println!("{}", cells.join(""));
        }
    }

    pub fn print_leaderboard(records: &[LeaderboardRecord]) {
        if records.is_empty() {
            println!("No records yet");
            return;
        }
        for (i, record) in records.iter().enumerate() {
            println!(
                "{:>2}. {:<20} {:>8}  {}",
                i + 1,
                record.name,
                record.score,
                record.date
            );
        }
    }
}
