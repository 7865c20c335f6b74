//! Zombie Swamp - a grid-based swamp survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic turn simulation (scheduling, pursuit AI, collisions, progression)
//! - `audio`: Sound cue routing to an optional playback backend
//! - `settings`: Player preferences
//! - `highscores`: Persistent leaderboard

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Grid is GRID_SIZE x GRID_SIZE tiles
    pub const GRID_SIZE: i32 = 15;
    /// Scheduler poll resolution in milliseconds
    pub const POLL_INTERVAL_MS: f64 = 50.0;
    /// Player turn duration at level 1 (milliseconds)
    pub const BASE_PLAYER_DURATION_MS: f64 = 1000.0;
    /// Zombie turn duration at level 1 (milliseconds)
    pub const BASE_ZOMBIE_DURATION_MS: f64 = 1500.0;
    /// Starting lives
    pub const INITIAL_LIVES: u32 = 3;
    /// Points for a zombie kill before the combo multiplier
    pub const ZOMBIE_KILL_POINTS: u64 = 100;
    /// Bonus awarded on level completion
    pub const LEVEL_COMPLETE_BONUS: u64 = 500;
    /// Multiplier applied per chained kill
    pub const COMBO_MULTIPLIER: f64 = 1.5;
    /// Kills at most this many player turns apart chain into a combo
    pub const COMBO_CHAIN_TURNS: u64 = 2;
    /// Fraction of the player turn during which input is accepted
    pub const INPUT_WINDOW_FRACTION: f64 = 0.9;
    /// Minimum Manhattan distance between a spawned zombie and the player
    pub const ZOMBIE_SPAWN_DISTANCE: i32 = 3;
    /// Attempts per random placement before giving up
    pub const PLACEMENT_ATTEMPTS: u32 = 100;
}

/// Center cell of the grid (player spawn/respawn point)
#[inline]
pub fn grid_center() -> IVec2 {
    IVec2::splat(consts::GRID_SIZE / 2)
}

/// True if the cell lies on the grid
#[inline]
pub fn in_bounds(pos: IVec2) -> bool {
    pos.x >= 0 && pos.x < consts::GRID_SIZE && pos.y >= 0 && pos.y < consts::GRID_SIZE
}

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
