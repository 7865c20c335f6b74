//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Poll-driven turn clocks fed caller-supplied time, never a wall clock
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies

pub mod level;
pub mod resolve;
pub mod scheduler;
pub mod speed;
pub mod state;

pub use level::{init_level, powerup_count, swamp_count, zombie_count};
pub use resolve::{complete_level, level_complete, resolve_collisions};
pub use scheduler::TurnScheduler;
pub use speed::{TurnDurations, player_turn_duration, zombie_turn_duration};
pub use state::{
    Direction, GameEvent, GamePhase, GameState, Player, PlayerView, Snapshot, SoundCue, Zombie,
    ZombieView,
};
