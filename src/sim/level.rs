//! Procedural level generation
//!
//! Rebuilds the grid contents for the current level: swamps, then shield
//! pickups, then zombies held a minimum Manhattan distance from the player.
//! Placement is rejection sampling with a bounded retry budget; an exhausted
//! budget skips that placement, so the banded counts are targets rather than
//! guarantees.

use glam::IVec2;
use rand::Rng;

use super::state::{GameState, Player, Zombie};
use crate::consts::*;
use crate::{grid_center, manhattan};

/// Zombies to spawn for a 1-based level
pub fn zombie_count(level: u32) -> usize {
    let count = if level <= 5 {
        3 + level
    } else if level <= 10 {
        5 + level
    } else if level <= 20 {
        8 + level / 2
    } else {
        15 + level / 3
    };
    count as usize
}

/// Swamps to place: dense early, sparser as the horde grows
pub fn swamp_count(level: u32) -> usize {
    if level <= 5 {
        15
    } else if level <= 10 {
        12
    } else if level <= 20 {
        10
    } else {
        8
    }
}

/// Shield pickups to place
pub fn powerup_count(level: u32) -> usize {
    if level <= 1 { 0 } else { 1 }
}

/// Rebuild all grid contents for `state.level`. The player is recreated at
/// the grid center first, so placements reject its cell.
pub fn init_level(state: &mut GameState) {
    state.swamps.clear();
    state.zombies.clear();
    state.powerups.clear();
    state.player = Player::new(grid_center());

    let mut rng = state.rng_state.level_rng(state.level);

    for _ in 0..swamp_count(state.level) {
        if let Some(pos) = random_empty_cell(state, &mut rng, 0) {
            state.swamps.push(pos);
        }
    }

    for _ in 0..powerup_count(state.level) {
        if let Some(pos) = random_empty_cell(state, &mut rng, 0) {
            state.powerups.push(pos);
        }
    }

    for _ in 0..zombie_count(state.level) {
        if let Some(pos) = random_empty_cell(state, &mut rng, ZOMBIE_SPAWN_DISTANCE) {
            state.zombies.push(Zombie::new(pos));
        }
    }

    log::info!(
        "Level {}: {} zombies, {} swamps, {} pickups",
        state.level,
        state.zombies.len(),
        state.swamps.len(),
        state.powerups.len()
    );
}

/// Sample an unoccupied cell, rejecting the player's cell and (when
/// `min_player_distance` > 0) anything closer than that Manhattan distance.
fn random_empty_cell(
    state: &GameState,
    rng: &mut impl Rng,
    min_player_distance: i32,
) -> Option<IVec2> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let pos = IVec2::new(
            rng.random_range(0..GRID_SIZE),
            rng.random_range(0..GRID_SIZE),
        );

        if state.occupied(pos) || pos == state.player.pos {
            continue;
        }
        if min_player_distance > 0 && manhattan(pos, state.player.pos) < min_player_distance {
            continue;
        }
        return Some(pos);
    }
    None
}
