//! Turn-duration formulas
//!
//! The game speeds up as levels advance: the player clock tightens by 10%
//! on each odd level >= 4, the zombie clock on each even level >= 4. The
//! formulas have no natural floor, so the scheduler clamps them with the
//! configurable minimum from [`crate::Settings`].

use crate::consts::{BASE_PLAYER_DURATION_MS, BASE_ZOMBIE_DURATION_MS};

/// Per-level durations for the two turn clocks, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnDurations {
    pub player_ms: f64,
    pub zombie_ms: f64,
}

impl TurnDurations {
    /// Compute the unclamped durations for a 1-based level
    pub fn for_level(level: u32) -> Self {
        Self {
            player_ms: player_turn_duration(level),
            zombie_ms: zombie_turn_duration(level),
        }
    }

    /// Apply the configured lower bound to both clocks
    pub fn clamped(self, floor_ms: f64) -> Self {
        Self {
            player_ms: self.player_ms.max(floor_ms),
            zombie_ms: self.zombie_ms.max(floor_ms),
        }
    }
}

/// Player turn duration: 1000ms through level 3, then 0.9^k where k counts
/// the odd levels in [4, level]
pub fn player_turn_duration(level: u32) -> f64 {
    if level <= 3 {
        return BASE_PLAYER_DURATION_MS;
    }
    let increments = (4..=level).filter(|l| l % 2 == 1).count() as i32;
    1000.0 * 0.9f64.powi(increments)
}

/// Zombie turn duration: 1500/1250/1000ms for levels 1-3, then 0.9^k where
/// k counts the even levels in [4, level]
pub fn zombie_turn_duration(level: u32) -> f64 {
    match level {
        0 | 1 => BASE_ZOMBIE_DURATION_MS,
        2 => 1250.0,
        3 => 1000.0,
        _ => {
            let increments = (4..=level).filter(|l| l % 2 == 0).count() as i32;
            1000.0 * 0.9f64.powi(increments)
        }
    }
}
