//! Collision and combat resolution
//!
//! Runs once after every player-turn or zombie-turn move application, in a
//! fixed order:
//!
//! 1. zombies standing on a swamp sink (each kill feeds combo scoring)
//! 2. player standing on a swamp dies (short-circuits the rest of the pass)
//! 3. zombies on the player's cell: shield absorbs them, otherwise death
//! 4. player standing on a pickup collects it

use super::state::{GameEvent, GamePhase, GameState, SoundCue};
use crate::consts::*;

pub fn resolve_collisions(state: &mut GameState) {
    // Zombies sink into swamps
    let before = state.zombies.len();
    {
        let swamps = &state.swamps;
        state.zombies.retain_mut(|z| {
            if swamps.contains(&z.pos) {
                z.alive = false;
                false
            } else {
                true
            }
        });
    }
    let drowned = before - state.zombies.len();
    for _ in 0..drowned {
        record_kill(state);
    }

    // Player in a swamp: lethal, and nothing else is adjudicated this pass
    if state.swamp_at(state.player.pos) {
        player_death(state, "You stepped into a swamp!");
        return;
    }

    // Zombies on the player's cell
    if state.zombie_at(state.player.pos) {
        if state.player.shield {
            state.player.shield = false;
            let player_pos = state.player.pos;
            state.zombies.retain(|z| z.pos != player_pos);
            state.push_event(GameEvent::ShieldBroken);
        } else {
            player_death(state, "A zombie got you!");
            return;
        }
    }

    // Shield pickup
    if let Some(idx) = state.powerups.iter().position(|&p| p == state.player.pos) {
        state.powerups.remove(idx);
        state.player.shield = true;
        state.push_event(GameEvent::Sound(SoundCue::Powerup));
        state.push_event(GameEvent::Message("Shield acquired!".to_string()));
    }
}

/// Combo and score accounting for one destroyed zombie
fn record_kill(state: &mut GameState) {
    state.zombies_killed += 1;

    if state.current_turn - state.last_kill_turn <= COMBO_CHAIN_TURNS {
        state.combo += 1;
        if state.combo >= 2 {
            state.push_event(GameEvent::ComboPopup { combo: state.combo });
            state.push_event(GameEvent::Sound(SoundCue::Combo { level: state.combo }));
        }
    } else {
        state.combo = 1;
    }
    state.last_kill_turn = state.current_turn;

    let points =
        (ZOMBIE_KILL_POINTS as f64 * COMBO_MULTIPLIER.powi(state.combo as i32 - 1)).floor() as u64;
    state.score += points;
    log::debug!(
        "Zombie down on turn {}: +{} (combo {})",
        state.current_turn,
        points,
        state.combo
    );

    state.push_event(GameEvent::Sound(SoundCue::Splash));
}

/// Lose a life; respawn at center or end the run
fn player_death(state: &mut GameState, message: &str) {
    state.push_event(GameEvent::Sound(SoundCue::Death));
    state.lives = state.lives.saturating_sub(1);

    if state.lives == 0 {
        game_over(state);
    } else {
        state.push_event(GameEvent::Message(message.to_string()));
        state.player.respawn();
        log::info!("Player died ({message}), {} lives left", state.lives);
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::Sound(SoundCue::GameOver));
    state.push_event(GameEvent::GameOver {
        score: state.score,
        level: state.level,
        zombies_killed: state.zombies_killed,
    });
    log::info!(
        "Game over: score {} at level {} ({} kills)",
        state.score,
        state.level,
        state.zombies_killed
    );
}

/// The level is complete exactly when no zombies remain, however many
/// swamps are left
pub fn level_complete(state: &GameState) -> bool {
    state.zombies.is_empty()
}

/// Award the completion bonus and park the run until the next-level action
pub fn complete_level(state: &mut GameState) {
    state.phase = GamePhase::LevelComplete;
    let base_score = state.score;
    state.score += LEVEL_COMPLETE_BONUS;
    state.push_event(GameEvent::Sound(SoundCue::Victory));
    state.push_event(GameEvent::LevelComplete {
        base_score,
        bonus: LEVEL_COMPLETE_BONUS,
        total: state.score,
    });
    log::info!("Level {} complete, score {}", state.level, state.score);
}
