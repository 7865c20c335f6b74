//! Zombie Swamp entry point
//!
//! Headless demo: an autoplay bot drives the turn scheduler through a few
//! levels on a simulated clock, with game events routed to the log and the
//! run recorded on the local leaderboard. Rendering and playback stay with
//! external collaborators; this binary stands in for them.

use std::path::Path;

use zombie_swamp::audio::{AudioBackend, AudioManager};
use zombie_swamp::consts::POLL_INTERVAL_MS;
use zombie_swamp::sim::{Direction, GameEvent, GamePhase, GameState, SoundCue, TurnScheduler};
use zombie_swamp::{HighScores, Settings, in_bounds, manhattan};

/// Demo levels to clear before calling it a run
const DEMO_LEVELS: u32 = 3;
/// Hard cap on simulated time (ms) in case the bot stalls out a level
const DEMO_TIME_CAP_MS: f64 = 600_000.0;

/// Stand-in playback backend: cues go to the debug log
struct LogAudio;

impl AudioBackend for LogAudio {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("audio: {cue:?} at volume {volume:.2}");
    }
}

/// Pick the safest adjacent cell: never a swamp or a zombie, keep distance
/// from the horde, drift toward a shield pickup when one is up.
fn choose_move(state: &GameState) -> Option<Direction> {
    let dirs = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    let mut best: Option<(i32, Direction)> = None;
    for dir in dirs {
        let next = state.player.pos + dir.delta();
        if !in_bounds(next) || state.swamp_at(next) || state.zombie_at(next) {
            continue;
        }

        let danger = state
            .zombies
            .iter()
            .map(|z| manhattan(z.pos, next))
            .min()
            .unwrap_or(i32::MAX);
        let pull = state
            .powerups
            .iter()
            .map(|&p| manhattan(p, next))
            .min()
            .unwrap_or(0);

        let score = danger * 4 - pull;
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, dir));
        }
    }

    best.map(|(_, dir)| dir)
}

fn handle_event(event: GameEvent, audio: &mut AudioManager, settings: &Settings) {
    match event {
        GameEvent::Sound(SoundCue::Groan) if !settings.groan_ambience => {}
        GameEvent::Sound(cue) => audio.play(cue),
        GameEvent::Message(text) => log::info!("{text}"),
        GameEvent::ComboPopup { combo } => log::info!("{combo}x COMBO!"),
        GameEvent::ShieldBroken => log::info!("Shield broken!"),
        GameEvent::ExtraLife { lives } => log::info!("Extra life! {lives} remaining"),
        GameEvent::LevelComplete {
            base_score,
            bonus,
            total,
        } => log::info!("Level clear: {base_score} + {bonus} bonus = {total}"),
        GameEvent::GameOver {
            score,
            level,
            zombies_killed,
        } => log::info!("Game over: {score} points, level {level}, {zombies_killed} kills"),
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xD1CE);
    log::info!("Zombie Swamp demo, seed {seed}");

    let settings = Settings::load_or_default(Path::new("settings.json"));
    let mut audio = AudioManager::with_backend(Box::new(LogAudio));
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let mut state = GameState::new(seed);
    let mut scheduler = TurnScheduler::new(settings.min_turn_duration_ms);
    scheduler.start(&mut state, 0.0);

    let mut now = 0.0;
    while now < DEMO_TIME_CAP_MS {
        now += POLL_INTERVAL_MS;

        if scheduler.can_move(now) && state.player.queued_move.is_none() {
            if let Some(dir) = choose_move(&state) {
                scheduler.queue_move(&mut state, dir, now);
            }
        }

        scheduler.poll(&mut state, now);
        for event in state.drain_events() {
            handle_event(event, &mut audio, &settings);
        }

        match state.phase {
            GamePhase::LevelComplete => {
                if state.level >= DEMO_LEVELS {
                    break;
                }
                scheduler.advance_level(&mut state, now);
            }
            GamePhase::GameOver => break,
            _ => {}
        }
    }

    let highscore_path = Path::new("highscores.json");
    let mut scores = HighScores::load_or_default(highscore_path);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    if let Some(rank) = scores.add_score(state.score, state.level, state.zombies_killed, timestamp)
    {
        log::info!("Leaderboard rank {rank}");
        if let Err(err) = scores.save(highscore_path) {
            log::warn!("Failed to save high scores: {err}");
        }
    }

    let snapshot = state.snapshot();
    println!(
        "Run finished: score {} at level {}, {} zombies destroyed over {} turns ({} lives left)",
        snapshot.score, snapshot.level, state.zombies_killed, snapshot.turn, snapshot.lives
    );
}
