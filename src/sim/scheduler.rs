//! Turn scheduling
//!
//! Two independent periodic clocks (player turns, zombie turns) polled on a
//! coarse cadence, fully decoupled from whatever render loop the embedder
//! runs. The caller supplies the current time in milliseconds on every call;
//! the core never reads a wall clock, which keeps the whole loop
//! deterministic and testable.
//!
//! A turn fire runs to completion (move, resolve, advance or terminate)
//! before the next clock is examined. Once the phase leaves `Playing`, both
//! clocks, the input window, and the ambient groan timer are dead until the
//! scheduler is re-armed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::level;
use super::resolve;
use super::speed::TurnDurations;
use super::state::{Direction, GameEvent, GamePhase, GameState, SoundCue};
use crate::consts::*;

/// Ambient groan cadence: base delay plus uniform jitter
const GROAN_BASE_MS: f64 = 3000.0;
const GROAN_JITTER_MS: f64 = 2000.0;

/// Drives the player/zombie turn clocks and the input-acceptance window.
///
/// Poll at roughly [`crate::consts::POLL_INTERVAL_MS`]; finer polling only
/// sharpens turn timing.
#[derive(Debug)]
pub struct TurnScheduler {
    running: bool,
    /// Clamped per-level durations, recomputed on every (re)start
    durations: TurnDurations,
    /// Configured floor applied to the speed formulas
    min_turn_duration_ms: f64,
    last_player_turn_ms: f64,
    last_zombie_turn_ms: f64,
    /// Input accepted while `now` is before this deadline
    input_deadline_ms: Option<f64>,
    next_groan_ms: f64,
    /// Jitter source for the groan timer
    rng: Pcg32,
}

impl TurnScheduler {
    pub fn new(min_turn_duration_ms: f64) -> Self {
        Self {
            running: false,
            durations: TurnDurations::for_level(1),
            min_turn_duration_ms,
            last_player_turn_ms: 0.0,
            last_zombie_turn_ms: 0.0,
            input_deadline_ms: None,
            next_groan_ms: 0.0,
            rng: Pcg32::seed_from_u64(0),
        }
    }

    /// Generate the current level and arm both clocks. Used for both the
    /// initial start and every level re-arm.
    pub fn start(&mut self, state: &mut GameState, now_ms: f64) {
        level::init_level(state);
        state.phase = GamePhase::Playing;

        self.durations = TurnDurations::for_level(state.level).clamped(self.min_turn_duration_ms);
        log::info!(
            "Level {}: player turn {:.0}ms, zombie turn {:.0}ms",
            state.level,
            self.durations.player_ms,
            self.durations.zombie_ms
        );

        self.last_player_turn_ms = now_ms;
        self.last_zombie_turn_ms = now_ms;
        // The first window stays open until the first player turn fires
        self.input_deadline_ms = Some(now_ms + self.durations.player_ms);
        self.rng = Pcg32::seed_from_u64(state.seed ^ u64::from(state.level));
        self.next_groan_ms = now_ms + GROAN_BASE_MS + self.rng.random_range(0.0..GROAN_JITTER_MS);
        self.running = true;
    }

    /// Cancel both turn clocks, the input window, and the groan timer
    pub fn stop(&mut self) {
        self.running = false;
        self.input_deadline_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Durations currently in force (clamped)
    pub fn durations(&self) -> TurnDurations {
        self.durations
    }

    /// True while queued input would be accepted
    pub fn can_move(&self, now_ms: f64) -> bool {
        self.running && self.input_deadline_ms.is_some_and(|d| now_ms < d)
    }

    /// Queue a directional intent. Silently dropped outside the acceptance
    /// window; a newer intent overwrites a still-pending one.
    pub fn queue_move(&self, state: &mut GameState, dir: Direction, now_ms: f64) {
        if !self.can_move(now_ms) {
            log::debug!("Input {dir:?} dropped: window closed");
            return;
        }
        state.player.queue_move(dir);
    }

    /// Advance both clocks against `now_ms`, firing at most one turn of
    /// each kind per poll.
    pub fn poll(&mut self, state: &mut GameState, now_ms: f64) {
        if !self.running || !state.is_running() {
            return;
        }

        if now_ms - self.last_player_turn_ms >= self.durations.player_ms {
            self.execute_player_turn(state, now_ms);
            self.last_player_turn_ms = now_ms;
        }

        // A player turn may have ended the level or the run
        if !self.running || !state.is_running() {
            return;
        }

        if now_ms - self.last_zombie_turn_ms >= self.durations.zombie_ms {
            self.execute_zombie_turn(state);
            self.last_zombie_turn_ms = now_ms;
        }

        if !self.running || !state.is_running() {
            return;
        }

        if now_ms >= self.next_groan_ms {
            if !state.zombies.is_empty() {
                state.push_event(GameEvent::Sound(SoundCue::Groan));
            }
            self.next_groan_ms =
                now_ms + GROAN_BASE_MS + self.rng.random_range(0.0..GROAN_JITTER_MS);
        }
    }

    /// The "next level" action from the level-complete screen
    pub fn advance_level(&mut self, state: &mut GameState, now_ms: f64) {
        if state.phase != GamePhase::LevelComplete {
            log::warn!("advance_level ignored in phase {:?}", state.phase);
            return;
        }

        state.level += 1;
        state.combo = 0;

        // Extra life every 5th level
        if state.level % 5 == 0 {
            state.lives += 1;
            state.push_event(GameEvent::ExtraLife { lives: state.lives });
            state.push_event(GameEvent::Message("Extra life earned!".to_string()));
        }

        self.start(state, now_ms);
    }

    fn execute_player_turn(&mut self, state: &mut GameState, now_ms: f64) {
        state.current_turn += 1;

        let playback_rate = (BASE_PLAYER_DURATION_MS / self.durations.player_ms) as f32;
        state.push_event(GameEvent::Sound(SoundCue::Tick { playback_rate }));

        if state.player.execute_move() {
            state.push_event(GameEvent::Sound(SoundCue::Footstep));
        }

        resolve::resolve_collisions(state);

        if state.phase == GamePhase::GameOver {
            self.stop();
            return;
        }
        if resolve::level_complete(state) {
            resolve::complete_level(state);
            self.stop();
            return;
        }

        // Re-open the acceptance window for most of the coming turn
        self.input_deadline_ms =
            Some(now_ms + self.durations.player_ms * INPUT_WINDOW_FRACTION);
    }

    fn execute_zombie_turn(&mut self, state: &mut GameState) {
        let player_pos = state.player.pos;
        for zombie in &mut state.zombies {
            zombie.execute_move(player_pos);
        }

        resolve::resolve_collisions(state);

        if state.phase == GamePhase::GameOver {
            self.stop();
            return;
        }
        if resolve::level_complete(state) {
            resolve::complete_level(state);
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_center;
    use crate::sim::state::Zombie;
    use glam::IVec2;

    const FLOOR_MS: f64 = 150.0;

    /// Start a run, then replace the generated layout with a bare grid so
    /// tests control every entity.
    fn bare_game(seed: u64) -> (TurnScheduler, GameState) {
        let mut state = GameState::new(seed);
        let mut sched = TurnScheduler::new(FLOOR_MS);
        sched.start(&mut state, 0.0);
        state.zombies.clear();
        state.swamps.clear();
        state.powerups.clear();
        state.drain_events();
        (sched, state)
    }

    fn far_zombie() -> Zombie {
        Zombie::new(IVec2::new(0, 0))
    }

    #[test]
    fn test_player_turn_fires_on_cadence() {
        let (mut sched, mut state) = bare_game(1);
        state.zombies.push(far_zombie());

        sched.poll(&mut state, 999.0);
        assert_eq!(state.current_turn, 0);

        sched.poll(&mut state, 1000.0);
        assert_eq!(state.current_turn, 1);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Sound(SoundCue::Tick { .. })
        )));

        // Baseline reset: the next fire is a full duration later
        sched.poll(&mut state, 1500.0);
        assert_eq!(state.current_turn, 1);
        sched.poll(&mut state, 2000.0);
        assert_eq!(state.current_turn, 2);
    }

    #[test]
    fn test_zombie_turn_steps_toward_player() {
        let (mut sched, mut state) = bare_game(1);
        state.zombies.push(Zombie::new(IVec2::new(7, 1)));

        // 1000ms: player turn only
        sched.poll(&mut state, 1000.0);
        assert_eq!(state.zombies[0].pos, IVec2::new(7, 1));

        // 1500ms: zombie closes in along y (player at (7, 7))
        sched.poll(&mut state, 1500.0);
        assert_eq!(state.zombies[0].pos, IVec2::new(7, 2));
        assert_eq!(state.zombies[0].facing, Direction::Down);
    }

    #[test]
    fn test_queued_move_applies_on_next_player_turn() {
        let (mut sched, mut state) = bare_game(1);
        state.zombies.push(far_zombie());

        sched.queue_move(&mut state, Direction::Up, 100.0);
        assert_eq!(state.player.queued_move, Some(Direction::Up));

        sched.poll(&mut state, 1000.0);
        assert_eq!(state.player.pos, grid_center() + IVec2::new(0, -1));
        assert_eq!(state.player.queued_move, None);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundCue::Footstep))
        );
    }

    #[test]
    fn test_input_window_closes_at_ninety_percent() {
        let (mut sched, mut state) = bare_game(1);
        state.zombies.push(far_zombie());

        sched.poll(&mut state, 1000.0);
        // Window spans 90% of the 1000ms player turn
        assert!(sched.can_move(1899.0));
        assert!(!sched.can_move(1900.0));

        sched.queue_move(&mut state, Direction::Left, 1950.0);
        assert_eq!(state.player.queued_move, None, "late input dropped");
    }

    #[test]
    fn test_input_rejected_when_stopped() {
        let (mut sched, mut state) = bare_game(1);
        state.zombies.push(far_zombie());
        sched.stop();

        sched.queue_move(&mut state, Direction::Down, 10.0);
        assert_eq!(state.player.queued_move, None);

        sched.poll(&mut state, 5000.0);
        assert_eq!(state.current_turn, 0, "no turns fire after stop");
    }

    #[test]
    fn test_run_to_first_kill_and_level_complete() {
        // Scenario: one zombie three cells above the player, a swamp in
        // between. Zombie turns at 1500/3000ms walk it onto the swamp.
        let (mut sched, mut state) = bare_game(1);
        state.zombies.push(Zombie::new(IVec2::new(7, 4)));
        state.swamps.push(IVec2::new(7, 6));

        let mut now = 0.0;
        while state.is_running() && now < 10_000.0 {
            now += POLL_INTERVAL_MS;
            sched.poll(&mut state, now);
        }

        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.zombies_killed, 1);
        assert_eq!(state.combo, 1);
        // 100 for the kill, 500 for the level
        assert_eq!(state.score, 600);
        assert!(!sched.is_running());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::Splash)));
        assert!(events.contains(&GameEvent::Sound(SoundCue::Victory)));
    }

    #[test]
    fn test_advance_level_rearms_and_rewards() {
        let (mut sched, mut state) = bare_game(9);
        state.level = 4;
        state.phase = GamePhase::LevelComplete;
        state.combo = 3;
        sched.stop();

        sched.advance_level(&mut state, 2000.0);

        assert_eq!(state.level, 5);
        assert_eq!(state.combo, 0);
        assert_eq!(state.lives, INITIAL_LIVES + 1, "extra life on level 5");
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(sched.is_running());
        assert!(!state.zombies.is_empty(), "new layout generated");
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ExtraLife { .. }))
        );
    }

    #[test]
    fn test_advance_level_ignored_while_playing() {
        let (mut sched, mut state) = bare_game(9);
        state.zombies.push(far_zombie());
        sched.advance_level(&mut state, 500.0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_groan_ambience_fires_while_running() {
        let (mut sched, mut state) = bare_game(3);
        state.zombies.push(far_zombie());

        // Well past base + jitter; a groan must have fired by now
        let mut now = 0.0;
        let mut groaned = false;
        while now < 6000.0 {
            now += POLL_INTERVAL_MS;
            sched.poll(&mut state, now);
            if state
                .drain_events()
                .contains(&GameEvent::Sound(SoundCue::Groan))
            {
                groaned = true;
            }
        }
        assert!(groaned);
    }

    #[test]
    fn test_game_over_stops_scheduler() {
        let (mut sched, mut state) = bare_game(5);
        state.lives = 1;
        state.zombies.push(far_zombie());
        state.swamps.push(grid_center() + IVec2::new(0, -1));

        sched.queue_move(&mut state, Direction::Up, 100.0);
        sched.poll(&mut state, 1000.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!sched.is_running());
        assert!(!sched.can_move(1001.0));
    }

    #[test]
    fn test_faster_levels_report_faster_tick() {
        let mut state = GameState::new(2);
        state.level = 7;
        let mut sched = TurnScheduler::new(FLOOR_MS);
        sched.start(&mut state, 0.0);
        state.drain_events();
        state.zombies.clear();
        state.zombies.push(far_zombie());
        state.swamps.clear();
        state.powerups.clear();

        // Level 7 player turn is 810ms
        sched.poll(&mut state, 810.0);
        let events = state.drain_events();
        let rate = events.iter().find_map(|e| match e {
            GameEvent::Sound(SoundCue::Tick { playback_rate }) => Some(*playback_rate),
            _ => None,
        });
        let rate = rate.expect("tick cue");
        assert!((rate - (1000.0 / 810.0) as f32).abs() < 1e-5);
    }
}
