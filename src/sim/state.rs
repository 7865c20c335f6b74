//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{grid_center, in_bounds};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level armed (menu / before start)
    Idle,
    /// Active gameplay, turn clocks running
    Playing,
    /// All zombies destroyed, waiting for the next-level action
    LevelComplete,
    /// Run ended
    GameOver,
}

/// One of the four cardinal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit grid delta for this direction (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Named sound cues the core hands to the audio collaborator.
///
/// Playback and synthesis live entirely outside the simulation; a missing
/// audio backend must never stall the turn clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Turn-clock tick; rate > 1.0 means the clock runs faster than level 1
    Tick { playback_rate: f32 },
    /// Zombie sank into a swamp
    Splash,
    /// Player stepped to a new cell
    Footstep,
    /// Player died
    Death,
    /// Level cleared
    Victory,
    /// Run ended
    GameOver,
    /// Chained kill
    Combo { level: u32 },
    /// Shield pickup collected
    Powerup,
    /// Ambient zombie groan
    Groan,
}

/// Discrete events the core emits for its collaborators (renderer HUD,
/// screen manager, audio). Buffered on [`GameState`] and drained per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    Message(String),
    ComboPopup {
        combo: u32,
    },
    ShieldBroken,
    ExtraLife {
        lives: u32,
    },
    LevelComplete {
        base_score: u64,
        bonus: u64,
        total: u64,
    },
    GameOver {
        score: u64,
        level: u32,
        zombies_killed: u32,
    },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
    pub facing: Direction,
    /// At most one pending move; newer input overwrites it
    pub queued_move: Option<Direction>,
    pub shield: bool,
}

impl Player {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            facing: Direction::Down,
            queued_move: None,
            shield: false,
        }
    }

    /// Queue a move for the next player turn, updating facing immediately
    pub fn queue_move(&mut self, dir: Direction) {
        self.facing = dir;
        self.queued_move = Some(dir);
    }

    /// Consume the queued move and apply it. Off-grid moves are dropped
    /// (the player stays put). Returns true if the position changed.
    pub fn execute_move(&mut self) -> bool {
        let Some(dir) = self.queued_move.take() else {
            return false;
        };
        let next = self.pos + dir.delta();
        if in_bounds(next) {
            self.pos = next;
            true
        } else {
            false
        }
    }

    /// Reposition at the grid center (level start / respawn)
    pub fn respawn(&mut self) {
        self.pos = grid_center();
    }
}

/// A pursuing zombie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub pos: IVec2,
    pub facing: Direction,
    pub alive: bool,
    /// Most recent applied move
    pub last_move: Option<Direction>,
}

impl Zombie {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            facing: Direction::Down,
            alive: true,
            last_move: None,
        }
    }

    /// Pursuit AI: step along the axis of greater distance to the player,
    /// preferring x only when strictly greater. Facing updates even when
    /// the chosen step is blocked by the grid edge.
    pub fn plan_move(&mut self, player_pos: IVec2) -> Option<Direction> {
        let dx = player_pos.x - self.pos.x;
        let dy = player_pos.y - self.pos.y;

        if dx.abs() > dy.abs() {
            let dir = if dx > 0 {
                Direction::Right
            } else {
                Direction::Left
            };
            self.facing = dir;
            Some(dir)
        } else if dy.abs() > 0 {
            let dir = if dy > 0 { Direction::Down } else { Direction::Up };
            self.facing = dir;
            Some(dir)
        } else {
            // Already on the player's cell
            None
        }
    }

    /// Plan and apply one pursuit step. Off-grid steps leave the position
    /// unchanged (facing already updated by planning).
    pub fn execute_move(&mut self, player_pos: IVec2) {
        if !self.alive {
            return;
        }
        if let Some(dir) = self.plan_move(player_pos) {
            let next = self.pos + dir.delta();
            if in_bounds(next) {
                self.last_move = Some(dir);
                self.pos = next;
            }
        }
    }
}

/// RNG seed wrapper: level layouts derive from (seed, level) so each level
/// differs while a run stays reproducible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// RNG for one level's generation
    pub fn level_rng(&self, level: u32) -> Pcg32 {
        let stream = u64::from(level).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Pcg32::seed_from_u64(self.seed ^ stream)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Current score
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Remaining lives
    pub lives: u32,
    /// Cumulative kills this run
    pub zombies_killed: u32,
    /// Current kill chain length (0 = no chain)
    pub combo: u32,
    /// Player-turn index of the most recent kill
    pub last_kill_turn: u64,
    /// Player-turn counter, incremented once per player-turn fire
    pub current_turn: u64,
    /// Current phase
    pub phase: GamePhase,
    /// The player
    pub player: Player,
    /// Live zombies (dead ones are removed by the resolver)
    pub zombies: Vec<Zombie>,
    /// Static swamp tiles for this level
    pub swamps: Vec<IVec2>,
    /// Shield pickups remaining on the grid
    pub powerups: Vec<IVec2>,
    /// Pending events for collaborators (not part of the save state)
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run. The grid is empty until the scheduler arms the
    /// first level.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            score: 0,
            level: 1,
            lives: INITIAL_LIVES,
            zombies_killed: 0,
            combo: 0,
            last_kill_turn: 0,
            current_turn: 0,
            phase: GamePhase::Idle,
            player: Player::new(grid_center()),
            zombies: Vec::new(),
            swamps: Vec::new(),
            powerups: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue an event for the collaborators
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True while turn clocks should run
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn swamp_at(&self, pos: IVec2) -> bool {
        self.swamps.contains(&pos)
    }

    pub fn powerup_at(&self, pos: IVec2) -> bool {
        self.powerups.contains(&pos)
    }

    pub fn zombie_at(&self, pos: IVec2) -> bool {
        self.zombies.iter().any(|z| z.pos == pos)
    }

    /// Cell already holds a tile or entity (player checked separately
    /// during generation)
    pub fn occupied(&self, pos: IVec2) -> bool {
        self.swamp_at(pos) || self.powerup_at(pos) || self.zombie_at(pos)
    }

    /// Read-only view for the renderer, taken once per frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: PlayerView {
                pos: self.player.pos,
                facing: self.player.facing,
                shield: self.player.shield,
            },
            zombies: self
                .zombies
                .iter()
                .map(|z| ZombieView {
                    pos: z.pos,
                    facing: z.facing,
                    alive: z.alive,
                })
                .collect(),
            swamps: self.swamps.clone(),
            powerups: self.powerups.clone(),
            turn: self.current_turn,
            score: self.score,
            level: self.level,
            lives: self.lives,
            zombies_remaining: self.zombies.len(),
        }
    }
}

/// Player fields the renderer needs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: IVec2,
    pub facing: Direction,
    pub shield: bool,
}

/// Zombie fields the renderer needs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZombieView {
    pub pos: IVec2,
    pub facing: Direction,
    pub alive: bool,
}

/// Read-only frame snapshot for the renderer/HUD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerView,
    pub zombies: Vec<ZombieView>,
    pub swamps: Vec<IVec2>,
    pub powerups: Vec<IVec2>,
    pub turn: u64,
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub zombies_remaining: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_overwrites_pending() {
        let mut player = Player::new(grid_center());
        player.queue_move(Direction::Up);
        player.queue_move(Direction::Left);
        assert_eq!(player.queued_move, Some(Direction::Left));
        assert_eq!(player.facing, Direction::Left);
    }

    #[test]
    fn test_move_consumed_once() {
        let mut player = Player::new(grid_center());
        player.queue_move(Direction::Right);
        assert!(player.execute_move());
        assert_eq!(player.pos, grid_center() + IVec2::new(1, 0));
        // No queued move left
        assert!(!player.execute_move());
        assert_eq!(player.pos, grid_center() + IVec2::new(1, 0));
    }

    #[test]
    fn test_edge_move_dropped_facing_kept() {
        let mut player = Player::new(IVec2::new(0, 3));
        player.queue_move(Direction::Left);
        assert!(!player.execute_move());
        assert_eq!(player.pos, IVec2::new(0, 3));
        assert_eq!(player.facing, Direction::Left);
        assert_eq!(player.queued_move, None);
    }

    #[test]
    fn test_pursuit_prefers_larger_axis() {
        let mut z = Zombie::new(IVec2::new(0, 0));
        // |dx| = 5 > |dy| = 2 -> step right
        assert_eq!(z.plan_move(IVec2::new(5, 2)), Some(Direction::Right));
        assert_eq!(z.facing, Direction::Right);

        let mut z = Zombie::new(IVec2::new(10, 10));
        // |dx| = 1 < |dy| = 4 -> step up
        assert_eq!(z.plan_move(IVec2::new(9, 6)), Some(Direction::Up));
        assert_eq!(z.facing, Direction::Up);
    }

    #[test]
    fn test_pursuit_tie_goes_to_y_axis() {
        // |dx| == |dy|: x is not strictly greater, so the y branch wins
        let mut z = Zombie::new(IVec2::new(4, 4));
        assert_eq!(z.plan_move(IVec2::new(7, 7)), Some(Direction::Down));

        let mut z = Zombie::new(IVec2::new(4, 4));
        assert_eq!(z.plan_move(IVec2::new(1, 1)), Some(Direction::Up));
    }

    #[test]
    fn test_pursuit_no_move_on_player_cell() {
        let mut z = Zombie::new(IVec2::new(3, 3));
        assert_eq!(z.plan_move(IVec2::new(3, 3)), None);
    }

    #[test]
    fn test_dead_zombie_never_moves() {
        let mut z = Zombie::new(IVec2::new(0, 7));
        z.alive = false;
        z.execute_move(IVec2::new(10, 7));
        assert_eq!(z.pos, IVec2::new(0, 7));
        assert_eq!(z.last_move, None);
    }

    #[test]
    fn test_level_rng_differs_per_level() {
        use rand::Rng;
        let rng_state = RngState::new(42);
        let a: u32 = rng_state.level_rng(1).random();
        let b: u32 = rng_state.level_rng(2).random();
        assert_ne!(a, b);
        // Same (seed, level) reproduces
        let a2: u32 = rng_state.level_rng(1).random();
        assert_eq!(a, a2);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(7);
        state.zombies.push(Zombie::new(IVec2::new(1, 2)));
        state.swamps.push(IVec2::new(5, 5));
        state.score = 300;
        let snap = state.snapshot();
        assert_eq!(snap.zombies_remaining, 1);
        assert_eq!(snap.swamps, vec![IVec2::new(5, 5)]);
        assert_eq!(snap.score, 300);
        assert_eq!(snap.player.pos, grid_center());
    }

    #[test]
    fn test_events_drain_in_order() {
        let mut state = GameState::new(7);
        state.push_event(GameEvent::Sound(SoundCue::Splash));
        state.push_event(GameEvent::ShieldBroken);
        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GameEvent::Sound(SoundCue::Splash));
        assert!(state.drain_events().is_empty());
    }
}
