//! Run state and entity model
//!
//! Everything a run mutates lives in [`GameState`]. It is owned by exactly one
//! caller and handed to input handling and ticking by `&mut`, so there is no
//! shared mutable state between the input surface and the frame loop.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::tuning::Tuning;

/// Playfield dimensions in pixels, captured at run start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Fixed horizontal position of the avatar's centre
    pub fn avatar_x(&self, tuning: &Tuning) -> f32 {
        self.width * tuning.avatar_x_fraction
    }

    /// Vertical centre, where the avatar starts and respawns
    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Avatar is parked, waiting for the first jump ("tap to start")
    AwaitingInput,
    /// Physics, spawning and collisions are live
    Playing,
    /// Run ended; nothing advances any more
    GameOver,
}

/// The player avatar. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avatar {
    /// Centre y (screen coordinates, down is positive)
    pub y: f32,
    /// Pixels per tick, positive is falling
    pub velocity: f32,
    /// Cosmetic tilt in degrees, derived from velocity
    pub rotation: f32,
}

impl Avatar {
    pub fn new(y: f32) -> Self {
        Self {
            y,
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    /// Put the avatar back at `y` with no motion
    pub fn recenter(&mut self, y: f32) {
        self.y = y;
        self.velocity = 0.0;
    }
}

/// An obstacle pair with a vertical gap the avatar must fly through
#[derive(Debug, Clone, PartialEq)]
pub struct GatedObstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_top: f32,
    pub gap_height: f32,
    pub width: f32,
    /// Set once the avatar has cleared this obstacle; scores exactly once
    pub passed: bool,
}

impl GatedObstacle {
    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap_height / 2.0
    }
}

/// A small hazard placed inside a gap
#[derive(Debug, Clone, PartialEq)]
pub struct PathHazard {
    pub id: u32,
    /// Centre
    pub pos: Vec2,
    pub size: f32,
    /// Set once the hazard is fully behind the avatar
    pub passed: bool,
}

impl PathHazard {
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }
}

/// A life token
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: u32,
    /// Centre
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
}

impl Pickup {
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }
}

/// What the avatar ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    Obstacle,
    Hazard,
    Boundary,
}

/// Side effects produced by the simulation, drained by the host once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// First jump of the run moved the phase to `Playing`
    RunActivated,
    Jumped,
    Scored { score: u32 },
    LifeLost { cause: HitCause, lives_left: u8 },
    LifeGained { lives: u8 },
    /// Terminal transition; emitted exactly once per run
    GameOver { score: u32 },
}

/// Per-run counters
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    /// Never decreases within a run
    pub score: u32,
    /// Extra lives, bounded by `Tuning::max_lives`
    pub lives: u8,
    /// Derived from `score` by the difficulty controller every tick
    pub scroll_speed: f32,
    pub phase: GamePhase,
    /// Active ticks simulated so far
    pub ticks: u64,
}

impl RunState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives.min(tuning.max_lives),
            scroll_speed: super::difficulty::scroll_speed(tuning, 0),
            phase: GamePhase::AwaitingInput,
            ticks: 0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the spawner RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub avatar: Avatar,
    pub run: RunState,
    /// Spawn order, oldest (leftmost) first
    pub obstacles: Vec<GatedObstacle>,
    pub hazards: Vec<PathHazard>,
    pub pickups: Vec<Pickup>,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, playfield: Playfield, tuning: Tuning) -> Self {
        Self {
            seed,
            run: RunState::new(&tuning),
            avatar: Avatar::new(playfield.center_y()),
            tuning,
            playfield,
            obstacles: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Discard the current run and start over on a (possibly resized) playfield
    pub fn reset(&mut self, seed: u64, playfield: Playfield) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(seed, playfield, tuning);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn avatar_x(&self) -> f32 {
        self.playfield.avatar_x(&self.tuning)
    }

    /// Avatar centre as a point
    pub fn avatar_center(&self) -> Vec2 {
        Vec2::new(self.avatar_x(), self.avatar.y)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.run.is_active()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.run.is_terminal()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_awaits_input() {
        let state = GameState::new(7, Playfield::new(1200.0, 800.0), Tuning::default());
        assert_eq!(state.run.phase, GamePhase::AwaitingInput);
        assert_eq!(state.avatar.y, 400.0);
        assert_eq!(state.run.lives, 0);
        assert!(state.obstacles.is_empty());
        assert!((state.avatar_x() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset_keeps_tuning_and_resizes() {
        let tuning = Tuning {
            starting_lives: 2,
            ..Default::default()
        };
        let mut state = GameState::new(1, Playfield::new(800.0, 600.0), tuning);
        state.run.score = 12;
        state.run.phase = GamePhase::GameOver;
        state.emit(GameEvent::Jumped);

        state.reset(2, Playfield::new(1000.0, 700.0));
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run.lives, 2);
        assert_eq!(state.run.phase, GamePhase::AwaitingInput);
        assert_eq!(state.avatar.y, 350.0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_entity_ids_are_sequential() {
        let mut state = GameState::new(1, Playfield::new(800.0, 600.0), Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_eq!(b, a + 1);
    }
}
