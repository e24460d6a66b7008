//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Hitbox;
pub use difficulty::{gap_height, scroll_speed};
pub use scoring::{abort, terminate};
pub use spawner::jump;
pub use state::{
    Avatar, GameEvent, GamePhase, GameState, GatedObstacle, HitCause, PathHazard, Pickup,
    Playfield, RunState,
};
pub use tick::{TickInput, tick};
