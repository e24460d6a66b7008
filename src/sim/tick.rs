//! One simulation step
//!
//! Order within a tick: input, avatar physics, scroll, spawn, scoring,
//! collisions, pruning, then the difficulty controller refreshes the scroll
//! speed from the (possibly new) score.

use super::difficulty;
use super::scoring;
use super::spawner;
use super::state::GameState;

/// Input commands gathered between two ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump (pointer-down, Space, ArrowUp)
    pub jump: bool,
    /// Give up the run (Escape)
    pub abort: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_terminal() {
        return;
    }

    if input.abort {
        scoring::abort(state);
        return;
    }
    if input.jump {
        spawner::jump(state);
    }

    // Parked before the first jump
    if !state.is_active() {
        return;
    }
    state.run.ticks += 1;

    spawner::integrate_avatar(state);
    spawner::scroll_entities(state);
    spawner::spawn_entities(state);

    scoring::apply_scoring(state);
    scoring::resolve_collisions(state);
    spawner::prune_entities(state);

    state.run.scroll_speed = difficulty::scroll_speed(&state.tuning, state.run.score);
}
