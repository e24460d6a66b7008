//! Avatar physics and procedural spawning
//!
//! Spawning is distance-paced: a new entity appears once the newest entity of
//! the same kind has scrolled far enough left of the right edge. Pacing is
//! therefore independent of how many frames the host manages per second.

use glam::Vec2;
use rand::Rng;

use super::difficulty;
use super::state::{GameEvent, GamePhase, GameState, GatedObstacle, PathHazard, Pickup};

/// Apply an upward impulse, activating the run on the first call.
///
/// Returns false (and does nothing) once the run has ended.
pub fn jump(state: &mut GameState) -> bool {
    match state.run.phase {
        GamePhase::GameOver => return false,
        GamePhase::AwaitingInput => {
            state.run.phase = GamePhase::Playing;
            log::info!("Run activated");
            state.emit(GameEvent::RunActivated);
        }
        GamePhase::Playing => {}
    }
    state.avatar.velocity = state.tuning.jump_impulse;
    state.emit(GameEvent::Jumped);
    true
}

/// Integrate gravity and derive the cosmetic rotation
pub fn integrate_avatar(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    let t = &state.tuning;
    let avatar = &mut state.avatar;
    avatar.velocity = (avatar.velocity + t.gravity).min(t.terminal_velocity);
    avatar.y += avatar.velocity;
    avatar.rotation = (avatar.velocity * t.rotation_per_velocity)
        .clamp(t.min_rotation_deg, t.max_rotation_deg);
}

/// Move every live entity left by the current scroll speed
pub fn scroll_entities(state: &mut GameState) {
    let dx = state.run.scroll_speed;
    for obstacle in &mut state.obstacles {
        obstacle.x -= dx;
    }
    for hazard in &mut state.hazards {
        hazard.pos.x -= dx;
    }
    for pickup in &mut state.pickups {
        pickup.pos.x -= dx;
    }
}

/// Run all spawners for this tick
pub fn spawn_entities(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    spawn_gated_obstacle(state);
    spawn_path_hazard(state);
    spawn_pickup(state);
}

/// True when the newest entity's position is far enough left of the right edge
#[inline]
fn spawn_window_open(newest_x: Option<f32>, width: f32, distance: f32) -> bool {
    newest_x.is_none_or(|x| x < width - distance)
}

fn spawn_gated_obstacle(state: &mut GameState) {
    let width = state.playfield.width;
    let newest = state.obstacles.last().map(|o| o.x);
    if !spawn_window_open(newest, width, state.tuning.obstacle_spawn_distance) {
        return;
    }

    let gap = difficulty::gap_height(&state.tuning, state.run.score).min(state.playfield.height);
    let min_top = state.tuning.gap_margin;
    let max_top = state.playfield.height - gap - state.tuning.gap_margin;
    let gap_top = if max_top > min_top {
        state.rng.random_range(min_top..max_top)
    } else {
        // Playfield too short for the margins: keep the whole gap on screen
        ((state.playfield.height - gap) / 2.0).max(0.0)
    };

    let id = state.next_entity_id();
    log::debug!("Spawn obstacle {id}: gap {gap_top:.0}+{gap:.0}");
    state.obstacles.push(GatedObstacle {
        id,
        x: width,
        gap_top,
        gap_height: gap,
        width: state.tuning.obstacle_width,
        passed: false,
    });
}

fn spawn_path_hazard(state: &mut GameState) {
    let t = &state.tuning;
    if state.run.score <= t.hazard_min_score {
        return;
    }
    let newest = state.hazards.last().map(|h| h.pos.x - h.size / 2.0);
    if !spawn_window_open(newest, state.playfield.width, t.hazard_spawn_distance) {
        return;
    }
    let Some(anchor) = state.obstacles.last() else {
        return;
    };
    let (gap_top, gap_bottom, gap_center) = (anchor.gap_top, anchor.gap_bottom(), anchor.gap_center());
    let (probability, inset_min, inset_max, size) =
        (t.hazard_probability, t.hazard_inset_min, t.hazard_inset_max, t.hazard_size);

    if !state.rng.random_bool(probability.clamp(0.0, 1.0)) {
        return;
    }
    let top_half = state.rng.random_bool(0.5);
    let inset = inset_min + state.rng.random::<f32>() * (inset_max - inset_min);
    let y = if top_half {
        gap_top + (gap_center - gap_top) * inset
    } else {
        gap_bottom - (gap_bottom - gap_center) * inset
    };

    let id = state.next_entity_id();
    log::debug!("Spawn hazard {id} at y {y:.0}");
    state.hazards.push(PathHazard {
        id,
        pos: Vec2::new(state.playfield.width + size / 2.0, y),
        size,
        passed: false,
    });
}

fn spawn_pickup(state: &mut GameState) {
    let t = &state.tuning;
    if state.run.score < t.pickup_min_score {
        return;
    }
    let newest = state.pickups.last().map(|p| p.pos.x);
    if !spawn_window_open(newest, state.playfield.width, t.pickup_spawn_distance) {
        return;
    }
    let Some(anchor) = state.obstacles.last() else {
        return;
    };
    let y = anchor.gap_center();
    let (probability, size) = (t.pickup_probability, t.pickup_size);

    if !state.rng.random_bool(probability.clamp(0.0, 1.0)) {
        return;
    }
    let id = state.next_entity_id();
    log::debug!("Spawn pickup {id}");
    state.pickups.push(Pickup {
        id,
        pos: Vec2::new(state.playfield.width, y),
        size,
        collected: false,
    });
}

/// Drop entities whose trailing edge left the screen, plus consumed pickups
pub fn prune_entities(state: &mut GameState) {
    state.obstacles.retain(|o| o.right() > 0.0);
    state.hazards.retain(|h| h.right() > 0.0);
    state.pickups.retain(|p| !p.collected && p.right() > 0.0);
}
