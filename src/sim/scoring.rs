//! Collision resolution and scoring rules
//!
//! Deterministic: no RNG is touched here. Every `passed`/`collected` flag is a
//! one-way latch, so re-evaluating the same state never repeats a side effect.

use super::collision::{self, Hitbox};
use super::state::{GameEvent, GamePhase, GameState, HitCause};

fn avatar_hitbox(state: &GameState) -> Hitbox {
    Hitbox::new(state.avatar_center(), state.tuning.avatar_size)
}

/// Latch `passed` on everything the avatar has cleared; obstacles score once each
pub fn apply_scoring(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    let avatar_x = state.avatar_x();
    let mut cleared = 0;
    for obstacle in &mut state.obstacles {
        if !obstacle.passed && obstacle.right() < avatar_x {
            obstacle.passed = true;
            cleared += 1;
        }
    }
    for _ in 0..cleared {
        state.run.score += 1;
        let score = state.run.score;
        state.emit(GameEvent::Scored { score });
    }

    let behind = avatar_hitbox(state).left();
    for hazard in &mut state.hazards {
        if !hazard.passed && hazard.right() < behind {
            hazard.passed = true;
        }
    }
}

fn first_obstacle_hit(state: &GameState) -> Option<usize> {
    let hitbox = avatar_hitbox(state);
    state
        .obstacles
        .iter()
        .position(|o| collision::hits_gated_obstacle(&hitbox, o))
}

fn first_hazard_hit(state: &GameState) -> Option<usize> {
    let hitbox = avatar_hitbox(state);
    state
        .hazards
        .iter()
        .position(|h| !h.passed && collision::hits_hazard(&hitbox, h))
}

/// Spend a life for a hit, or end the run when none are left.
///
/// Returns true if the run continues.
fn absorb_hit(state: &mut GameState, cause: HitCause) -> bool {
    if state.run.lives > 0 {
        state.run.lives -= 1;
        let lives_left = state.run.lives;
        log::debug!("Hit {cause:?}, {lives_left} lives left");
        state.emit(GameEvent::LifeLost { cause, lives_left });
        true
    } else {
        log::info!("Hit {cause:?} with no lives left");
        terminate(state);
        false
    }
}

/// Evaluate every collision for the current tick and apply its consequences.
///
/// Stops at the first fatal hit; nothing after it is evaluated.
pub fn resolve_collisions(state: &mut GameState) {
    if !state.is_active() {
        return;
    }

    while let Some(index) = first_obstacle_hit(state) {
        if !absorb_hit(state, HitCause::Obstacle) {
            return;
        }
        state.obstacles.remove(index);
    }

    if collision::out_of_bounds(&avatar_hitbox(state), state.playfield.height) {
        if !absorb_hit(state, HitCause::Boundary) {
            return;
        }
        let center = state.playfield.center_y();
        state.avatar.recenter(center);
    }

    while let Some(index) = first_hazard_hit(state) {
        if !absorb_hit(state, HitCause::Hazard) {
            return;
        }
        state.hazards.remove(index);
    }

    let hitbox = avatar_hitbox(state);
    let max_lives = state.tuning.max_lives;
    let mut gained = Vec::new();
    for pickup in &mut state.pickups {
        if pickup.collected || !collision::touches_pickup(&hitbox, pickup) {
            continue;
        }
        pickup.collected = true;
        if state.run.lives < max_lives {
            state.run.lives += 1;
            gained.push(state.run.lives);
        }
    }
    for lives in gained {
        state.emit(GameEvent::LifeGained { lives });
    }
}

/// One-way transition to `GameOver`. Returns false if the run had already ended.
pub fn terminate(state: &mut GameState) -> bool {
    if state.is_terminal() {
        return false;
    }
    state.run.phase = GamePhase::GameOver;
    let score = state.run.score;
    log::info!("Run over, final score {score}");
    state.emit(GameEvent::GameOver { score });
    true
}

/// Player gave up: end the run right now with the current score
pub fn abort(state: &mut GameState) -> bool {
    terminate(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner;
    use crate::sim::state::{GatedObstacle, PathHazard, Pickup, Playfield};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn playing(lives: u8) -> GameState {
        let tuning = Tuning {
            starting_lives: lives,
            ..Default::default()
        };
        let mut state = GameState::new(1, Playfield::new(1200.0, 800.0), tuning);
        spawner::jump(&mut state);
        state.avatar.velocity = 0.0;
        state.drain_events();
        state
    }

    /// Obstacle overlapping the avatar (x = 400) with the gap well below it
    fn blocking_obstacle(id: u32) -> GatedObstacle {
        GatedObstacle {
            id,
            x: 380.0,
            gap_top: 500.0,
            gap_height: 250.0,
            width: 80.0,
            passed: false,
        }
    }

    fn game_overs(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count()
    }

    #[test]
    fn test_score_latches_once() {
        let mut state = playing(0);
        state.obstacles.push(GatedObstacle {
            x: 300.0,
            ..blocking_obstacle(1)
        });
        apply_scoring(&mut state);
        assert_eq!(state.run.score, 1);
        assert!(state.obstacles[0].passed);

        // Same state evaluated again: nothing changes
        apply_scoring(&mut state);
        apply_scoring(&mut state);
        assert_eq!(state.run.score, 1);
        assert_eq!(state.drain_events(), vec![GameEvent::Scored { score: 1 }]);
    }

    #[test]
    fn test_trailing_edge_on_avatar_does_not_score() {
        let mut state = playing(0);
        state.obstacles.push(GatedObstacle {
            x: 320.0,
            ..blocking_obstacle(1)
        });
        apply_scoring(&mut state);
        assert_eq!(state.run.score, 0);
    }

    #[test]
    fn test_fatal_obstacle_hit() {
        let mut state = playing(0);
        state.run.score = 7;
        state.obstacles.push(blocking_obstacle(1));
        resolve_collisions(&mut state);
        assert!(state.is_terminal());
        assert_eq!(state.run.score, 7);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::GameOver { score: 7 }]);
    }

    #[test]
    fn test_life_absorbs_obstacle_hit() {
        let mut state = playing(2);
        state.run.score = 4;
        state.obstacles.push(blocking_obstacle(1));
        resolve_collisions(&mut state);
        assert!(state.is_active());
        assert_eq!(state.run.lives, 1);
        assert_eq!(state.run.score, 4);
        assert!(state.obstacles.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LifeLost {
                cause: HitCause::Obstacle,
                lives_left: 1
            }]
        );
    }

    #[test]
    fn test_each_overlapping_obstacle_costs_a_life() {
        let mut state = playing(1);
        state.obstacles.push(blocking_obstacle(1));
        state.obstacles.push(blocking_obstacle(2));
        resolve_collisions(&mut state);
        assert!(state.is_terminal());
        assert_eq!(state.run.lives, 0);
        assert_eq!(game_overs(&state.drain_events()), 1);
    }

    #[test]
    fn test_boundary_hit_recenters() {
        let mut state = playing(1);
        state.avatar.y = 790.0;
        state.avatar.velocity = 8.0;
        resolve_collisions(&mut state);
        assert!(state.is_active());
        assert_eq!(state.run.lives, 0);
        assert_eq!(state.avatar.y, 400.0);
        assert_eq!(state.avatar.velocity, 0.0);
    }

    #[test]
    fn test_boundary_hit_without_lives_ends_run() {
        let mut state = playing(0);
        state.avatar.y = 20.0;
        resolve_collisions(&mut state);
        assert!(state.is_terminal());
        assert_eq!(state.avatar.y, 20.0);
    }

    #[test]
    fn test_hazard_hit_removes_hazard() {
        let mut state = playing(1);
        state.hazards.push(PathHazard {
            id: 5,
            pos: Vec2::new(410.0, 410.0),
            size: 35.0,
            passed: false,
        });
        resolve_collisions(&mut state);
        assert!(state.hazards.is_empty());
        assert_eq!(state.run.lives, 0);
        assert!(state.is_active());

        state.hazards.push(PathHazard {
            id: 6,
            pos: Vec2::new(390.0, 380.0),
            size: 35.0,
            passed: false,
        });
        resolve_collisions(&mut state);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_pickup_at_cap_is_collected_without_effect() {
        let mut state = playing(3);
        state.pickups.push(Pickup {
            id: 9,
            pos: Vec2::new(400.0, 400.0),
            size: 30.0,
            collected: false,
        });
        resolve_collisions(&mut state);
        assert_eq!(state.run.lives, 3);
        assert!(state.pickups[0].collected);
        assert!(state.drain_events().is_empty());

        spawner::prune_entities(&mut state);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_pickup_grants_life() {
        let mut state = playing(0);
        state.pickups.push(Pickup {
            id: 9,
            pos: Vec2::new(420.0, 390.0),
            size: 30.0,
            collected: false,
        });
        resolve_collisions(&mut state);
        assert_eq!(state.run.lives, 1);
        assert_eq!(state.run.score, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::LifeGained { lives: 1 }]);

        // Latched: a second pass does not grant again
        resolve_collisions(&mut state);
        assert_eq!(state.run.lives, 1);
    }

    #[test]
    fn test_terminate_is_one_way() {
        let mut state = playing(0);
        assert!(abort(&mut state));
        assert!(!abort(&mut state));
        assert!(!terminate(&mut state));
        assert_eq!(game_overs(&state.drain_events()), 1);

        // Nothing is evaluated after the run ended
        state.obstacles.push(blocking_obstacle(1));
        resolve_collisions(&mut state);
        apply_scoring(&mut state);
        assert!(state.drain_events().is_empty());
    }
}
