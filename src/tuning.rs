//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Units are pixels and ticks:
//! the simulation advances one fixed step per animation frame, so velocities
//! are pixels/tick and gravity is pixels/tick².

use serde::{Deserialize, Serialize};

/// Balance constants for one run.
///
/// Deserialized with `#[serde(default)]`, so a JSON override only needs the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Avatar ===
    /// Velocity added every active tick
    pub gravity: f32,
    /// Maximum downward velocity
    pub terminal_velocity: f32,
    /// Velocity set (not added) by a jump
    pub jump_impulse: f32,
    /// Avatar hitbox/sprite edge length
    pub avatar_size: f32,
    /// Avatar horizontal position as a fraction of playfield width
    pub avatar_x_fraction: f32,
    /// Degrees of rotation per unit of velocity
    pub rotation_per_velocity: f32,
    pub min_rotation_deg: f32,
    pub max_rotation_deg: f32,

    // === Difficulty ===
    pub base_scroll_speed: f32,
    pub speed_per_point: f32,
    /// Optional ceiling on scroll speed (`None` = uncapped)
    pub max_scroll_speed: Option<f32>,
    pub base_gap: f32,
    pub gap_shrink_per_point: f32,
    pub min_gap: f32,

    // === Gated obstacles ===
    pub obstacle_width: f32,
    /// Minimum distance between a gap and the top/bottom of the playfield
    pub gap_margin: f32,
    /// Spawn once the newest obstacle is this far left of the right edge
    pub obstacle_spawn_distance: f32,

    // === Path hazards ===
    pub hazard_size: f32,
    /// Hazards only spawn once score is strictly greater than this
    pub hazard_min_score: u32,
    pub hazard_spawn_distance: f32,
    pub hazard_probability: f64,
    /// Hazard offset from a gap edge toward the gap centre, as a fraction of half the gap
    pub hazard_inset_min: f32,
    pub hazard_inset_max: f32,

    // === Pickups ===
    pub pickup_size: f32,
    pub pickup_min_score: u32,
    pub pickup_spawn_distance: f32,
    pub pickup_probability: f64,

    // === Lives ===
    pub starting_lives: u8,
    pub max_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.28,
            terminal_velocity: 8.0,
            jump_impulse: -6.5,
            avatar_size: 70.0,
            avatar_x_fraction: 1.0 / 3.0,
            rotation_per_velocity: 3.0,
            min_rotation_deg: -25.0,
            max_rotation_deg: 90.0,

            base_scroll_speed: 1.3,
            speed_per_point: 0.05,
            max_scroll_speed: None,
            base_gap: 350.0,
            gap_shrink_per_point: 5.0,
            min_gap: 250.0,

            obstacle_width: 80.0,
            gap_margin: 150.0,
            obstacle_spawn_distance: 550.0,

            hazard_size: 35.0,
            hazard_min_score: 3,
            hazard_spawn_distance: 400.0,
            hazard_probability: 0.4,
            hazard_inset_min: 0.2,
            hazard_inset_max: 0.5,

            pickup_size: 30.0,
            pickup_min_score: 0,
            pickup_spawn_distance: 1200.0,
            pickup_probability: 0.05,

            starting_lives: 0,
            max_lives: 3,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validate())
    }

    /// Clamp out-of-range values into something the simulation can run with.
    pub fn validate(mut self) -> Self {
        for (name, p) in [
            ("hazard_probability", &mut self.hazard_probability),
            ("pickup_probability", &mut self.pickup_probability),
        ] {
            let value = *p;
            if value.is_nan() || !(0.0..=1.0).contains(&value) {
                log::warn!("{name} = {value} out of range, clamping");
                *p = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
            }
        }
        if self.hazard_inset_min > self.hazard_inset_max {
            log::warn!(
                "hazard_inset_min {} exceeds hazard_inset_max {}, swapping",
                self.hazard_inset_min,
                self.hazard_inset_max
            );
            std::mem::swap(&mut self.hazard_inset_min, &mut self.hazard_inset_max);
        }
        if self.min_gap > self.base_gap {
            log::warn!("min_gap exceeds base_gap, raising base_gap");
            self.base_gap = self.min_gap;
        }
        if self.terminal_velocity < 0.0 {
            log::warn!("terminal_velocity must be positive, flipping sign");
            self.terminal_velocity = -self.terminal_velocity;
        }
        if self.starting_lives > self.max_lives {
            log::warn!("starting_lives exceeds max_lives, capping");
            self.starting_lives = self.max_lives;
        }
        self
    }

    /// Half the avatar's edge length
    #[inline]
    pub fn avatar_half(&self) -> f32 {
        self.avatar_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "max_scroll_speed": 6.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.max_scroll_speed, Some(6.0));
        assert_eq!(tuning.jump_impulse, Tuning::default().jump_impulse);
    }

    #[test]
    fn test_validate_clamps_probabilities() {
        let tuning = Tuning::from_json(r#"{ "hazard_probability": 3.0, "pickup_probability": -1 }"#)
            .unwrap();
        assert_eq!(tuning.hazard_probability, 1.0);
        assert_eq!(tuning.pickup_probability, 0.0);
    }

    #[test]
    fn test_validate_caps_starting_lives() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 9 }"#).unwrap();
        assert_eq!(tuning.starting_lives, tuning.max_lives);
    }

    #[test]
    fn test_validate_repairs_insets_and_terminal_velocity() {
        let tuning = Tuning::from_json(
            r#"{ "hazard_inset_min": 0.5, "hazard_inset_max": 0.2, "terminal_velocity": -8.0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.hazard_inset_min, 0.2);
        assert_eq!(tuning.hazard_inset_max, 0.5);
        assert_eq!(tuning.terminal_velocity, 8.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
