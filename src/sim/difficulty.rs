//! Difficulty curve
//!
//! Pure functions of score. Nothing here is stored independently of the
//! score it was computed from.

use crate::tuning::Tuning;

/// Horizontal scroll speed (pixels/tick) for a given score
pub fn scroll_speed(tuning: &Tuning, score: u32) -> f32 {
    let speed = tuning.base_scroll_speed + score as f32 * tuning.speed_per_point;
    match tuning.max_scroll_speed {
        Some(cap) => speed.min(cap),
        None => speed,
    }
}

/// Vertical gap size for a newly spawned obstacle
pub fn gap_height(tuning: &Tuning, score: u32) -> f32 {
    (tuning.base_gap - score as f32 * tuning.gap_shrink_per_point).max(tuning.min_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_values() {
        let tuning = Tuning::default();
        assert!((scroll_speed(&tuning, 0) - 1.3).abs() < 1e-6);
        assert!((scroll_speed(&tuning, 10) - 1.8).abs() < 1e-5);
        assert_eq!(gap_height(&tuning, 0), 350.0);
        assert_eq!(gap_height(&tuning, 10), 300.0);
        assert_eq!(gap_height(&tuning, 20), 250.0);
        assert_eq!(gap_height(&tuning, 500), 250.0);
    }

    #[test]
    fn test_speed_cap() {
        let tuning = Tuning {
            max_scroll_speed: Some(3.0),
            ..Default::default()
        };
        assert_eq!(scroll_speed(&tuning, 1_000), 3.0);
        assert!(scroll_speed(&tuning, 1) < 3.0);
    }

    proptest! {
        #[test]
        fn gap_is_non_increasing_and_bounded(score in 0u32..100_000) {
            let tuning = Tuning::default();
            let now = gap_height(&tuning, score);
            let next = gap_height(&tuning, score + 1);
            prop_assert!(next <= now);
            prop_assert!(now >= tuning.min_gap);
        }

        #[test]
        fn speed_is_monotonic(score in 0u32..100_000) {
            let tuning = Tuning::default();
            prop_assert!(scroll_speed(&tuning, score + 1) >= scroll_speed(&tuning, score));
        }
    }
}
