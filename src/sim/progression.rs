//! Difficulty progression: speed grows with distance up to a cap

use crate::tuning::Tuning;

/// Target speed for a travelled distance
#[inline]
pub fn speed_for_distance(tuning: &Tuning, distance: f32) -> f32 {
    (tuning.base_speed + distance.max(0.0) / tuning.speed_scale).min(tuning.max_speed)
}

/// Next speed given the current one. Never lower than `current`, never above
/// the cap.
#[inline]
pub fn next_speed(tuning: &Tuning, current: f32, distance: f32) -> f32 {
    speed_for_distance(tuning, distance)
        .max(current)
        .min(tuning.max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_speed_at_start() {
        let tuning = Tuning::classic();
        assert_eq!(speed_for_distance(&tuning, 0.0), tuning.base_speed);
    }

    #[test]
    fn test_speed_caps() {
        let tuning = Tuning::classic();
        assert_eq!(speed_for_distance(&tuning, 1.0e9), tuning.max_speed);
    }

    #[test]
    fn test_next_speed_never_decreases() {
        let tuning = Tuning::classic();
        let fast = next_speed(&tuning, 300.0, 0.0);
        assert_eq!(fast, 300.0);
        let grown = next_speed(&tuning, tuning.base_speed, 100.0);
        assert!((grown - (tuning.base_speed + 60.0)).abs() < 0.01);
    }
}
