//! Point table and level progression curves
//!
//! Pure functions only; the reducer decides when to call them.

use crate::tuning::Tuning;

pub const DOT_POINTS: u64 = 10;
pub const POWER_PELLET_POINTS: u64 = 50;
/// Ghost values by streak position within one power-pellet window
pub const GHOST_POINTS: [u64; 4] = [200, 400, 800, 1600];
pub const LEVEL_BONUS_STEP: u64 = 1000;

/// Points for the next ghost eaten, capped at the last table entry
pub fn ghost_points(streak: u32) -> u64 {
    let idx = (streak as usize).min(GHOST_POINTS.len() - 1);
    GHOST_POINTS[idx]
}

/// Bonus awarded on entering `level`
pub fn level_bonus(level: u32) -> u64 {
    LEVEL_BONUS_STEP * u64::from(level.saturating_sub(1))
}

/// Agent speed multiplier for a level: `min(1 + step * (level - 1), cap)`
pub fn speed_multiplier(level: u32, tuning: &Tuning) -> f32 {
    let extra = tuning.level_speed_step * level.saturating_sub(1) as f32;
    (1.0 + extra).min(tuning.max_speed_multiplier)
}

/// House release delay for a ghost on a given level; shrinks as levels speed up
pub fn exit_delay_for_level(base_ms: f64, level: u32, tuning: &Tuning) -> f64 {
    base_ms / f64::from(speed_multiplier(level, tuning))
}

/// True when a score change crosses the bonus-life threshold
pub fn crosses_extra_life(before: u64, after: u64, threshold: u64) -> bool {
    threshold > 0 && before < threshold && after >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_points_cap() {
        let awarded: Vec<u64> = (0..6).map(ghost_points).collect();
        assert_eq!(awarded, vec![200, 400, 800, 1600, 1600, 1600]);
    }

    #[test]
    fn test_level_bonus() {
        assert_eq!(level_bonus(1), 0);
        assert_eq!(level_bonus(2), 1000);
        assert_eq!(level_bonus(5), 4000);
    }

    #[test]
    fn test_speed_multiplier_is_capped() {
        let tuning = Tuning::default();
        assert_eq!(speed_multiplier(1, &tuning), 1.0);
        assert!((speed_multiplier(3, &tuning) - 1.2).abs() < 1e-6);
        assert_eq!(speed_multiplier(11, &tuning), 2.0);
        assert_eq!(speed_multiplier(50, &tuning), 2.0);
    }

    #[test]
    fn test_exit_delay_shrinks() {
        let tuning = Tuning::default();
        let l1 = exit_delay_for_level(3000.0, 1, &tuning);
        let l5 = exit_delay_for_level(3000.0, 5, &tuning);
        assert_eq!(l1, 3000.0);
        assert!(l5 < l1);
    }

    #[test]
    fn test_extra_life_threshold() {
        assert!(crosses_extra_life(9_990, 10_000, 10_000));
        assert!(!crosses_extra_life(10_000, 10_010, 10_000));
        assert!(!crosses_extra_life(0, 50_000, 0));
    }
}
