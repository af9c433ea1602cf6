//! Global scatter/chase scheduler
//!
//! The timer only runs while no power pellet is active; fright mode
//! suspends scatter/chase progress rather than consuming it.

use serde::{Deserialize, Serialize};

use super::state::{Ghost, GhostMode};
use crate::tuning::Tuning;

/// The mode every non-scared, non-eaten ghost follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlobalMode {
    #[default]
    Scatter,
    Chase,
}

impl GlobalMode {
    pub fn flipped(self) -> Self {
        match self {
            GlobalMode::Scatter => GlobalMode::Chase,
            GlobalMode::Chase => GlobalMode::Scatter,
        }
    }
}

impl From<GlobalMode> for GhostMode {
    fn from(mode: GlobalMode) -> Self {
        match mode {
            GlobalMode::Scatter => GhostMode::Scatter,
            GlobalMode::Chase => GhostMode::Chase,
        }
    }
}

/// Current global mode and time spent in it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeScheduler {
    pub mode: GlobalMode,
    pub timer_ms: f64,
}

impl ModeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long the current mode lasts
    pub fn duration_ms(&self, tuning: &Tuning) -> f64 {
        match self.mode {
            GlobalMode::Scatter => tuning.scatter_duration_ms,
            GlobalMode::Chase => tuning.chase_duration_ms,
        }
    }

    /// Advance by `delta_ms` unless frozen. Returns the new mode on a flip;
    /// the timer restarts from zero after each flip.
    pub fn advance(&mut self, delta_ms: f64, frozen: bool, tuning: &Tuning) -> Option<GlobalMode> {
        if frozen {
            return None;
        }
        self.timer_ms += delta_ms;
        if self.timer_ms >= self.duration_ms(tuning) {
            self.mode = self.mode.flipped();
            self.timer_ms = 0.0;
            return Some(self.mode);
        }
        None
    }
}

/// Apply a global flip: ghosts following the schedule switch mode and turn around
pub fn apply_flip(ghosts: &mut [Ghost], mode: GlobalMode) {
    for ghost in ghosts.iter_mut() {
        if ghost.follows_schedule() {
            ghost.mode = mode.into();
            ghost.direction = ghost.direction.opposite();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Direction;
    use crate::sim::state::GhostKind;
    use glam::Vec2;

    #[test]
    fn test_flips_after_exact_durations() {
        let tuning = Tuning::default();
        let mut scheduler = ModeScheduler::new();

        assert_eq!(scheduler.advance(tuning.scatter_duration_ms - 1.0, false, &tuning), None);
        assert_eq!(scheduler.advance(1.0, false, &tuning), Some(GlobalMode::Chase));
        assert_eq!(scheduler.timer_ms, 0.0);

        assert_eq!(scheduler.advance(tuning.chase_duration_ms - 1.0, false, &tuning), None);
        assert_eq!(scheduler.advance(1.0, false, &tuning), Some(GlobalMode::Scatter));
    }

    #[test]
    fn test_cycles_indefinitely() {
        let tuning = Tuning::default();
        let mut scheduler = ModeScheduler::new();
        for _ in 0..10 {
            assert_eq!(scheduler.advance(tuning.scatter_duration_ms, false, &tuning), Some(GlobalMode::Chase));
            assert_eq!(scheduler.advance(tuning.chase_duration_ms, false, &tuning), Some(GlobalMode::Scatter));
        }
    }

    #[test]
    fn test_frozen_does_not_advance() {
        let tuning = Tuning::default();
        let mut scheduler = ModeScheduler::new();
        scheduler.advance(1000.0, false, &tuning);
        assert_eq!(scheduler.advance(1_000_000.0, true, &tuning), None);
        assert_eq!(scheduler.timer_ms, 1000.0);
        assert_eq!(scheduler.mode, GlobalMode::Scatter);
    }

    #[test]
    fn test_flip_reverses_only_scheduled_ghosts() {
        let mut chasing = Ghost::new(GhostKind::Blinky, Vec2::ZERO, 1.0, GhostMode::Scatter, 0.0);
        chasing.in_house = false;
        chasing.direction = Direction::Left;
        let mut scared = chasing.clone();
        scared.mode = GhostMode::Scared;
        let mut eaten = chasing.clone();
        eaten.mode = GhostMode::Eaten;

        let mut ghosts = vec![chasing, scared, eaten];
        apply_flip(&mut ghosts, GlobalMode::Chase);

        assert_eq!(ghosts[0].mode, GhostMode::Chase);
        assert_eq!(ghosts[0].direction, Direction::Right);
        assert_eq!(ghosts[1].mode, GhostMode::Scared);
        assert_eq!(ghosts[1].direction, Direction::Left);
        assert_eq!(ghosts[2].mode, GhostMode::Eaten);
        assert_eq!(ghosts[2].direction, Direction::Left);
    }
}
