//! Data-driven game balance
//!
//! Every timing and speed constant the engine uses lives here so hosts can
//! tweak difficulty without touching simulation code. Loaded from JSON;
//! missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value for {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speeds (pixels per tick) ===
    /// Player base speed at level 1
    pub player_speed: f32,
    /// Ghost base speed at level 1
    pub ghost_speed: f32,
    /// Multiplier while scared
    pub scared_speed_factor: f32,
    /// Multiplier while returning home as eyes
    pub eaten_speed_factor: f32,

    // === Mode timing (ms) ===
    pub scatter_duration_ms: f64,
    pub chase_duration_ms: f64,
    pub power_pellet_duration_ms: f64,

    // === Ghost AI ===
    /// Probability a scared ghost picks a random valid direction at a decision point
    pub scared_random_ratio: f64,
    /// Maximum nodes A* may expand before giving up
    pub astar_node_budget: usize,
    /// House release delay per ghost (Blinky, Pinky, Inky, Clyde) at level 1
    pub ghost_exit_delays_ms: [f64; 4],
    /// Clyde chases only while farther than this many cells
    pub shy_distance: i32,

    // === Progression ===
    pub starting_lives: u32,
    /// Speed multiplier added per level beyond the first
    pub level_speed_step: f32,
    pub max_speed_multiplier: f32,
    /// Score at which a single bonus life is awarded (0 disables)
    pub extra_life_score: u64,
    /// Game time spent in the level-complete state before the next level starts
    pub level_complete_pause_ms: f64,

    /// Seed for the scared-ghost RNG
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 2.0,
            ghost_speed: 1.8,
            scared_speed_factor: 0.5,
            eaten_speed_factor: 2.0,

            scatter_duration_ms: 7_000.0,
            chase_duration_ms: 20_000.0,
            power_pellet_duration_ms: 6_000.0,

            scared_random_ratio: 0.3,
            astar_node_budget: 80,
            ghost_exit_delays_ms: [0.0, 1_000.0, 3_000.0, 5_000.0],
            shy_distance: 8,

            starting_lives: 3,
            level_speed_step: 0.1,
            max_speed_multiplier: 2.0,
            extra_life_score: 10_000,
            level_complete_pause_ms: 2_000.0,

            seed: 0x5eed,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON text
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from a file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        if !(self.player_speed > 0.0) {
            return invalid("player_speed", "must be positive");
        }
        if !(self.ghost_speed > 0.0) {
            return invalid("ghost_speed", "must be positive");
        }
        if !(self.scared_speed_factor > 0.0) || !(self.eaten_speed_factor > 0.0) {
            return invalid("speed factors", "must be positive");
        }
        if !(self.scatter_duration_ms > 0.0) || !(self.chase_duration_ms > 0.0) {
            return invalid("mode durations", "must be positive");
        }
        if !(self.power_pellet_duration_ms >= 0.0) {
            return invalid("power_pellet_duration_ms", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.scared_random_ratio) {
            return invalid("scared_random_ratio", "must be within 0..=1");
        }
        if self.astar_node_budget == 0 {
            return invalid("astar_node_budget", "must be at least 1");
        }
        if self.ghost_exit_delays_ms.iter().any(|d| !(*d >= 0.0)) {
            return invalid("ghost_exit_delays_ms", "must not be negative");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        if !(self.max_speed_multiplier >= 1.0) {
            return invalid("max_speed_multiplier", "must be at least 1");
        }
        Ok(())
    }
}
