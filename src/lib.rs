//! Maze Chase - a grid maze chase game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, ghost AI, reducer)
//! - `tuning`: Data-driven game balance
//! - `highscore`: High score storage (LocalStorage / JSON file)
//! - `session`: Fixed-timestep host loop with persistence

pub mod highscore;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscore::{FileStore, HighScoreStore, MemoryStore, StoreError};
pub use session::Session;
pub use sim::{Action, Direction, GameEvent, GamePhase, GameState, TickInput, reduce, tick};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Side of one maze cell in pixels
    pub const CELL_SIZE: f32 = 16.0;

    /// Fixed simulation timestep (60 Hz; agent speeds are pixels per tick)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the host loop will simulate
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Centre distance (pixels) at which the player and a ghost interact
    pub const CONTACT_DISTANCE: f32 = 8.0;
}
