//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (ghosts by kind)
//! - No rendering or platform dependencies

pub mod ghost;
pub mod grid;
pub mod layout;
pub mod maze;
pub mod mode;
pub mod movement;
pub mod pathfinding;
pub mod reducer;
pub mod scoring;
pub mod state;
pub mod tick;

pub use ghost::{AiContext, GhostUpdate, chase_target, target_cell, update_ghost};
pub use grid::{Direction, cell_of, cell_origin, is_aligned};
pub use layout::{CLASSIC_MAZE, LevelLayout};
pub use maze::{CellKind, HouseBounds, Maze, MazeError, Mover};
pub use mode::{GlobalMode, ModeScheduler};
pub use pathfinding::{find_path, get_direction_to_target};
pub use reducer::{Action, reduce};
pub use state::{GameEvent, GamePhase, GameState, Ghost, GhostKind, GhostMode, Player};
pub use tick::{TickInput, autopilot_direction, tick};
