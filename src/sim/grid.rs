//! Grid geometry shared by every simulation module
//!
//! Positions are pixels (`Vec2`), cells are integer grid coordinates
//! (`IVec2`). Row 0 is the top of the maze, so `Up` is negative y.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::CELL_SIZE;

/// Tolerance used when deciding whether a pixel coordinate sits on a cell boundary
pub const ALIGN_EPSILON: f32 = 1e-3;

/// Traversal direction of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All real directions in tie-break order
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    /// Unit step in grid coordinates
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::None => IVec2::ZERO,
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Unit step in pixel space
    #[inline]
    pub fn vector(self) -> Vec2 {
        self.delta().as_vec2()
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::None => Direction::None,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Grid cell containing a pixel position (`floor(pixel / CELL_SIZE)`)
#[inline]
pub fn cell_of(pos: Vec2) -> IVec2 {
    (pos / CELL_SIZE).floor().as_ivec2()
}

/// Pixel position of a cell's aligned origin
#[inline]
pub fn cell_origin(cell: IVec2) -> Vec2 {
    cell.as_vec2() * CELL_SIZE
}

/// True when a single coordinate lies on a cell boundary
#[inline]
pub fn is_coord_aligned(coord: f32) -> bool {
    let rem = coord.rem_euclid(CELL_SIZE);
    rem < ALIGN_EPSILON || CELL_SIZE - rem < ALIGN_EPSILON
}

/// Both coordinates on a cell boundary; the only place an agent may turn
#[inline]
pub fn is_aligned(pos: Vec2) -> bool {
    is_coord_aligned(pos.x) && is_coord_aligned(pos.y)
}

/// Nearest grid-aligned position
#[inline]
pub fn snap_to_grid(pos: Vec2) -> Vec2 {
    (pos / CELL_SIZE).round() * CELL_SIZE
}

/// Plain Manhattan distance between two cells
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
