//! Grid-aligned movement and collision
//!
//! Agents travel in straight lines between cell boundaries. A single step
//! never crosses a boundary: it stops exactly on it, so every agent passes
//! through an aligned position where turning and wall checks happen. Walls
//! are tested only there; leaving an aligned position is only allowed toward
//! an open cell, so an agent can never overlap a wall.

use glam::{IVec2, Vec2};

use super::grid::{ALIGN_EPSILON, Direction, cell_of, is_aligned, is_coord_aligned, snap_to_grid};
use super::maze::{Maze, Mover};
use crate::consts::{CELL_SIZE, CONTACT_DISTANCE};

/// Result of advancing one agent by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub pos: Vec2,
    /// `None` when the agent stopped against a wall
    pub direction: Direction,
    /// The agent passed through the horizontal tunnel this step
    pub wrapped: bool,
}

/// Pick the direction to travel this tick: the desired one if the agent is
/// aligned and the cell that way is open, otherwise the current one.
pub fn try_turn(maze: &Maze, pos: Vec2, current: Direction, desired: Direction, mover: Mover) -> Direction {
    if desired == Direction::None || desired == current {
        return current;
    }
    if !is_aligned(pos) {
        return current;
    }
    let cell = maze.wrap_cell(cell_of(snap_to_grid(pos)));
    if maze.is_passable(maze.neighbor(cell, desired), mover) {
        desired
    } else {
        current
    }
}

/// True when the cell ahead in `direction` can't be entered
pub fn is_blocked(maze: &Maze, cell: IVec2, direction: Direction, mover: Mover) -> bool {
    direction == Direction::None || !maze.is_passable(maze.neighbor(cell, direction), mover)
}

/// More than two open neighbors
pub fn is_intersection(maze: &Maze, cell: IVec2, mover: Mover) -> bool {
    maze.open_directions(cell, mover).len() > 2
}

/// Wrap x through the tunnel. Returns the new position and whether it wrapped;
/// y is never touched.
pub fn wrap_horizontal(maze: &Maze, pos: Vec2) -> (Vec2, bool) {
    let width = maze.pixel_width();
    if pos.x < 0.0 {
        (Vec2::new(pos.x + width, pos.y), true)
    } else if pos.x >= width {
        (Vec2::new(pos.x - width, pos.y), true)
    } else {
        (pos, false)
    }
}

/// Bring a position back inside the maze: x wraps, y clamps
pub fn clamp_to_maze(maze: &Maze, pos: Vec2) -> Vec2 {
    let max_y = (maze.height() - 1).max(0) as f32 * CELL_SIZE;
    let x = if pos.x.is_finite() { pos.x.rem_euclid(maze.pixel_width()) } else { 0.0 };
    let y = if pos.y.is_finite() { pos.y.clamp(0.0, max_y) } else { 0.0 };
    Vec2::new(x, y)
}

/// Pixels left until the next cell boundary along a direction
fn distance_to_boundary(coord: f32, positive: bool) -> f32 {
    let rem = coord.rem_euclid(CELL_SIZE);
    let on_boundary = rem < ALIGN_EPSILON || CELL_SIZE - rem < ALIGN_EPSILON;
    match (on_boundary, positive) {
        (true, _) => CELL_SIZE,
        (false, true) => CELL_SIZE - rem,
        (false, false) => rem,
    }
}

/// Advance an agent by up to `speed` pixels in `direction`
pub fn advance(maze: &Maze, pos: Vec2, direction: Direction, speed: f32, mover: Mover) -> Step {
    let mut pos = clamp_to_maze(maze, pos);
    if direction == Direction::None || speed <= 0.0 {
        return Step { pos, direction, wrapped: false };
    }

    // The off-axis coordinate must sit on the grid line being travelled
    if direction.is_horizontal() && !is_coord_aligned(pos.y) {
        pos.y = (pos.y / CELL_SIZE).round() * CELL_SIZE;
    } else if direction.is_vertical() && !is_coord_aligned(pos.x) {
        pos.x = (pos.x / CELL_SIZE).round() * CELL_SIZE;
    }

    if is_aligned(pos) {
        pos = snap_to_grid(pos);
        let cell = maze.wrap_cell(cell_of(pos));
        if is_blocked(maze, cell, direction, mover) {
            let (pos, _) = wrap_horizontal(maze, pos);
            return Step {
                pos,
                direction: Direction::None,
                wrapped: false,
            };
        }
    }

    let positive = matches!(direction, Direction::Right | Direction::Down);
    let coord = if direction.is_horizontal() { pos.x } else { pos.y };
    let remaining = distance_to_boundary(coord, positive);

    let next = if speed >= remaining - ALIGN_EPSILON {
        let boundary = coord + if positive { remaining } else { -remaining };
        (boundary / CELL_SIZE).round() * CELL_SIZE
    } else {
        coord + if positive { speed } else { -speed }
    };
    if direction.is_horizontal() {
        pos.x = next;
    } else {
        pos.y = next;
    }

    let (pos, wrapped) = wrap_horizontal(maze, pos);
    Step { pos, direction, wrapped }
}

/// Whether two agents overlap enough to interact, measured through the tunnel
pub fn agents_touch(maze: &Maze, a: Vec2, b: Vec2) -> bool {
    let width = maze.pixel_width();
    let dx = (a.x - b.x).abs();
    let dx = dx.min(width - dx);
    let dy = (a.y - b.y).abs();
    Vec2::new(dx, dy).length() < CONTACT_DISTANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::cell_origin;
    use crate::sim::layout::LevelLayout;
    use crate::sim::maze::CellKind;
    use proptest::prelude::*;

    fn classic() -> Maze {
        LevelLayout::classic().maze
    }

    #[test]
    fn test_moves_along_open_corridor() {
        let maze = classic();
        let start = cell_origin(IVec2::new(1, 1));
        let step = advance(&maze, start, Direction::Right, 2.0, Mover::Player);
        assert_eq!(step.pos, start + Vec2::new(2.0, 0.0));
        assert_eq!(step.direction, Direction::Right);
    }

    #[test]
    fn test_stops_at_wall() {
        let maze = classic();
        // (1,1) has a wall above it
        let start = cell_origin(IVec2::new(1, 1));
        let step = advance(&maze, start, Direction::Up, 2.0, Mover::Player);
        assert_eq!(step.pos, start);
        assert_eq!(step.direction, Direction::None);
    }

    #[test]
    fn test_step_never_overshoots_boundary() {
        let maze = classic();
        let start = cell_origin(IVec2::new(1, 1)) + Vec2::new(15.0, 0.0);
        let step = advance(&maze, start, Direction::Right, 4.0, Mover::Player);
        assert_eq!(step.pos, cell_origin(IVec2::new(2, 1)));
        assert!(is_aligned(step.pos));
    }

    #[test]
    fn test_turn_requires_alignment() {
        let maze = classic();
        // (6,5) is a crossing: open left/right and down
        let aligned = cell_origin(IVec2::new(6, 5));
        assert_eq!(
            try_turn(&maze, aligned, Direction::Right, Direction::Down, Mover::Player),
            Direction::Down
        );
        let off_grid = aligned + Vec2::new(2.0, 0.0);
        assert_eq!(
            try_turn(&maze, off_grid, Direction::Right, Direction::Down, Mover::Player),
            Direction::Right
        );
        // Even a reversal waits for the next boundary
        assert_eq!(
            try_turn(&maze, off_grid, Direction::Right, Direction::Left, Mover::Player),
            Direction::Right
        );
    }

    #[test]
    fn test_turn_into_wall_keeps_current() {
        let maze = classic();
        let pos = cell_origin(IVec2::new(1, 1));
        assert_eq!(try_turn(&maze, pos, Direction::Right, Direction::Up, Mover::Player), Direction::Right);
    }

    #[test]
    fn test_player_blocked_by_house_door() {
        let maze = classic();
        // Door cells (13,12)/(14,12) sit under (13,11)
        let pos = cell_origin(IVec2::new(13, 11));
        assert!(is_blocked(&maze, IVec2::new(13, 11), Direction::Down, Mover::Player));
        assert!(!is_blocked(&maze, IVec2::new(13, 11), Direction::Down, Mover::Ghost));
        let step = advance(&maze, pos, Direction::Down, 2.0, Mover::Player);
        assert_eq!(step.direction, Direction::None);
    }

    #[test]
    fn test_tunnel_wraps_left_to_right() {
        let maze = classic();
        let y = 14.0 * CELL_SIZE;
        let step = advance(&maze, Vec2::new(0.0, y), Direction::Left, 2.0, Mover::Player);
        assert!(step.wrapped);
        assert_eq!(step.pos, Vec2::new(maze.pixel_width() - 2.0, y));
        assert_eq!(step.direction, Direction::Left);
    }

    #[test]
    fn test_tunnel_wraps_right_to_left() {
        let maze = classic();
        let y = 14.0 * CELL_SIZE;
        let start = Vec2::new(maze.pixel_width() - 1.0, y);
        let step = advance(&maze, start, Direction::Right, 2.0, Mover::Player);
        assert!(step.wrapped);
        assert_eq!(step.pos, Vec2::new(0.0, y));
    }

    #[test]
    fn test_clamp_recovers_desynced_position() {
        let maze = classic();
        let pos = clamp_to_maze(&maze, Vec2::new(-5.0, 10_000.0));
        assert!(pos.x >= 0.0 && pos.x < maze.pixel_width());
        assert_eq!(pos.y, (maze.height() - 1) as f32 * CELL_SIZE);
        assert_eq!(clamp_to_maze(&maze, Vec2::new(f32::NAN, 3.0)), Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_intersection_detection() {
        let maze = classic();
        assert!(is_intersection(&maze, IVec2::new(6, 5), Mover::Player));
        // Straight corridor
        assert!(!is_intersection(&maze, IVec2::new(3, 5), Mover::Player));
    }

    #[test]
    fn test_agents_touch_across_tunnel() {
        let maze = classic();
        let y = 14.0 * CELL_SIZE;
        assert!(agents_touch(&maze, Vec2::new(1.0, y), Vec2::new(maze.pixel_width() - 1.0, y)));
        assert!(!agents_touch(&maze, Vec2::new(0.0, y), Vec2::new(CELL_SIZE * 2.0, y)));
    }

    proptest! {
        #[test]
        fn prop_walls_never_entered(
            moves in prop::collection::vec((0usize..4, 1u32..40), 1..30),
            speed in 0.5f32..6.0,
        ) {
            let maze = classic();
            let mut pos = cell_origin(IVec2::new(13, 23));
            let mut dir = Direction::None;
            for (choice, ticks) in moves {
                let desired = Direction::ALL[choice];
                for _ in 0..ticks {
                    dir = try_turn(&maze, pos, dir, desired, Mover::Player);
                    let step = advance(&maze, pos, dir, speed, Mover::Player);
                    pos = step.pos;
                    dir = step.direction;
                    let cell = maze.wrap_cell(cell_of(pos));
                    prop_assert!(maze.is_passable(cell, Mover::Player), "entered {:?} at {:?}", maze.cell(cell), cell);
                    // The far edge of the sprite must not overlap a wall either
                    let far = maze.wrap_cell(cell_of(pos + Vec2::splat(CELL_SIZE - 0.01)));
                    prop_assert_ne!(maze.cell(far), CellKind::Wall);
                }
            }
        }

        #[test]
        fn prop_tunnel_preserves_row(speed in 0.5f32..8.0) {
            let maze = classic();
            let y = 14.0 * CELL_SIZE;
            let mut pos = Vec2::new(3.0 * CELL_SIZE, y);
            let mut wrapped = false;
            for _ in 0..200 {
                let step = advance(&maze, pos, Direction::Left, speed, Mover::Player);
                prop_assert_eq!(step.pos.y, y);
                prop_assert_eq!(step.direction, Direction::Left);
                wrapped |= step.wrapped;
                pos = step.pos;
                if wrapped && pos.x < maze.pixel_width() - 3.0 * CELL_SIZE {
                    break;
                }
            }
            prop_assert!(wrapped);
        }
    }
}
