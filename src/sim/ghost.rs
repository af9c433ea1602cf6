//! Ghost AI: per-personality targeting and mode-driven steering
//!
//! Every ghost reads the same immutable snapshot of the tick's starting
//! positions, so Inky's dependency on Blinky never sees a half-updated ghost.

use glam::IVec2;
use rand::Rng;

use super::grid::{Direction, cell_origin, is_aligned};
use super::layout::LevelLayout;
use super::maze::{Maze, Mover};
use super::mode::GlobalMode;
use super::movement::{self, is_blocked, is_intersection};
use super::pathfinding::{best_available_direction, get_direction_to_target};
use super::state::{Ghost, GhostKind, GhostMode};
use crate::tuning::Tuning;

/// Read-only view of the world a ghost decides from
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    pub maze: &'a Maze,
    pub layout: &'a LevelLayout,
    pub tuning: &'a Tuning,
    pub player_cell: IVec2,
    pub player_facing: Direction,
    /// All ghosts as they were at the start of the tick
    pub ghosts: &'a [Ghost],
    pub global_mode: GlobalMode,
    pub game_time_ms: f64,
}

/// Outcome of one ghost's update
#[derive(Debug, Clone)]
pub struct GhostUpdate {
    pub ghost: Ghost,
    /// Left the house this tick
    pub released: bool,
    /// Eyes reached the house and rejoined the schedule this tick
    pub revived: bool,
}

/// `n` cells ahead of `cell`. Facing up also shifts `n` cells left, matching the
/// arcade overflow bug.
pub fn ahead_of(cell: IVec2, facing: Direction, n: i32) -> IVec2 {
    match facing {
        Direction::Up => cell + IVec2::new(-n, -n),
        other => cell + other.delta() * n,
    }
}

/// Chase-mode target for each personality
pub fn chase_target(kind: GhostKind, ghost_cell: IVec2, ctx: &AiContext) -> IVec2 {
    let player = ctx.player_cell;
    match kind {
        GhostKind::Blinky => player,
        GhostKind::Pinky => ahead_of(player, ctx.player_facing, 4),
        GhostKind::Inky => {
            let pivot = ahead_of(player, ctx.player_facing, 2);
            match ctx.ghosts.iter().find(|g| g.kind == GhostKind::Blinky) {
                Some(blinky) => {
                    let from = blinky.cell(ctx.maze);
                    from + (pivot - from) * 2
                }
                None => pivot,
            }
        }
        GhostKind::Clyde => {
            if ctx.maze.wrapped_manhattan(ghost_cell, player) > ctx.tuning.shy_distance {
                player
            } else {
                ctx.layout.scatter_corner(kind)
            }
        }
    }
}

/// Point away from the player: the player-to-ghost vector doubled from the player
pub fn flee_target(ghost_cell: IVec2, player_cell: IVec2, maze: &Maze) -> IVec2 {
    maze.clamp_cell(player_cell + (ghost_cell - player_cell) * 2)
}

/// Target cell for a ghost outside the house, clamped into the maze
pub fn target_cell(ghost: &Ghost, ctx: &AiContext) -> IVec2 {
    let cell = ghost.cell(ctx.maze);
    let target = match ghost.mode {
        GhostMode::Eaten => ctx.layout.house_target,
        GhostMode::Scared => flee_target(cell, ctx.player_cell, ctx.maze),
        GhostMode::Scatter => ctx.layout.scatter_corner(ghost.kind),
        GhostMode::Chase => chase_target(ghost.kind, cell, ctx),
    };
    ctx.maze.clamp_cell(target)
}

/// Pick a new direction at a decision point
pub fn choose_direction(ghost: &Ghost, cell: IVec2, target: IVec2, ctx: &AiContext, rng: &mut impl Rng) -> Direction {
    match ghost.mode {
        GhostMode::Scared => {
            let ratio = ctx.tuning.scared_random_ratio.clamp(0.0, 1.0);
            let open = ctx.maze.open_directions(cell, Mover::Ghost);
            if !open.is_empty() && rng.random_bool(ratio) {
                open[rng.random_range(0..open.len())]
            } else {
                best_available_direction(ctx.maze, cell, target, ghost.direction, Mover::Ghost)
            }
        }
        _ => get_direction_to_target(
            ctx.maze,
            cell,
            target,
            ghost.direction,
            Mover::Ghost,
            ctx.tuning.astar_node_budget,
        ),
    }
}

/// Advance one ghost by one tick
pub fn update_ghost(ghost: &Ghost, ctx: &AiContext, rng: &mut impl Rng) -> GhostUpdate {
    let mut next = ghost.clone();
    let mut released = false;
    let mut revived = false;

    if next.in_house {
        if ctx.game_time_ms < next.release_at_ms {
            return GhostUpdate { ghost: next, released, revived };
        }
        next.in_house = false;
        next.pos = cell_origin(ctx.layout.house_exit);
        next.direction = Direction::Left;
        released = true;
    }

    let cell = next.cell(ctx.maze);
    if next.mode == GhostMode::Eaten
        && ctx.maze.house_bounds().is_some_and(|house| house.contains(cell))
    {
        next.mode = ctx.global_mode.into();
        revived = true;
    }

    next.target = target_cell(&next, ctx);

    if is_aligned(next.pos)
        && (is_blocked(ctx.maze, cell, next.direction, Mover::Ghost) || is_intersection(ctx.maze, cell, Mover::Ghost))
    {
        next.direction = choose_direction(&next, cell, next.target, ctx, rng);
    }

    let step = movement::advance(ctx.maze, next.pos, next.direction, next.effective_speed(ctx.tuning), Mover::Ghost);
    next.pos = step.pos;
    next.direction = step.direction;

    GhostUpdate { ghost: next, released, revived }
}
