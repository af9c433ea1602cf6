//! Fixed timestep simulation tick
//!
//! Composes reducer actions the way a host loop dispatches them once per
//! frame: toggles first, then time, player, consumption, contacts, ghosts.

use glam::IVec2;

use super::grid::Direction;
use super::maze::{CellKind, Mover};
use super::movement::agents_touch;
use super::pathfinding::get_direction_to_target;
use super::reducer::{Action, reduce};
use super::state::{GamePhase, GameState, GhostMode};

/// Ghosts closer than this (in cells) make the autopilot run
const AUTOPILOT_DANGER_RADIUS: i32 = 4;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested direction (keyboard/swipe)
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
    /// Start a new game
    pub restart: bool,
    pub toggle_sound: bool,
    /// Demo mode - the player steers itself
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(mut state: GameState, input: &TickInput, delta_ms: f64) -> GameState {
    state.events.clear();

    if input.restart {
        state = reduce(state, Action::Restart);
    }
    if input.toggle_sound {
        state = reduce(state, Action::ToggleSound);
    }
    if input.pause {
        match state.phase {
            GamePhase::Playing => return reduce(state, Action::Pause),
            GamePhase::Paused => state = reduce(state, Action::Resume),
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return state,
        GamePhase::LevelComplete => {
            state = reduce(state, Action::UpdateGameTime(delta_ms));
            if state.phase_timer_ms >= state.tuning.level_complete_pause_ms {
                state = reduce(state, Action::NextLevel);
            }
            return state;
        }
        GamePhase::Playing => {}
    }

    let direction = if input.autopilot {
        Some(autopilot_direction(&state))
    } else {
        input.direction
    };
    if let Some(dir) = direction {
        state = reduce(state, Action::SetDirection(dir));
    }

    state = reduce(state, Action::UpdateGameTime(delta_ms));
    state = reduce(state, Action::MovePlayer);

    let cell = state.player_cell();
    match state.maze.cell(cell) {
        CellKind::Dot => state = reduce(state, Action::EatDot(cell)),
        CellKind::PowerPellet => state = reduce(state, Action::EatPowerPellet(cell)),
        _ => {}
    }

    state = resolve_contacts(state);
    state = reduce(state, Action::UpdateGhosts);
    resolve_contacts(state)
}

/// Player/ghost overlaps: scared ghosts get eaten, dangerous ones cost a life
fn resolve_contacts(mut state: GameState) -> GameState {
    for i in 0..state.ghosts.len() {
        if state.phase != GamePhase::Playing {
            break;
        }
        let ghost = &state.ghosts[i];
        if ghost.in_house || !agents_touch(&state.maze, state.player.pos, ghost.pos) {
            continue;
        }
        let (kind, mode) = (ghost.kind, ghost.mode);
        match mode {
            GhostMode::Scared => state = reduce(state, Action::EatGhost(kind)),
            GhostMode::Scatter | GhostMode::Chase => {
                log::debug!("Caught by {}", kind.name());
                return reduce(state, Action::LoseLife);
            }
            GhostMode::Eaten => {}
        }
    }
    state
}

/// Demo steering: run from nearby ghosts, otherwise head for the closest
/// dot or pellet.
pub fn autopilot_direction(state: &GameState) -> Direction {
    let maze = &state.maze;
    let cell = state.player_cell();

    let threats: Vec<IVec2> = state
        .ghosts
        .iter()
        .filter(|g| g.is_dangerous())
        .map(|g| g.cell(maze))
        .filter(|&g| maze.wrapped_manhattan(cell, g) <= AUTOPILOT_DANGER_RADIUS)
        .collect();

    if !threats.is_empty() {
        let escape = maze.open_directions(cell, Mover::Player).into_iter().max_by_key(|&dir| {
            let next = maze.neighbor(cell, dir);
            threats
                .iter()
                .map(|&t| maze.wrapped_manhattan(next, t))
                .min()
                .unwrap_or(i32::MAX)
        });
        if let Some(dir) = escape {
            return dir;
        }
    }

    let Some(target) = maze.consumables().min_by_key(|&c| maze.wrapped_manhattan(cell, c)) else {
        return state.player.direction;
    };
    let budget = (maze.width() * maze.height()) as usize;
    get_direction_to_target(maze, cell, target, state.player.direction, Mover::Player, budget)
}
