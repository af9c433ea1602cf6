//! Game state reducer
//!
//! `reduce` takes a snapshot and an action and returns the next snapshot.
//! Actions that don't apply in the current phase, or whose payload doesn't
//! match the maze (eating a dot that isn't there, eating a ghost that isn't
//! scared), return the state unchanged.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::ghost::{AiContext, update_ghost};
use super::grid::Direction;
use super::maze::{CellKind, Mover};
use super::mode::{ModeScheduler, apply_flip};
use super::movement;
use super::scoring;
use super::state::{GameEvent, GamePhase, GameState, GhostKind, GhostMode};

/// Everything the host (or the tick driver) can ask the simulation to do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Queue a turn; applied at the next aligned position
    SetDirection(Direction),
    MovePlayer,
    UpdateGhosts,
    EatDot(IVec2),
    EatPowerPellet(IVec2),
    EatGhost(GhostKind),
    LoseLife,
    NextLevel,
    Pause,
    Resume,
    Restart,
    /// Advance timers by this many milliseconds
    UpdateGameTime(f64),
    ToggleSound,
}

/// Apply one action and return the resulting snapshot
pub fn reduce(mut state: GameState, action: Action) -> GameState {
    let playing = state.phase == GamePhase::Playing;
    match action {
        Action::SetDirection(dir) => {
            if state.phase != GamePhase::GameOver {
                state.pending_direction = dir;
            }
        }
        Action::MovePlayer if playing => move_player(&mut state),
        Action::UpdateGhosts if playing => update_ghosts(&mut state),
        Action::EatDot(cell) if playing => eat_dot(&mut state, cell),
        Action::EatPowerPellet(cell) if playing => eat_power_pellet(&mut state, cell),
        Action::EatGhost(kind) if playing => eat_ghost(&mut state, kind),
        Action::LoseLife if playing => lose_life(&mut state),
        Action::NextLevel if matches!(state.phase, GamePhase::Playing | GamePhase::LevelComplete) => {
            next_level(&mut state)
        }
        Action::Pause if playing => state.phase = GamePhase::Paused,
        Action::Resume if state.phase == GamePhase::Paused => state.phase = GamePhase::Playing,
        Action::Restart => state = restart(state),
        Action::UpdateGameTime(delta) => update_game_time(&mut state, delta),
        Action::ToggleSound => state.sound_enabled = !state.sound_enabled,
        _ => {}
    }
    state
}

/// Add points, granting the bonus life when the threshold is crossed
fn award(state: &mut GameState, points: u64) {
    let before = state.score;
    state.score += points;
    if !state.extra_life_awarded && scoring::crosses_extra_life(before, state.score, state.tuning.extra_life_score) {
        state.extra_life_awarded = true;
        state.lives += 1;
        state.events.push(GameEvent::ExtraLife);
        log::info!("Extra life at {} points", state.score);
    }
}

fn move_player(state: &mut GameState) {
    let player = &state.player;
    let direction = movement::try_turn(
        &state.maze,
        player.pos,
        player.direction,
        state.pending_direction,
        Mover::Player,
    );
    let step = movement::advance(&state.maze, player.pos, direction, player.speed, Mover::Player);

    let player = &mut state.player;
    if step.pos != player.pos {
        player.anim_phase = (player.anim_phase + player.speed / crate::consts::CELL_SIZE).fract();
    }
    player.pos = step.pos;
    player.direction = step.direction;
    if step.direction != Direction::None {
        player.facing = step.direction;
    }
}

fn update_ghosts(state: &mut GameState) {
    let snapshot = state.ghosts.clone();
    let ctx = AiContext {
        maze: &state.maze,
        layout: &state.layout,
        tuning: &state.tuning,
        player_cell: state.player.cell(&state.maze),
        player_facing: state.player.facing,
        ghosts: &snapshot,
        global_mode: state.schedule.mode,
        game_time_ms: state.game_time_ms,
    };

    let mut updated = Vec::with_capacity(snapshot.len());
    for ghost in &snapshot {
        let update = update_ghost(ghost, &ctx, &mut state.rng);
        if update.released {
            log::debug!("{} left the house at {:.0}ms", ghost.kind.name(), state.game_time_ms);
            state.events.push(GameEvent::GhostReleased(ghost.kind));
        }
        if update.revived {
            log::debug!("{} is back in play", ghost.kind.name());
        }
        updated.push(update.ghost);
    }
    state.ghosts = updated;
}

/// Shared bookkeeping after a dot or pellet is consumed
fn consume(state: &mut GameState, cell: IVec2, points: u64) {
    state.maze.set_cell(cell, CellKind::Empty);
    state.dots_remaining = state.dots_remaining.saturating_sub(1);
    award(state, points);
    if state.dots_remaining == 0 {
        state.phase = GamePhase::LevelComplete;
        state.phase_timer_ms = 0.0;
        state.events.push(GameEvent::LevelComplete);
        log::info!("Level {} complete, score {}", state.level, state.score);
    }
}

fn eat_dot(state: &mut GameState, cell: IVec2) {
    if state.maze.cell(cell) != CellKind::Dot {
        return;
    }
    state.events.push(GameEvent::DotEaten);
    consume(state, cell, scoring::DOT_POINTS);
}

fn eat_power_pellet(state: &mut GameState, cell: IVec2) {
    if state.maze.cell(cell) != CellKind::PowerPellet {
        return;
    }
    state.events.push(GameEvent::PowerPelletEaten);

    let duration = state.tuning.power_pellet_duration_ms;
    for ghost in state.ghosts.iter_mut().filter(|g| g.mode != GhostMode::Eaten) {
        ghost.mode = GhostMode::Scared;
        ghost.scared_timer_ms = duration;
        ghost.direction = ghost.direction.opposite();
    }
    state.ghost_streak = 0;
    state.power_pellet_active = true;
    state.power_pellet_timer_ms = duration;

    consume(state, cell, scoring::POWER_PELLET_POINTS);
}

fn eat_ghost(state: &mut GameState, kind: GhostKind) {
    let Some(ghost) = state
        .ghosts
        .iter_mut()
        .find(|g| g.kind == kind && g.mode == GhostMode::Scared)
    else {
        return;
    };
    ghost.mode = GhostMode::Eaten;
    ghost.scared_timer_ms = 0.0;

    let points = scoring::ghost_points(state.ghost_streak);
    state.ghost_streak += 1;
    state.events.push(GameEvent::GhostEaten { ghost: kind, points });
    award(state, points);
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::PlayerDied);

    if state.lives == 0 {
        state.player.alive = false;
        state.high_score = state.high_score.max(state.score);
        state.phase = GamePhase::GameOver;
        state.phase_timer_ms = 0.0;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over: score {}, high score {}", state.score, state.high_score);
        return;
    }

    log::info!("Life lost, {} remaining", state.lives);
    state.power_pellet_active = false;
    state.power_pellet_timer_ms = 0.0;
    state.ghost_streak = 0;
    state.spawn_agents();
}

fn next_level(state: &mut GameState) {
    state.level += 1;
    state.maze = state.layout.maze.clone();
    state.dots_remaining = state.maze.count_consumables();
    state.power_pellet_active = false;
    state.power_pellet_timer_ms = 0.0;
    state.schedule = ModeScheduler::new();
    state.ghost_streak = 0;
    state.phase = GamePhase::Playing;
    state.phase_timer_ms = 0.0;
    state.spawn_agents();

    let bonus = scoring::level_bonus(state.level);
    award(state, bonus);
    state.events.push(GameEvent::LevelStarted(state.level));
    log::info!(
        "Level {} started (bonus {}, speed x{:.1})",
        state.level,
        bonus,
        state.speed_multiplier()
    );
}

fn restart(state: GameState) -> GameState {
    let high_score = state.high_score.max(state.score);
    let mut fresh = GameState::with_layout(state.layout, state.tuning, high_score);
    fresh.rng = state.rng;
    fresh.sound_enabled = state.sound_enabled;
    fresh.events.push(GameEvent::LevelStarted(fresh.level));
    log::info!("Game restarted");
    fresh
}

fn update_game_time(state: &mut GameState, delta_ms: f64) {
    if !(delta_ms > 0.0) || !delta_ms.is_finite() {
        return;
    }
    match state.phase {
        GamePhase::Playing => {}
        GamePhase::LevelComplete => {
            state.game_time_ms += delta_ms;
            state.phase_timer_ms += delta_ms;
            return;
        }
        GamePhase::Paused | GamePhase::GameOver => return,
    }

    state.game_time_ms += delta_ms;
    state.phase_timer_ms += delta_ms;

    if state.power_pellet_active {
        state.power_pellet_timer_ms -= delta_ms;
        let global: GhostMode = state.schedule.mode.into();
        for ghost in state.ghosts.iter_mut().filter(|g| g.mode == GhostMode::Scared) {
            ghost.scared_timer_ms -= delta_ms;
            if ghost.scared_timer_ms <= 0.0 {
                ghost.scared_timer_ms = 0.0;
                ghost.mode = global;
            }
        }
        if state.power_pellet_timer_ms <= 0.0 {
            state.power_pellet_active = false;
            state.power_pellet_timer_ms = 0.0;
            for ghost in state.ghosts.iter_mut().filter(|g| g.mode == GhostMode::Scared) {
                ghost.scared_timer_ms = 0.0;
                ghost.mode = global;
            }
        }
        return;
    }

    if let Some(mode) = state.schedule.advance(delta_ms, false, &state.tuning) {
        apply_flip(&mut state.ghosts, mode);
        state.events.push(GameEvent::ModeChanged(mode));
        log::debug!("Global mode -> {:?} at {:.0}ms", mode, state.game_time_ms);
    }
}
