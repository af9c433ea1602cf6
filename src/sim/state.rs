//! Episode state and agent types
//!
//! One `GameState` value is the whole snapshot a host renders from. The
//! reducer consumes it and hands back the next one.

use std::sync::Arc;

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, cell_of, cell_origin};
use super::layout::LevelLayout;
use super::maze::Maze;
use super::mode::{GlobalMode, ModeScheduler};
use super::scoring;
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Host stopped dispatching gameplay; only Resume/Restart act
    Paused,
    /// Every dot eaten; waiting for NextLevel
    LevelComplete,
    /// Out of lives
    GameOver,
}

/// Per-ghost behaviour mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostMode {
    Scatter,
    Chase,
    /// Fleeing after a power pellet; vulnerable
    Scared,
    /// Eyes returning to the house
    Eaten,
}

/// The four fixed ghost personalities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostKind {
    /// Targets the player's cell directly
    Blinky,
    /// Ambushes four cells ahead of the player
    Pinky,
    /// Doubles the vector from Blinky to a point ahead of the player
    Inky,
    /// Chases from afar, retreats to its corner up close
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [GhostKind::Blinky, GhostKind::Pinky, GhostKind::Inky, GhostKind::Clyde];

    pub fn index(self) -> usize {
        match self {
            GhostKind::Blinky => 0,
            GhostKind::Pinky => 1,
            GhostKind::Inky => 2,
            GhostKind::Clyde => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GhostKind::Blinky => "Blinky",
            GhostKind::Pinky => "Pinky",
            GhostKind::Inky => "Inky",
            GhostKind::Clyde => "Clyde",
        }
    }
}

/// The player agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub direction: Direction,
    /// Last non-`None` direction; what ambushing ghosts read
    pub facing: Direction,
    /// Pixels per tick
    pub speed: f32,
    /// Mouth animation phase (cosmetic)
    pub anim_phase: f32,
    pub alive: bool,
}

impl Player {
    pub fn new(cell: IVec2, speed: f32) -> Self {
        Self {
            pos: cell_origin(cell),
            direction: Direction::None,
            facing: Direction::Left,
            speed,
            anim_phase: 0.0,
            alive: true,
        }
    }

    /// Grid cell, folded into the maze horizontally
    pub fn cell(&self, maze: &Maze) -> IVec2 {
        maze.wrap_cell(cell_of(self.pos))
    }
}

/// A ghost agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Vec2,
    pub direction: Direction,
    /// Base pixels per tick for the current level
    pub speed: f32,
    pub mode: GhostMode,
    pub scared_timer_ms: f64,
    /// Cell the AI steered toward on the last update
    pub target: IVec2,
    pub in_house: bool,
    /// Release delay for this level
    pub exit_delay_ms: f64,
    /// Game time at which the ghost leaves the house
    pub release_at_ms: f64,
}

impl Ghost {
    /// A ghost waiting in the house, released after `exit_delay_ms` of game time
    pub fn new(kind: GhostKind, pos: Vec2, speed: f32, mode: GhostMode, exit_delay_ms: f64) -> Self {
        Self {
            kind,
            pos,
            direction: Direction::None,
            speed,
            mode,
            scared_timer_ms: 0.0,
            target: cell_of(pos),
            in_house: true,
            exit_delay_ms,
            release_at_ms: exit_delay_ms,
        }
    }

    pub fn cell(&self, maze: &Maze) -> IVec2 {
        maze.wrap_cell(cell_of(self.pos))
    }

    /// Effective speed for the current mode
    pub fn effective_speed(&self, tuning: &Tuning) -> f32 {
        match self.mode {
            GhostMode::Scared => self.speed * tuning.scared_speed_factor,
            GhostMode::Eaten => self.speed * tuning.eaten_speed_factor,
            GhostMode::Scatter | GhostMode::Chase => self.speed,
        }
    }

    /// Ghosts in Scatter/Chase follow the global scheduler
    pub fn follows_schedule(&self) -> bool {
        matches!(self.mode, GhostMode::Scatter | GhostMode::Chase)
    }

    /// Touching this ghost costs the player a life
    pub fn is_dangerous(&self) -> bool {
        !self.in_house && self.follows_schedule()
    }
}

/// Signals for audio and render collaborators, one per reducer branch that fired
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DotEaten,
    PowerPelletEaten,
    GhostEaten { ghost: GhostKind, points: u64 },
    GhostReleased(GhostKind),
    ModeChanged(GlobalMode),
    PlayerDied,
    ExtraLife,
    LevelComplete,
    LevelStarted(u32),
    GameOver,
}

/// Complete episode snapshot
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Level template the maze is reset from
    #[serde(skip)]
    pub layout: Arc<LevelLayout>,
    #[serde(skip)]
    pub tuning: Tuning,
    pub maze: Maze,
    pub player: Player,
    /// Ordered by [`GhostKind::index`]
    pub ghosts: Vec<Ghost>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub dots_remaining: u32,
    pub power_pellet_active: bool,
    pub power_pellet_timer_ms: f64,
    pub schedule: ModeScheduler,
    /// Ghosts eaten during the current power pellet
    pub ghost_streak: u32,
    pub pending_direction: Direction,
    pub game_time_ms: f64,
    pub high_score: u64,
    pub phase: GamePhase,
    /// Time spent in the current phase (drives the level-complete pause)
    pub phase_timer_ms: f64,
    pub sound_enabled: bool,
    pub extra_life_awarded: bool,
    /// Events raised since the host last cleared them
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub rng: Pcg32,
}

impl GameState {
    /// Fresh episode on the classic board
    pub fn new(tuning: Tuning, high_score: u64) -> Self {
        Self::with_layout(Arc::new(LevelLayout::classic()), tuning, high_score)
    }

    /// Fresh episode on a custom layout
    pub fn with_layout(layout: Arc<LevelLayout>, tuning: Tuning, high_score: u64) -> Self {
        let maze = layout.maze.clone();
        let dots_remaining = maze.count_consumables();
        let rng = Pcg32::seed_from_u64(tuning.seed);
        let mut state = Self {
            maze,
            player: Player::new(layout.player_start, tuning.player_speed),
            ghosts: Vec::with_capacity(GhostKind::ALL.len()),
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            dots_remaining,
            power_pellet_active: false,
            power_pellet_timer_ms: 0.0,
            schedule: ModeScheduler::new(),
            ghost_streak: 0,
            pending_direction: Direction::None,
            game_time_ms: 0.0,
            high_score,
            phase: GamePhase::Playing,
            phase_timer_ms: 0.0,
            sound_enabled: true,
            extra_life_awarded: false,
            events: Vec::new(),
            rng,
            layout,
            tuning,
        };
        state.spawn_agents();
        state
    }

    /// Speed multiplier for the current level
    pub fn speed_multiplier(&self) -> f32 {
        scoring::speed_multiplier(self.level, &self.tuning)
    }

    /// Place player and ghosts at their start cells. Ghost release delays are
    /// measured from the current game time.
    pub fn spawn_agents(&mut self) {
        let multiplier = self.speed_multiplier();
        self.player = Player::new(self.layout.player_start, self.tuning.player_speed * multiplier);
        self.pending_direction = Direction::None;

        let mode = self.schedule.mode.into();
        self.ghosts = GhostKind::ALL
            .into_iter()
            .map(|kind| {
                let delay = scoring::exit_delay_for_level(
                    self.tuning.ghost_exit_delays_ms[kind.index()],
                    self.level,
                    &self.tuning,
                );
                let mut ghost = Ghost::new(
                    kind,
                    cell_origin(self.layout.ghost_start(kind)),
                    self.tuning.ghost_speed * multiplier,
                    mode,
                    delay,
                );
                ghost.release_at_ms = self.game_time_ms + delay;
                ghost
            })
            .collect();
    }

    pub fn ghost(&self, kind: GhostKind) -> Option<&Ghost> {
        self.ghosts.iter().find(|g| g.kind == kind)
    }

    pub fn player_cell(&self) -> IVec2 {
        self.player.cell(&self.maze)
    }

    /// Remove and return pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
