//! Host-facing session: fixed-timestep loop plus high score persistence
//!
//! A host feeds wall-clock frame times and input; the session turns them
//! into whole simulation ticks and writes the high score when a game ends.

use std::sync::Arc;

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT_MS};
use crate::highscore::{HighScoreStore, load_or_zero};
use crate::sim::{Action, GameEvent, GamePhase, GameState, LevelLayout, TickInput, reduce, tick};
use crate::tuning::Tuning;

/// One running game bound to a high score store
pub struct Session<S: HighScoreStore> {
    store: S,
    state: GameState,
    accumulator_ms: f64,
    input: TickInput,
    last_phase: GamePhase,
}

impl<S: HighScoreStore> Session<S> {
    /// Start a session on the classic board; the stored high score is read once here
    pub fn new(store: S, tuning: Tuning) -> Self {
        let high_score = load_or_zero(&store);
        log::info!("Session started (high score {})", high_score);
        let state = GameState::new(tuning, high_score);
        Self::from_state(store, state)
    }

    pub fn with_layout(store: S, layout: Arc<LevelLayout>, tuning: Tuning) -> Self {
        let high_score = load_or_zero(&store);
        let state = GameState::with_layout(layout, tuning, high_score);
        Self::from_state(store, state)
    }

    fn from_state(store: S, state: GameState) -> Self {
        Self {
            last_phase: state.phase,
            store,
            state,
            accumulator_ms: 0.0,
            input: TickInput::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Input used by the following ticks
    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    /// Run as many fixed ticks as `frame_ms` of wall time covers. Returns
    /// every event raised along the way.
    pub fn update(&mut self, frame_ms: f64) -> Vec<GameEvent> {
        let frame_ms = if frame_ms.is_finite() { frame_ms.clamp(0.0, MAX_FRAME_MS) } else { 0.0 };
        self.accumulator_ms += frame_ms;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator_ms >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            let state = self.state.clone();
            self.state = tick(state, &self.input, SIM_DT_MS);
            self.accumulator_ms -= SIM_DT_MS;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
            self.input.restart = false;
            self.input.toggle_sound = false;

            events.extend(self.state.events.iter().copied());
            self.check_phase_transition();
        }
        events
    }

    /// Apply one action outside the tick loop (menu buttons and the like)
    pub fn dispatch(&mut self, action: Action) {
        let state = self.state.clone();
        self.state = reduce(state, action);
        self.check_phase_transition();
    }

    /// Persist the high score on entry into game over
    fn check_phase_transition(&mut self) {
        let phase = self.state.phase;
        if phase == self.last_phase {
            return;
        }
        if phase == GamePhase::GameOver {
            let best = self.state.high_score.max(self.state.score);
            if let Err(e) = self.store.save(best) {
                log::warn!("Failed to save high score: {}", e);
            }
        }
        self.last_phase = phase;
    }
}
