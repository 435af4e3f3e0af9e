//! Session lifecycle on top of the tick engine
//!
//! A [`Session`] drives one [`GameState`] through
//! `NotStarted -> Running <-> Paused -> GameOver -> Running ...`, gates player
//! input on that lifecycle, and settles the high score when a session ends.

use std::time::Duration;
use tracing::{info, warn};

use super::{
    action::Direction,
    engine::{GameEngine, TickOutcome},
    state::{CollisionType, GameState, SessionPhase},
};
use crate::persistence::HighScoreStore;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    Collision(CollisionType),
    BoardFull,
}

/// What the player is told when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub final_score: u32,
    /// High score after this session was settled
    pub high_score: u32,
    /// Whether this session set the high score
    pub new_high_score: bool,
    pub cause: GameOverCause,
}

/// Result of one timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    /// Restart the tick timer at this period
    pub reschedule: Option<Duration>,
    /// Set on the tick that ended the session
    pub game_over: Option<GameOverReport>,
}

pub struct Session<S: HighScoreStore> {
    engine: GameEngine,
    state: GameState,
    store: S,
    high_score: u32,
    last_game_over: Option<GameOverReport>,
}

impl<S: HighScoreStore> Session<S> {
    /// Load the high score and lay out a board that waits for `start`
    pub fn new(mut engine: GameEngine, store: S) -> Self {
        let high_score = store.load();
        let mut state = engine.initialize();
        state.phase = SessionPhase::NotStarted;

        Self {
            engine,
            state,
            store,
            high_score,
            last_game_over: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report of the most recent session end, until the next start
    pub fn last_game_over(&self) -> Option<&GameOverReport> {
        self.last_game_over.as_ref()
    }

    /// Begin a new session
    ///
    /// Does nothing while a session is in progress. Otherwise returns the
    /// tick period the timer should be restarted with, or `None` when the
    /// new board has no room for food.
    pub fn start(&mut self) -> Option<Duration> {
        if self.state.is_running() {
            return None;
        }

        self.state = self.engine.initialize();
        self.last_game_over = None;
        if self.state.is_over() {
            return None;
        }
        info!(
            tiles = self.state.tile_count,
            speed_ms = self.state.speed_ms,
            "session started"
        );

        Some(self.state.tick_interval())
    }

    /// Queue a turn; ignored outside a session and for reversals
    pub fn turn(&mut self, direction: Direction) -> bool {
        self.engine.set_pending_direction(&mut self.state, direction)
    }

    /// Pause or resume; returns whether the session is now paused
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.engine.toggle_pause(&mut self.state);
        if self.state.is_running() {
            info!(paused, "pause toggled");
        }
        paused
    }

    /// Advance the session by one tick
    pub fn tick(&mut self) -> TickReport {
        let outcome = self.engine.advance(&mut self.state);

        let (reschedule, game_over) = match outcome {
            TickOutcome::AteFood { new_speed } => (new_speed, None),
            TickOutcome::Collided(collision) => {
                (None, Some(self.game_over(GameOverCause::Collision(collision))))
            }
            TickOutcome::BoardFull => (None, Some(self.game_over(GameOverCause::BoardFull))),
            TickOutcome::Idle | TickOutcome::Moved => (None, None),
        };

        TickReport {
            outcome,
            reschedule,
            game_over,
        }
    }

    /// Settle the high score for a finished session
    fn game_over(&mut self, cause: GameOverCause) -> GameOverReport {
        let final_score = self.state.score;
        let new_high_score = final_score > self.high_score;

        if new_high_score {
            self.high_score = final_score;
            if let Err(err) = self.store.save(final_score) {
                warn!(error = %err, "failed to persist high score");
            }
            info!(high_score = final_score, "new high score");
        }

        info!(score = final_score, ?cause, "game over");

        let report = GameOverReport {
            final_score,
            high_score: self.high_score,
            new_high_score,
            cause,
        };
        self.last_game_over = Some(report);
        report
    }

    /// Whether the start control is usable
    pub fn can_start(&self) -> bool {
        !self.state.is_running()
    }

    /// Label for the start control
    pub fn start_label(&self) -> &'static str {
        match self.state.phase {
            SessionPhase::NotStarted => "Start",
            SessionPhase::Running | SessionPhase::Paused => "Playing...",
            SessionPhase::GameOver => "Restart",
        }
    }

    /// Label for the pause control
    pub fn pause_label(&self) -> &'static str {
        if self.state.is_paused() {
            "Continue"
        } else {
            "Pause"
        }
    }
}
