//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is a plain state transition, so it can be driven by the tick timer
//! or stepped directly in tests.

pub mod action;
pub mod config;
pub mod engine;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome};
pub use session::{GameOverCause, GameOverReport, Session, TickReport};
pub use state::{CollisionType, GameState, Position, SessionPhase, Snake};
