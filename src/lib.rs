//! Snake Classic - grid Snake for the terminal
//!
//! This library provides:
//! - Core game logic and the session lifecycle (game module)
//! - High score persistence (persistence module)
//! - The tick timer that drives the engine (ticker module)
//! - TUI rendering and keyboard input (render and input modules)
//! - The interactive loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod ticker;
