//! Space Invaders: a single-screen arcade shooter in the terminal.
//!
//! The library holds everything that does not touch the terminal directly:
//! entity data, the per-tick simulation, the game state machine and the
//! renderer (which draws onto an abstract `Surface`).  `main.rs` owns the
//! terminal, the input thread and the frame cadence.

pub mod compute;
pub mod config;
pub mod controller;
pub mod display;
pub mod entities;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod input;
pub mod scheduler;

pub use config::GameConfig;
pub use controller::{Game, Phase};
pub use entities::{GameEvent, GameState, GameStatus};
pub use error::GameError;
pub use geometry::{intersects, Rect};
