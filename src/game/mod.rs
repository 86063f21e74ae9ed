//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Hosts drive it through [`GameLoop`] and draw from [`FrameView`].

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod game_loop;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use collision::CollisionType;
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepOutcome};
pub use error::GameError;
pub use food::{FoodPlacer, PlacementError};
pub use game_loop::{EndReason, FrameView, GameLoop, RunState, TickOutcome};
pub use state::{Cell, Snake, SnakeState};
