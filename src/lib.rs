//! Grid Snake - the classic Snake game in the terminal
//!
//! This library provides:
//! - Core game logic, independent of any host (game module)
//! - High-score persistence (storage module)
//! - Terminal input, rendering and sound (input, render, audio modules)
//! - The interactive terminal mode (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
