use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::collision;
use super::state::Cell;

/// Arena size of the classic board
pub const DEFAULT_GRID_SIZE: i32 = 18;
/// Starting speed in ticks per second
pub const INITIAL_SPEED: f64 = 6.0;
/// Speed added every time the score reaches a multiple of the threshold
pub const SPEED_STEP: f64 = 0.5;
/// Score interval between speed-ups
pub const SPEED_INCREMENT_EVERY: u32 = 5;
/// Where a fresh snake appears on the classic board
pub const DEFAULT_START: Cell = Cell::new(13, 15);
/// Largest arena side the renderer and cell arithmetic are sized for
pub const MAX_GRID_SIZE: i32 = 255;
/// Slowest allowed starting speed: one tick every 100 seconds
pub const MIN_SPEED: f64 = 0.01;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(i32),
    #[error("grid size must be at most 255, got {0}")]
    GridTooLarge(i32),
    #[error("initial speed must be finite and at least 0.01, got {0}")]
    InvalidSpeed(f64),
    #[error("speed step must be non-negative and finite, got {0}")]
    InvalidSpeedStep(f64),
    #[error("speed threshold must be at least 1")]
    ZeroThreshold,
    #[error("start cell ({}, {}) lies outside the {grid_size}x{grid_size} arena", .start.x, .start.y)]
    StartOutOfBounds { start: Cell, grid_size: i32 },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square arena
    pub grid_size: i32,
    /// Cell a new snake starts on
    pub start: Cell,
    /// Ticks per second at the start of a round
    pub initial_speed: f64,
    pub speed_step: f64,
    pub speed_increment_every: u32,
    /// Ignore steering straight back into the neck
    pub forbid_reversal: bool,
    /// Fixed seed for food placement; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            start: DEFAULT_START,
            initial_speed: INITIAL_SPEED,
            speed_step: SPEED_STEP,
            speed_increment_every: SPEED_INCREMENT_EVERY,
            forbid_reversal: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration for a custom arena size.
    ///
    /// Keeps the classic start cell when it fits, otherwise starts in the middle.
    pub fn new(grid_size: i32) -> Self {
        let start = if collision::in_bounds(DEFAULT_START, grid_size) {
            DEFAULT_START
        } else {
            let middle = (grid_size + 1) / 2;
            Cell::new(middle, middle)
        };

        Self {
            grid_size,
            start,
            ..Default::default()
        }
    }

    /// Read a JSON configuration file; missing fields take their defaults.
    ///
    /// Not validated here: callers apply their overrides first, then call
    /// [`GameConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&json).context("Failed to parse game config")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // a single cell leaves no room for food next to the snake
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if !(self.initial_speed.is_finite() && self.initial_speed >= MIN_SPEED) {
            return Err(ConfigError::InvalidSpeed(self.initial_speed));
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            return Err(ConfigError::InvalidSpeedStep(self.speed_step));
        }
        if self.speed_increment_every == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if !collision::in_bounds(self.start, self.grid_size) {
            return Err(ConfigError::StartOutOfBounds {
                start: self.start,
                grid_size: self.grid_size,
            });
        }
        Ok(())
    }
}
