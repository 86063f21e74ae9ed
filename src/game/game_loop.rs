//! Tick scheduling and round lifecycle
//!
//! The host calls [`GameLoop::tick`] from whatever timer it has (a frame
//! interval in the terminal) with a monotonic timestamp. Calls arriving sooner
//! than `1 / speed` seconds after the last executed tick are skipped, so the
//! host may call as often as it likes.
//!
//! ```text
//! Idle --first input / first tick--> Running <--toggle--> Paused
//! Running --collision / arena full--> GameOver --restart--> Running
//! ```
//!
//! Steering is buffered in every state but GameOver, so a turn chosen while
//! paused takes effect on the first tick after resuming.

use std::time::Duration;
use tracing::{info, warn};

use super::{
    action::Direction,
    collision::CollisionType,
    config::GameConfig,
    engine::{GameEngine, StepOutcome},
    error::GameError,
    state::{Cell, SnakeState},
};
use crate::storage::ScoreStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has happened yet
    Idle,
    Running,
    Paused,
    /// A round ended; waiting for a restart
    GameOver,
}

/// Why the last round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Collision(CollisionType),
    /// The snake filled every cell food could go to
    ArenaFull,
}

/// Result of one scheduler callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Too soon after the previous tick for the current speed
    Throttled,
    Paused,
    /// Round is over; nothing advances until restart
    Over,
    Advanced(StepOutcome),
}

/// Read-only snapshot handed to renderers
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub segments: &'a [Cell],
    pub food: Cell,
    pub grid_size: i32,
    pub score: u32,
    pub high_score: u32,
    pub speed: f64,
    pub run_state: RunState,
    pub end_reason: Option<EndReason>,
}

pub struct GameLoop {
    engine: GameEngine,
    state: SnakeState,
    run_state: RunState,
    end_reason: Option<EndReason>,
    /// Latest steering input since the last tick
    pending_direction: Option<Direction>,
    last_tick: Duration,
    high_score: u32,
    store: Box<dyn ScoreStore>,
}

impl GameLoop {
    /// Validate the config, place the first food and read the stored high score
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self, GameError> {
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset()?;

        let high_score = match store.load() {
            Ok(score) => score,
            Err(e) => {
                warn!("Failed to read high score, starting from 0: {}", e);
                0
            }
        };

        Ok(Self {
            engine,
            state,
            run_state: RunState::Idle,
            end_reason: None,
            pending_direction: None,
            last_tick: Duration::ZERO,
            high_score,
            store,
        })
    }

    /// Buffer a steering input for the next tick; the newest input wins.
    ///
    /// Input given while paused is kept and applied on the first tick after
    /// resuming. Returns false when the input was ignored: after game over,
    /// or for a reversal when `forbid_reversal` is set.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.run_state == RunState::GameOver {
            return false;
        }

        if self.engine.config().forbid_reversal && self.state.snake.len() > 1 {
            let reverses = self
                .state
                .snake
                .direction
                .is_some_and(|current| current.is_opposite(direction));
            if reverses {
                return false;
            }
        }

        if self.run_state == RunState::Idle {
            self.begin_round();
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Flip between running and paused; other states are left alone
    pub fn toggle_pause(&mut self) -> RunState {
        self.run_state = match self.run_state {
            RunState::Running => {
                info!(score = self.state.score, "Paused");
                RunState::Paused
            }
            RunState::Paused => {
                info!(score = self.state.score, "Resumed");
                RunState::Running
            }
            other => other,
        };
        self.run_state
    }

    /// Scheduler callback. `now` must not go backwards between calls.
    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        match self.run_state {
            RunState::Paused => return TickOutcome::Paused,
            RunState::GameOver => return TickOutcome::Over,
            RunState::Idle | RunState::Running => {}
        }

        if now.saturating_sub(self.last_tick) < self.state.tick_interval() {
            return TickOutcome::Throttled;
        }
        self.last_tick = now;

        if self.run_state == RunState::Idle {
            self.begin_round();
        }

        let direction = self
            .pending_direction
            .take()
            .or(self.state.snake.direction);
        let outcome = self.engine.advance(&mut self.state, direction);

        match outcome {
            StepOutcome::Moved { ate_food: true, .. } => self.record_score(),
            StepOutcome::Collided(collision) => self.end_round(EndReason::Collision(collision)),
            StepOutcome::ArenaFull => {
                self.record_score();
                self.end_round(EndReason::ArenaFull);
            }
            StepOutcome::Idle | StepOutcome::Moved { .. } => {}
        }

        TickOutcome::Advanced(outcome)
    }

    /// Start a new round after game over: one idle segment, zero score,
    /// initial speed, new food.
    ///
    /// Returns `Ok(false)` and leaves the round alone in any other state.
    pub fn restart(&mut self) -> Result<bool, GameError> {
        if self.run_state != RunState::GameOver {
            return Ok(false);
        }

        self.state = self.engine.reset()?;
        self.pending_direction = None;
        self.end_reason = None;
        self.run_state = RunState::Running;
        info!(high_score = self.high_score, "Round restarted");
        Ok(true)
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            segments: self.state.snake.segments(),
            food: self.state.food,
            grid_size: self.state.grid_size,
            score: self.state.score,
            high_score: self.high_score,
            speed: self.state.speed,
            run_state: self.run_state,
            end_reason: self.end_reason,
        }
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    fn begin_round(&mut self) {
        self.run_state = RunState::Running;
        info!(
            grid_size = self.state.grid_size,
            speed = self.state.speed,
            "Round started"
        );
    }

    fn end_round(&mut self, reason: EndReason) {
        self.run_state = RunState::GameOver;
        self.end_reason = Some(reason);
        info!(
            score = self.state.score,
            length = self.state.snake.len(),
            ?reason,
            "Game over"
        );
    }

    fn record_score(&mut self) {
        if self.state.score <= self.high_score {
            return;
        }

        self.high_score = self.state.score;
        info!(high_score = self.high_score, "New high score");
        if let Err(e) = self.store.save(self.high_score) {
            warn!("Failed to save high score: {}", e);
        }
    }
}
