use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::action::Direction;

/// A cell on the arena grid, 1-indexed on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one step in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake: occupied cells from head (index 0) to tail
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Cell>,
    /// Committed direction; `None` until the first input of a round
    pub direction: Option<Direction>,
}

impl Snake {
    /// Single-segment snake sitting idle on `head`
    pub fn new(head: Cell) -> Self {
        Self {
            body: vec![head],
            direction: None,
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty list.
    pub fn from_segments(segments: Vec<Cell>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: segments,
            direction: None,
        })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> &[Cell] {
        &self.body
    }

    /// Segments that will still be occupied behind the head after the next shift.
    ///
    /// The tail cell is vacated by a plain move and kept by a growing one.
    pub fn trailing_body(&self, growing: bool) -> &[Cell] {
        if growing {
            &self.body
        } else {
            &self.body[..self.body.len() - 1]
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Shift every segment one step towards the tail and put the head on `new_head`.
    ///
    /// Walks tail to head so each segment reads its predecessor before that one
    /// is overwritten. With `grow` the old tail is kept, adding one segment.
    pub fn shift_to(&mut self, new_head: Cell, grow: bool) {
        if grow {
            let tail = self.tail();
            self.body.push(tail);
        }

        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = new_head;
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Everything that changes while a round is played
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeState {
    pub snake: Snake,
    pub food: Cell,
    pub grid_size: i32,
    pub score: u32,
    /// Target ticks per second
    pub speed: f64,
    /// Segments earned by eating that the next shifts still have to add
    pub pending_growth: u32,
}

impl SnakeState {
    pub fn new(snake: Snake, food: Cell, grid_size: i32, speed: f64) -> Self {
        Self {
            snake,
            food,
            grid_size,
            score: 0,
            speed,
            pending_growth: 0,
        }
    }

    pub fn is_occupied_by_snake(&self, cell: Cell) -> bool {
        self.snake.contains(cell)
    }

    /// Minimum time between two executed ticks at the current speed.
    ///
    /// Saturates at `Duration::MAX` for speeds too slow to represent.
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.speed).unwrap_or(Duration::MAX)
    }
}
