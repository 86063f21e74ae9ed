use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::collision::MIN_COORD;
use super::state::{Cell, Snake};

/// Random draws tried before falling back to enumerating the free cells
pub const MAX_REJECTION_SAMPLES: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no free cell left in the {grid_size}x{grid_size} arena")]
    NoSpace { grid_size: i32 },
}

/// Places food uniformly over the whole arena, away from the snake
#[derive(Debug)]
pub struct FoodPlacer {
    rng: StdRng,
}

impl FoodPlacer {
    /// Seeded placers produce the same sequence for the same snake history
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn place(&mut self, snake: &Snake, grid_size: i32) -> Result<Cell, PlacementError> {
        for _ in 0..MAX_REJECTION_SAMPLES {
            let candidate = Cell::new(
                self.rng.gen_range(MIN_COORD..=grid_size),
                self.rng.gen_range(MIN_COORD..=grid_size),
            );
            if !snake.contains(candidate) {
                return Ok(candidate);
            }
        }

        // Crowded arena: pick among what is actually left
        let free: Vec<Cell> = (MIN_COORD..=grid_size)
            .flat_map(|y| (MIN_COORD..=grid_size).map(move |x| Cell::new(x, y)))
            .filter(|cell| !snake.contains(*cell))
            .collect();

        free.choose(&mut self.rng)
            .copied()
            .ok_or(PlacementError::NoSpace { grid_size })
    }
}
