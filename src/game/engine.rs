use tracing::debug;

use super::{
    action::Direction,
    collision::{self, CollisionType},
    config::GameConfig,
    error::GameError,
    food::{FoodPlacer, PlacementError},
    state::{Snake, SnakeState},
};

/// What a single `advance` did to the state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// No direction committed yet; nothing moved
    Idle,
    /// The snake moved one cell
    Moved {
        ate_food: bool,
        /// Speed was raised because the score hit the threshold
        speed_up: bool,
    },
    /// The move was refused; segments are unchanged
    Collided(CollisionType),
    /// Food was eaten but the snake now covers every free cell
    ArenaFull,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    placer: FoodPlacer,
}

impl GameEngine {
    /// Create a new game engine, rejecting invalid configuration up front
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let placer = FoodPlacer::new(config.seed);
        Ok(Self { config, placer })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh round: one idle segment on the start cell, zero score, initial speed
    pub fn reset(&mut self) -> Result<SnakeState, PlacementError> {
        let snake = Snake::new(self.config.start);
        let food = self.placer.place(&snake, self.config.grid_size)?;

        Ok(SnakeState::new(
            snake,
            food,
            self.config.grid_size,
            self.config.initial_speed,
        ))
    }

    /// Advance the snake one tick in `direction`.
    ///
    /// A `None` direction is the idle zero vector and leaves the state untouched.
    /// Food eaten on this tick adds its segment on the next tick's shift.
    pub fn advance(&mut self, state: &mut SnakeState, direction: Option<Direction>) -> StepOutcome {
        let Some(direction) = direction else {
            return StepOutcome::Idle;
        };
        state.snake.direction = Some(direction);

        let new_head = state.snake.head().moved_in_direction(direction);
        let growing = state.pending_growth > 0;

        if let Some(collision) = collision::check(
            new_head,
            state.snake.trailing_body(growing),
            state.grid_size,
        ) {
            return StepOutcome::Collided(collision);
        }

        state.snake.shift_to(new_head, growing);
        if growing {
            state.pending_growth -= 1;
        }

        if new_head != state.food {
            return StepOutcome::Moved {
                ate_food: false,
                speed_up: false,
            };
        }

        state.score += 1;
        state.pending_growth += 1;

        let speed_up = state.score % self.config.speed_increment_every == 0;
        if speed_up {
            state.speed += self.config.speed_step;
            debug!(score = state.score, speed = state.speed, "speed raised");
        }

        match self.placer.place(&state.snake, state.grid_size) {
            Ok(food) => {
                debug!(score = state.score, x = food.x, y = food.y, "food eaten, new food placed");
                state.food = food;
                StepOutcome::Moved {
                    ate_food: true,
                    speed_up,
                }
            }
            Err(PlacementError::NoSpace { .. }) => StepOutcome::ArenaFull,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, ConfigError};

    fn engine() -> GameEngine {
        GameEngine::new(GameConfig {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap()
    }

    fn state_with(segments: Vec<Cell>, food: Cell) -> SnakeState {
        SnakeState::new(Snake::from_segments(segments).unwrap(), food, 18, 6.0)
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset().unwrap();

        assert_eq!(state.snake.segments(), &[Cell::new(13, 15)]);
        assert_eq!(state.snake.direction, None);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 6.0);
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameEngine::new(GameConfig::new(0));
        assert!(matches!(
            result,
            Err(GameError::Config(ConfigError::GridTooSmall(0)))
        ));
    }

    #[test]
    fn test_idle_direction_is_a_no_op() {
        let mut engine = engine();
        // head already out of bounds: an idle tick must not even look at it
        let mut state = state_with(vec![Cell::new(0, 5)], Cell::new(3, 3));
        let before = state.clone();

        assert_eq!(engine.advance(&mut state, None), StepOutcome::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn test_three_ticks_up() {
        let mut engine = engine();
        let mut state = state_with(vec![Cell::new(13, 15)], Cell::new(1, 1));

        for _ in 0..3 {
            let outcome = engine.advance(&mut state, Some(Direction::Up));
            assert_eq!(
                outcome,
                StepOutcome::Moved {
                    ate_food: false,
                    speed_up: false
                }
            );
        }

        assert_eq!(state.snake.head(), Cell::new(13, 12));
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_eating_scores_then_grows_on_next_shift() {
        let mut engine = engine();
        let mut state = state_with(vec![Cell::new(5, 5), Cell::new(4, 5)], Cell::new(6, 5));

        let outcome = engine.advance(&mut state, Some(Direction::Right));

        assert_eq!(
            outcome,
            StepOutcome::Moved {
                ate_food: true,
                speed_up: false
            }
        );
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 2);
        assert!(!state.is_occupied_by_snake(state.food));

        state.food = Cell::new(1, 1);
        engine.advance(&mut state, Some(Direction::Right));

        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Cell::new(7, 5));
        assert_eq!(state.snake.tail(), Cell::new(5, 5));
        assert_eq!(state.pending_growth, 0);

        engine.advance(&mut state, Some(Direction::Right));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_length_changes_only_after_eating() {
        let mut engine = engine();
        let mut state = state_with(
            vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
            Cell::new(8, 9),
        );
        let moves = [
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Right,
            Direction::Down,
        ];

        for direction in moves {
            let growing = state.pending_growth > 0;
            let before = state.snake.len();

            let outcome = engine.advance(&mut state, Some(direction));
            assert!(matches!(outcome, StepOutcome::Moved { .. }));

            let expected = if growing { before + 1 } else { before };
            assert_eq!(state.snake.len(), expected);
        }
    }

    #[test]
    fn test_speed_steps_once_at_threshold() {
        let mut engine = engine();
        let mut state = state_with(vec![Cell::new(5, 5)], Cell::new(6, 5));
        state.score = 4;

        let outcome = engine.advance(&mut state, Some(Direction::Right));

        assert_eq!(
            outcome,
            StepOutcome::Moved {
                ate_food: true,
                speed_up: true
            }
        );
        assert_eq!(state.score, 5);
        assert_eq!(state.speed, 6.5);

        // ticks without food keep the raised speed as is
        state.food = Cell::new(1, 1);
        engine.advance(&mut state, Some(Direction::Down));
        engine.advance(&mut state, Some(Direction::Down));
        assert_eq!(state.speed, 6.5);
    }

    #[test]
    fn test_wall_collision_leaves_segments_untouched() {
        let mut engine = engine();
        let mut state = state_with(vec![Cell::new(1, 7), Cell::new(2, 7)], Cell::new(9, 9));
        let before = state.snake.segments().to_vec();

        let outcome = engine.advance(&mut state, Some(Direction::Left));

        assert_eq!(outcome, StepOutcome::Collided(CollisionType::Wall));
        assert_eq!(state.snake.segments(), before.as_slice());
    }

    #[test]
    fn test_moving_onto_last_column_is_allowed() {
        let mut engine = engine();
        let mut state = state_with(vec![Cell::new(17, 3)], Cell::new(1, 1));

        let outcome = engine.advance(&mut state, Some(Direction::Right));
        assert!(matches!(outcome, StepOutcome::Moved { .. }));
        assert_eq!(state.snake.head(), Cell::new(18, 3));

        let outcome = engine.advance(&mut state, Some(Direction::Right));
        assert_eq!(outcome, StepOutcome::Collided(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        // square loop: moving up from (5,6) lands on (5,5)
        let mut state = state_with(
            vec![
                Cell::new(5, 6),
                Cell::new(6, 6),
                Cell::new(6, 5),
                Cell::new(5, 5),
                Cell::new(4, 5),
            ],
            Cell::new(9, 9),
        );

        let outcome = engine.advance(&mut state, Some(Direction::Up));

        assert_eq!(outcome, StepOutcome::Collided(CollisionType::SelfCollision));
    }

    #[test]
    fn test_chasing_the_tail_is_safe() {
        let mut engine = engine();
        // 2x2 loop: the head moves into the cell the tail is leaving
        let mut state = state_with(
            vec![
                Cell::new(5, 6),
                Cell::new(6, 6),
                Cell::new(6, 5),
                Cell::new(5, 5),
            ],
            Cell::new(9, 9),
        );

        let outcome = engine.advance(&mut state, Some(Direction::Up));

        assert!(matches!(outcome, StepOutcome::Moved { .. }));
        assert_eq!(state.snake.head(), Cell::new(5, 5));
    }

    #[test]
    fn test_instant_reversal_collides_with_neck() {
        let mut engine = engine();
        let mut state = state_with(
            vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
            Cell::new(9, 9),
        );
        state.snake.direction = Some(Direction::Right);

        let outcome = engine.advance(&mut state, Some(Direction::Left));

        assert_eq!(outcome, StepOutcome::Collided(CollisionType::SelfCollision));
    }

    #[test]
    fn test_filling_the_arena_signals_no_space() {
        let mut engine = GameEngine::new(GameConfig {
            grid_size: 2,
            start: Cell::new(1, 1),
            seed: Some(5),
            ..Default::default()
        })
        .unwrap();
        let mut state = SnakeState::new(
            Snake::from_segments(vec![Cell::new(2, 2), Cell::new(2, 1), Cell::new(1, 1)]).unwrap(),
            Cell::new(1, 2),
            2,
            6.0,
        );
        state.pending_growth = 1;

        let outcome = engine.advance(&mut state, Some(Direction::Left));

        assert_eq!(outcome, StepOutcome::ArenaFull);
        assert_eq!(state.score, 1);
    }
}
