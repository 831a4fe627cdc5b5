use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::ConfigError;
use crate::snake::{Direction, Snake};
use crate::Coords;

/// Smallest grid that fits the starting snake and a food cell inside the border.
pub const MIN_GRID_SIZE: i32 = 7;

pub const INITIAL_HEAD: Coords = (5, 5);
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Source of randomness for food placement.
pub trait RandomSource {
    /// Uniform integer in `min..=max`.
    fn uniform_int(&mut self, min: i32, max: i32) -> i32;
}

/// `StdRng`-backed source, reproducible from its seed.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_seed(seed: u64) -> Self {
        StdRandom { rng: StdRng::seed_from_u64(seed) }
    }
}

impl RandomSource for StdRandom {
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..=max)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverReason {
    Wall,
    SelfCollision,
    Quit,
    /// The snake covers the whole playing field.
    BoardFilled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Over(OverReason),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    width: i32,
    height: i32,
    snake: Snake,
    food: Coords,
    status: Status,
}

impl GameState {
    pub fn initialize<R: RandomSource>(width: i32, height: i32, rng: &mut R) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall { width, height });
        }

        let snake = Snake::new(INITIAL_HEAD, INITIAL_SNAKE_LENGTH, INITIAL_DIRECTION);
        // A 7x7 grid has 25 interior cells, so this only fails on a grid too small to play
        let food = spawn_food(width, height, &snake, rng).ok_or(ConfigError::GridTooSmall { width, height })?;

        Ok(GameState { width, height, snake, food, status: Status::Running })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::Over(_))
    }

    pub fn score(&self) -> usize {
        self.snake.len().saturating_sub(INITIAL_SNAKE_LENGTH)
    }

    /// True for cells strictly inside the border ring.
    pub fn is_interior(&self, pos: Coords) -> bool {
        pos.0 > 0 && pos.0 < self.width - 1 && pos.1 > 0 && pos.1 < self.height - 1
    }

    /// Requests a turn. It is silently ignored if it is the opposite of the
    /// current direction or of the direction of the last step taken, and
    /// after the game has ended.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.is_over() {
            return false;
        }

        self.snake.set_direction(direction)
    }

    /// Ends the game right away, e.g. when the player quits.
    pub fn quit(&mut self) {
        if !self.is_over() {
            self.status = Status::Over(OverReason::Quit);
        }
    }

    /// Advances the game by one step.
    pub fn tick<R: RandomSource>(&mut self, rng: &mut R) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::GameOver;
        }

        let new_head = self.snake.next_head();

        if !self.is_interior(new_head) {
            self.status = Status::Over(OverReason::Wall);
            return TickOutcome::GameOver;
        }

        // The tail counts even though it would move out of the way this step
        if self.snake.contains(&new_head) {
            self.status = Status::Over(OverReason::SelfCollision);
            return TickOutcome::GameOver;
        }

        let ate = new_head == self.food;
        self.snake.advance(new_head, ate);

        if ate {
            match spawn_food(self.width, self.height, &self.snake, rng) {
                Some(food) => self.food = food,
                None => {
                    self.status = Status::Over(OverReason::BoardFilled);
                    return TickOutcome::GameOver;
                }
            }
        }

        TickOutcome::Continue
    }
}

/// Picks a uniformly random interior cell not covered by the snake, or `None`
/// if the snake fills the whole interior.
fn spawn_food<R: RandomSource>(width: i32, height: i32, snake: &Snake, rng: &mut R) -> Option<Coords> {
    let occupied: HashSet<&Coords> = snake.body().collect();
    let mut choices = Vec::new();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if !occupied.contains(&(x, y)) {
                choices.push((x, y));
            }
        }
    }

    if choices.is_empty() {
        return None;
    }

    let i = rng.uniform_int(0, choices.len() as i32 - 1);
    choices.get(i as usize).copied()
}
