use std::{thread::sleep, time::Duration};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::snake::Direction::{self, *};
use crate::state::{GameState, RandomSource, StdRandom, Status, TickOutcome};
use crate::TermInt;

/// A recognised player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Quit,
}

impl InputEvent {
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputEvent::Up => Some(Up),
            InputEvent::Down => Some(Down),
            InputEvent::Left => Some(Left),
            InputEvent::Right => Some(Right),
            InputEvent::Quit => None,
        }
    }
}

/// Draws the game.
pub trait Renderer {
    fn render(&mut self, state: &GameState) -> Result<()>;

    /// Called once when the game has ended.
    fn render_game_over(&mut self, state: &GameState) -> Result<()>;
}

/// Delivers player input without blocking.
pub trait InputSource {
    fn poll_input(&mut self) -> Result<Option<InputEvent>>;
}

/// Runs a [`GameState`] at a fixed cadence.
pub struct SnakeGame<R: RandomSource> {
    state: GameState,
    rng: R,
    tick_interval: Duration,
    game_over_delay: Duration,
    ticks: u64,
}

impl SnakeGame<StdRandom> {
    /// Sets up a game for a terminal of the given size.
    pub fn from_config(config: &GameConfig, terminal: (TermInt, TermInt)) -> Result<Self, ConfigError> {
        let (width, height) = config.grid_dimensions(terminal)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRandom::from_seed(seed);
        let state = GameState::initialize(width as i32, height as i32, &mut rng)?;

        info!("New game on a {}x{} grid, seed {}", width, height, seed);
        Ok(SnakeGame::new(state, rng, config.tick_interval, config.game_over_delay))
    }
}

impl<R: RandomSource> SnakeGame<R> {
    pub fn new(state: GameState, rng: R, tick_interval: Duration, game_over_delay: Duration) -> Self {
        SnakeGame { state, rng, tick_interval, game_over_delay, ticks: 0 }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Plays until the game is over, then shows the banner and returns.
    pub fn run<T: Renderer + InputSource>(&mut self, term: &mut T) -> Result<()> {
        while !self.state.is_over() {
            term.render(&self.state).context("Failed to draw the game")?;

            if let Some(event) = term.poll_input().context("Failed to read input")? {
                self.handle_input(event);
            }

            if !self.state.is_over() {
                self.step();
            }

            if !self.tick_interval.is_zero() {
                sleep(self.tick_interval);
            }
        }

        if let Status::Over(reason) = self.state.status() {
            info!("Game over ({:?}) after {} ticks, score {}", reason, self.ticks, self.state.score());
        }

        term.render_game_over(&self.state).context("Failed to draw the game over screen")?;

        if !self.game_over_delay.is_zero() {
            sleep(self.game_over_delay);
        }

        Ok(())
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event.direction() {
            Some(dir) => {
                if !self.state.set_direction(dir) {
                    debug!("Ignored turn {:?} while heading {:?}", dir, self.state.direction());
                }
            }
            None => self.state.quit(),
        }
    }

    fn step(&mut self) {
        let len_before = self.state.snake().len();
        let outcome = self.state.tick(&mut self.rng);
        self.ticks += 1;

        if outcome == TickOutcome::Continue && self.state.snake().len() > len_before {
            debug!("Ate food, length {}, next food at {:?}", self.state.snake().len(), self.state.food());
        }
    }
}
