use thiserror::Error;

use crate::state::MIN_GRID_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small, need at least {}x{}", MIN_GRID_SIZE, MIN_GRID_SIZE)]
    GridTooSmall { width: i32, height: i32 },

    #[error("grid {width}x{height} does not fit the {term_width}x{term_height} terminal")]
    GridExceedsTerminal {
        width: u16,
        height: u16,
        term_width: u16,
        term_height: u16,
    },

    #[error("invalid SNAKE_GRID value {0:?}, expected WIDTHxHEIGHT")]
    InvalidGrid(String),

    #[error("invalid SNAKE_SEED value {0:?}, expected an unsigned integer")]
    InvalidSeed(String),

    #[error("invalid SNAKE_LOG_LEVEL value {0:?}")]
    InvalidLogLevel(String),
}
