use std::{path::PathBuf, time::Duration};

use log::LevelFilter;

use crate::error::ConfigError;
use crate::TermInt;

const TICK_INTERVAL_MS: u64 = 100;
const GAME_OVER_DELAY_MS: u64 = 2000;

pub const GRID_VAR: &str = "SNAKE_GRID";
pub const SEED_VAR: &str = "SNAKE_SEED";
pub const LOG_FILE_VAR: &str = "SNAKE_LOG";
pub const LOG_LEVEL_VAR: &str = "SNAKE_LOG_LEVEL";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GridSize {
    /// Use the whole terminal.
    Terminal,
    Fixed { width: TermInt, height: TermInt },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub grid: GridSize,
    /// Seed for food placement; a random one is picked when unset.
    pub seed: Option<u64>,
    pub tick_interval: Duration,
    /// How long the game-over banner stays up before exiting.
    pub game_over_delay: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: GridSize::Terminal,
            seed: None,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            game_over_delay: Duration::from_millis(GAME_OVER_DELAY_MS),
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from a variable lookup. Unset or blank variables
    /// keep their defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = GameConfig::default();

        if let Some(grid) = get(GRID_VAR) {
            config.grid = parse_grid(&grid)?;
        }

        if let Some(seed) = get(SEED_VAR) {
            config.seed = Some(seed.parse().map_err(|_| ConfigError::InvalidSeed(seed.clone()))?);
        }

        config.log_file = get(LOG_FILE_VAR).map(PathBuf::from);

        if let Some(level) = get(LOG_LEVEL_VAR) {
            config.log_level = level.parse().map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?;
        }

        Ok(config)
    }

    /// Grid dimensions to play on, given the terminal size.
    pub fn grid_dimensions(&self, terminal: (TermInt, TermInt)) -> Result<(TermInt, TermInt), ConfigError> {
        let (term_width, term_height) = terminal;

        match self.grid {
            GridSize::Terminal => Ok(terminal),
            GridSize::Fixed { width, height } if width > term_width || height > term_height => {
                Err(ConfigError::GridExceedsTerminal { width, height, term_width, term_height })
            }
            GridSize::Fixed { width, height } => Ok((width, height)),
        }
    }
}

fn parse_grid(value: &str) -> Result<GridSize, ConfigError> {
    let invalid = || ConfigError::InvalidGrid(value.to_string());

    let mut parts = value.splitn(2, |c| c == 'x' || c == 'X');
    let width = parts.next().ok_or_else(invalid)?.trim().parse().map_err(|_| invalid())?;
    let height = parts.next().ok_or_else(invalid)?.trim().parse().map_err(|_| invalid())?;

    Ok(GridSize::Fixed { width, height })
}
