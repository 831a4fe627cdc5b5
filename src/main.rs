use std::fs::File;

use anyhow::{Context, Result};
use log::{error, info};
use simplelog::{Config, WriteLogger};

use term_snake::config::GameConfig;
use term_snake::game::SnakeGame;
use term_snake::term::TermManager;

fn main() -> Result<()> {
    let config = GameConfig::from_env()?;

    // The game owns the terminal, so logs only ever go to a file
    if let Some(path) = &config.log_file {
        let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
        WriteLogger::init(config.log_level, Config::default(), file).context("Failed to initialize logger")?;
    }

    let mut term = TermManager::new()?;
    let mut game = SnakeGame::from_config(&config, term.get_terminal_size())?;

    term.setup()?;
    let result = game.run(&mut term);

    // Restore the terminal even if the game loop failed
    match (result, term.restore()) {
        (Err(e), Err(restore_err)) => {
            error!("Failed to restore the terminal: {:?}", restore_err);
            Err(e)
        }
        (result, restored) => {
            result?;
            restored?;
            info!("Exiting");
            Ok(())
        }
    }
}
