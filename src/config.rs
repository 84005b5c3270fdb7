//! Game settings: board size, cell size, tick rate and RNG seed.
//!
//! Settings can come from a YAML file; any key left out keeps its default.
//!
//! ```yaml
//! canvas_size: 400
//! cell_size: 20
//! tick_interval_ms: 100
//! seed: 42
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::game::{Game, Grid};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Board width and height in pixels.
    pub canvas_size: u32,
    /// Width and height of one cell in pixels.
    pub cell_size: u32,
    /// Time between two moves.
    pub tick_interval_ms: u64,
    /// Fixed seed for food placement; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { canvas_size: 400, cell_size: 20, tick_interval_ms: 100, seed: None }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid()?;
        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidTickInterval);
        }
        Ok(())
    }

    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.canvas_size, self.cell_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn build_game(&self) -> Result<Game> {
        let grid = self.grid()?;
        Ok(match self.seed {
            Some(seed) => Game::with_seed(grid, seed),
            None => Game::new(grid),
        })
    }
}
