use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest grid side; keeps the rendered board (two columns per cell plus
/// borders) inside a terminal's u16 coordinates.
pub const MAX_TILE_COUNT: usize = 255;

/// Configuration for the game
///
/// Every field has a default, so a JSON file only needs to name the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each side of the square grid
    pub tile_count: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Speed schedule
    /// Tick interval at the start of a session, in milliseconds
    pub initial_speed_ms: u64,
    /// How much the tick interval shrinks on each speed-up
    pub speed_step_ms: u64,
    /// The tick interval never drops below this
    pub min_speed_ms: u64,
    /// Speed up every time the score is a multiple of this
    pub speedup_every: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            initial_snake_length: 3,
            initial_speed_ms: 150,
            speed_step_ms: 10,
            min_speed_ms: 50,
            speedup_every: 5,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.initial_snake_length == 0 {
            bail!("initial_snake_length must be at least 1");
        }
        // The starting snake extends left from the centre and must stay on the grid.
        if self.tile_count / 2 + 1 < self.initial_snake_length {
            bail!(
                "tile_count {} is too small for a snake of length {}",
                self.tile_count,
                self.initial_snake_length
            );
        }
        if self.tile_count > MAX_TILE_COUNT {
            bail!(
                "tile_count {} exceeds the maximum of {}",
                self.tile_count,
                MAX_TILE_COUNT
            );
        }
        // Food needs at least one cell the starting snake does not cover.
        if self.tile_count * self.tile_count <= self.initial_snake_length {
            bail!(
                "a {}x{} grid leaves no room for food next to a snake of length {}",
                self.tile_count,
                self.tile_count,
                self.initial_snake_length
            );
        }
        if self.speedup_every == 0 {
            bail!("speedup_every must be at least 1");
        }
        if self.speed_step_ms == 0 {
            bail!("speed_step_ms must be at least 1");
        }
        if self.min_speed_ms == 0 {
            bail!("min_speed_ms must be at least 1");
        }
        if self.min_speed_ms > self.initial_speed_ms {
            bail!(
                "min_speed_ms ({}) exceeds initial_speed_ms ({})",
                self.min_speed_ms,
                self.initial_speed_ms
            );
        }
        Ok(())
    }

    /// Tick interval at the start of a session
    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_speed_ms)
    }
}
