use anyhow::{Context, Result};
use clap::Parser;
use snake_classic::game::{GameConfig, GameEngine};
use snake_classic::modes::HumanMode;
use snake_classic::persistence::JsonFileStore;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_classic")]
#[command(version, about = "Classic grid Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells along each side of the square grid
    #[arg(long)]
    tiles: Option<usize>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    speed: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "snake_classic.log")]
    log_file: PathBuf,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(tiles) = self.tiles {
            config.tile_count = tiles;
        }
        if let Some(speed) = self.speed {
            config.initial_speed_ms = speed;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;
    let config = cli.game_config()?;
    let store = JsonFileStore::new(&cli.high_score_file);
    info!(?config, high_score_file = ?store.path(), "starting");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let mut human_mode = HumanMode::new(engine, store);
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from(["snake_classic", "--tiles", "30", "--speed", "200"]);
        let config = cli.game_config().unwrap();
        assert_eq!(config.tile_count, 30);
        assert_eq!(config.initial_speed_ms, 200);
        assert_eq!(config.min_speed_ms, 50);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let cli = Cli::parse_from(["snake_classic", "--tiles", "2"]);
        assert!(cli.game_config().is_err());

        let cli = Cli::parse_from(["snake_classic", "--tiles", "40000"]);
        assert!(cli.game_config().is_err());
    }

    #[test]
    fn test_default_paths() {
        let cli = Cli::parse_from(["snake_classic"]);
        assert_eq!(cli.high_score_file, PathBuf::from("snake_high_score.json"));
        assert_eq!(cli.config, None);
        assert_eq!(cli.game_config().unwrap(), GameConfig::default());
    }
}
