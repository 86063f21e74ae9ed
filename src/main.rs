use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::audio::{Silent, SoundSink, TerminalBell};
use grid_snake::game::GameConfig;
use grid_snake::game::collision::in_bounds;
use grid_snake::modes::HumanMode;
use grid_snake::storage::JsonFileScoreStore;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// JSON game config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena side length
    #[arg(long)]
    grid_size: Option<i32>,

    /// Starting speed in ticks per second
    #[arg(long)]
    speed: Option<f64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Ignore steering straight back into the body
    #[arg(long)]
    forbid_reversal: bool,

    /// Where the high score is kept
    #[arg(long, default_value = ".grid_snake_hiscore.json")]
    high_score_file: PathBuf,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not ring the terminal bell
    #[arg(long)]
    mute: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
            if !in_bounds(config.start, grid_size) {
                config.start = GameConfig::new(grid_size).start;
            }
        }
        if let Some(speed) = self.speed {
            config.initial_speed = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.forbid_reversal {
            config.forbid_reversal = true;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

fn init_logging(log_file: &Path) -> Result<()> {
    let file = std::fs::File::create(log_file)
        .with_context(|| format!("Failed to create log file {:?}", log_file))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "grid_snake=info".into()),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_file) = &cli.log_file {
        init_logging(log_file)?;
    }

    let config = cli.game_config()?;
    let store = JsonFileScoreStore::new(&cli.high_score_file);
    let sound: Box<dyn SoundSink> = if cli.mute {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell::new(std::io::stdout()))
    };

    tracing::info!(
        grid_size = config.grid_size,
        speed = config.initial_speed,
        high_score_file = ?store.path(),
        "Starting"
    );

    let mut human_mode = HumanMode::new(config, Box::new(store), sound)?;
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file_before_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        // on its own this file is invalid: (13, 15) lies outside a 10x10 arena
        std::fs::write(&path, r#"{ "grid_size": 10, "initial_speed": 8.0 }"#).unwrap();
        let path_arg = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["grid_snake", "--config", path_arg, "--grid-size", "20"])
            .unwrap();
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_size, 20);
        assert_eq!(config.start, GameConfig::default().start);
        assert_eq!(config.initial_speed, 8.0);

        let cli = Cli::try_parse_from(["grid_snake", "--config", path_arg]).unwrap();
        assert!(cli.game_config().is_err());
    }

    #[test]
    fn test_out_of_range_flags_are_rejected() {
        let cli = Cli::try_parse_from(["grid_snake", "--speed", "1e-20"]).unwrap();
        assert!(cli.game_config().is_err());

        let cli = Cli::try_parse_from(["grid_snake", "--grid-size", "100000"]).unwrap();
        assert!(cli.game_config().is_err());
    }
}
