//! Offline training entry point: replays a PGN collection into a training
//! set, fits the policy network, and writes the parameters to disk. The
//! server picks the file up on its next start.

use anyhow::{bail, Context, Result};
use candle_core::Device;
use fianchetto::dataset::{build_dataset, load_games};
use fianchetto_model::{training, DEFAULT_MODEL_PATH};
use log::{info, warn};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;

const DEFAULT_PGN_PATH: &str = "games.pgn";

fn main() -> Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let args: Vec<String> = env::args().collect();
    let (pgn_path, model_path) = match args.len() {
        1 => (DEFAULT_PGN_PATH, DEFAULT_MODEL_PATH),
        2 => (args[1].as_str(), DEFAULT_MODEL_PATH),
        3 => (args[1].as_str(), args[2].as_str()),
        _ => bail!("Usage: {} [pgn_file] [model_file]", args[0]),
    };

    let games = load_games(pgn_path)
        .with_context(|| format!("Could not load games from {pgn_path}"))?;
    info!("Loaded {} games from {}", games.len(), pgn_path);

    let (set, dropped) = build_dataset(&games);
    if dropped > 0 {
        warn!("Dropped {} plies that did not replay as legal moves", dropped);
    }
    info!("Built {} training examples", set.len());

    let report = training::train_and_save(&set, model_path, &Device::Cpu)
        .context("Training failed")?;
    info!(
        "Saved model to {} (final train loss {:.4})",
        model_path, report.train_loss
    );

    Ok(())
}
