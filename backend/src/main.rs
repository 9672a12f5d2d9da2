mod config;
mod prediction;
mod server;

#[macro_use]
extern crate log;

#[cfg(test)]
mod test;

use candle_core::Device;
use config::EnvironmentConfig;
use fianchetto_model::Predictor;
use std::fs::File;
use std::sync::Arc;

/// Process-wide state shared by all request handlers. The predictor is
/// loaded once here and never written to afterwards, so handlers can share
/// it without any locking.
#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub predictor: Arc<Predictor>,
}

fn init_logger() {
    use simplelog::*;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create("server.log").unwrap(),
        ),
    ])
    .unwrap();

    debug!("Logger successfully initialized");
}

#[tokio::main]
async fn main() {
    init_logger();

    let config = config::load_config();

    // If there is no model file, the server is allowed to just crash.
    // Serving without a model makes no sense.
    let predictor = match Predictor::load(&config.model_path, Device::Cpu) {
        Ok(predictor) => predictor,
        Err(err) => {
            error!(
                "Could not load model from {}: {}",
                config.model_path, err
            );
            std::process::exit(1);
        }
    };
    info!("Model loaded from {}", config.model_path);

    let state = AppState {
        config,
        predictor: Arc::new(predictor),
    };

    server::run(state).await;
}
