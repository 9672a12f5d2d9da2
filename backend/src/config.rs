//! This module is in charge of defining the configuration format with types
//! and reading the configuration.

use serde::Deserialize;
use std::{env, fs};

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Path of the persisted model parameters.
    pub model_path: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            bind: "0.0.0.0:5000".to_string(),
            model_path: fianchetto_model::DEFAULT_MODEL_PATH.to_string(),
        }
    }
}

/// Determines from the first command line argument which config file to load,
/// parses the toml into an EnvironmentConfig struct and returns it.
/// Without an argument the built-in defaults apply, so a plain start binds
/// 0.0.0.0:5000 and reads the model from the working directory.
pub fn load_config() -> EnvironmentConfig {
    match load_config_inner() {
        Ok(config) => config,
        Err(err) => {
            // With the immediate exit, we can't use error!() here.
            println!("Error loading config: {err}");
            std::process::exit(1);
        }
    }
}

/// Inner method to unify error handling
fn load_config_inner() -> Result<EnvironmentConfig, String> {
    let args: Vec<String> = env::args().collect();

    let config_filename = match args.len() {
        1 => return Ok(EnvironmentConfig::default()),
        2 => args[1].clone(),
        _ => {
            return Err(format!("Usage: {} [config_file]", args[0]));
        }
    };

    let config_file = fs::read_to_string(&config_filename)
        .map_err(|_| format!("Could not read config file at path: {config_filename}"))?;

    info!("Loaded config file: {}", config_filename);

    let config: EnvironmentConfig = toml::from_str(&config_file).map_err(|e| {
        format!(
            "Could not parse config file at path: {}\nCaused by: {:?}",
            config_filename, e
        )
    })?;

    Ok(config)
}
