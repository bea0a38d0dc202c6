// src/utils/config.rs

use crate::errors::AppError;
use crate::llm::settings::GenerationDefaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub output_directory: String,
    pub retries: u32,
    #[serde(default)]
    pub generation: GenerationDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "off".to_string(),
            output_directory: "./".to_string(),
            retries: 3,
            generation: GenerationDefaults::default(),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    let mut path = get_executable_dir();
    path.push("config.toml");
    path
}

/// Validate config to prevent obviously wrong or missing values.
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.generation.temperature < 0.0 || config.generation.temperature > 2.0 {
        return Err(AppError::InvalidInput(
            "Temperature must be between 0.0 and 2.0".to_string(),
        ));
    }
    if config.generation.max_tokens == 0 {
        return Err(AppError::InvalidInput(
            "Max tokens cannot be zero".to_string(),
        ));
    }
    if !Path::new(&config.output_directory).is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Output directory does not exist: {}",
            config.output_directory
        )));
    }
    Ok(())
}

/// Read config from file, and create a default config if none exists.
pub fn read_config() -> Result<Config, AppError> {
    let config_path = get_config_path();
    if !config_path.exists() {
        write_config(&Config::default())?;
    }
    let config_str = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&config_str)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn write_config(config: &Config) -> std::io::Result<()> {
    let config_path = get_config_path();
    let config_str = toml::to_string(config).expect("Failed to serialize config");
    fs::write(config_path, config_str)
}

fn get_executable_dir() -> PathBuf {
    env::current_exe()
        .expect("Failed to get the executable path")
        .parent()
        .expect("Failed to get the executable directory")
        .to_path_buf()
}
