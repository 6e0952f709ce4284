//! Configuration file loading for the CLI.
//!
//! Finds and loads TOML configuration from an explicit path, the local
//! project directory, or the platform config directory, in that order.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use machina::{MachinaError, config::AppConfig};

/// Configuration-related errors for the CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for MachinaError {
    fn from(err: ConfigError) -> Self {
        MachinaError::Io(io::Error::other(err.to_string()))
    }
}

/// Find and load configuration.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (`machina/config.toml`)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns an error if an explicit path does not exist, or if a found
/// config file cannot be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MachinaError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("machina/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "machina", "machina") {
        let system_config = proj_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            info!(path = system_config.display().to_string(); "loading configuration from system path");
            return load_config_file(system_config);
        }
        debug!(path = system_config.display().to_string(); "system configuration file not found");
    } else {
        debug!("could not determine platform-specific config directory");
    }

    debug!("no configuration file found, using defaults");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, MachinaError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;

    Ok(config)
}
