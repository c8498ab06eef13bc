//! YAML configuration loading

use crate::error::{Result, SiftError};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and parse a YAML configuration file
///
/// Unlike [`load_config`], every failure is reported to the caller.
pub fn read_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let contents = std::fs::read_to_string(path).map_err(|source| SiftError::Config {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str::<T>(&contents).map_err(|source| SiftError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return T::default();
    }

    match read_config(path) {
        Ok(config) => {
            log::info!("load_config: Successfully loaded config from {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("load_config: {}, using defaults", e);
            T::default()
        }
    }
}
