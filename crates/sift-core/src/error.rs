//! Error types for the outer seams of sift-core
//!
//! Filtering, querying and run control never fail; anomalies there degrade
//! to no-ops. Errors only come from parsing, config I/O and service plumbing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Invalid filter predicate: {0}")]
    InvalidPredicate(String),

    #[error("Failed to read config file: {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to spawn service thread: {0}")]
    ServiceSpawn(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Reply channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, SiftError>;
