//! Error types for everything outside the simulation core.
//!
//! The simulation itself cannot fail; see `compute::tick`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read tuning file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning: {0}")]
    Parse(String),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum GauntletError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
