//! Unified error types surfaced by the runtime.
//!
//! Wraps failures from the core, configuration loading and repositories so
//! clients can bubble them up with consistent context.
use std::path::PathBuf;

use combat_core::{ConfigError, MovementError, RestoreError, TimeCostError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error(transparent)]
    Movement(#[from] MovementError),

    #[error("failed to schedule action")]
    Schedule(#[from] TimeCostError),

    #[error("failed to restore snapshot")]
    Restore(#[from] RestoreError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no snapshot saved in slot {slot:?}")]
    SnapshotNotFound { slot: String },
}
