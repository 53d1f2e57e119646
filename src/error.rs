//! Error types
//!
//! Geometry is total over finite coordinates, so the only failures the
//! simulation surfaces are an exhausted spawn search and a bad config.

use thiserror::Error;

use crate::sim::EntityKind;

/// Spawning failed within the attempt budget
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// Every sampled position violated a spawn constraint
    #[error("cannot place {kind:?}: board too crowded after {attempts} attempts")]
    Exhausted {
        /// What was being placed
        kind: EntityKind,
        /// Candidates tried
        attempts: u32,
    },
}

/// Configuration could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}
