//! File-backed repositories for everything that outlives a match.
//!
//! All records are JSON files under a base directory. Writes go through a
//! temp file plus atomic rename so a crash mid-save never leaves a truncated
//! record behind. Reads distinguish "missing" (a normal fresh start) from
//! "corrupt" (surfaced as an error for the caller to downgrade and log);
//! a failed save or load must never abort an active match.

mod brain;
mod heatmap;
mod progression;
mod strategy;

pub use brain::BrainRepository;
pub use heatmap::HeatmapRepository;
pub use progression::ProgressionRepository;
pub use strategy::StrategyRepository;

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Serializes a value to JSON at `path` via temp file + atomic rename.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json =
        serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    tracing::debug!(path = %path.display(), "record saved");
    Ok(())
}

/// Reads a JSON record, returning `Ok(None)` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    tracing::debug!(path = %path.display(), "record loaded");
    Ok(Some(value))
}
