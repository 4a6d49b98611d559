//! Progression record persistence.

use std::path::{Path, PathBuf};

use super::{Result, read_json, write_json};
use crate::progression::Progression;

/// Stores the progression record as `progression.json`.
pub struct ProgressionRepository {
    path: PathBuf,
}

impl ProgressionRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            path: base_dir.as_ref().join("progression.json"),
        }
    }

    pub fn save(&self, progression: &Progression) -> Result<()> {
        write_json(&self.path, progression)
    }

    pub fn load(&self) -> Result<Option<Progression>> {
        read_json(&self.path)
    }
}
