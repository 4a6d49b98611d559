//! Strategic meta-brain persistence.

use std::path::{Path, PathBuf};

use agent::StrategySnapshot;

use super::{Result, read_json, write_json};

/// Stores the strategy table as `strategic_brain.json`.
pub struct StrategyRepository {
    path: PathBuf,
}

impl StrategyRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            path: base_dir.as_ref().join("strategic_brain.json"),
        }
    }

    pub fn save(&self, snapshot: &StrategySnapshot) -> Result<()> {
        write_json(&self.path, snapshot)
    }

    /// Loads the stored table; merging into defaults is the caller's job via
    /// [`agent::StrategicBrain::merge_snapshot`], so newly added strategies
    /// survive old saves.
    pub fn load(&self) -> Result<Option<StrategySnapshot>> {
        read_json(&self.path)
    }
}
