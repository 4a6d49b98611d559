//! Q-table persistence, one record per role.

use std::path::{Path, PathBuf};

use agent::BrainSnapshot;
use game_core::Role;

use super::{Result, read_json, write_json};

/// Stores Q-table snapshots as `{role}_qtable.json`.
pub struct BrainRepository {
    base_dir: PathBuf,
}

impl BrainRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, role: Role) -> PathBuf {
        self.base_dir
            .join(format!("{}_qtable.json", role.to_string().to_lowercase()))
    }

    pub fn save(&self, role: Role, snapshot: &BrainSnapshot) -> Result<()> {
        write_json(&self.path(role), snapshot)
    }

    /// Loads the stored snapshot; `None` means no prior knowledge exists.
    /// Width validation against the live action set happens in
    /// [`agent::QBrain::restore`], not here.
    pub fn load(&self, role: Role) -> Result<Option<BrainSnapshot>> {
        read_json(&self.path(role))
    }
}
