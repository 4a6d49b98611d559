//! Per-match heatmap records and their cross-match aggregation input.
//!
//! Each completed match appends one record; hotspot prediction loads every
//! record for the current level. Unreadable files are skipped with a warning
//! rather than aborting the aggregation, since historical data is
//! best-effort.

use std::fs;
use std::path::{Path, PathBuf};

use agent::HeatmapRecord;

use super::{Result, read_json, write_json};

/// Stores heatmaps as `heatmap_level{level}_{seq}.json`.
pub struct HeatmapRepository {
    base_dir: PathBuf,
}

impl HeatmapRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn prefix(level: u32) -> String {
        format!("heatmap_level{level}_")
    }

    /// Appends one match's record under the next free sequence number.
    pub fn save(&self, record: &HeatmapRecord) -> Result<()> {
        let mut seq = self.list_paths(record.level)?.len();
        let path = loop {
            let candidate = self
                .base_dir
                .join(format!("{}{}.json", Self::prefix(record.level), seq));
            if !candidate.exists() {
                break candidate;
            }
            seq += 1;
        };
        write_json(&path, record)
    }

    /// Loads all records for a level, skipping any that fail to parse.
    pub fn load_for_level(&self, level: u32) -> Result<Vec<HeatmapRecord>> {
        let mut records = Vec::new();
        for path in self.list_paths(level)? {
            match read_json::<HeatmapRecord>(&path) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        %error,
                        "skipping unreadable heatmap record"
                    );
                }
            }
        }
        Ok(records)
    }

    fn list_paths(&self, level: u32) -> Result<Vec<PathBuf>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = Self::prefix(level);
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(name) = path.file_name().and_then(|name| name.to_str())
                && name.starts_with(&prefix)
                && name.ends_with(".json")
            {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}
