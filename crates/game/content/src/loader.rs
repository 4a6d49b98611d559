//! Text-layout level files.
//!
//! One character per tile, one line per row; the on-disk format is exactly
//! what [`TileGrid::parse`] and [`TileGrid::to_layout`] exchange.

use std::path::Path;

use game_core::TileGrid;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a level layout from a text file.
pub fn load_level(path: &Path) -> LoadResult<TileGrid> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read level file {}: {}", path.display(), e))?;
    let grid = TileGrid::parse(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse level file {}: {}", path.display(), e))?;
    tracing::debug!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        "level loaded"
    );
    Ok(grid)
}

/// Writes a level layout to a text file, creating parent directories.
pub fn save_level(path: &Path, grid: &TileGrid) -> LoadResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, grid.to_layout())
        .map_err(|e| anyhow::anyhow!("Failed to write level file {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::MazeGenerator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_levels_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels").join("level_1.txt");

        let mut rng = StdRng::seed_from_u64(11);
        let grid = MazeGenerator::new(6, 6).generate(1, &mut rng);
        save_level(&path, &grid).unwrap();

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_level(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read level file"));
    }
}
