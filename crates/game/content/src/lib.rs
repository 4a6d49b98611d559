//! Content production: procedural mazes and text-layout level files.
//!
//! The generator produces the same grid the loader reads back, so hosts can
//! generate fresh mazes per match or ship hand-authored layouts; the
//! runtime never knows the difference.
pub mod loader;
pub mod maze;

pub use loader::{LoadResult, load_level, save_level};
pub use maze::MazeGenerator;
