//! Deterministic pursuit-game primitives shared across crates.
//!
//! `game-core` defines the tile grid, the A* pathfinder, and the shared
//! coordinate/role types. It holds no behavior policy and performs no I/O;
//! the agent and runtime crates build on the pure APIs exposed here.
pub mod config;
pub mod grid;
pub mod path;
pub mod types;

pub use config::GameConfig;
pub use grid::{MapError, TileGrid, TileKind};
pub use path::find_path;
pub use types::{Position, Role, Vec2};
