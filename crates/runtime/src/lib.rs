//! Match runtime: the tick loop, controller seam, and persistence.
//!
//! [`MatchSession`] owns the grid and both controllers and resolves all
//! world-level events (traps, key pickups, exits, catches) inline within a
//! single synchronous tick. Durable state (Q-tables, heatmaps, the strategy
//! table, progression) lives in the file repositories, which are only
//! touched at match boundaries, never inside the hot tick path.
pub mod controller;
pub mod progression;
pub mod repository;
pub mod session;

pub use controller::{Controller, InputController};
pub use progression::Progression;
pub use repository::{
    BrainRepository, HeatmapRepository, ProgressionRepository, RepositoryError, Result,
    StrategyRepository,
};
pub use session::{MatchOutcome, MatchSession, spawn_points};
