//! Agent decision stack: perception, learning, and per-role behavior.
//!
//! Each agent owns a [`QBrain`] (tabular Q-learning over discretized state
//! buckets), a [`PerceptionMemory`] (vision-derived belief sets plus a visit
//! heatmap), and an [`AgentCore`] that fuses both with A* pathfinding into
//! movement and ability decisions every simulation tick. The optional
//! [`StrategicBrain`] layers match-level strategy selection on top.
//!
//! Nothing in this crate performs I/O. Durable state crosses the boundary as
//! serde snapshot values; the runtime crate owns the files they live in.
pub mod brain;
pub mod core;
pub mod events;
pub mod hunter;
pub mod movement;
pub mod perception;
pub mod state_key;
pub mod strategy;
pub mod survivor;

pub use brain::{BrainSnapshot, Mode, QBrain, role_actions};
pub use self::core::{AgentCore, TickContext};
pub use events::{DecisionEvent, EventSource, MatchEvents, RewardKind, SoundCue};
pub use movement::collides;
pub use perception::{HeatmapRecord, PerceptionMemory};
pub use state_key::{DistanceBand, StateKey, Visibility};
pub use strategy::{SelectionKind, StrategicBrain, Strategy, StrategyRecord, StrategySnapshot};
