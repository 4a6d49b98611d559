//! Tabular Q-learning brain with epsilon-greedy action selection.
//!
//! One brain instance exists per agent and role. States are created lazily
//! on first lookup with every legal action initialized to zero, so the table
//! only ever holds rows whose width matches the role's action set. Snapshots
//! cross the persistence boundary as plain serde values; a stored table whose
//! action width no longer matches the current action set is discarded rather
//! than partially reused.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use game_core::Role;

use crate::state_key::StateKey;

/// Macro behavior states; each role draws from its own three-action subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Mode {
    // Hunter
    Patrol,
    Chase,
    Investigate,
    // Survivor
    Scavenge,
    Evade,
    Explore,
}

/// The legal macro-action set for a role, in fixed enumeration order.
///
/// Enumeration order is load-bearing: Q-table rows are indexed by position in
/// this slice, and greedy ties break toward the earliest entry.
pub fn role_actions(role: Role) -> &'static [Mode] {
    match role {
        Role::Hunter => &[Mode::Patrol, Mode::Chase, Mode::Investigate],
        Role::Survivor => &[Mode::Scavenge, Mode::Evade, Mode::Explore],
    }
}

/// Initial behavior state for a role.
pub fn initial_mode(role: Role) -> Mode {
    match role {
        Role::Hunter => Mode::Patrol,
        Role::Survivor => Mode::Explore,
    }
}

/// Durable form of a Q-table, tagged with the action width it was built for.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BrainSnapshot {
    pub action_count: usize,
    pub table: HashMap<String, Vec<f64>>,
}

/// Tabular state-action value store with an epsilon-greedy policy.
pub struct QBrain {
    role: Role,
    actions: &'static [Mode],
    learning_rate: f64,
    discount: f64,
    epsilon: f64,
    table: HashMap<String, Vec<f64>>,
    rng: StdRng,
}

impl QBrain {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_DISCOUNT: f64 = 0.9;
    pub const DEFAULT_EPSILON: f64 = 0.1;

    pub fn new(role: Role) -> Self {
        Self {
            role,
            actions: role_actions(role),
            learning_rate: Self::DEFAULT_LEARNING_RATE,
            discount: Self::DEFAULT_DISCOUNT,
            epsilon: Self::DEFAULT_EPSILON,
            table: HashMap::new(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Replaces the policy RNG with a seeded one for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Overrides the exploration rate (0 disables random exploration).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Number of distinct states encountered so far.
    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Epsilon-greedy selection over the role's action set.
    ///
    /// With probability epsilon a uniformly random legal action is returned;
    /// otherwise the stored maximum for the state, ties breaking toward the
    /// earliest action in enumeration order.
    pub fn choose_action(&mut self, state: &StateKey) -> Mode {
        let key = state.to_string();
        let width = self.actions.len();
        let row = self.table.entry(key).or_insert_with(|| vec![0.0; width]);

        if self.rng.random::<f64>() < self.epsilon {
            return *self.actions.choose(&mut self.rng).expect("non-empty action set");
        }

        let mut best = 0;
        for (index, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = index;
            }
        }
        self.actions[best]
    }

    /// One-step Q-update:
    /// `Q[s,a] += α · (reward + γ · max_a' Q[s',a'] − Q[s,a])`.
    pub fn learn(&mut self, state: &StateKey, action: Mode, reward: f64, next_state: &StateKey) {
        let Some(index) = self.actions.iter().position(|&a| a == action) else {
            return;
        };

        let width = self.actions.len();
        let next_key = next_state.to_string();
        let next_max = self
            .table
            .entry(next_key)
            .or_insert_with(|| vec![0.0; width])
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let row = self
            .table
            .entry(state.to_string())
            .or_insert_with(|| vec![0.0; width]);
        let old = row[index];
        row[index] = old + self.learning_rate * (reward + self.discount * next_max - old);
    }

    pub fn snapshot(&self) -> BrainSnapshot {
        BrainSnapshot {
            action_count: self.actions.len(),
            table: self.table.clone(),
        }
    }

    /// Installs a previously persisted table.
    ///
    /// A snapshot whose action width differs from the current action set is
    /// discarded wholesale: correctness over backward compatibility.
    pub fn restore(&mut self, snapshot: BrainSnapshot) {
        let width = self.actions.len();
        let compatible = snapshot.action_count == width
            && snapshot.table.values().all(|row| row.len() == width);

        if !compatible {
            tracing::warn!(
                role = %self.role,
                stored = snapshot.action_count,
                current = width,
                "persisted q-table has a mismatched action width, starting fresh"
            );
            self.table = HashMap::new();
            return;
        }

        tracing::info!(role = %self.role, states = snapshot.table.len(), "q-table restored");
        self.table = snapshot.table;
    }
}
