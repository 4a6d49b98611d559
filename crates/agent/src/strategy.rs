//! Match-level strategy selection: a weighted bandit with tier unlocks.
//!
//! Independent of the per-tick brain: one strategy is picked per match,
//! its weight is adjusted by the outcome, and the whole table persists as a
//! flat snapshot. Locked strategies migrate permanently into the active set
//! once the agent's level reaches their tier. Loading merges into the
//! defaults instead of replacing them, so strategies added after a save was
//! written are not erased.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use game_core::Role;

/// Named high-level hunter strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    RushSpawn,
    CampTraps,
    PatrolKeys,
    ZoneDefense,
    PredictiveCutoff,
    BerserkRush,
}

/// Outcome statistics and selection weight for one strategy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrategyRecord {
    pub successes: u32,
    pub failures: u32,
    pub weight: f64,
    pub tier: u32,
}

impl StrategyRecord {
    fn fresh(weight: f64, tier: u32) -> Self {
        Self {
            successes: 0,
            failures: 0,
            weight,
            tier,
        }
    }
}

/// How the most recent pick was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionKind {
    Exploration,
    Exploitation,
    Fallback,
}

/// Durable form of the strategy table.
pub type StrategySnapshot = BTreeMap<Strategy, StrategyRecord>;

/// Weighted bandit over named strategies with tier-gated unlocks.
pub struct StrategicBrain {
    /// Unlocked strategies eligible for selection.
    active: BTreeMap<Strategy, StrategyRecord>,
    /// Strategies still gated behind a progression tier.
    locked: BTreeMap<Strategy, StrategyRecord>,
    current: Option<Strategy>,
    rng: StdRng,
}

impl StrategicBrain {
    /// Weight floor a losing strategy can never drop below.
    pub const WEIGHT_FLOOR: f64 = 0.1;
    /// Match duration under which a win earns the efficiency bonus.
    pub const EFFICIENT_WIN_SECS: f32 = 20.0;
    const FALLBACK: Strategy = Strategy::PatrolKeys;

    pub fn new() -> Self {
        let active = BTreeMap::from([
            (Strategy::RushSpawn, StrategyRecord::fresh(1.0, 1)),
            (Strategy::CampTraps, StrategyRecord::fresh(1.0, 1)),
            (Strategy::PatrolKeys, StrategyRecord::fresh(1.0, 1)),
        ]);
        let locked = BTreeMap::from([
            (Strategy::ZoneDefense, StrategyRecord::fresh(1.5, 5)),
            (Strategy::PredictiveCutoff, StrategyRecord::fresh(1.5, 10)),
            (Strategy::BerserkRush, StrategyRecord::fresh(2.0, 15)),
        ]);
        Self {
            active,
            locked,
            current: None,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn current(&self) -> Option<Strategy> {
        self.current
    }

    pub fn is_unlocked(&self, strategy: Strategy) -> bool {
        self.active.contains_key(&strategy)
    }

    /// Migrates every locked strategy whose tier the level has reached.
    /// Unlocks are permanent; the strategy never returns to the locked set.
    pub fn check_unlocks(&mut self, level: u32) {
        let ready: Vec<Strategy> = self
            .locked
            .iter()
            .filter(|(_, record)| level >= record.tier)
            .map(|(&strategy, _)| strategy)
            .collect();
        for strategy in ready {
            let record = self.locked.remove(&strategy).expect("present");
            tracing::info!(%strategy, tier = record.tier, "strategy unlocked");
            self.active.insert(strategy, record);
        }
    }

    /// Picks the strategy for the next match.
    ///
    /// Unlocks are processed first. With probability `exploration_rate` the
    /// pick is uniform over the active set; otherwise it is weighted by each
    /// strategy's current weight, falling back to a fixed default when the
    /// total weight is non-positive.
    pub fn pick_strategy(&mut self, level: u32, exploration_rate: f64) -> (Strategy, SelectionKind) {
        self.check_unlocks(level);

        if self.rng.random::<f64>() < exploration_rate {
            let pick = self
                .active
                .keys()
                .copied()
                .choose(&mut self.rng)
                .expect("active set is never empty");
            self.current = Some(pick);
            return (pick, SelectionKind::Exploration);
        }

        let total: f64 = self.active.values().map(|record| record.weight).sum();
        if total > 0.0 {
            let mut roll = self.rng.random_range(0.0..total);
            for (&strategy, record) in &self.active {
                roll -= record.weight;
                if roll <= 0.0 {
                    self.current = Some(strategy);
                    return (strategy, SelectionKind::Exploitation);
                }
            }
        }

        self.current = Some(Self::FALLBACK);
        (Self::FALLBACK, SelectionKind::Fallback)
    }

    /// Feeds the match outcome back into the picked strategy's weight:
    /// a win increments it (with a bonus for fast wins), a loss decrements
    /// it down to the floor.
    pub fn report_result(&mut self, winner: Role, duration: f32) {
        let Some(strategy) = self.current else {
            return;
        };
        let Some(record) = self.active.get_mut(&strategy) else {
            return;
        };

        if winner == Role::Hunter {
            record.successes += 1;
            record.weight += 0.5;
            if duration < Self::EFFICIENT_WIN_SECS {
                record.weight += 0.5;
            }
        } else {
            record.failures += 1;
            record.weight = (record.weight - 0.2).max(Self::WEIGHT_FLOOR);
        }
        tracing::debug!(%strategy, %winner, weight = record.weight, "strategy result recorded");
    }

    pub fn snapshot(&self) -> StrategySnapshot {
        self.active.clone()
    }

    /// Merges a persisted table into the defaults.
    ///
    /// Known active strategies take the stored record; stored strategies that
    /// are still locked by default are unlocked with their stored state.
    /// Strategies missing from the snapshot keep their defaults.
    pub fn merge_snapshot(&mut self, snapshot: StrategySnapshot) {
        for (strategy, record) in snapshot {
            if self.active.contains_key(&strategy) {
                self.active.insert(strategy, record);
            } else if self.locked.remove(&strategy).is_some() {
                self.active.insert(strategy, record);
            }
        }
    }
}

impl Default for StrategicBrain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_with_three_active_strategies() {
        let brain = StrategicBrain::new();
        assert_eq!(brain.snapshot().len(), 3);
        assert!(brain.is_unlocked(Strategy::RushSpawn));
        assert!(!brain.is_unlocked(Strategy::BerserkRush));
    }

    #[test]
    fn unlocks_migrate_at_tier_and_are_permanent() {
        let mut brain = StrategicBrain::new().with_seed(9);
        brain.check_unlocks(4);
        assert!(!brain.is_unlocked(Strategy::ZoneDefense));

        brain.check_unlocks(5);
        assert!(brain.is_unlocked(Strategy::ZoneDefense));
        assert!(!brain.is_unlocked(Strategy::PredictiveCutoff));

        brain.check_unlocks(15);
        assert!(brain.is_unlocked(Strategy::PredictiveCutoff));
        assert!(brain.is_unlocked(Strategy::BerserkRush));
    }

    #[test]
    fn losses_floor_the_weight() {
        let mut brain = StrategicBrain::new().with_seed(9);
        brain.pick_strategy(1, 0.0);
        for _ in 0..20 {
            brain.report_result(Role::Survivor, 30.0);
        }
        let strategy = brain.current().unwrap();
        let record = brain.snapshot()[&strategy];
        assert_eq!(record.weight, StrategicBrain::WEIGHT_FLOOR);
        assert_eq!(record.failures, 20);
    }

    #[test]
    fn fast_wins_earn_the_efficiency_bonus() {
        let mut brain = StrategicBrain::new().with_seed(9);
        brain.pick_strategy(1, 0.0);
        let strategy = brain.current().unwrap();
        let before = brain.snapshot()[&strategy].weight;

        brain.report_result(Role::Hunter, 10.0);
        let record = brain.snapshot()[&strategy];
        assert_eq!(record.weight, before + 1.0);
        assert_eq!(record.successes, 1);
    }

    #[test]
    fn exploration_rate_one_always_explores() {
        let mut brain = StrategicBrain::new().with_seed(9);
        let (_, kind) = brain.pick_strategy(1, 1.0);
        assert_eq!(kind, SelectionKind::Exploration);
    }

    #[test]
    fn weighted_selection_tags_exploitation() {
        let mut brain = StrategicBrain::new().with_seed(9);
        let (strategy, kind) = brain.pick_strategy(1, 0.0);
        assert_eq!(kind, SelectionKind::Exploitation);
        assert!(brain.is_unlocked(strategy));
    }

    #[test]
    fn merge_keeps_new_defaults_and_restores_stored_unlocks() {
        let mut stored = StrategySnapshot::new();
        stored.insert(
            Strategy::RushSpawn,
            StrategyRecord {
                successes: 7,
                failures: 2,
                weight: 3.5,
                tier: 1,
            },
        );
        // An unlock earned in a previous run.
        stored.insert(
            Strategy::ZoneDefense,
            StrategyRecord {
                successes: 1,
                failures: 0,
                weight: 2.0,
                tier: 5,
            },
        );

        let mut brain = StrategicBrain::new().with_seed(9);
        brain.merge_snapshot(stored);

        let table = brain.snapshot();
        assert_eq!(table[&Strategy::RushSpawn].successes, 7);
        assert_eq!(table[&Strategy::ZoneDefense].weight, 2.0);
        // Defaults not present in the save survive the merge.
        assert!(table.contains_key(&Strategy::CampTraps));
        assert!(table.contains_key(&Strategy::PatrolKeys));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut brain = StrategicBrain::new().with_seed(9);
        brain.pick_strategy(1, 0.0);
        brain.report_result(Role::Hunter, 25.0);

        let json = serde_json::to_string(&brain.snapshot()).unwrap();
        let decoded: StrategySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, brain.snapshot());
    }
}
