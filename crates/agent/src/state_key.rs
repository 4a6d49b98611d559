//! Discretized state buckets for the tabular Q-learning brain.
//!
//! The world is far too large to enumerate, so decisions are keyed by a
//! coarse composition of threat distance, line-of-sight, and objective
//! progress. Keys render to stable strings which double as the persistence
//! format for Q-table rows.

use std::fmt;

/// Coarse threat-distance bucket, measured in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum DistanceBand {
    Near,
    Medium,
    Far,
}

impl DistanceBand {
    /// Buckets a distance: < 5 near, < 10 medium, otherwise far.
    pub fn from_distance(distance: f32) -> Self {
        if distance < 5.0 {
            DistanceBand::Near
        } else if distance < 10.0 {
            DistanceBand::Medium
        } else {
            DistanceBand::Far
        }
    }
}

/// Whether the opponent is currently inside the vision radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl From<bool> for Visibility {
    fn from(can_see: bool) -> Self {
        if can_see {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

/// Discretized decision state: distance band × objective progress × sight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub distance: DistanceBand,
    /// Keys still missing from the survivor's quota.
    pub keys_left: u32,
    pub visibility: Visibility,
}

impl StateKey {
    pub fn new(distance: f32, keys_left: u32, can_see: bool) -> Self {
        Self {
            distance: DistanceBand::from_distance(distance),
            keys_left,
            visibility: Visibility::from(can_see),
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.distance, self.keys_left, self.visibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_band_boundaries() {
        assert_eq!(DistanceBand::from_distance(0.0), DistanceBand::Near);
        assert_eq!(DistanceBand::from_distance(4.9), DistanceBand::Near);
        assert_eq!(DistanceBand::from_distance(5.0), DistanceBand::Medium);
        assert_eq!(DistanceBand::from_distance(9.9), DistanceBand::Medium);
        assert_eq!(DistanceBand::from_distance(10.0), DistanceBand::Far);
        assert_eq!(DistanceBand::from_distance(999.0), DistanceBand::Far);
    }

    #[test]
    fn key_renders_stable_string() {
        let key = StateKey::new(3.2, 2, true);
        assert_eq!(key.to_string(), "NEAR_2_VISIBLE");

        let key = StateKey::new(20.0, 0, false);
        assert_eq!(key.to_string(), "FAR_0_HIDDEN");
    }
}
