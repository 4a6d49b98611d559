//! Explicit match event log shared between agents and the session.
//!
//! Replaces ambient logging/sound hooks: agents and the session append
//! reward events and sound cues here, and the host decides what to do with
//! them (render, play, analyze, or drop).

use game_core::Role;

/// Audio cues the host may render; purely advisory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SoundCue {
    Pickup,
    Scare,
    Win,
}

/// Which subsystem produced a reward event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EventSource {
    Agent(Role),
    Ability,
    Physics,
    System,
}

/// Reward-bearing events recorded over a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardKind {
    ExplorationBonus,
    CampingPenalty,
    WallHit,
    TrapPlaced,
    TrapSuccess,
    BoostUsed,
    KeyCollected,
    SurvivorTrapped,
    Caught,
    Catch,
}

/// One timestamped reward entry in the decision log.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecisionEvent {
    /// Simulated match time in seconds.
    pub t: f32,
    pub source: EventSource,
    pub kind: RewardKind,
    pub reward: f64,
}

/// Append-only event log for one match.
#[derive(Debug, Default)]
pub struct MatchEvents {
    decisions: Vec<DecisionEvent>,
    cues: Vec<SoundCue>,
}

impl MatchEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, t: f32, source: EventSource, kind: RewardKind, reward: f64) {
        tracing::debug!(t, ?source, %kind, reward, "reward event");
        self.decisions.push(DecisionEvent {
            t,
            source,
            kind,
            reward,
        });
    }

    pub fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    pub fn decisions(&self) -> &[DecisionEvent] {
        &self.decisions
    }

    /// Hands pending sound cues to the host, clearing the queue.
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_drain_once() {
        let mut events = MatchEvents::new();
        events.cue(SoundCue::Pickup);
        events.cue(SoundCue::Scare);
        assert_eq!(events.drain_cues(), vec![SoundCue::Pickup, SoundCue::Scare]);
        assert!(events.drain_cues().is_empty());
    }

    #[test]
    fn reward_kind_labels_are_screaming_snake() {
        assert_eq!(RewardKind::ExplorationBonus.to_string(), "EXPLORATION_BONUS");
        assert_eq!(RewardKind::WallHit.to_string(), "WALL_HIT");
    }
}
