//! Cross-match agent progression: accumulated XP and derived level.

use game_core::GameConfig;

/// Durable progression record, read at startup and rewritten after every
/// match.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Progression {
    pub total_xp: f64,
    pub level: u32,
}

impl Progression {
    pub fn new() -> Self {
        Self {
            total_xp: 0.0,
            level: 1,
        }
    }

    /// Folds one match's XP into the total and rederives the level.
    pub fn apply_match_xp(&mut self, xp: f64) {
        self.total_xp += xp;
        self.level = Self::level_for(self.total_xp);
    }

    /// `1 + floor(total / threshold)`, never below 1.
    pub fn level_for(total_xp: f64) -> u32 {
        let base = 1 + (total_xp / GameConfig::LEVEL_XP_THRESHOLD).floor() as i64;
        base.max(1) as u32
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(Progression::level_for(0.0), 1);
        assert_eq!(Progression::level_for(2499.9), 1);
        assert_eq!(Progression::level_for(2500.0), 2);
        assert_eq!(Progression::level_for(7600.0), 4);
        // Negative totals (heavily penalized agents) never drop below 1.
        assert_eq!(Progression::level_for(-500.0), 1);
    }

    #[test]
    fn apply_accumulates_across_matches() {
        let mut progression = Progression::new();
        progression.apply_match_xp(1800.0);
        assert_eq!(progression.level, 1);
        progression.apply_match_xp(900.0);
        assert_eq!(progression.level, 2);
        assert_eq!(progression.total_xp, 2700.0);
    }
}
