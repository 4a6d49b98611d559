/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GameConfig {
    /// Seconds between agent macro-decision re-evaluations.
    pub decision_interval: f32,
    /// Simulated-time multiplier (>1 fast-forwards spectated matches).
    pub time_scale: f32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum simultaneously armed traps per hunter.
    pub const MAX_ACTIVE_TRAPS: usize = 2;

    // ===== movement =====
    pub const HUNTER_SPEED: f32 = 3.8;
    pub const SURVIVOR_SPEED: f32 = 4.0;
    pub const BOOST_SPEED: f32 = 6.5;
    /// Inset applied to the four collision probe corners, in tiles.
    pub const COLLISION_MARGIN: f32 = 0.25;
    /// Distance at which a path waypoint counts as reached and is snapped to.
    pub const WAYPOINT_TOLERANCE: f32 = 0.15;

    // ===== vision =====
    pub const BASE_VISION: f32 = 5.0;
    pub const SCAN_VISION: f32 = 10.0;
    /// Exponential smoothing rate for the vision radius approaching its target.
    pub const VISION_SMOOTHING: f32 = 10.0;

    // ===== abilities =====
    pub const TRAP_COOLDOWN: f32 = 15.0;
    pub const SCAN_COOLDOWN: f32 = 60.0;
    pub const SCAN_DURATION: f32 = 1.0;
    pub const BOOST_COOLDOWN: f32 = 15.0;
    pub const BOOST_DURATION: f32 = 1.5;
    /// Seconds a trapped agent is fully suspended.
    pub const FREEZE_DURATION: f32 = 2.0;

    // ===== survivor danger model (path distances, in tiles) =====
    /// Euclidean cutoff beyond which no path-distance estimate is computed.
    pub const DANGER_VISUAL_CUTOFF: f32 = 12.0;
    /// Path distance below which the survivor switches to evading.
    pub const EVADE_TRIGGER: f32 = 8.0;
    /// Path distance below which an off-cooldown speed boost fires.
    pub const BOOST_TRIGGER: f32 = 4.0;
    /// Path distance inside which pressure rewards (stress/flee) accrue.
    pub const PRESSURE_BAND: f32 = 10.0;
    /// Path distance inside which standing still is penalized as camping.
    pub const CAMP_RADIUS: f32 = 15.0;

    /// Base used when rescaling hunter speed against key progress.
    pub const HUNTER_SPEED_SCALE_BASE: f32 = 4.0;

    // ===== hunter trap triggers =====
    /// Mid-range band (exclusive) for trap drops while chasing.
    pub const TRAP_CHASE_MIN: f32 = 2.0;
    pub const TRAP_CHASE_MAX: f32 = 5.0;

    // ===== stuck detection (real-time seconds / tile displacements) =====
    /// Displacement below which an agent is considered stuck against geometry.
    pub const STUCK_EPSILON: f32 = 0.05;
    /// Displacement below which an agent is considered fully stationary.
    pub const STILL_EPSILON: f32 = 0.01;
    /// Accumulated stuck time that trips a forced relocation.
    pub const STUCK_TRIP: f32 = 0.5;

    // ===== match rules =====
    /// Euclidean distance at which the hunter catches the survivor.
    pub const CATCH_RADIUS: f32 = 0.9;
    /// Match XP required per progression level.
    pub const LEVEL_XP_THRESHOLD: f64 = 2500.0;
    /// Passive XP accrued per simulated second, purely for staying in play.
    pub const PASSIVE_XP_RATE: f64 = 0.05;
    /// One-shot bonus granted when map coverage first reaches the threshold.
    pub const EXPLORATION_BONUS: f64 = 15.0;
    pub const EXPLORATION_BONUS_COVERAGE: f64 = 0.50;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DECISION_INTERVAL: f32 = 0.25;

    pub fn new() -> Self {
        Self {
            decision_interval: Self::DEFAULT_DECISION_INTERVAL,
            time_scale: 1.0,
        }
    }

    pub fn with_time_scale(time_scale: f32) -> Self {
        Self {
            time_scale,
            ..Self::new()
        }
    }

    /// Keys the survivor must collect before an exit opens, by maze level.
    pub fn keys_required(level: u32) -> u32 {
        3 + level / 2
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
