//! Client runtime configuration loaded from process environment variables.
use std::env;
use std::path::PathBuf;

/// Options for a headless training/spectate run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Number of AI-vs-AI matches to run back to back.
    pub matches: u32,
    /// Maze level: drives maze size and key quota.
    pub level: u32,
    /// Base RNG seed; unset means non-deterministic runs.
    pub seed: Option<u64>,
    /// Simulated-time multiplier applied to every tick.
    pub time_scale: f32,
    /// Simulated seconds before a match is called for the survivor.
    pub match_timeout: f32,
    /// Strategy exploration rate for the meta-brain.
    pub exploration_rate: f64,
    /// Root directory for all persisted records.
    pub data_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            matches: 10,
            level: 1,
            seed: None,
            time_scale: 1.0,
            match_timeout: 180.0,
            exploration_rate: 0.2,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl RunConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PURSUIT_MATCHES` - Matches to run (default: 10)
    /// - `PURSUIT_LEVEL` - Maze level (default: 1)
    /// - `PURSUIT_SEED` - Base RNG seed (default: non-deterministic)
    /// - `PURSUIT_TIME_SCALE` - Simulated-time multiplier (default: 1.0)
    /// - `PURSUIT_MATCH_TIMEOUT` - Simulated seconds before a match is
    ///   called for the survivor (default: 180)
    /// - `PURSUIT_EXPLORATION` - Strategy exploration rate (default: 0.2)
    /// - `PURSUIT_DATA_DIR` - Root for persisted records (default: ./data)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(matches) = read_env::<u32>("PURSUIT_MATCHES") {
            config.matches = matches.max(1);
        }
        if let Some(level) = read_env::<u32>("PURSUIT_LEVEL") {
            config.level = level.max(1);
        }
        config.seed = read_env::<u64>("PURSUIT_SEED");
        if let Some(scale) = read_env::<f32>("PURSUIT_TIME_SCALE") {
            config.time_scale = scale.clamp(0.1, 10.0);
        }
        if let Some(timeout) = read_env::<f32>("PURSUIT_MATCH_TIMEOUT") {
            config.match_timeout = timeout.max(1.0);
        }
        if let Some(rate) = read_env::<f64>("PURSUIT_EXPLORATION") {
            config.exploration_rate = rate.clamp(0.0, 1.0);
        }
        if let Some(dir) = env::var("PURSUIT_DATA_DIR").ok().map(PathBuf::from) {
            config.data_dir = dir;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
