//! Headless AI-vs-AI training loop.
//!
//! Each iteration generates a maze, hydrates both agents from the persisted
//! records, runs the match to a verdict (or calls it for the survivor at the
//! timeout), and writes every durable record back. Persistence failures are
//! logged and swallowed: a broken disk never takes down a training run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use agent::{AgentCore, StrategicBrain};
use game_content::{MazeGenerator, load_level, save_level};
use game_core::{GameConfig, Role, TileGrid};
use runtime::{
    BrainRepository, HeatmapRepository, MatchOutcome, MatchSession, Progression,
    ProgressionRepository, StrategyRepository, spawn_points,
};

use crate::config::RunConfig;

/// Fixed frame time for the headless loop, matching a 60 FPS host.
const FRAME_DT: f32 = 1.0 / 60.0;

pub struct Trainer {
    config: RunConfig,
    brains: BrainRepository,
    heatmaps: HeatmapRepository,
    strategies: StrategyRepository,
    progression_store: ProgressionRepository,
    progression: Progression,
    strategy_brain: StrategicBrain,
    rng: StdRng,
}

impl Trainer {
    pub fn new(config: RunConfig) -> Self {
        let brains = BrainRepository::new(config.data_dir.join("brains"));
        let heatmaps = HeatmapRepository::new(config.data_dir.join("memory"));
        let strategies = StrategyRepository::new(&config.data_dir);
        let progression_store = ProgressionRepository::new(&config.data_dir);

        let progression = match progression_store.load() {
            Ok(Some(progression)) => progression,
            Ok(None) => Progression::new(),
            Err(error) => {
                tracing::warn!(%error, "progression record unreadable, starting fresh");
                Progression::new()
            }
        };

        let mut strategy_brain = StrategicBrain::new();
        match strategies.load() {
            Ok(Some(snapshot)) => strategy_brain.merge_snapshot(snapshot),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "strategy table unreadable, using defaults");
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        if let Some(seed) = config.seed {
            strategy_brain = strategy_brain.with_seed(seed ^ 0x5354524154); // "STRAT"
        }

        Self {
            config,
            brains,
            heatmaps,
            strategies,
            progression_store,
            progression,
            strategy_brain,
            rng,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!(
            matches = self.config.matches,
            level = self.config.level,
            agent_level = self.progression.level,
            "training run starting"
        );

        for index in 0..self.config.matches {
            let outcome = self.run_match(index)?;
            tracing::info!(
                match_index = index + 1,
                winner = %outcome.winner,
                duration_secs = outcome.duration,
                keys = outcome.keys_collected,
                total_xp = self.progression.total_xp,
                agent_level = self.progression.level,
                "match finished"
            );
        }
        Ok(())
    }

    fn run_match(&mut self, index: u32) -> anyhow::Result<MatchOutcome> {
        let level = self.config.level;
        let grid = self.build_level(index)?;
        let (hunter_spawn, survivor_spawn) = spawn_points(&grid);

        let session_config = GameConfig::with_time_scale(self.config.time_scale);
        let mut hunter = AgentCore::new(Role::Hunter, hunter_spawn, &grid, session_config.clone());
        let mut survivor =
            AgentCore::new(Role::Survivor, survivor_spawn, &grid, session_config.clone());
        if self.config.seed.is_some() {
            let hunter_seed = self.rng.random::<u64>();
            let survivor_seed = self.rng.random::<u64>();
            hunter = hunter.with_seed(hunter_seed);
            survivor = survivor.with_seed(survivor_seed);
        }

        self.hydrate(&mut hunter, &grid, level);
        self.hydrate(&mut survivor, &grid, level);

        let (strategy, selection) = self
            .strategy_brain
            .pick_strategy(self.progression.level, self.config.exploration_rate);
        tracing::info!(%strategy, %selection, "hunter strategy picked");

        // The synchronous tick loop; the timeout is survival, a survivor win.
        let mut session = MatchSession::new(grid, hunter, survivor, level, session_config);
        let outcome = loop {
            if let Some(outcome) = session.tick(FRAME_DT) {
                break outcome;
            }
            if session.game_time() >= self.config.match_timeout {
                tracing::info!(
                    timeout = self.config.match_timeout,
                    "match timed out, survivor outlasted the hunter"
                );
                break MatchOutcome {
                    winner: Role::Survivor,
                    duration: session.game_time(),
                    keys_collected: session.keys_collected(),
                };
            }
        };

        self.persist(&session, outcome);
        Ok(outcome)
    }

    /// Generates the maze, writing it through the level-file round trip so
    /// the on-disk format stays exercised (and inspectable after a run).
    fn build_level(&mut self, index: u32) -> anyhow::Result<TileGrid> {
        let generator = MazeGenerator::for_level(self.config.level);
        let grid = generator.generate(self.config.level, &mut self.rng);

        let path = self
            .config
            .data_dir
            .join("levels")
            .join(format!("match_{index}.txt"));
        save_level(&path, &grid)?;
        load_level(&path)
    }

    /// Installs persisted knowledge into a fresh agent: Q-table, walkable
    /// count, and (for the hunter) predicted hotspots from past traffic.
    fn hydrate(&self, agent: &mut AgentCore, grid: &TileGrid, level: u32) {
        let role = agent.role();
        match self.brains.load(role) {
            Ok(Some(snapshot)) => agent.brain_mut().restore(snapshot),
            Ok(None) => tracing::info!(%role, "no persisted q-table, starting fresh"),
            Err(error) => {
                tracing::warn!(%role, %error, "q-table unreadable, starting fresh");
            }
        }

        agent.memory_mut().initialize_walkable_count(grid);

        if role == Role::Hunter {
            match self.heatmaps.load_for_level(level) {
                Ok(records) => agent.memory_mut().predict_hotspots(&records),
                Err(error) => {
                    tracing::warn!(%error, "heatmap history unavailable, no hotspots");
                }
            }
        }
    }

    /// Writes every durable record; failures are logged, never propagated.
    fn persist(&mut self, session: &MatchSession<AgentCore, AgentCore>, outcome: MatchOutcome) {
        if let Err(error) = self
            .brains
            .save(Role::Hunter, &session.hunter().brain().snapshot())
        {
            tracing::warn!(%error, "failed to save hunter q-table");
        }
        if let Err(error) = self
            .brains
            .save(Role::Survivor, &session.survivor().brain().snapshot())
        {
            tracing::warn!(%error, "failed to save survivor q-table");
        }

        // The survivor's traffic is tomorrow's hotspot prior.
        let record = session.survivor().memory().heatmap_record(self.config.level);
        if let Err(error) = self.heatmaps.save(&record) {
            tracing::warn!(%error, "failed to save heatmap record");
        }

        self.strategy_brain
            .report_result(outcome.winner, outcome.duration);
        if let Err(error) = self.strategies.save(&self.strategy_brain.snapshot()) {
            tracing::warn!(%error, "failed to save strategy table");
        }

        self.progression
            .apply_match_xp(session.survivor().match_xp());
        if let Err(error) = self.progression_store.save(&self.progression) {
            tracing::warn!(%error, "failed to save progression");
        }
    }
}
