//! Per-tick agent runtime state and the shared half of the decision loop.
//!
//! [`AgentCore`] owns everything one agent carries through a match: continuous
//! position, behavior mode, cooldowns, ability flags, perception memory, the
//! learning brain, and the current path. Every tick receives an explicit
//! [`TickContext`] instead of reaching into an ambient game object, so the
//! core stays testable and the host controls exactly what an agent can see.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use rand::SeedableRng;
use rand::rngs::StdRng;

use game_core::{GameConfig, Position, Role, TileGrid, Vec2};

use crate::brain::{Mode, QBrain, initial_mode};
use crate::events::{EventSource, MatchEvents, RewardKind, SoundCue};
use crate::perception::PerceptionMemory;
use crate::state_key::StateKey;

/// Bounded slot list for armed traps.
pub type TrapSlots = ArrayVec<Position, { GameConfig::MAX_ACTIVE_TRAPS }>;

/// Everything an agent may observe and touch during one tick.
pub struct TickContext<'a> {
    pub grid: &'a TileGrid,
    /// Simulated seconds elapsed this tick (already time-scaled).
    pub dt: f32,
    /// Total simulated match time, for event timestamps.
    pub time: f32,
    /// Opponent position as the world reports it.
    pub opponent: Vec2,
    pub keys_collected: u32,
    pub keys_required: u32,
    pub events: &'a mut MatchEvents,
}

impl TickContext<'_> {
    pub fn keys_left(&self) -> u32 {
        self.keys_required.saturating_sub(self.keys_collected)
    }
}

/// The previously taken (state, action) pair awaiting its learn step.
pub(crate) struct PendingTransition {
    pub state: StateKey,
    pub action: Mode,
}

/// Full runtime state of one AI-driven agent.
pub struct AgentCore {
    pub(crate) role: Role,
    pub(crate) position: Vec2,
    pub(crate) speed: f32,
    pub(crate) mode: Mode,
    pub(crate) brain: QBrain,
    pub(crate) memory: PerceptionMemory,
    pub(crate) path: VecDeque<Position>,

    // Vision
    pub(crate) vision_radius: f32,
    pub(crate) is_scanning: bool,
    pub(crate) scan_duration: f32,
    pub(crate) scan_cooldown: f32,

    // Abilities
    pub(crate) active_traps: TrapSlots,
    pub(crate) trap_cooldown: f32,
    pub(crate) is_boosting: bool,
    pub(crate) boost_duration: f32,
    pub(crate) boost_cooldown: f32,
    pub(crate) freeze_timer: f32,

    // Reward accounting
    pub(crate) match_xp: f64,
    pub(crate) exploration_rewarded: bool,
    /// Shaping reward accrued since the last decision tick, fed to `learn`.
    pub(crate) pending_reward: f64,

    // Decision state
    pub(crate) decision_timer: f32,
    pub(crate) pending: Option<PendingTransition>,
    pub(crate) last_seen: Option<Vec2>,

    // Stuck detection
    pub(crate) last_position: Vec2,
    pub(crate) stuck_timer: f32,
    pub(crate) still_timer: f32,

    pub(crate) rng: StdRng,
    pub(crate) config: GameConfig,
}

impl AgentCore {
    pub fn new(role: Role, spawn: Position, grid: &TileGrid, config: GameConfig) -> Self {
        let position = Vec2::from(spawn);
        Self {
            role,
            position,
            speed: base_speed(role),
            mode: initial_mode(role),
            brain: QBrain::new(role),
            memory: PerceptionMemory::new(grid.width(), grid.height()),
            path: VecDeque::new(),
            vision_radius: GameConfig::BASE_VISION,
            is_scanning: false,
            scan_duration: 0.0,
            scan_cooldown: 0.0,
            active_traps: TrapSlots::new(),
            trap_cooldown: 0.0,
            is_boosting: false,
            boost_duration: 0.0,
            boost_cooldown: 0.0,
            freeze_timer: 0.0,
            match_xp: 0.0,
            exploration_rewarded: false,
            pending_reward: 0.0,
            decision_timer: 0.0,
            pending: None,
            last_seen: None,
            last_position: position,
            stuck_timer: 0.0,
            still_timer: 0.0,
            rng: StdRng::from_rng(&mut rand::rng()),
            config,
        }
    }

    /// Seeds both the policy and behavior RNGs for reproducible simulations.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.brain = QBrain::new(self.role).with_seed(seed ^ 0x9e3779b97f4a7c15);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn vision_radius(&self) -> f32 {
        self.vision_radius
    }

    pub fn is_scanning(&self) -> bool {
        self.is_scanning
    }

    pub fn is_boosting(&self) -> bool {
        self.is_boosting
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_timer > 0.0
    }

    pub fn match_xp(&self) -> f64 {
        self.match_xp
    }

    /// Applies a world-sourced reward (key pickup, trap outcome, match end).
    pub fn add_match_xp(&mut self, delta: f64) {
        self.match_xp += delta;
    }

    pub fn active_traps(&self) -> &[Position] {
        &self.active_traps
    }

    /// Removes a sprung trap; returns false if no trap was armed there.
    pub fn consume_trap(&mut self, position: Position) -> bool {
        if let Some(index) = self.active_traps.iter().position(|&trap| trap == position) {
            self.active_traps.swap_remove(index);
            true
        } else {
            false
        }
    }

    /// Suspends movement and decisions for the given duration.
    pub fn freeze(&mut self, duration: f32) {
        self.freeze_timer = duration;
    }

    /// Rescales the hunter's speed as the survivor closes in on the quota.
    pub fn scale_speed(&mut self, progress: f32, base: f32) {
        self.speed = base * (0.95 + progress * 0.2);
    }

    pub fn brain(&self) -> &QBrain {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut QBrain {
        &mut self.brain
    }

    pub fn memory(&self) -> &PerceptionMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut PerceptionMemory {
        &mut self.memory
    }

    /// Advances the agent by one simulation tick.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        let dt = ctx.dt;

        // Freeze fully suspends movement and decisions; the timer still runs.
        if self.is_frozen() {
            self.freeze_timer -= dt;
            if self.freeze_timer > 0.0 {
                return;
            }
        }

        // Passive reward trickle for staying in play.
        self.match_xp += GameConfig::PASSIVE_XP_RATE * dt as f64;

        self.tick_cooldowns(dt);
        self.tick_vision(dt);
        self.tick_boost(dt);

        self.sweep_vision(ctx.grid);
        self.memory.visit(self.position.nearest_cell());
        self.check_exploration_bonus(ctx);
        self.check_stuck(ctx);

        match self.role {
            Role::Hunter => self.hunter_tick(ctx),
            Role::Survivor => self.survivor_tick(ctx),
        }
    }

    fn tick_cooldowns(&mut self, dt: f32) {
        if self.trap_cooldown > 0.0 {
            self.trap_cooldown -= dt;
        }
        if self.scan_cooldown > 0.0 {
            self.scan_cooldown -= dt;
        }
        if self.boost_cooldown > 0.0 {
            self.boost_cooldown -= dt;
        }
    }

    /// Eases the vision radius toward its target instead of jumping, so an
    /// observer never sees the radius pop.
    fn tick_vision(&mut self, dt: f32) {
        let mut target = GameConfig::BASE_VISION;
        if self.is_scanning {
            self.scan_duration -= dt;
            if self.scan_duration <= 0.0 {
                self.is_scanning = false;
            } else {
                target = GameConfig::SCAN_VISION;
            }
        }

        let diff = target - self.vision_radius;
        if diff.abs() > 0.1 {
            self.vision_radius += diff * GameConfig::VISION_SMOOTHING * dt;
        } else {
            self.vision_radius = target;
        }
    }

    fn tick_boost(&mut self, dt: f32) {
        if self.is_boosting {
            self.boost_duration -= dt;
            self.speed = GameConfig::BOOST_SPEED;
            if self.boost_duration <= 0.0 {
                self.is_boosting = false;
                self.speed = base_speed(self.role);
            }
        }
    }

    /// Classifies every tile within the current vision radius and feeds it to
    /// the belief update. Distance is Euclidean from the continuous position.
    fn sweep_vision(&mut self, grid: &TileGrid) {
        let view_r = self.vision_radius as i32 + 1;
        let center = self.position.cell();
        for y in (center.y - view_r)..=(center.y + view_r) {
            for x in (center.x - view_r)..=(center.x + view_r) {
                let cell = Position::new(x, y);
                let Some(tile) = grid.tile(cell) else {
                    continue;
                };
                let dx = x as f32 - self.position.x;
                let dy = y as f32 - self.position.y;
                if dx.hypot(dy) <= self.vision_radius {
                    self.memory.observe_tile(cell, tile);
                }
            }
        }
    }

    fn check_exploration_bonus(&mut self, ctx: &mut TickContext<'_>) {
        if self.exploration_rewarded {
            return;
        }
        if self.memory.exploration_percentage() >= GameConfig::EXPLORATION_BONUS_COVERAGE {
            self.match_xp += GameConfig::EXPLORATION_BONUS;
            self.exploration_rewarded = true;
            ctx.events.record(
                ctx.time,
                EventSource::System,
                RewardKind::ExplorationBonus,
                GameConfig::EXPLORATION_BONUS,
            );
        }
    }

    /// Tracks displacement over time. A near-zero displacement accrues the
    /// stuck timer (and the stricter still timer); past the trip point the
    /// agent is forcibly relocated.
    fn check_stuck(&mut self, ctx: &mut TickContext<'_>) {
        let moved = self.position.distance(self.last_position);
        if moved < GameConfig::STUCK_EPSILON {
            self.stuck_timer += ctx.dt;
            if moved < GameConfig::STILL_EPSILON {
                self.still_timer += ctx.dt;
            } else {
                self.still_timer = 0.0;
            }

            if self.stuck_timer > GameConfig::STUCK_TRIP {
                self.force_unstuck(ctx);
                self.stuck_timer = 0.0;
            }
        } else {
            self.stuck_timer = 0.0;
            self.still_timer = 0.0;
            self.last_position = self.position;
        }
    }

    // ===== abilities =====

    pub(crate) fn place_trap(&mut self, ctx: &mut TickContext<'_>) {
        let cell = self.position.cell();
        if self.active_traps.try_push(cell).is_err() {
            return;
        }
        self.trap_cooldown = GameConfig::TRAP_COOLDOWN;
        self.match_xp += 5.0;
        ctx.events
            .record(ctx.time, EventSource::Ability, RewardKind::TrapPlaced, 5.0);
        tracing::debug!(%cell, "trap armed");
    }

    pub(crate) fn activate_boost(&mut self, ctx: &mut TickContext<'_>) {
        self.is_boosting = true;
        self.boost_duration = GameConfig::BOOST_DURATION;
        self.boost_cooldown = GameConfig::BOOST_COOLDOWN;
        self.match_xp -= 2.0;
        ctx.events.cue(SoundCue::Pickup);
        ctx.events
            .record(ctx.time, EventSource::Ability, RewardKind::BoostUsed, -2.0);
    }

    /// Fires the scan pulse: temporarily widens the vision target radius.
    /// Exposed for host-driven controllers; the learned policies never scan.
    pub fn activate_scan(&mut self, events: &mut MatchEvents) {
        if self.scan_cooldown > 0.0 {
            return;
        }
        self.is_scanning = true;
        self.scan_duration = GameConfig::SCAN_DURATION;
        self.scan_cooldown = GameConfig::SCAN_COOLDOWN;
        events.cue(SoundCue::Scare);
    }
}

pub(crate) fn base_speed(role: Role) -> f32 {
    match role {
        Role::Hunter => GameConfig::HUNTER_SPEED,
        Role::Survivor => GameConfig::SURVIVOR_SPEED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MatchEvents;
    use game_core::TileKind;

    fn arena() -> TileGrid {
        TileGrid::parse(
            "########\n\
             #......#\n\
             #......#\n\
             #......#\n\
             #......#\n\
             #......#\n\
             #......#\n\
             ########\n",
        )
        .unwrap()
    }

    fn context<'a>(
        grid: &'a TileGrid,
        events: &'a mut MatchEvents,
        opponent: Vec2,
        dt: f32,
    ) -> TickContext<'a> {
        TickContext {
            grid,
            dt,
            time: 0.0,
            opponent,
            keys_collected: 0,
            keys_required: 3,
            events,
        }
    }

    #[test]
    fn freeze_suspends_updates_until_expiry() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = AgentCore::new(
            Role::Survivor,
            Position::new(1, 1),
            &grid,
            GameConfig::default(),
        )
        .with_seed(3);

        agent.freeze(GameConfig::FREEZE_DURATION);
        let xp_before = agent.match_xp();

        let mut ctx = context(&grid, &mut events, Vec2::new(6.0, 6.0), 0.5);
        agent.update(&mut ctx);
        assert!(agent.is_frozen());
        assert_eq!(agent.match_xp(), xp_before, "no passive reward while frozen");

        for _ in 0..4 {
            let mut ctx = context(&grid, &mut events, Vec2::new(6.0, 6.0), 0.5);
            agent.update(&mut ctx);
        }
        assert!(!agent.is_frozen());
        assert!(agent.match_xp() > xp_before);
    }

    #[test]
    fn vision_radius_eases_toward_scan_target() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = AgentCore::new(
            Role::Hunter,
            Position::new(1, 1),
            &grid,
            GameConfig::default(),
        )
        .with_seed(3);

        agent.activate_scan(&mut events);
        let mut ctx = context(&grid, &mut events, Vec2::new(6.0, 6.0), 0.016);
        agent.update(&mut ctx);

        let radius = agent.vision_radius();
        assert!(radius > GameConfig::BASE_VISION, "radius should be rising");
        assert!(radius < GameConfig::SCAN_VISION, "radius must not pop");
    }

    #[test]
    fn scan_respects_cooldown() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = AgentCore::new(
            Role::Hunter,
            Position::new(1, 1),
            &grid,
            GameConfig::default(),
        )
        .with_seed(3);

        agent.activate_scan(&mut events);
        agent.is_scanning = false;
        agent.activate_scan(&mut events);
        assert!(!agent.is_scanning(), "cooldown must block a second pulse");
    }

    #[test]
    fn sweep_discovers_keys_within_radius_only() {
        let mut grid = arena();
        grid.set_tile(Position::new(3, 1), TileKind::Key);
        grid.set_tile(Position::new(6, 6), TileKind::Key);

        let mut events = MatchEvents::new();
        let mut agent = AgentCore::new(
            Role::Survivor,
            Position::new(1, 1),
            &grid,
            GameConfig::default(),
        )
        .with_seed(3);

        let mut ctx = context(&grid, &mut events, Vec2::new(6.0, 6.0), 0.016);
        agent.update(&mut ctx);

        assert!(agent.memory().known_keys().contains(&Position::new(3, 1)));
        assert!(
            !agent.memory().known_keys().contains(&Position::new(6, 6)),
            "key beyond the vision radius must stay unknown"
        );
    }

    #[test]
    fn consume_trap_removes_only_armed_cells() {
        let grid = arena();
        let mut agent = AgentCore::new(
            Role::Hunter,
            Position::new(1, 1),
            &grid,
            GameConfig::default(),
        )
        .with_seed(3);

        agent.active_traps.push(Position::new(2, 2));
        assert!(!agent.consume_trap(Position::new(3, 3)));
        assert!(agent.consume_trap(Position::new(2, 2)));
        assert!(agent.active_traps().is_empty());
    }

    #[test]
    fn forced_unstuck_relocates_and_penalizes() {
        // Hunter sees the survivor through a full barrier: chase plans fail,
        // the agent cannot move, and the stuck timer must trip a relocation.
        let grid = TileGrid::parse(
            "#######\n\
             #.#...#\n\
             #.#...#\n\
             #.#...#\n\
             #######\n",
        )
        .unwrap();
        let mut events = MatchEvents::new();
        let mut agent = AgentCore::new(
            Role::Hunter,
            Position::new(1, 2),
            &grid,
            GameConfig::default(),
        )
        .with_seed(11);

        let survivor = Vec2::new(3.0, 2.0);
        let start = agent.position();
        for _ in 0..8 {
            let mut ctx = context(&grid, &mut events, survivor, 0.1);
            agent.update(&mut ctx);
        }

        let penalties: Vec<_> = events
            .decisions()
            .iter()
            .filter(|event| event.kind == RewardKind::WallHit)
            .collect();
        assert!(!penalties.is_empty(), "wall-hit penalty must be recorded");
        assert!(penalties[0].reward < 0.0);
        // Teleported onto an adjacent open cell.
        let relocated = agent.position().nearest_cell();
        assert_eq!(relocated.manhattan(start.nearest_cell()), 1);
        assert!(!grid.is_wall(relocated.x, relocated.y));
    }
}
