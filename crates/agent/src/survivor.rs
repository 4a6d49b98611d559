//! Survivor decision core: SCAVENGE / EVADE / EXPLORE.
//!
//! Danger is a path-distance estimate, not a raw Euclidean one: within a
//! short visual cutoff the true walking distance to the hunter is computed
//! via A*, and an unreachable hunter counts as zero danger no matter how
//! close they look, since walls provide real safety. Shaping rewards accrue
//! between decision ticks and feed the brain's learn step one tick late
//! through the pending-transition buffer.

use rand::Rng;
use rand::seq::SliceRandom;

use game_core::{GameConfig, Position, Vec2, find_path};

use crate::brain::Mode;
use crate::core::{AgentCore, PendingTransition, TickContext};
use crate::state_key::StateKey;

/// Danger stand-in for "unreachable or far beyond the cutoff".
const NO_DANGER: f32 = 999.0;

impl AgentCore {
    pub(crate) fn survivor_tick(&mut self, ctx: &mut TickContext<'_>) {
        let euclidean = self.position.distance(ctx.opponent);
        let danger = self.danger_distance(ctx, euclidean);

        // Pressure shaping: stress under real threat, a bonus for opening
        // distance since the last sampled position.
        if danger < GameConfig::PRESSURE_BAND {
            self.shape_reward(-0.5 * ctx.dt as f64);
            let previous = ctx.opponent.distance(self.last_position);
            if euclidean > previous {
                self.shape_reward(2.0 * ctx.dt as f64);
            }
        }

        // Anti-camping, only when the danger is real.
        if self.still_timer >= 1.0 {
            if danger < GameConfig::CAMP_RADIUS {
                self.shape_reward(-2.0 * ctx.dt as f64);
            }
            self.still_timer = 0.0;
        }

        self.decision_timer -= ctx.dt;
        if self.decision_timer <= 0.0 {
            self.decision_timer = self.config.decision_interval;
            // Base survival reward plus whatever shaping accrued since the
            // previous decision.
            let reward = 0.1 + std::mem::take(&mut self.pending_reward);

            if danger < GameConfig::EVADE_TRIGGER {
                self.mode = Mode::Evade;
                if self.boost_cooldown <= 0.0 && danger < GameConfig::BOOST_TRIGGER {
                    self.activate_boost(ctx);
                }
            } else if ctx.keys_collected < ctx.keys_required {
                self.mode = if self.memory.known_keys().is_empty() {
                    Mode::Explore
                } else {
                    Mode::Scavenge
                };
            } else {
                self.mode = if self.memory.known_exits().is_empty() {
                    Mode::Explore
                } else {
                    Mode::Scavenge
                };
            }

            let can_see = euclidean < self.vision_radius;
            let key = StateKey::new(danger, ctx.keys_left(), can_see);
            if let Some(previous) = self.pending.take() {
                self.brain.learn(&previous.state, previous.action, reward, &key);
            }
            self.pending = Some(PendingTransition {
                state: key,
                action: self.mode,
            });
        }

        match self.mode {
            Mode::Evade => self.evade(ctx),
            Mode::Scavenge => self.scavenge(ctx),
            _ => self.explore(ctx),
        }
    }

    fn shape_reward(&mut self, delta: f64) {
        self.match_xp += delta;
        self.pending_reward += delta;
    }

    /// True walking danger: only computed when the hunter is visually close,
    /// and `NO_DANGER` when no path exists inside the cutoff.
    fn danger_distance(&self, ctx: &TickContext<'_>, euclidean: f32) -> f32 {
        if euclidean >= GameConfig::DANGER_VISUAL_CUTOFF {
            return NO_DANGER;
        }
        match find_path(ctx.grid, self.position.cell(), ctx.opponent.cell()) {
            Some(path) => path.len() as f32,
            None => NO_DANGER,
        }
    }

    /// Head for the closest known objective: keys while under quota,
    /// exits afterwards. Falls back to exploring when nothing is known.
    fn scavenge(&mut self, ctx: &mut TickContext<'_>) {
        let targets = if ctx.keys_collected < ctx.keys_required {
            self.memory.known_keys()
        } else {
            self.memory.known_exits()
        };
        if targets.is_empty() {
            self.mode = Mode::Explore;
            self.explore(ctx);
            return;
        }

        let here = self.position;
        let closest = targets
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = Vec2::from(*a).distance(here);
                let db = Vec2::from(*b).distance(here);
                da.partial_cmp(&db).expect("finite distances")
            })
            .expect("non-empty targets");

        let stale = self
            .path
            .back()
            .is_none_or(|&end| Vec2::from(end).distance(closest.into()) > 1.0);
        if stale {
            self.path = find_path(ctx.grid, self.position.cell(), closest)
                .unwrap_or_default()
                .into();
        }
        self.follow_path(ctx.grid, ctx.dt);
    }

    /// Pick a random reachable interior cell and walk there; a handful of
    /// attempts per replan keeps the cost bounded.
    fn explore(&mut self, ctx: &mut TickContext<'_>) {
        if self.path.is_empty() {
            for _ in 0..5 {
                let target = Position::new(
                    self.rng.random_range(1..ctx.grid.width() as i32 - 1),
                    self.rng.random_range(1..ctx.grid.height() as i32 - 1),
                );
                if ctx.grid.is_wall(target.x, target.y) {
                    continue;
                }
                if let Some(path) = find_path(ctx.grid, self.position.cell(), target) {
                    self.path = path.into();
                    break;
                }
            }
        }
        self.follow_path(ctx.grid, ctx.dt);
    }

    /// Step onto whichever open neighbor (diagonals included) maximizes
    /// distance to the hunter; when cornered, push straight away in panic.
    fn evade(&mut self, ctx: &mut TickContext<'_>) {
        let here = self.position.cell();
        let threat = ctx.opponent.cell();

        let mut offsets = [
            (0, 1),
            (0, -1),
            (1, 0),
            (-1, 0),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        // Shuffled so equal-distance options don't lock into a pattern.
        offsets.shuffle(&mut self.rng);

        let mut best: Option<(i32, i32)> = None;
        let mut best_distance = -1.0f32;
        for (dx, dy) in offsets {
            let nx = here.x + dx;
            let ny = here.y + dy;
            if ctx.grid.is_wall(nx, ny) {
                continue;
            }
            let distance = ((nx - threat.x) as f32).hypot((ny - threat.y) as f32);
            if distance > best_distance {
                best_distance = distance;
                best = Some((dx, dy));
            }
        }

        if let Some((dx, dy)) = best {
            let direction = Vec2::new(dx as f32, dy as f32).normalized();
            self.move_toward(direction, ctx.grid, ctx.dt);
        } else {
            let away = Vec2::new(
                self.position.x - ctx.opponent.x,
                self.position.y - ctx.opponent.y,
            )
            .normalized();
            self.move_toward(away, ctx.grid, ctx.dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MatchEvents;
    use game_core::{Role, TileGrid, TileKind};

    fn arena() -> TileGrid {
        TileGrid::parse(
            "##########\n\
             #........#\n\
             #........#\n\
             #........#\n\
             #........#\n\
             #........#\n\
             #........#\n\
             #........#\n\
             #........#\n\
             ##########\n",
        )
        .unwrap()
    }

    fn survivor(grid: &TileGrid, seed: u64) -> AgentCore {
        AgentCore::new(
            Role::Survivor,
            Position::new(1, 1),
            grid,
            GameConfig::default(),
        )
        .with_seed(seed)
    }

    fn tick(
        agent: &mut AgentCore,
        grid: &TileGrid,
        events: &mut MatchEvents,
        opponent: Vec2,
        keys_collected: u32,
    ) {
        let mut ctx = TickContext {
            grid,
            dt: 0.05,
            time: 0.0,
            opponent,
            keys_collected,
            keys_required: 3,
            events,
        };
        agent.update(&mut ctx);
    }

    #[test]
    fn nearby_reachable_hunter_triggers_evade_and_boost() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = survivor(&grid, 42);

        tick(&mut agent, &grid, &mut events, Vec2::new(3.0, 1.0), 0);
        assert_eq!(agent.mode(), Mode::Evade);
        assert!(agent.is_boosting(), "path distance under the boost cutoff");
    }

    #[test]
    fn walled_off_hunter_is_no_danger_despite_euclidean_closeness() {
        // Full barrier column: the hunter is 2 tiles away in a straight line
        // but unreachable, so the survivor must not evade.
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
            Role::Survivor,
            Position::new(1, 2),
            &grid,
            GameConfig::default(),
        )
        .with_seed(42);

        for _ in 0..10 {
            tick(&mut agent, &grid, &mut events, Vec2::new(3.0, 2.0), 0);
            assert_ne!(agent.mode(), Mode::Evade);
        }
    }

    #[test]
    fn hunter_beyond_visual_cutoff_never_triggers_evade() {
        // 20x3 corridor: hunter reachable but 15+ tiles away, past the
        // 12-tile cutoff where no path estimate is even computed.
        let mut layout = String::new();
        layout.push_str(&"#".repeat(20));
        layout.push('\n');
        layout.push('#');
        layout.push_str(&".".repeat(18));
        layout.push('#');
        layout.push('\n');
        layout.push_str(&"#".repeat(20));
        layout.push('\n');
        let grid = TileGrid::parse(&layout).unwrap();

        let mut events = MatchEvents::new();
        let mut agent = AgentCore::new(
            Role::Survivor,
            Position::new(1, 1),
            &grid,
            GameConfig::default(),
        )
        .with_seed(42);

        tick(&mut agent, &grid, &mut events, Vec2::new(17.0, 1.0), 0);
        assert_ne!(agent.mode(), Mode::Evade);
    }

    #[test]
    fn known_key_switches_explore_to_scavenge() {
        let mut grid = arena();
        grid.set_tile(Position::new(4, 1), TileKind::Key);

        let mut events = MatchEvents::new();
        let mut agent = survivor(&grid, 42);

        // Key sits inside the base vision radius, so the sweep discovers it
        // and the next decision tick heads for it.
        tick(&mut agent, &grid, &mut events, Vec2::new(8.0, 8.0), 0);
        assert_eq!(agent.mode(), Mode::Scavenge);
        assert_eq!(agent.path.back(), Some(&Position::new(4, 1)));
    }

    #[test]
    fn quota_met_retargets_known_exits() {
        let mut grid = arena();
        grid.set_tile(Position::new(1, 4), TileKind::Exit);

        let mut events = MatchEvents::new();
        let mut agent = survivor(&grid, 42);

        tick(&mut agent, &grid, &mut events, Vec2::new(8.0, 8.0), 3);
        assert_eq!(agent.mode(), Mode::Scavenge);
        assert_eq!(agent.path.back(), Some(&Position::new(1, 4)));
    }

    #[test]
    fn pending_transition_learns_one_tick_late() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = survivor(&grid, 42);

        // First decision: no pending pair yet, nothing to learn.
        tick(&mut agent, &grid, &mut events, Vec2::new(8.0, 8.0), 0);
        assert_eq!(agent.brain().state_count(), 0);
        assert!(agent.pending.is_some());

        // Cross the next decision boundary: the stashed pair is learned.
        for _ in 0..5 {
            tick(&mut agent, &grid, &mut events, Vec2::new(8.0, 8.0), 0);
        }
        assert!(agent.brain().state_count() > 0);
    }

    #[test]
    fn evade_moves_away_from_the_threat() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = survivor(&grid, 42);
        agent.position = Vec2::new(4.0, 4.0);
        agent.last_position = agent.position;

        let hunter = Vec2::new(2.0, 4.0);
        let before = agent.position().distance(hunter);
        for _ in 0..10 {
            tick(&mut agent, &grid, &mut events, hunter, 0);
        }
        assert!(agent.position().distance(hunter) > before);
    }
}
