//! Hunter decision core: PATROL / CHASE / INVESTIGATE.
//!
//! Sight acquisition promotes straight to CHASE. Losing sight demotes to
//! INVESTIGATE, which walks to the last seen position; when that path
//! exhausts, the learned policy picks the next macro-state. Trap placement
//! re-evaluates on the periodic decision tick, distance-band trigger first
//! (see DESIGN.md for the precedence decision).

use rand::Rng;

use game_core::{GameConfig, Position, Vec2, find_path};

use crate::brain::Mode;
use crate::core::{AgentCore, TickContext};
use crate::events::{EventSource, RewardKind};
use crate::state_key::StateKey;

impl AgentCore {
    pub(crate) fn hunter_tick(&mut self, ctx: &mut TickContext<'_>) {
        // Standing fully still long enough is camping, blocked or not.
        if self.still_timer >= 2.0 {
            self.match_xp -= 2.0;
            self.still_timer = 0.0;
            ctx.events.record(
                ctx.time,
                EventSource::System,
                RewardKind::CampingPenalty,
                -2.0,
            );
        }

        let distance = self.position.distance(ctx.opponent);
        let can_see = distance < self.vision_radius;
        if can_see {
            self.last_seen = Some(ctx.opponent);
            self.mode = Mode::Chase;
        }

        self.decision_timer -= ctx.dt;
        if self.decision_timer <= 0.0 {
            self.decision_timer = self.config.decision_interval;

            self.consider_trap(ctx, distance);

            let key = StateKey::new(distance, ctx.keys_left(), can_see);
            if self.mode == Mode::Chase && !can_see {
                self.mode = Mode::Investigate;
            } else if self.mode == Mode::Investigate && self.path.is_empty() {
                self.mode = self.brain.choose_action(&key);
            } else if self.mode == Mode::Patrol && self.rng.random::<f64>() < 0.1 {
                self.mode = self.brain.choose_action(&key);
            }
        }

        match self.mode {
            Mode::Chase => self.chase(ctx),
            Mode::Investigate => self.investigate(ctx),
            _ => self.patrol(ctx),
        }
    }

    /// Trap placement triggers, distance band first: a chasing hunter acts on
    /// live pursuit information, hotspot loitering is the fallback prior.
    fn consider_trap(&mut self, ctx: &mut TickContext<'_>, distance: f32) {
        if self.trap_cooldown > 0.0 || self.active_traps.is_full() {
            return;
        }

        let chasing_in_band = self.mode == Mode::Chase
            && distance > GameConfig::TRAP_CHASE_MIN
            && distance < GameConfig::TRAP_CHASE_MAX;
        if chasing_in_band {
            self.place_trap(ctx);
            return;
        }

        let loitering_hotspot = matches!(self.mode, Mode::Patrol | Mode::Investigate)
            && self.memory.is_hotspot(self.position.cell());
        if loitering_hotspot {
            self.place_trap(ctx);
        }
    }

    /// Re-path to the opponent whenever the current path's endpoint has
    /// drifted away from where they actually are.
    fn chase(&mut self, ctx: &mut TickContext<'_>) {
        let target = ctx.opponent.cell();
        let stale = self
            .path
            .back()
            .is_none_or(|&end| Vec2::from(end).distance(target.into()) > 1.0);
        if stale {
            self.path = find_path(ctx.grid, self.position.cell(), target)
                .unwrap_or_default()
                .into();
        }
        self.follow_path(ctx.grid, ctx.dt);
    }

    /// Head to the last seen position; give up to PATROL once the trail ends.
    fn investigate(&mut self, ctx: &mut TickContext<'_>) {
        let Some(last_seen) = self.last_seen else {
            self.mode = Mode::Patrol;
            return;
        };

        if self.path.is_empty() {
            self.path = find_path(ctx.grid, self.position.cell(), last_seen.cell())
                .unwrap_or_default()
                .into();
        }
        self.follow_path(ctx.grid, ctx.dt);
        if self.path.is_empty() {
            self.mode = Mode::Patrol;
        }
    }

    /// Wander toward a random interior cell.
    fn patrol(&mut self, ctx: &mut TickContext<'_>) {
        if self.path.is_empty() {
            let target = Position::new(
                self.rng.random_range(1..ctx.grid.width() as i32 - 1),
                self.rng.random_range(1..ctx.grid.height() as i32 - 1),
            );
            if !ctx.grid.is_wall(target.x, target.y) {
                self.path = find_path(ctx.grid, self.position.cell(), target)
                    .unwrap_or_default()
                    .into();
            }
        }
        self.follow_path(ctx.grid, ctx.dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MatchEvents;
    use game_core::{Role, TileGrid};

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

    fn hunter(grid: &TileGrid, seed: u64) -> AgentCore {
        AgentCore::new(
            Role::Hunter,
            Position::new(1, 1),
            grid,
            GameConfig::default(),
        )
        .with_seed(seed)
    }

    fn tick(agent: &mut AgentCore, grid: &TileGrid, events: &mut MatchEvents, opponent: Vec2) {
        let mut ctx = TickContext {
            grid,
            dt: 0.05,
            time: 0.0,
            opponent,
            keys_collected: 0,
            keys_required: 3,
            events,
        };
        agent.update(&mut ctx);
    }

    #[test]
    fn sight_acquisition_switches_to_chase() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = hunter(&grid, 21);

        assert_eq!(agent.mode(), Mode::Patrol);
        tick(&mut agent, &grid, &mut events, Vec2::new(3.0, 1.0));
        assert_eq!(agent.mode(), Mode::Chase);
    }

    #[test]
    fn losing_sight_demotes_to_investigate_with_last_seen_target() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = hunter(&grid, 21);

        tick(&mut agent, &grid, &mut events, Vec2::new(3.0, 1.0));
        assert_eq!(agent.mode(), Mode::Chase);

        // Opponent teleports far outside the vision radius.
        for _ in 0..6 {
            tick(&mut agent, &grid, &mut events, Vec2::new(8.0, 8.0));
        }
        assert_eq!(agent.mode(), Mode::Investigate);
        assert_eq!(agent.last_seen.unwrap().cell(), Position::new(3, 1));
    }

    #[test]
    fn chase_traps_only_inside_the_mid_range_band() {
        let grid = arena();
        let mut events = MatchEvents::new();

        // Too close: no trap.
        let mut close = hunter(&grid, 21);
        tick(&mut close, &grid, &mut events, Vec2::new(2.0, 1.0));
        assert!(close.active_traps().is_empty());

        // Mid-range band: trap drops on the decision tick.
        let mut banded = hunter(&grid, 21);
        tick(&mut banded, &grid, &mut events, Vec2::new(4.5, 1.0));
        assert_eq!(banded.active_traps().len(), 1);
        assert!(banded.trap_cooldown > 0.0);
    }

    #[test]
    fn patrol_traps_only_on_predicted_hotspots() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = hunter(&grid, 21);

        let mut history = agent.memory().heatmap_record(1);
        history.cells[1][1] = 80;
        agent.memory_mut().predict_hotspots(&[history]);
        assert!(agent.memory().is_hotspot(Position::new(1, 1)));

        // Opponent far away and hidden: still PATROL, standing on a hotspot.
        tick(&mut agent, &grid, &mut events, Vec2::new(8.0, 8.0));
        assert_eq!(agent.active_traps().len(), 1);
    }

    #[test]
    fn trap_slots_are_bounded() {
        let grid = arena();
        let mut events = MatchEvents::new();
        let mut agent = hunter(&grid, 21);

        agent.active_traps.push(Position::new(2, 2));
        agent.active_traps.push(Position::new(3, 3));

        tick(&mut agent, &grid, &mut events, Vec2::new(4.5, 1.0));
        assert_eq!(agent.active_traps().len(), GameConfig::MAX_ACTIVE_TRAPS);
    }
}
