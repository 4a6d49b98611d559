//! Continuous movement, collision probes, and path following.
//!
//! Collision is resolved per axis: the X displacement is attempted and kept
//! only if all four margin-inset corner probes stay off wall tiles, then the
//! Y displacement is attempted independently. Decoupling the axes lets
//! agents slide along walls instead of sticking to them.

use rand::seq::IndexedRandom;

use game_core::{GameConfig, Position, TileGrid, Vec2};

use crate::core::{AgentCore, TickContext};
use crate::events::{EventSource, RewardKind};

impl AgentCore {
    /// Moves along `direction` (a unit vector) for one tick, resolving each
    /// axis against the grid separately.
    pub(crate) fn move_toward(&mut self, direction: Vec2, grid: &TileGrid, dt: f32) {
        let step = self.speed * dt;

        let next_x = self.position.x + direction.x * step;
        if !collides(grid, next_x, self.position.y) {
            self.position.x = next_x;
        }

        let next_y = self.position.y + direction.y * step;
        if !collides(grid, self.position.x, next_y) {
            self.position.y = next_y;
        }
    }

    /// Steers toward the first waypoint of the current path.
    ///
    /// Within the arrival tolerance the agent snaps to the waypoint's exact
    /// coordinates and pops it; movement resumes next tick. Without a path
    /// this is a no-op.
    pub(crate) fn follow_path(&mut self, grid: &TileGrid, dt: f32) {
        let Some(&next) = self.path.front() else {
            return;
        };

        let target = Vec2::from(next);
        let delta = Vec2::new(target.x - self.position.x, target.y - self.position.y);
        if delta.length() < GameConfig::WAYPOINT_TOLERANCE {
            self.path.pop_front();
            self.position = target;
            return;
        }

        self.move_toward(delta.normalized(), grid, dt);
    }

    /// Emergency relocation when displacement has stalled past the trip
    /// point: teleport to a random open neighbor cell, drop the stale path,
    /// and record the penalty.
    pub(crate) fn force_unstuck(&mut self, ctx: &mut TickContext<'_>) {
        self.match_xp -= 5.0;
        ctx.events
            .record(ctx.time, EventSource::Physics, RewardKind::WallHit, -5.0);

        let center = self.position.nearest_cell();
        let open: Vec<Position> = center
            .cardinal_neighbors()
            .into_iter()
            .filter(|neighbor| !ctx.grid.is_wall(neighbor.x, neighbor.y))
            .collect();

        if let Some(&target) = open.choose(&mut self.rng) {
            tracing::debug!(from = %center, to = %target, "forced unstuck relocation");
            self.position = target.into();
            self.path.clear();
        }
    }
}

/// True when any of the four margin-inset corners of a unit-sized body at
/// `(x, y)` lands on a wall tile.
///
/// Shared by every mover in the simulation, agent-driven or host-driven.
pub fn collides(grid: &TileGrid, x: f32, y: f32) -> bool {
    let margin = GameConfig::COLLISION_MARGIN;
    let probes = [
        (x + margin, y + margin),
        (x + 1.0 - margin, y + margin),
        (x + margin, y + 1.0 - margin),
        (x + 1.0 - margin, y + 1.0 - margin),
    ];
    probes
        .iter()
        .any(|&(px, py)| grid.is_wall(px as i32, py as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Role;

    fn corridor() -> TileGrid {
        // One open row from (1,1) to (6,1).
        TileGrid::parse(
            "########\n\
             #......#\n\
             ########\n",
        )
        .unwrap()
    }

    fn agent_at(grid: &TileGrid, x: f32, y: f32) -> AgentCore {
        let mut agent = AgentCore::new(
            Role::Survivor,
            Position::new(x as i32, y as i32),
            grid,
            GameConfig::default(),
        )
        .with_seed(5);
        agent.position = Vec2::new(x, y);
        agent
    }

    #[test]
    fn axes_resolve_independently_for_wall_sliding() {
        let grid = corridor();
        let mut agent = agent_at(&grid, 2.0, 1.0);

        // Diagonal push: Y is blocked by the corridor walls, X still moves.
        agent.move_toward(Vec2::new(1.0, 1.0).normalized(), &grid, 0.1);
        assert!(agent.position.x > 2.0, "free axis must advance");
        assert_eq!(agent.position.y, 1.0, "blocked axis must hold");
    }

    #[test]
    fn movement_into_walls_is_rejected() {
        let grid = corridor();
        let mut agent = agent_at(&grid, 1.0, 1.0);

        agent.move_toward(Vec2::new(-1.0, 0.0), &grid, 0.5);
        assert_eq!(agent.position.x, 1.0);
    }

    #[test]
    fn follow_path_snaps_and_pops_waypoints() {
        let grid = corridor();
        let mut agent = agent_at(&grid, 1.0, 1.0);
        agent.path = vec![Position::new(2, 1), Position::new(3, 1)].into();

        // Walk until the first waypoint is consumed.
        for _ in 0..40 {
            agent.follow_path(&grid, 0.05);
            if agent.path.len() == 1 {
                break;
            }
        }
        assert_eq!(agent.path.len(), 1, "first waypoint should be popped");
        assert_eq!(agent.position.y, 1.0);
    }

    #[test]
    fn probe_margin_allows_standing_near_walls() {
        let grid = corridor();
        // Slightly off the cell center: corners stay inside the open row.
        assert!(!collides(&grid, 1.2, 1.0));
        // Straddling into the wall row collides.
        assert!(collides(&grid, 1.2, 1.5));
    }
}
