//! Procedural maze generation: recursive backtracker plus loop braiding.
//!
//! The backtracker carves a perfect maze over an odd-dimension lattice, then
//! a braiding pass knocks out a fraction of the remaining interior walls so
//! pursuit has alternate routes instead of dead-end funnels. Entity
//! placement enforces minimum spacing between objectives, with a relaxed
//! fallback pass so every requested item spawns even on cramped layouts.

use rand::Rng;
use rand::seq::IndexedRandom;

use game_core::{GameConfig, Position, TileGrid, TileKind};

/// Chance that a braiding candidate wall is opened into a loop.
const BRAID_CHANCE: f64 = 0.1;
/// Minimum spacing between placed keys, in tiles.
const KEY_SPACING: f32 = 8.0;
/// Minimum spacing between placed exits, in tiles.
const EXIT_SPACING: f32 = 10.0;
/// Objectives must spawn at least this far from the survivor start.
const SPAWN_CLEARANCE: f32 = 6.0;

/// Maze generator over a `width × height` cell lattice.
///
/// The produced grid measures `2 * width + 1` by `2 * height + 1` tiles:
/// cells sit on odd coordinates with carvable walls between them.
pub struct MazeGenerator {
    width: u32,
    height: u32,
}

impl MazeGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(5),
            height: height.max(5),
        }
    }

    /// Lattice size for a maze level: grows one cell per level.
    pub fn for_level(level: u32) -> Self {
        let size = 10 + level.saturating_sub(1);
        Self::new(size, size)
    }

    /// Carves a maze and places spawns, keys, and exits for `level`.
    pub fn generate(&self, level: u32, rng: &mut impl Rng) -> TileGrid {
        let map_w = self.width * 2 + 1;
        let map_h = self.height * 2 + 1;
        let mut grid = TileGrid::filled(map_w, map_h, TileKind::Wall);

        self.carve(&mut grid, rng);
        self.braid(&mut grid, rng);
        self.place_entities(&mut grid, level, rng);

        tracing::debug!(
            width = map_w,
            height = map_h,
            level,
            "maze generated"
        );
        grid
    }

    /// Recursive backtracker, iterative form: walk to a random unvisited
    /// lattice neighbor, knocking out the wall between, and backtrack when
    /// boxed in.
    fn carve(&self, grid: &mut TileGrid, rng: &mut impl Rng) {
        let start = Position::new(1, 1);
        grid.set_tile(start, TileKind::Floor);
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let neighbors = self.unvisited_neighbors(grid, current);
            if let Some(&next) = neighbors.choose(rng) {
                let wall = Position::new((current.x + next.x) / 2, (current.y + next.y) / 2);
                grid.set_tile(wall, TileKind::Floor);
                grid.set_tile(next, TileKind::Floor);
                stack.push(next);
            } else {
                stack.pop();
            }
        }
    }

    /// Lattice neighbors two tiles away that are still walls.
    fn unvisited_neighbors(&self, grid: &TileGrid, cell: Position) -> Vec<Position> {
        [(0, -2), (0, 2), (-2, 0), (2, 0)]
            .iter()
            .map(|&(dx, dy)| Position::new(cell.x + dx, cell.y + dy))
            .filter(|&candidate| {
                candidate.x > 0
                    && candidate.y > 0
                    && candidate.x < grid.width() as i32 - 1
                    && candidate.y < grid.height() as i32 - 1
                    && grid.tile(candidate) == Some(TileKind::Wall)
            })
            .collect()
    }

    /// Opens a fraction of straight wall segments into loops.
    fn braid(&self, grid: &mut TileGrid, rng: &mut impl Rng) {
        for y in 1..grid.height() as i32 - 1 {
            for x in 1..grid.width() as i32 - 1 {
                if grid.tile(Position::new(x, y)) != Some(TileKind::Wall) {
                    continue;
                }
                let vertical_corridor = !grid.is_wall(x, y - 1) && !grid.is_wall(x, y + 1);
                let horizontal_corridor = !grid.is_wall(x - 1, y) && !grid.is_wall(x + 1, y);
                if (vertical_corridor || horizontal_corridor) && rng.random_bool(BRAID_CHANCE) {
                    grid.set_tile(Position::new(x, y), TileKind::Floor);
                }
            }
        }
    }

    /// Survivor spawns top-left, hunter bottom-right, then keys and exits
    /// scatter with spacing constraints.
    fn place_entities(&self, grid: &mut TileGrid, level: u32, rng: &mut impl Rng) {
        let mut placed = Vec::new();

        let survivor = Position::new(1, 1);
        grid.set_tile(survivor, TileKind::SurvivorSpawn);
        placed.push(survivor);

        let hunter = Position::new(self.width as i32 * 2 - 1, self.height as i32 * 2 - 1);
        grid.set_tile(hunter, TileKind::HunterSpawn);

        // One spare key beyond the quota keeps the match winnable even if a
        // key ends up in an awkward pocket.
        let key_count = GameConfig::keys_required(level) + 1;
        self.place_items(grid, TileKind::Key, key_count, KEY_SPACING, &mut placed, rng);
        self.place_items(grid, TileKind::Exit, 2, EXIT_SPACING, &mut placed, rng);
    }

    fn place_items(
        &self,
        grid: &mut TileGrid,
        item: TileKind,
        count: u32,
        spacing: f32,
        placed: &mut Vec<Position>,
        rng: &mut impl Rng,
    ) {
        let mut remaining = count;
        let mut attempts = 0;
        while remaining > 0 && attempts < 3000 {
            attempts += 1;
            let candidate = Position::new(
                rng.random_range(1..grid.width() as i32 - 1),
                rng.random_range(1..grid.height() as i32 - 1),
            );
            if grid.tile(candidate) != Some(TileKind::Floor) {
                continue;
            }
            if distance(candidate, Position::new(1, 1)) < SPAWN_CLEARANCE {
                continue;
            }
            let too_close = placed
                .iter()
                .any(|&existing| distance(candidate, existing) < spacing);
            if too_close {
                continue;
            }

            grid.set_tile(candidate, item);
            placed.push(candidate);
            remaining -= 1;
        }

        // Relaxed pass: spacing no longer matters, spawning does.
        if remaining > 0 {
            tracing::debug!(?item, remaining, "relaxed placement fallback");
            for _ in 0..1000 {
                if remaining == 0 {
                    break;
                }
                let candidate = Position::new(
                    rng.random_range(1..grid.width() as i32 - 1),
                    rng.random_range(1..grid.height() as i32 - 1),
                );
                if grid.tile(candidate) == Some(TileKind::Floor) {
                    grid.set_tile(candidate, item);
                    placed.push(candidate);
                    remaining -= 1;
                }
            }
        }
    }
}

fn distance(a: Position, b: Position) -> f32 {
    ((a.x - b.x) as f32).hypot((a.y - b.y) as f32)
}
