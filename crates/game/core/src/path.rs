//! Grid pathfinding via A* with a Manhattan heuristic.
//!
//! Movement is 4-directional with unit cost, so the Manhattan distance is an
//! admissible heuristic and cells never need to be reopened once expanded.
//! The search is capped so degenerate or unreachable queries terminate in
//! bounded time; callers treat `None` as "unreachable or too far", never as
//! an error.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::TileGrid;
use crate::types::Position;

/// Node expansions after which a search is abandoned as unreachable.
const MAX_EXPANSIONS: usize = 5000;

/// Shortest 4-directional path from `start` to `goal`, both inclusive.
///
/// Returns `None` when no path exists, when the goal is walled off, or when
/// the expansion cap is exhausted. The returned path is owned by the caller
/// and is meant to be replaced wholesale when it goes stale, never patched.
pub fn find_path(grid: &TileGrid, start: Position, goal: Position) -> Option<Vec<Position>> {
    // Open set ordered by f = g + h; ties broken by insertion sequence so the
    // search is deterministic.
    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_score: HashMap<Position, u32> = HashMap::new();
    let mut closed: HashSet<Position> = HashSet::new();

    let mut sequence = 0u32;
    g_score.insert(start, 0);
    open.push(Reverse((start.manhattan(goal), sequence, start)));

    let mut expansions = 0usize;
    while let Some(Reverse((_, _, current))) = open.pop() {
        expansions += 1;
        if expansions > MAX_EXPANSIONS {
            return None;
        }

        if !closed.insert(current) {
            // Stale duplicate entry for an already-finalized cell.
            continue;
        }

        if current == goal {
            return Some(reconstruct(&came_from, current));
        }

        let current_g = g_score[&current];
        for neighbor in current.cardinal_neighbors() {
            if grid.is_wall(neighbor.x, neighbor.y) || closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let known_g = g_score.get(&neighbor).copied();
            if known_g.is_none_or(|g| tentative_g < g) {
                g_score.insert(neighbor, tentative_g);
                came_from.insert(neighbor, current);
                sequence += 1;
                open.push(Reverse((
                    tentative_g + neighbor.manhattan(goal),
                    sequence,
                    neighbor,
                )));
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&parent) = came_from.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileKind;
    use crate::types::Role;

    fn open_grid(width: u32, height: u32) -> TileGrid {
        let mut grid = TileGrid::filled(width, height, TileKind::Floor);
        for x in 0..width as i32 {
            grid.set_tile(Position::new(x, 0), TileKind::Wall);
            grid.set_tile(Position::new(x, height as i32 - 1), TileKind::Wall);
        }
        for y in 0..height as i32 {
            grid.set_tile(Position::new(0, y), TileKind::Wall);
            grid.set_tile(Position::new(width as i32 - 1, y), TileKind::Wall);
        }
        grid
    }

    #[test]
    fn path_length_matches_manhattan_distance_on_open_grid() {
        let grid = open_grid(12, 12);
        for (start, goal) in [
            (Position::new(1, 1), Position::new(10, 10)),
            (Position::new(3, 8), Position::new(9, 2)),
            (Position::new(1, 5), Position::new(1, 5)),
        ] {
            let path = find_path(&grid, start, goal).unwrap();
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&goal));
            // Inclusive of both endpoints, so length is distance + 1.
            assert_eq!(path.len() as u32, start.manhattan(goal) + 1);
        }
    }

    #[test]
    fn consecutive_path_cells_are_adjacent_and_walkable() {
        let grid = TileGrid::parse(
            "#######\n\
             #P..#.#\n\
             ##.##.#\n\
             #...#E#\n\
             #.#...#\n\
             #######\n",
        )
        .unwrap();
        let start = grid.spawn(Role::Survivor).unwrap();
        let goal = Position::new(5, 3);
        let path = find_path(&grid, start, goal).unwrap();
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
            assert!(!grid.is_wall(pair[1].x, pair[1].y));
        }
    }

    #[test]
    fn complete_barrier_yields_no_path() {
        let mut grid = open_grid(9, 9);
        for y in 0..9 {
            grid.set_tile(Position::new(4, y), TileKind::Wall);
        }
        assert!(find_path(&grid, Position::new(1, 1), Position::new(7, 7)).is_none());
    }

    #[test]
    fn walled_goal_is_unreachable() {
        let grid = open_grid(6, 6);
        assert!(find_path(&grid, Position::new(1, 1), Position::new(0, 0)).is_none());
    }

    #[test]
    fn search_is_deterministic() {
        let grid = open_grid(10, 10);
        let a = find_path(&grid, Position::new(1, 1), Position::new(8, 8));
        let b = find_path(&grid, Position::new(1, 1), Position::new(8, 8));
        assert_eq!(a, b);
    }
}
