//! Per-agent perception memory: visit heatmap, coverage, and belief sets.
//!
//! Memory is rebuilt empty at every match start; only the heatmap leaves the
//! match as a [`HeatmapRecord`] so future matches can aggregate historical
//! traffic into predicted hotspots. Belief sets (known keys, known exits) are
//! continuously re-derived from what the vision sweep actually observes, not
//! one-time snapshots, so a key collected by the opponent disappears from the
//! belief once the cell is seen empty.

use std::collections::HashSet;

use game_core::{Position, TileGrid, TileKind};

/// Fraction of the peak aggregated visit count above which a cell counts as
/// a hotspot (strictly greater).
const HOTSPOT_THRESHOLD: f64 = 0.3;

/// One match worth of visit counts, persisted per completed match.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HeatmapRecord {
    pub level: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major visit counts, `cells[y][x]`.
    pub cells: Vec<Vec<u32>>,
}

/// Visit tracking and fog-of-war belief state for a single agent.
#[derive(Clone, Debug)]
pub struct PerceptionMemory {
    width: u32,
    height: u32,
    heatmap: Vec<u32>,
    visited: HashSet<Position>,
    walkable_cells: usize,
    known_keys: Vec<Position>,
    known_exits: Vec<Position>,
    hotspots: HashSet<Position>,
}

impl PerceptionMemory {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            heatmap: vec![0; (width * height) as usize],
            visited: HashSet::new(),
            walkable_cells: 0,
            known_keys: Vec::new(),
            known_exits: Vec::new(),
            hotspots: HashSet::new(),
        }
    }

    /// Counts the walkable cells of the freshly generated grid.
    ///
    /// Called once at match start; [`exploration_percentage`] reports 0 until
    /// it has run.
    ///
    /// [`exploration_percentage`]: Self::exploration_percentage
    pub fn initialize_walkable_count(&mut self, grid: &TileGrid) {
        self.walkable_cells = grid.walkable_count();
    }

    /// Records a visit: bumps the heatmap cell and tracks unique coverage.
    /// Out-of-bounds positions are ignored.
    pub fn visit(&mut self, position: Position) {
        let Some(index) = self.index(position) else {
            return;
        };
        self.heatmap[index] += 1;
        self.visited.insert(position);
    }

    /// Unique visited cells over total walkable cells, in `[0, 1]`.
    pub fn exploration_percentage(&self) -> f64 {
        if self.walkable_cells == 0 {
            return 0.0;
        }
        self.visited.len() as f64 / self.walkable_cells as f64
    }

    /// Belief update for one observed tile inside the vision radius.
    ///
    /// Newly seen keys and exits join the belief lists; a cell previously
    /// believed to hold a key but observed as floor is forgotten (the other
    /// agent picked it up).
    pub fn observe_tile(&mut self, position: Position, tile: TileKind) {
        match tile {
            TileKind::Key => {
                if !self.known_keys.contains(&position) {
                    self.known_keys.push(position);
                }
            }
            TileKind::Exit => {
                if !self.known_exits.contains(&position) {
                    self.known_exits.push(position);
                }
            }
            _ => self.forget_key(position),
        }
    }

    /// Drops a key belief, e.g. after this agent collected it.
    pub fn forget_key(&mut self, position: Position) {
        self.known_keys.retain(|&known| known != position);
    }

    pub fn known_keys(&self) -> &[Position] {
        &self.known_keys
    }

    pub fn known_exits(&self) -> &[Position] {
        &self.known_exits
    }

    pub fn is_hotspot(&self, position: Position) -> bool {
        self.hotspots.contains(&position)
    }

    pub fn hotspot_count(&self) -> usize {
        self.hotspots.len()
    }

    /// Derives predicted hotspots from historical heatmaps.
    ///
    /// Records with mismatched dimensions are skipped. The remaining grids
    /// are summed cell-wise and every cell strictly above 30% of the peak is
    /// marked; a flat (all-zero) history carries no signal and yields none.
    pub fn predict_hotspots(&mut self, records: &[HeatmapRecord]) {
        self.hotspots.clear();

        let mut total = vec![0u64; (self.width * self.height) as usize];
        let mut used = 0usize;
        for record in records {
            if record.width != self.width || record.height != self.height {
                tracing::debug!(
                    record_width = record.width,
                    record_height = record.height,
                    "skipping heatmap record with mismatched dimensions"
                );
                continue;
            }
            used += 1;
            for (y, row) in record.cells.iter().enumerate() {
                for (x, &count) in row.iter().enumerate() {
                    total[y * self.width as usize + x] += count as u64;
                }
            }
        }

        let max = total.iter().copied().max().unwrap_or(0);
        let threshold = max as f64 * HOTSPOT_THRESHOLD;
        if threshold > 0.0 {
            for y in 0..self.height as i32 {
                for x in 0..self.width as i32 {
                    if total[(y * self.width as i32 + x) as usize] as f64 > threshold {
                        self.hotspots.insert(Position::new(x, y));
                    }
                }
            }
        }

        tracing::debug!(
            records = used,
            hotspots = self.hotspots.len(),
            "hotspot prediction refreshed"
        );
    }

    /// Exports this match's heatmap for persistence.
    pub fn heatmap_record(&self, level: u32) -> HeatmapRecord {
        let cells = (0..self.height as usize)
            .map(|y| {
                let start = y * self.width as usize;
                self.heatmap[start..start + self.width as usize].to_vec()
            })
            .collect();
        HeatmapRecord {
            level,
            width: self.width,
            height: self.height,
            cells,
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
        {
            Some(position.y as usize * self.width as usize + position.x as usize)
        } else {
            None
        }
    }
}
