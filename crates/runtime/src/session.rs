//! One pursuit match: the synchronous tick loop and world-event resolution.
//!
//! The session is the only writer of the grid (key pickup) and the only
//! place traps spring, exits open, and catches land. Everything happens
//! inline within `tick`, so no locking discipline is needed anywhere.

use agent::{EventSource, MatchEvents, RewardKind, SoundCue, TickContext};
use game_core::{GameConfig, Position, Role, TileGrid, TileKind};

use crate::controller::Controller;

/// Terminal result of a match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchOutcome {
    pub winner: Role,
    /// Simulated seconds from first tick to completion.
    pub duration: f32,
    pub keys_collected: u32,
}

/// A running match between two controllers.
pub struct MatchSession<H, S> {
    grid: TileGrid,
    hunter: H,
    survivor: S,
    config: GameConfig,
    keys_collected: u32,
    keys_required: u32,
    game_time: f32,
    events: MatchEvents,
    outcome: Option<MatchOutcome>,
}

impl<H: Controller, S: Controller> MatchSession<H, S> {
    pub fn new(grid: TileGrid, hunter: H, survivor: S, level: u32, config: GameConfig) -> Self {
        Self {
            grid,
            hunter,
            survivor,
            config,
            keys_collected: 0,
            keys_required: GameConfig::keys_required(level),
            game_time: 0.0,
            events: MatchEvents::new(),
            outcome: None,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn hunter(&self) -> &H {
        &self.hunter
    }

    pub fn hunter_mut(&mut self) -> &mut H {
        &mut self.hunter
    }

    pub fn survivor(&self) -> &S {
        &self.survivor
    }

    pub fn survivor_mut(&mut self) -> &mut S {
        &mut self.survivor
    }

    pub fn keys_collected(&self) -> u32 {
        self.keys_collected
    }

    pub fn keys_required(&self) -> u32 {
        self.keys_required
    }

    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    pub fn events(&self) -> &MatchEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut MatchEvents {
        &mut self.events
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Advances the match by one frame of real time.
    ///
    /// `raw_dt` is scaled by the configured time multiplier before anything
    /// runs. Returns the outcome once the match completes; further calls are
    /// no-ops that keep returning it.
    pub fn tick(&mut self, raw_dt: f32) -> Option<MatchOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        let dt = raw_dt * self.config.time_scale;
        self.game_time += dt;

        let progress = if self.keys_required > 0 {
            self.keys_collected as f32 / self.keys_required as f32
        } else {
            0.0
        };

        // Controller updates, each with an explicit view of the world. The
        // survivor moves first and the hunter reacts to the moved position.
        let hunter_position = self.hunter.position();
        let mut ctx = TickContext {
            grid: &self.grid,
            dt,
            time: self.game_time,
            opponent: hunter_position,
            keys_collected: self.keys_collected,
            keys_required: self.keys_required,
            events: &mut self.events,
        };
        self.survivor.update(&mut ctx);

        let survivor_position = self.survivor.position();
        let mut ctx = TickContext {
            grid: &self.grid,
            dt,
            time: self.game_time,
            opponent: survivor_position,
            keys_collected: self.keys_collected,
            keys_required: self.keys_required,
            events: &mut self.events,
        };
        self.hunter.update(&mut ctx);
        self.hunter.apply_speed_scale(progress);

        self.resolve_traps();
        self.resolve_pickups();

        if let Some(outcome) = self.check_win_conditions() {
            self.finish(outcome);
        }
        self.outcome
    }

    /// Springs the first trap the survivor is standing on.
    fn resolve_traps(&mut self) {
        let cell = self.survivor.position().nearest_cell();
        if !self.hunter.active_traps().contains(&cell) {
            return;
        }

        self.hunter.consume_trap(cell);
        self.events.cue(SoundCue::Scare);
        self.hunter.add_match_xp(30.0);
        self.events.record(
            self.game_time,
            EventSource::Agent(Role::Hunter),
            RewardKind::TrapSuccess,
            30.0,
        );
        self.survivor.add_match_xp(-50.0);
        self.survivor.freeze(GameConfig::FREEZE_DURATION);
        self.events.record(
            self.game_time,
            EventSource::Agent(Role::Survivor),
            RewardKind::SurvivorTrapped,
            -50.0,
        );
        tracing::info!(%cell, t = self.game_time, "survivor trapped");
    }

    /// Collects a key under the survivor, mutating the grid in place.
    fn resolve_pickups(&mut self) {
        let cell = self.survivor.position().nearest_cell();
        if self.grid.tile(cell) != Some(TileKind::Key) {
            return;
        }

        self.keys_collected += 1;
        self.grid.clear_key(cell);
        self.events.cue(SoundCue::Pickup);
        self.survivor.add_match_xp(50.0);
        self.survivor.forget_key(cell);
        self.events.record(
            self.game_time,
            EventSource::Agent(Role::Survivor),
            RewardKind::KeyCollected,
            50.0,
        );
        tracing::info!(
            %cell,
            collected = self.keys_collected,
            required = self.keys_required,
            "key collected"
        );
    }

    fn check_win_conditions(&mut self) -> Option<MatchOutcome> {
        // Escape: standing on an exit with the quota met.
        let cell = self.survivor.position().nearest_cell();
        if self.grid.tile(cell) == Some(TileKind::Exit) && self.keys_collected >= self.keys_required
        {
            self.events.cue(SoundCue::Win);
            return Some(MatchOutcome {
                winner: Role::Survivor,
                duration: self.game_time,
                keys_collected: self.keys_collected,
            });
        }

        // Catch: close enough counts regardless of walls between centers.
        let gap = self.survivor.position().distance(self.hunter.position());
        if gap < GameConfig::CATCH_RADIUS {
            self.events.cue(SoundCue::Scare);
            self.survivor.add_match_xp(-100.0);
            self.events.record(
                self.game_time,
                EventSource::Agent(Role::Survivor),
                RewardKind::Caught,
                -100.0,
            );
            self.hunter.add_match_xp(100.0);
            self.events.record(
                self.game_time,
                EventSource::Agent(Role::Hunter),
                RewardKind::Catch,
                100.0,
            );
            return Some(MatchOutcome {
                winner: Role::Hunter,
                duration: self.game_time,
                keys_collected: self.keys_collected,
            });
        }

        None
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        tracing::info!(
            winner = %outcome.winner,
            duration = outcome.duration,
            keys = outcome.keys_collected,
            "match complete"
        );
        self.outcome = Some(outcome);
    }
}

/// Finds both spawn cells, defaulting to the map corners the generator uses.
pub fn spawn_points(grid: &TileGrid) -> (Position, Position) {
    let hunter = grid
        .spawn(Role::Hunter)
        .unwrap_or(Position::new(grid.width() as i32 - 2, grid.height() as i32 - 2));
    let survivor = grid.spawn(Role::Survivor).unwrap_or(Position::new(1, 1));
    (hunter, survivor)
}
