//! Capability seam between the session and whatever drives an entity.
//!
//! The session, recorder, and rendering collaborators depend only on
//! [`Controller`], never on concrete types: an AI-driven [`agent::AgentCore`]
//! and a host-driven [`InputController`] are interchangeable on either side
//! of a match.

use agent::{AgentCore, TickContext, collides};
use game_core::{GameConfig, Position, Role, Vec2};

/// Common capability interface for match participants.
pub trait Controller {
    fn role(&self) -> Role;

    fn position(&self) -> Vec2;

    /// Advances the entity by one tick with an explicit world view.
    fn update(&mut self, ctx: &mut TickContext<'_>);

    /// Traps currently armed by this entity (empty for most survivors).
    fn active_traps(&self) -> &[Position];

    /// Removes a sprung trap; false when no trap was armed at the cell.
    fn consume_trap(&mut self, position: Position) -> bool;

    /// Suspends the entity entirely for the given duration.
    fn freeze(&mut self, duration: f32);

    fn is_scanning(&self) -> bool;

    /// Applies a world-sourced reward. Host-driven entities ignore it.
    fn add_match_xp(&mut self, _delta: f64) {}

    fn match_xp(&self) -> f64 {
        0.0
    }

    /// Drops a key belief after the world confirmed the pickup.
    fn forget_key(&mut self, _position: Position) {}

    /// Rescales speed as the survivor's key progress grows.
    fn apply_speed_scale(&mut self, _progress: f32) {}
}

impl Controller for AgentCore {
    fn role(&self) -> Role {
        AgentCore::role(self)
    }

    fn position(&self) -> Vec2 {
        AgentCore::position(self)
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        AgentCore::update(self, ctx);
    }

    fn active_traps(&self) -> &[Position] {
        AgentCore::active_traps(self)
    }

    fn consume_trap(&mut self, position: Position) -> bool {
        AgentCore::consume_trap(self, position)
    }

    fn freeze(&mut self, duration: f32) {
        AgentCore::freeze(self, duration);
    }

    fn is_scanning(&self) -> bool {
        AgentCore::is_scanning(self)
    }

    fn add_match_xp(&mut self, delta: f64) {
        AgentCore::add_match_xp(self, delta);
    }

    fn match_xp(&self) -> f64 {
        AgentCore::match_xp(self)
    }

    fn forget_key(&mut self, position: Position) {
        self.memory_mut().forget_key(position);
    }

    fn apply_speed_scale(&mut self, progress: f32) {
        self.scale_speed(progress, GameConfig::HUNTER_SPEED_SCALE_BASE);
    }
}

impl<T: Controller + ?Sized> Controller for Box<T> {
    fn role(&self) -> Role {
        (**self).role()
    }

    fn position(&self) -> Vec2 {
        (**self).position()
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        (**self).update(ctx);
    }

    fn active_traps(&self) -> &[Position] {
        (**self).active_traps()
    }

    fn consume_trap(&mut self, position: Position) -> bool {
        (**self).consume_trap(position)
    }

    fn freeze(&mut self, duration: f32) {
        (**self).freeze(duration);
    }

    fn is_scanning(&self) -> bool {
        (**self).is_scanning()
    }

    fn add_match_xp(&mut self, delta: f64) {
        (**self).add_match_xp(delta);
    }

    fn match_xp(&self) -> f64 {
        (**self).match_xp()
    }

    fn forget_key(&mut self, position: Position) {
        (**self).forget_key(position);
    }

    fn apply_speed_scale(&mut self, progress: f32) {
        (**self).apply_speed_scale(progress);
    }
}

/// Host-driven entity: the hook through which human input reaches a match.
///
/// The host pushes a movement direction and ability requests before each
/// tick; the controller applies them with the same collision rules and
/// ability cooldowns the agents obey.
pub struct InputController {
    role: Role,
    position: Vec2,
    speed: f32,
    direction: Vec2,
    freeze_timer: f32,

    stamina: f32,
    is_sprinting: bool,

    active_traps: Vec<Position>,
    trap_cooldown: f32,
    wants_trap: bool,

    is_scanning: bool,
    scan_timer: f32,
    scan_cooldown: f32,
    wants_scan: bool,
}

impl InputController {
    /// Trap cooldown for human hunters (shorter than the AI's).
    const TRAP_COOLDOWN: f32 = 5.0;
    const SCAN_COOLDOWN: f32 = 15.0;

    pub const MAX_STAMINA: f32 = 100.0;
    const SPRINT_MULTIPLIER: f32 = 1.5;
    const SPRINT_DRAIN: f32 = 30.0;
    const SPRINT_REGEN: f32 = 15.0;

    pub fn new(role: Role, spawn: Position) -> Self {
        let speed = match role {
            Role::Hunter => 4.2,
            Role::Survivor => GameConfig::SURVIVOR_SPEED,
        };
        Self {
            role,
            position: Vec2::from(spawn),
            speed,
            direction: Vec2::new(0.0, 0.0),
            freeze_timer: 0.0,
            stamina: Self::MAX_STAMINA,
            is_sprinting: false,
            active_traps: Vec::new(),
            trap_cooldown: 0.0,
            wants_trap: false,
            is_scanning: false,
            scan_timer: 0.0,
            scan_cooldown: 0.0,
            wants_scan: false,
        }
    }

    /// Sets the movement direction for the next tick (need not be unit).
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.normalized();
    }

    /// Holds or releases sprint; sprinting drains stamina and stops working
    /// once it runs dry.
    pub fn set_sprinting(&mut self, sprinting: bool) {
        self.is_sprinting = sprinting;
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn request_trap(&mut self) {
        self.wants_trap = true;
    }

    pub fn request_scan(&mut self) {
        self.wants_scan = true;
    }

    fn place_trap(&mut self) {
        if self.trap_cooldown > 0.0 || self.active_traps.len() >= GameConfig::MAX_ACTIVE_TRAPS {
            return;
        }
        let cell = self.position.nearest_cell();
        if self.active_traps.contains(&cell) {
            return;
        }
        self.active_traps.push(cell);
        self.trap_cooldown = Self::TRAP_COOLDOWN;
        tracing::debug!(%cell, "human trap armed");
    }
}

impl Controller for InputController {
    fn role(&self) -> Role {
        self.role
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        let dt = ctx.dt;
        if self.freeze_timer > 0.0 {
            self.freeze_timer -= dt;
            self.direction = Vec2::new(0.0, 0.0);
            self.wants_trap = false;
            self.wants_scan = false;
            if self.freeze_timer > 0.0 {
                return;
            }
        }

        if self.trap_cooldown > 0.0 {
            self.trap_cooldown -= dt;
        }
        if self.scan_cooldown > 0.0 {
            self.scan_cooldown -= dt;
        }
        if self.is_scanning {
            self.scan_timer -= dt;
            if self.scan_timer <= 0.0 {
                self.is_scanning = false;
            }
        }

        let mut current_speed = self.speed;
        if self.is_sprinting && self.stamina > 0.0 {
            current_speed *= Self::SPRINT_MULTIPLIER;
            self.stamina -= Self::SPRINT_DRAIN * dt;
        } else if self.stamina < Self::MAX_STAMINA {
            self.stamina = (self.stamina + Self::SPRINT_REGEN * dt).min(Self::MAX_STAMINA);
        }

        // Per-axis collision, same rules as agent movement.
        let step = current_speed * dt;
        let next_x = self.position.x + self.direction.x * step;
        if !collides(ctx.grid, next_x, self.position.y) {
            self.position.x = next_x;
        }
        let next_y = self.position.y + self.direction.y * step;
        if !collides(ctx.grid, self.position.x, next_y) {
            self.position.y = next_y;
        }

        if std::mem::take(&mut self.wants_trap) && self.role == Role::Hunter {
            self.place_trap();
        }
        if std::mem::take(&mut self.wants_scan) && self.scan_cooldown <= 0.0 {
            self.is_scanning = true;
            self.scan_timer = GameConfig::SCAN_DURATION;
            self.scan_cooldown = Self::SCAN_COOLDOWN;
            ctx.events.cue(agent::SoundCue::Scare);
        }
    }

    fn active_traps(&self) -> &[Position] {
        &self.active_traps
    }

    fn consume_trap(&mut self, position: Position) -> bool {
        if let Some(index) = self.active_traps.iter().position(|&trap| trap == position) {
            self.active_traps.swap_remove(index);
            true
        } else {
            false
        }
    }

    fn freeze(&mut self, duration: f32) {
        self.freeze_timer = duration;
    }

    fn is_scanning(&self) -> bool {
        self.is_scanning
    }
}
