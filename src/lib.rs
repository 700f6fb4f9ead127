//! Horde Siege - A top-down city survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, combat, waves)
//! - `settings`: Headless runner preferences
//!
//! Rendering, HUD, minimap, camera and input capture live outside this crate
//! and read the simulation through [`sim::GameState`].

pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Longest frame the simulation will integrate in one step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Nominal frame step used by the headless runner
    pub const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 5200.0;
    pub const WORLD_HEIGHT: f32 = 3200.0;

    /// Obstacle circles along building perimeters
    pub const OBSTACLE_RADIUS: f32 = 16.0;
    pub const OBSTACLE_STRIDE: f32 = 44.0;
    pub const OBSTACLE_INSET: f32 = 20.0;
    /// Extra clearance kept between a moving body and an obstacle
    pub const COLLISION_SKIN: f32 = 2.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PLAYER_BASE_SPEED: f32 = 230.0;
    pub const PLAYER_SPRINT_BOOST: f32 = 1.65;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_MAX_STAMINA: f32 = 100.0;
    /// Stamina drained per second while sprinting
    pub const STAMINA_DRAIN: f32 = 35.0;
    /// Stamina regenerated per second otherwise
    pub const STAMINA_REGEN: f32 = 22.0;
    /// Sprinting requires strictly more stamina than this
    pub const SPRINT_MIN_STAMINA: f32 = 1.0;
    /// Immunity window after taking a hit (seconds)
    pub const HIT_IMMUNITY: f32 = 0.25;
    /// Fire lockout after switching weapons (seconds)
    pub const SWITCH_LOCKOUT: f32 = 0.25;

    /// Projectiles leave the barrel this far from the player center
    pub const MUZZLE_OFFSET: f32 = 26.0;
    /// Relative speed jitter applied per pellet (±7.5%)
    pub const PELLET_SPEED_JITTER: f32 = 0.15;
    pub const BALLISTIC_LIFETIME: f32 = 0.95;
    /// Incendiary projectiles swell each step
    pub const INCENDIARY_GROWTH: f32 = 1.05;

    /// Agent behaviour
    pub const ENGAGE_RANGE: f32 = 920.0;
    pub const WANDER_SPEED_FACTOR: f32 = 0.28;
    /// Facing is only refreshed above this speed
    pub const FACING_MIN_SPEED: f32 = 1.0;

    /// Spawning
    pub const SPAWN_RATE: f32 = 55.0;
    pub const MAX_ACTIVE_AGENTS: usize = 260;
    pub const SPAWN_CANDIDATES: usize = 32;
    pub const SPAWN_MIN_PLAYER_DIST: f32 = 520.0;
    pub const SPAWN_PROBE_RADIUS: f32 = 18.0;
    pub const SPAWN_OBSTACLE_MARGIN: f32 = 8.0;
    pub const SPAWN_WEIGHT_SPREAD: f32 = 1.05;
    pub const SPAWN_WEIGHT_EDGE: f32 = 0.15;
    pub const SPAWN_WEIGHT_PLAYER: f32 = 0.18;

    /// Waves
    pub const WAVE_MULTIPLIER: u32 = 100;
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    pub const FIRST_REST: f32 = 1.2;
    pub const WAVE_REST: f32 = 1.5;
    pub const WAVE_CLEAR_BONUS: u64 = 120;

    /// Health caches
    pub const PICKUP_RADIUS: f32 = 11.0;
    pub const PICKUP_HEAL: f32 = 28.0;
    pub const PICKUP_BONUS: u64 = 35;
    pub const PICKUP_KILL_INTERVAL: u32 = 20;

    /// Particle drag applied per step
    pub const PARTICLE_DRAG: f32 = 0.92;
}

/// Smallest denominator used when normalizing a vector
pub const NORMALIZE_EPSILON: f32 = 0.001;

/// Unit vector from `v`, dividing by at least [`NORMALIZE_EPSILON`]
#[inline]
pub fn normalize_or_epsilon(v: Vec2) -> Vec2 {
    v / v.length().max(NORMALIZE_EPSILON)
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
