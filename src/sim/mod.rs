//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame time only (clamped per frame)
//! - Seeded RNG only
//! - Fixed subsystem order per frame
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wave;
pub mod world;

pub use collision::{circle_hit, overlaps_obstacle, resolve_position};
pub use combat::{fire, reload, resolve_pickups, switch_weapon, update_projectiles};
pub use spawn::{AgentStats, feed_wave, spawn_agent};
pub use state::{
    Agent, AgentVariant, DischargeKind, GameEvent, GameState, Particle, ParticleKind, Pickup,
    Player, Projectile, Registry, Weapon,
};
pub use tick::{TickInput, tick};
pub use wave::{WaveDirector, WavePhase, WaveStatus, advance_waves, start_wave, wave_status};
pub use world::{Footprint, Obstacle, Quadrant, World};
