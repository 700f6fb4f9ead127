//! Per-frame simulation step
//!
//! Runs the subsystems in a fixed order. Later stages depend on the state
//! earlier stages leave behind within the same frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::combat::{resolve_pickups, update_particles, update_projectiles};
use super::movement::{update_agents, update_player};
use super::state::GameState;
use super::wave::advance_waves;
use crate::consts::*;

/// Input commands for a single frame, supplied before the update runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Desired movement direction (any length; zero = stand still)
    pub movement: Vec2,
    /// Sprint while moving
    pub sprint: bool,
    /// Hold trigger
    pub fire: bool,
    /// Reload request
    pub reload: bool,
    /// Equip a specific weapon slot
    pub select_weapon: Option<usize>,
    /// Equip the next weapon slot
    pub cycle_weapon: bool,
    /// Start a fresh run (only honoured after game over)
    pub restart: bool,
    /// Idle/demo mode - a simple bot plays the game
    pub autopilot: bool,
}

/// Advance the game state by one frame of `dt` seconds (clamped to [`MAX_FRAME_DT`])
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.game_over {
        if input.restart {
            restart(state);
        }
        return;
    }

    // f32::max maps NaN to zero; clamp would pass it through
    let dt = dt.max(0.0).min(MAX_FRAME_DT);
    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };

    state.frame += 1;

    update_player(state, &input, dt);
    update_projectiles(state, dt);
    update_particles(state, dt);
    resolve_pickups(state);
    update_agents(state, dt);

    if state.game_over {
        return;
    }
    advance_waves(state, dt);
}

/// Replace the run with a fresh one on the same world
fn restart(state: &mut GameState) {
    let seed = state.rng.random::<u64>();
    log::info!("Restarting run (seed {})", seed);
    let world = std::mem::replace(&mut state.world, super::world::World::open(0.0, 0.0));
    *state = GameState::with_world(seed, world, state.registry.max_particles);
}

/// Demo bot: keep away from the nearest agent while facing it often enough to shoot
fn autopilot_input(state: &GameState) -> TickInput {
    let player = &state.player;
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };

    let nearest = state.registry.live_agents().min_by(|a, b| {
        a.pos
            .distance_squared(player.pos)
            .total_cmp(&b.pos.distance_squared(player.pos))
    });

    let Some(agent) = nearest else {
        // Nothing to shoot: drift back toward the middle of the map
        input.fire = false;
        input.movement = state.world.center() - player.pos;
        return input;
    };

    let to_agent = agent.pos - player.pos;
    let dist = to_agent.length();
    if dist > 360.0 {
        // Close in to firing range
        input.movement = to_agent;
    } else if state.frame % 12 < 3 {
        // Brief turn to face the threat
        input.movement = to_agent;
    } else {
        // Back off at an angle, sprinting when it gets tight
        input.movement = -to_agent + to_agent.perp() * 0.6;
        input.sprint = dist < 160.0;
    }

    let weapon = player.weapon();
    if weapon.ammo == 0 && weapon.reserve == 0 {
        input.cycle_weapon = true;
    } else if weapon.ammo == 0 {
        input.reload = true;
    }
    input
}
