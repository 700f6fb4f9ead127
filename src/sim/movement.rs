//! Movement intents for the player and agents
//!
//! Both turn a desired velocity into a resolved position through
//! [`resolve_position`]. Agents are moved after the player so they chase the
//! player's updated position.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_position;
use super::combat::{agent_contact, fire, reload, switch_weapon, tick_player_timers};
use super::state::{GameEvent, GameState};
use super::tick::TickInput;
use crate::consts::*;
use crate::normalize_or_epsilon;

/// Apply one frame of player input: weapon selection, movement, stamina,
/// fire/reload intents, then timers.
pub fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;

    if let Some(index) = input.select_weapon {
        switch_weapon(player, index);
    } else if input.cycle_weapon {
        let next = (player.current_weapon + 1) % player.weapons.len();
        switch_weapon(player, next);
    }

    let direction = input.movement.normalize_or_zero();
    let moving = direction != Vec2::ZERO;
    if moving {
        player.dir = direction;
    }

    let sprinting = moving && input.sprint && player.stamina > SPRINT_MIN_STAMINA;
    let speed = player.base_speed * if sprinting { player.sprint_boost } else { 1.0 };
    let stamina_rate = if sprinting { -STAMINA_DRAIN } else { STAMINA_REGEN };
    player.stamina = (player.stamina + stamina_rate * dt).clamp(0.0, player.max_stamina);

    if moving {
        let desired = player.pos + direction * speed * dt;
        player.pos = resolve_position(&state.world, desired, player.radius);
    }

    if input.fire {
        fire(state);
    }
    if input.reload {
        reload(&mut state.player);
    }

    tick_player_timers(&mut state.player, dt);
}

/// Move every live agent and resolve contact attacks on the player.
///
/// Stops early once the player dies; the frame is then frozen.
pub fn update_agents(state: &mut GameState, dt: f32) {
    let target = state.player.pos;

    for agent in state.registry.agents.iter_mut().filter(|a| a.alive) {
        let to_player = target - agent.pos;
        let vel = if to_player.length() < ENGAGE_RANGE {
            normalize_or_epsilon(to_player) * agent.speed
        } else {
            agent.wander += (state.rng.random::<f32>() - 0.5) * dt;
            Vec2::from_angle(agent.wander) * agent.speed * WANDER_SPEED_FACTOR
        };

        let speed = vel.length();
        if speed > FACING_MIN_SPEED {
            agent.dir = vel / speed;
        }

        agent.pos = resolve_position(&state.world, agent.pos + vel * dt, agent.radius);

        if agent.attack_cd > 0.0 {
            agent.attack_cd -= dt;
        }

        if agent_contact(&mut state.player, agent, &mut state.events) && state.player.is_dead() {
            state.game_over = true;
            log::info!(
                "Player down on wave {} with score {}",
                state.waves.wave,
                state.player.score
            );
            state.events.push(GameEvent::GameOver {
                wave: state.waves.wave,
                score: state.player.score,
            });
            break;
        }
    }
}
