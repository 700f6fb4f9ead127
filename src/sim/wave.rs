//! Wave orchestration
//!
//! A wave feeds its quota of agents through the spawn director, waits for
//! the field to clear, rests briefly, then rolls over to the next wave with
//! a score bonus and an ammo resupply.

use serde::Serialize;

use super::spawn::feed_wave;
use super::state::{AgentVariant, GameEvent, GameState};
use crate::consts::*;

/// Where the active wave is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WavePhase {
    /// Quota not yet fully spawned
    Feeding,
    /// Quota spawned, agents still alive
    Clearing,
    /// Field clear, counting down to the next wave
    Resting,
}

/// Wave counters
#[derive(Debug, Clone, Serialize)]
pub struct WaveDirector {
    /// Current wave (1-based)
    pub wave: u32,
    /// Agents to spawn this wave
    pub target: u32,
    /// Agents spawned so far this wave (never exceeds `target`)
    pub spawned: u32,
    /// Accumulated spawn allowance
    pub spawn_budget: f32,
    /// Next spawn of this wave is forced to be a boss
    pub boss_pending: bool,
    /// Seconds of rest left once the field is clear
    pub rest_timer: f32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            wave: 1,
            target: 0,
            spawned: 0,
            spawn_budget: 0.0,
            boss_pending: false,
            rest_timer: FIRST_REST,
        }
    }
}

impl WaveDirector {
    pub fn phase(&self, live_agents: usize) -> WavePhase {
        if self.spawned < self.target {
            WavePhase::Feeding
        } else if live_agents > 0 {
            WavePhase::Clearing
        } else {
            WavePhase::Resting
        }
    }
}

/// Quota for a wave
pub fn wave_target(wave: u32) -> u32 {
    (4 + wave * 2) * WAVE_MULTIPLIER
}

/// Whether a wave opens with a boss
pub fn is_boss_wave(wave: u32) -> bool {
    wave % BOSS_WAVE_INTERVAL == 0
}

/// Reset counters for `wave` and spawn the opening burst
pub fn start_wave(state: &mut GameState, wave: u32) {
    let waves = &mut state.waves;
    waves.wave = wave;
    waves.target = wave_target(wave);
    waves.spawned = 0;
    waves.spawn_budget = MAX_ACTIVE_AGENTS as f32;
    waves.boss_pending = is_boss_wave(wave);

    log::info!(
        "Wave {} started: {} agents{}",
        wave,
        waves.target,
        if waves.boss_pending { ", boss incoming" } else { "" }
    );
    state.events.push(GameEvent::WaveStarted {
        wave,
        boss: waves.boss_pending,
    });

    feed_wave(state, 0.0);
}

/// Per-frame wave step: feed, then roll over once cleared and rested
pub fn advance_waves(state: &mut GameState, dt: f32) {
    feed_wave(state, dt);

    let live = state.registry.live_agent_count();
    if state.waves.phase(live) != WavePhase::Resting {
        return;
    }

    state.waves.rest_timer -= dt;
    if state.waves.rest_timer > 0.0 {
        return;
    }

    state.registry.clear_agents();
    let next = state.waves.wave + 1;
    state.waves.rest_timer = WAVE_REST;
    start_wave(state, next);

    state.player.score += WAVE_CLEAR_BONUS;
    for weapon in state.player.weapons.iter_mut() {
        weapon.resupply();
    }
}

/// HUD summary of the active wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaveStatus {
    pub wave: u32,
    pub alive: usize,
    /// Agents still to beat: unspawned quota plus live agents
    pub remaining: usize,
    pub boss_alive: bool,
}

pub fn wave_status(state: &GameState) -> WaveStatus {
    let alive = state.registry.live_agent_count();
    let unspawned = state.waves.target.saturating_sub(state.waves.spawned) as usize;
    WaveStatus {
        wave: state.waves.wave,
        alive,
        remaining: unspawned + alive,
        boss_alive: state
            .registry
            .live_agents()
            .any(|a| a.variant == AgentVariant::Boss),
    }
}
