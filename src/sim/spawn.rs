//! Spawn director
//!
//! Picks where and what to spawn. Placement balances agents across the four
//! world quadrants, then scores random candidates inside the emptiest one.
//! Spawning never fails: if every candidate is rejected the pre-drawn
//! fallback point is used.

use glam::Vec2;
use rand::Rng;

use super::collision::overlaps_obstacle;
use super::state::{Agent, AgentVariant, GameState};
use super::world::{Quadrant, World};
use crate::consts::*;

/// Stats for a freshly spawned agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentStats {
    pub hp: f32,
    /// Minimum speed; spawned agents add up to `speed_jitter` on top
    pub speed: f32,
    pub speed_jitter: f32,
    pub radius: f32,
    pub attack_damage: f32,
    pub attack_interval: f32,
    pub score_value: u64,
}

impl AgentStats {
    /// Deterministic stats for a variant at a wave. Non-decreasing in `wave`.
    pub fn for_wave(variant: AgentVariant, wave: u32) -> Self {
        let w = wave as f32;
        match variant {
            AgentVariant::Standard => Self {
                hp: (2 + wave / 3) as f32,
                speed: 70.0 + w * 2.0,
                speed_jitter: 35.0,
                radius: 18.0,
                attack_damage: 8.0,
                attack_interval: 0.55,
                score_value: 45,
            },
            AgentVariant::Heavy => Self {
                hp: (5 + wave / 2) as f32,
                speed: 56.0 + w * 1.25,
                speed_jitter: 26.0,
                radius: 23.0,
                attack_damage: 13.0,
                attack_interval: 0.55,
                score_value: 110,
            },
            AgentVariant::Boss => Self {
                hp: (36 + wave * 3) as f32,
                speed: 44.0 + w * 0.9,
                speed_jitter: 0.0,
                radius: 34.0,
                attack_damage: 22.0,
                attack_interval: 0.68,
                score_value: 680,
            },
        }
    }
}

/// Chance that an unforced spawn is heavy
pub fn heavy_chance(wave: u32) -> f64 {
    (0.08 + wave as f64 * 0.012).clamp(0.08, 0.32)
}

/// Live agents per quadrant, indexed by [`Quadrant::index`]
pub fn live_by_quadrant(state: &GameState) -> [usize; 4] {
    let mut counts = [0; 4];
    for agent in state.registry.live_agents() {
        counts[state.world.quadrant_of(agent.pos).index()] += 1;
    }
    counts
}

/// Least-populated quadrant; ties go to the lowest index
pub fn emptiest_quadrant(counts: &[usize; 4]) -> Quadrant {
    let mut best = Quadrant::TopLeft;
    for q in Quadrant::ALL.into_iter().skip(1) {
        if counts[q.index()] < counts[best.index()] {
            best = q;
        }
    }
    best
}

/// Distance to the nearest live agent (infinite when there are none)
fn nearest_live_agent(state: &GameState, pos: Vec2) -> f32 {
    state
        .registry
        .live_agents()
        .map(|a| a.pos.distance(pos))
        .fold(f32::INFINITY, f32::min)
}

/// Weighted placement score; higher is better
pub fn placement_score(world: &World, pos: Vec2, nearest_agent: f32, player_dist: f32) -> f32 {
    nearest_agent * SPAWN_WEIGHT_SPREAD
        + world.edge_distance(pos) * SPAWN_WEIGHT_EDGE
        + player_dist * SPAWN_WEIGHT_PLAYER
}

fn sample(rng: &mut impl Rng, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(sample_axis(rng, min.x, max.x), sample_axis(rng, min.y, max.y))
}

fn sample_axis(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Choose a spawn point in the emptiest quadrant
pub fn pick_spawn_point(state: &mut GameState) -> Vec2 {
    let quadrant = emptiest_quadrant(&live_by_quadrant(state));
    let (min, max) = state.world.quadrant_bounds(quadrant);

    let mut best = sample(&mut state.rng, min, max);
    let mut best_score = f32::NEG_INFINITY;

    for _ in 0..SPAWN_CANDIDATES {
        let candidate = sample(&mut state.rng, min, max);
        let player_dist = candidate.distance(state.player.pos);
        if player_dist < SPAWN_MIN_PLAYER_DIST {
            continue;
        }
        if overlaps_obstacle(&state.world, candidate, SPAWN_PROBE_RADIUS, SPAWN_OBSTACLE_MARGIN) {
            continue;
        }

        let spread = nearest_live_agent(state, candidate);
        let score = placement_score(&state.world, candidate, spread, player_dist);
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }

    if best_score == f32::NEG_INFINITY {
        log::debug!("No clean spawn point in {:?}, using fallback", quadrant);
    }
    best
}

/// Spawn one agent. `forced` bypasses the heavy roll.
pub fn spawn_agent(state: &mut GameState, forced: Option<AgentVariant>) -> &Agent {
    let pos = pick_spawn_point(state);
    let wave = state.waves.wave;

    let variant = forced.unwrap_or_else(|| {
        if state.rng.random_bool(heavy_chance(wave)) {
            AgentVariant::Heavy
        } else {
            AgentVariant::Standard
        }
    });

    let stats = AgentStats::for_wave(variant, wave);
    let speed = if stats.speed_jitter > 0.0 {
        stats.speed + state.rng.random_range(0.0..stats.speed_jitter)
    } else {
        stats.speed
    };
    let wander = state.rng.random_range(0.0..std::f32::consts::TAU);

    if variant == AgentVariant::Boss {
        log::debug!("Boss spawned at ({:.0}, {:.0}) on wave {}", pos.x, pos.y, wave);
    }

    state.registry.insert_agent(Agent {
        id: 0,
        pos,
        radius: stats.radius,
        speed,
        hp: stats.hp,
        max_hp: stats.hp,
        variant,
        alive: true,
        attack_cd: 0.0,
        attack_damage: stats.attack_damage,
        attack_interval: stats.attack_interval,
        score_value: stats.score_value,
        wander,
        dir: Vec2::X,
    })
}

/// Trickle agents into the active wave at a frame-rate independent rate.
///
/// Demand beyond the population cap stays in the budget until deaths free
/// capacity. A pending boss replaces the first regular spawn.
pub fn feed_wave(state: &mut GameState, dt: f32) {
    if state.waves.spawned >= state.waves.target {
        return;
    }
    state.waves.spawn_budget += SPAWN_RATE * dt;

    let mut alive = state.registry.live_agent_count();
    while state.waves.spawn_budget >= 1.0
        && state.waves.spawned < state.waves.target
        && alive < MAX_ACTIVE_AGENTS
    {
        if state.waves.boss_pending {
            spawn_agent(state, Some(AgentVariant::Boss));
            state.waves.boss_pending = false;
        } else {
            spawn_agent(state, None);
        }
        state.waves.spawned += 1;
        state.waves.spawn_budget -= 1.0;
        alive += 1;
    }
}
