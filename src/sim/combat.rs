//! Combat resolution
//!
//! Weapon discharge and reload state machines, projectile flight and hits,
//! kill rewards, health cache pickups, and contact damage to the player.

use glam::Vec2;
use rand::Rng;

use super::collision::circle_hit;
use super::state::{
    Agent, DischargeKind, GameEvent, GameState, Particle, ParticleKind, Pickup, Player, Projectile,
};
use crate::consts::*;
use crate::rotate;

/// Symmetric random value in `[-half, half)`
#[inline]
fn jitter(rng: &mut impl Rng, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * half
}

/// Start reloading the equipped weapon.
///
/// Ignored while already reloading, with a full magazine, or with no reserve.
pub fn reload(player: &mut Player) -> bool {
    let weapon = player.weapon();
    if player.is_reloading() || weapon.is_full() || weapon.reserve == 0 {
        return false;
    }
    let (name, duration) = (weapon.name, weapon.reload_time);
    player.reload_timer = duration;
    log::debug!("Reloading {} ({:.1}s)", name, duration);
    true
}

/// Equip another weapon slot. Cancels a reload in progress and briefly locks firing.
pub fn switch_weapon(player: &mut Player, index: usize) -> bool {
    if index >= player.weapons.len() || index == player.current_weapon {
        return false;
    }
    player.current_weapon = index;
    player.reload_timer = 0.0;
    player.switch_lockout = SWITCH_LOCKOUT;
    true
}

/// Count down player timers and finish a reload when its timer runs out
pub fn tick_player_timers(player: &mut Player, dt: f32) {
    if player.fire_cooldown > 0.0 {
        player.fire_cooldown -= dt;
    }
    if player.hit_cooldown > 0.0 {
        player.hit_cooldown -= dt;
    }
    if player.switch_lockout > 0.0 {
        player.switch_lockout -= dt;
    }

    if player.reload_timer > 0.0 {
        player.reload_timer -= dt;
        if player.reload_timer <= 0.0 {
            let weapon = player.weapon_mut();
            let amount = (weapon.mag_size - weapon.ammo).min(weapon.reserve);
            weapon.ammo += amount;
            weapon.reserve -= amount;
            player.reload_timer = 0.0;
        }
    }
}

/// Discharge the equipped weapon. Returns true if projectiles were emitted.
///
/// An empty magazine turns the request into a reload attempt.
pub fn fire(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if player.is_reloading() || player.fire_cooldown > 0.0 || player.switch_lockout > 0.0 {
        return false;
    }
    if player.weapon().ammo == 0 {
        reload(player);
        return false;
    }

    let slot = player.current_weapon;
    let weapon = &mut player.weapons[slot];
    weapon.ammo -= 1;
    player.fire_cooldown = weapon.fire_cooldown;
    let weapon = weapon.clone();
    let (origin, dir) = (player.pos, player.dir);
    let rng = &mut state.rng;

    if weapon.kind == DischargeKind::Ballistic {
        // Casing ejects sideways from the barrel
        let side = Vec2::new(dir.y + jitter(rng, 0.25), -dir.x + jitter(rng, 0.25));
        state.registry.insert_particle(Particle {
            pos: origin + dir * 10.0,
            vel: side * 120.0,
            life: 1.5 + rng.random::<f32>(),
            kind: ParticleKind::Shell,
        });
    }

    for _ in 0..weapon.pellets {
        let pellet_dir = rotate(dir, jitter(rng, weapon.spread * 0.5));
        let speed = weapon.speed * (1.0 + jitter(rng, PELLET_SPEED_JITTER * 0.5));
        let scatter = Vec2::new(jitter(rng, 2.5), jitter(rng, 2.5));

        let (life, radius) = match weapon.kind {
            DischargeKind::Incendiary => (
                0.35 + rng.random::<f32>() * 0.1,
                8.0 + rng.random::<f32>() * 6.0,
            ),
            DischargeKind::Ballistic => (BALLISTIC_LIFETIME, weapon.radius),
        };

        state.registry.insert_projectile(Projectile {
            pos: origin + pellet_dir * MUZZLE_OFFSET + scatter,
            vel: pellet_dir * speed,
            life,
            radius,
            damage: weapon.damage,
            kind: weapon.kind,
            tint: weapon.tint,
        });
    }

    state.events.push(GameEvent::Discharge {
        weapon: slot,
        kind: weapon.kind,
    });
    true
}

/// Damage an agent and pay out rewards if the hit was lethal
fn hit_agent(kills: &mut u32, player: &mut Player, agent: &mut Agent, damage: f32) -> bool {
    if !agent.take_damage(damage) {
        return false;
    }
    player.score += agent.score_value;
    *kills += 1;
    true
}

/// Advance projectiles: flight, expiry, obstacle impacts, then agent hits
pub fn update_projectiles(state: &mut GameState, dt: f32) {
    let mut projectiles = std::mem::take(&mut state.registry.projectiles);
    let mut kills: Vec<(u32, Vec2)> = Vec::new();
    let mut blood: Vec<Particle> = Vec::new();

    projectiles.retain_mut(|p| {
        p.pos += p.vel * dt;
        p.life -= dt;
        if p.kind == DischargeKind::Incendiary {
            p.radius *= INCENDIARY_GROWTH;
        }

        if p.life <= 0.0 || !state.world.contains(p.pos) {
            return false;
        }

        // Obstacles win over agents
        if state
            .world
            .obstacles
            .iter()
            .any(|o| circle_hit(p.pos, p.radius, o.pos, o.radius))
        {
            return false;
        }

        for agent in state.registry.agents.iter_mut().filter(|a| a.alive) {
            if !circle_hit(p.pos, p.radius, agent.pos, agent.radius) {
                continue;
            }

            let lethal = hit_agent(&mut state.kills, &mut state.player, agent, p.damage);
            if lethal {
                kills.push((state.kills, agent.pos));
                state.events.push(GameEvent::AgentKilled {
                    id: agent.id,
                    variant: agent.variant,
                    pos: agent.pos,
                });
            }

            let splatter = match p.kind {
                DischargeKind::Incendiary => 1,
                DischargeKind::Ballistic => 3,
            };
            for _ in 0..splatter {
                let rng = &mut state.rng;
                blood.push(Particle {
                    pos: p.pos,
                    vel: p.vel * 0.1 + Vec2::new(jitter(rng, 50.0), jitter(rng, 50.0)),
                    life: 0.3 + rng.random::<f32>() * 0.3,
                    kind: ParticleKind::Blood,
                });
            }

            if p.kind == DischargeKind::Ballistic {
                return false;
            }
        }
        true
    });

    state.registry.projectiles = projectiles;
    for particle in blood {
        state.registry.insert_particle(particle);
    }

    for (kill_number, pos) in kills {
        if kill_number % PICKUP_KILL_INTERVAL == 0 {
            log::debug!("Kill #{}: dropping health cache", kill_number);
            state.registry.insert_pickup(Pickup::health_cache(pos));
        }
    }
}

/// Integrate cosmetic particles with drag and expire them
pub fn update_particles(state: &mut GameState, dt: f32) {
    state.registry.particles.retain_mut(|p| {
        p.pos += p.vel * dt;
        p.vel *= PARTICLE_DRAG;
        p.life -= dt;
        p.life > 0.0
    });
}

/// Collect any untaken health cache the player is touching
pub fn resolve_pickups(state: &mut GameState) {
    let player = &mut state.player;
    for pickup in state.registry.pickups.iter_mut().filter(|p| !p.taken) {
        if !circle_hit(player.pos, player.radius, pickup.pos, pickup.radius + 2.0) {
            continue;
        }
        pickup.taken = true;
        player.health = (player.health + pickup.heal).clamp(0.0, PLAYER_MAX_HEALTH);
        player.score += PICKUP_BONUS;
        log::debug!("Health cache taken, health now {:.0}", player.health);
        state.events.push(GameEvent::PickupTaken {
            pos: pickup.pos,
            heal: pickup.heal,
        });
    }
}

/// Contact attack from an agent touching the player.
///
/// Returns true if damage landed. The caller counts down `attack_cd`.
pub fn agent_contact(player: &mut Player, agent: &mut Agent, events: &mut Vec<GameEvent>) -> bool {
    if !agent.alive || agent.attack_cd > 0.0 || player.hit_cooldown > 0.0 {
        return false;
    }
    if !circle_hit(player.pos, player.radius, agent.pos, agent.radius) {
        return false;
    }

    let damage = agent.attack_damage.max(0.0);
    player.health = (player.health - damage).clamp(0.0, PLAYER_MAX_HEALTH);
    agent.attack_cd = agent.attack_interval;
    player.hit_cooldown = HIT_IMMUNITY;
    events.push(GameEvent::PlayerHit {
        damage,
        health: player.health,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{AgentVariant, Weapon};
    use crate::sim::world::World;
    use proptest::prelude::*;

    fn empty_state() -> GameState {
        GameState::idle(1234, World::open(2000.0, 2000.0), 512)
    }

    fn agent_at(pos: Vec2, hp: f32) -> Agent {
        Agent {
            id: 0,
            pos,
            radius: 18.0,
            speed: 80.0,
            hp,
            max_hp: hp,
            variant: AgentVariant::Standard,
            alive: true,
            attack_cd: 0.0,
            attack_damage: 8.0,
            attack_interval: 0.55,
            score_value: 45,
            wander: 0.0,
            dir: Vec2::X,
        }
    }

    fn projectile_at(pos: Vec2, kind: DischargeKind, life: f32) -> Projectile {
        Projectile {
            pos,
            vel: Vec2::ZERO,
            life,
            radius: 10.0,
            damage: 0.4,
            kind,
            tint: 0,
        }
    }

    #[test]
    fn test_fire_consumes_ammo_and_sets_cooldown() {
        let mut state = empty_state();
        assert!(fire(&mut state));
        assert_eq!(state.player.weapon().ammo, 179);
        assert!(state.player.fire_cooldown > 0.0);
        assert_eq!(state.registry.projectiles.len(), 1);
        // Ballistic discharge ejects a shell
        assert_eq!(state.registry.particles.len(), 1);
        assert_eq!(state.registry.particles[0].kind, ParticleKind::Shell);
        // Cooldown blocks the next shot
        assert!(!fire(&mut state));
        assert_eq!(state.player.weapon().ammo, 179);
    }

    #[test]
    fn test_shotgun_pellets_within_spread() {
        let mut state = empty_state();
        switch_weapon(&mut state.player, 1);
        state.player.switch_lockout = 0.0;
        assert!(fire(&mut state));
        assert_eq!(state.registry.projectiles.len(), 10);
        let spread = Weapon::shotgun().spread;
        for p in &state.registry.projectiles {
            let angle = p.vel.y.atan2(p.vel.x);
            assert!(angle.abs() <= spread * 0.5 + 1e-4);
            let speed = p.vel.length();
            assert!(speed >= 700.0 * 0.925 - 1e-2 && speed <= 700.0 * 1.075 + 1e-2);
        }
    }

    #[test]
    fn test_flamethrower_emits_no_shell() {
        let mut state = empty_state();
        switch_weapon(&mut state.player, 2);
        state.player.switch_lockout = 0.0;
        assert!(fire(&mut state));
        assert!(state.registry.particles.is_empty());
        let p = &state.registry.projectiles[0];
        assert_eq!(p.kind, DischargeKind::Incendiary);
        assert!(p.life >= 0.35 && p.life <= 0.45);
    }

    #[test]
    fn test_empty_magazine_triggers_reload() {
        let mut state = empty_state();
        state.player.weapons[0].ammo = 0;
        assert!(!fire(&mut state));
        assert!(state.player.is_reloading());
        assert!(state.registry.projectiles.is_empty());
    }

    #[test]
    fn test_reload_guards() {
        let mut player = Player::new(Vec2::ZERO);
        // Full magazine
        assert!(!reload(&mut player));
        player.weapons[0].ammo = 10;
        assert!(reload(&mut player));
        // Already reloading
        assert!(!reload(&mut player));
        player.reload_timer = 0.0;
        player.weapons[0].reserve = 0;
        assert!(!reload(&mut player));
    }

    #[test]
    fn test_reload_transfers_atomically() {
        let mut player = Player::new(Vec2::ZERO);
        player.weapons[0].ammo = 100;
        player.weapons[0].reserve = 30;
        assert!(reload(&mut player));
        tick_player_timers(&mut player, 1.0);
        assert_eq!(player.weapons[0].ammo, 100);
        assert_eq!(player.weapons[0].reserve, 30);
        tick_player_timers(&mut player, 1.5);
        assert_eq!(player.weapons[0].ammo, 130);
        assert_eq!(player.weapons[0].reserve, 0);
        assert!(!player.is_reloading());
    }

    #[test]
    fn test_shotgun_last_round_with_empty_reserve() {
        let mut state = empty_state();
        switch_weapon(&mut state.player, 1);
        state.player.switch_lockout = 0.0;
        state.player.weapons[1].ammo = 1;
        state.player.weapons[1].reserve = 0;

        assert!(fire(&mut state));
        assert_eq!(state.player.weapons[1].ammo, 0);
        assert!(!state.player.is_reloading());

        // Still on cooldown: nothing happens
        assert!(!fire(&mut state));
        // Off cooldown: empty magazine, empty reserve, no reload either
        tick_player_timers(&mut state.player, 1.0);
        assert!(!fire(&mut state));
        assert!(!state.player.is_reloading());
        assert_eq!(state.player.weapons[1].ammo, 0);
        assert_eq!(state.registry.projectiles.len(), 10);
    }

    #[test]
    fn test_switch_cancels_reload_and_locks_fire() {
        let mut state = empty_state();
        state.player.weapons[0].ammo = 0;
        reload(&mut state.player);
        assert!(switch_weapon(&mut state.player, 1));
        assert!(!state.player.is_reloading());
        assert!(!fire(&mut state));
        assert!(!switch_weapon(&mut state.player, 1));
        assert!(!switch_weapon(&mut state.player, 3));
        tick_player_timers(&mut state.player, 0.3);
        assert!(fire(&mut state));
    }

    #[test]
    fn test_obstacle_blocks_projectile_before_agent() {
        let mut state = empty_state();
        state.world.obstacles.push(crate::sim::world::Obstacle {
            pos: Vec2::new(500.0, 500.0),
            radius: 16.0,
        });
        state.registry.insert_agent(agent_at(Vec2::new(505.0, 500.0), 5.0));
        state
            .registry
            .insert_projectile(projectile_at(Vec2::new(500.0, 500.0), DischargeKind::Ballistic, 1.0));
        update_projectiles(&mut state, 0.016);
        assert!(state.registry.projectiles.is_empty());
        assert_eq!(state.registry.agents[0].hp, 5.0);
    }

    #[test]
    fn test_projectile_expires_and_leaves_world() {
        let mut state = empty_state();
        state
            .registry
            .insert_projectile(projectile_at(Vec2::new(100.0, 100.0), DischargeKind::Ballistic, 0.01));
        let mut escaping = projectile_at(Vec2::new(1999.0, 100.0), DischargeKind::Ballistic, 1.0);
        escaping.vel = Vec2::new(500.0, 0.0);
        state.registry.insert_projectile(escaping);
        update_projectiles(&mut state, 0.016);
        assert!(state.registry.projectiles.is_empty());
    }

    #[test]
    fn test_incendiary_burns_every_overlapping_agent() {
        let mut state = empty_state();
        let spot = Vec2::new(1000.0, 1000.0);
        state.registry.insert_agent(agent_at(spot, 100.0));
        state.registry.insert_agent(agent_at(spot + Vec2::new(4.0, 0.0), 100.0));
        state
            .registry
            .insert_projectile(projectile_at(spot, DischargeKind::Incendiary, 0.35));

        // 0.35s of life at 0.1s steps: three burning steps, then expiry
        for _ in 0..5 {
            update_projectiles(&mut state, 0.1);
        }
        assert!(state.registry.projectiles.is_empty());
        for agent in &state.registry.agents {
            assert!((agent.hp - (100.0 - 0.4 * 3.0)).abs() < 1e-3, "hp {}", agent.hp);
        }
        // One blood particle per hit
        assert_eq!(state.registry.particles.len(), 6);
    }

    #[test]
    fn test_ballistic_hits_first_agent_only() {
        let mut state = empty_state();
        let spot = Vec2::new(1000.0, 1000.0);
        state.registry.insert_agent(agent_at(spot, 100.0));
        state.registry.insert_agent(agent_at(spot + Vec2::new(4.0, 0.0), 100.0));
        let mut bullet = projectile_at(spot, DischargeKind::Ballistic, 0.95);
        bullet.damage = 1.0;
        state.registry.insert_projectile(bullet);

        update_projectiles(&mut state, 0.016);
        assert!(state.registry.projectiles.is_empty());
        assert_eq!(state.registry.agents[0].hp, 99.0);
        assert_eq!(state.registry.agents[1].hp, 100.0);
        assert_eq!(state.registry.particles.len(), 3);
    }

    #[test]
    fn test_blood_respects_particle_cap() {
        let mut state = GameState::idle(1234, World::open(2000.0, 2000.0), 4);
        let spot = Vec2::new(1000.0, 1000.0);
        state.registry.insert_agent(agent_at(spot, 100.0));
        for _ in 0..3 {
            let mut bullet = projectile_at(spot, DischargeKind::Ballistic, 0.95);
            bullet.damage = 1.0;
            state.registry.insert_projectile(bullet);
        }

        update_projectiles(&mut state, 0.016);
        assert_eq!(state.registry.agents[0].hp, 97.0);
        assert_eq!(state.registry.particles.len(), 4);
    }

    #[test]
    fn test_kill_rewards_and_milestone_pickup() {
        let mut state = empty_state();
        state.kills = PICKUP_KILL_INTERVAL - 1;
        let spot = Vec2::new(800.0, 800.0);
        state.registry.insert_agent(agent_at(spot, 1.0));
        let mut bullet = projectile_at(spot, DischargeKind::Ballistic, 0.95);
        bullet.damage = 1.0;
        state.registry.insert_projectile(bullet);

        update_projectiles(&mut state, 0.016);
        let agent = &state.registry.agents[0];
        assert!(!agent.alive);
        assert_eq!(agent.hp, 0.0);
        assert_eq!(state.player.score, 45);
        assert_eq!(state.kills, PICKUP_KILL_INTERVAL);
        assert_eq!(state.registry.pickups.len(), 1);
        assert_eq!(state.registry.pickups[0].pos, spot);
        assert!(matches!(state.events[0], GameEvent::AgentKilled { .. }));
    }

    #[test]
    fn test_dead_agents_are_not_hit() {
        let mut state = empty_state();
        let spot = Vec2::new(800.0, 800.0);
        let mut corpse = agent_at(spot, 1.0);
        corpse.alive = false;
        corpse.hp = 0.0;
        state.registry.insert_agent(corpse);
        state
            .registry
            .insert_projectile(projectile_at(spot, DischargeKind::Ballistic, 0.95));
        update_projectiles(&mut state, 0.016);
        assert_eq!(state.registry.projectiles.len(), 1);
        assert!(!state.registry.agents[0].alive);
    }

    #[test]
    fn test_particles_drag_and_expire() {
        let mut state = empty_state();
        state.registry.insert_particle(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: 0.05,
            kind: ParticleKind::Blood,
        });
        update_particles(&mut state, 0.02);
        let p = &state.registry.particles[0];
        assert!((p.pos.x - 2.0).abs() < 1e-4);
        assert!((p.vel.x - 92.0).abs() < 1e-3);
        update_particles(&mut state, 0.02);
        update_particles(&mut state, 0.02);
        assert!(state.registry.particles.is_empty());
    }

    #[test]
    fn test_pickup_heals_once() {
        let mut state = empty_state();
        state.player.health = 50.0;
        state
            .registry
            .insert_pickup(Pickup::health_cache(state.player.pos + Vec2::new(5.0, 0.0)));

        resolve_pickups(&mut state);
        assert_eq!(state.player.health, 78.0);
        assert_eq!(state.player.score, PICKUP_BONUS);
        assert!(state.registry.pickups[0].taken);

        resolve_pickups(&mut state);
        assert_eq!(state.player.health, 78.0);
        assert_eq!(state.player.score, PICKUP_BONUS);
        assert_eq!(state.registry.live_pickups().count(), 0);
    }

    #[test]
    fn test_pickup_heal_clamped() {
        let mut state = empty_state();
        state.player.health = 90.0;
        state
            .registry
            .insert_pickup(Pickup::health_cache(state.player.pos));
        resolve_pickups(&mut state);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_agent_contact_respects_cooldowns() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        let mut agent = agent_at(Vec2::new(110.0, 100.0), 2.0);
        let mut events = Vec::new();

        assert!(agent_contact(&mut player, &mut agent, &mut events));
        assert_eq!(player.health, 92.0);
        assert_eq!(agent.attack_cd, 0.55);
        assert_eq!(player.hit_cooldown, HIT_IMMUNITY);

        // Agent on cooldown
        assert!(!agent_contact(&mut player, &mut agent, &mut events));
        // Player immune
        agent.attack_cd = 0.0;
        assert!(!agent_contact(&mut player, &mut agent, &mut events));
        assert_eq!(player.health, 92.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_agent_contact_never_below_zero() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.health = 3.0;
        let mut agent = agent_at(Vec2::new(100.0, 100.0), 2.0);
        let mut events = Vec::new();
        assert!(agent_contact(&mut player, &mut agent, &mut events));
        assert_eq!(player.health, 0.0);
        assert!(player.is_dead());
    }

    proptest! {
        #[test]
        fn reload_never_overfills(
            ammo in 0u32..=180,
            reserve in 0u32..=3600,
            steps in 1usize..200,
        ) {
            let mut player = Player::new(Vec2::ZERO);
            player.weapons[0].ammo = ammo;
            player.weapons[0].reserve = reserve;
            let total = ammo + reserve;
            reload(&mut player);
            for _ in 0..steps {
                tick_player_timers(&mut player, 0.033);
            }
            let w = &player.weapons[0];
            prop_assert!(w.ammo <= w.mag_size);
            prop_assert!(w.reserve <= w.max_reserve);
            prop_assert_eq!(w.ammo + w.reserve, total);
        }

        #[test]
        fn agent_hp_stays_in_range(hits in proptest::collection::vec(0.0f32..5.0, 0..40)) {
            let mut agent = agent_at(Vec2::ZERO, 10.0);
            let mut was_dead = false;
            for damage in hits {
                agent.take_damage(damage);
                prop_assert!(agent.hp >= 0.0 && agent.hp <= agent.max_hp);
                if was_dead {
                    prop_assert!(!agent.alive);
                }
                was_dead = !agent.alive;
            }
        }
    }
}
