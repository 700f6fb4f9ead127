//! Game state and core simulation types
//!
//! Everything the presentation layer reads each frame lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::wave::WaveDirector;
use super::world::World;
use crate::consts::*;

/// How a weapon's projectiles interact with agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DischargeKind {
    /// Consumed by the first agent it hits
    Ballistic,
    /// Burns through agents, damaging every one it overlaps each step
    Incendiary,
}

/// A weapon slot. Ammo counters are mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct Weapon {
    pub name: &'static str,
    pub ammo: u32,
    pub mag_size: u32,
    pub reserve: u32,
    pub max_reserve: u32,
    /// Seconds to reload a magazine
    pub reload_time: f32,
    /// Seconds between discharges
    pub fire_cooldown: f32,
    pub speed: f32,
    /// Full spread angle in radians
    pub spread: f32,
    pub pellets: u32,
    pub damage: f32,
    pub radius: f32,
    pub kind: DischargeKind,
    /// RGB tint for projectiles
    pub tint: u32,
    /// Reserve ammo granted on each wave clear
    pub resupply: u32,
}

impl Weapon {
    pub fn minigun() -> Self {
        Self {
            name: "Minigun",
            ammo: 180,
            mag_size: 180,
            reserve: 1800,
            max_reserve: 3600,
            reload_time: 2.2,
            fire_cooldown: 0.035,
            speed: 860.0,
            spread: 0.22,
            pellets: 1,
            damage: 1.0,
            radius: 4.0,
            kind: DischargeKind::Ballistic,
            tint: 0xffef9d,
            resupply: 220,
        }
    }

    pub fn shotgun() -> Self {
        Self {
            name: "Shotgun",
            ammo: 8,
            mag_size: 8,
            reserve: 64,
            max_reserve: 128,
            reload_time: 1.5,
            fire_cooldown: 0.8,
            speed: 700.0,
            spread: 0.35,
            pellets: 10,
            damage: 1.0,
            radius: 3.0,
            kind: DischargeKind::Ballistic,
            tint: 0xf3c153,
            resupply: 16,
        }
    }

    pub fn flamethrower() -> Self {
        Self {
            name: "Flamethrower",
            ammo: 150,
            mag_size: 150,
            reserve: 600,
            max_reserve: 1200,
            reload_time: 2.8,
            fire_cooldown: 0.04,
            speed: 450.0,
            spread: 0.3,
            pellets: 1,
            damage: 0.4,
            radius: 10.0,
            kind: DischargeKind::Incendiary,
            tint: 0xff5000,
            resupply: 150,
        }
    }

    /// Standard three-slot loadout
    pub fn loadout() -> [Weapon; 3] {
        [Self::minigun(), Self::shotgun(), Self::flamethrower()]
    }

    pub fn is_full(&self) -> bool {
        self.ammo >= self.mag_size
    }

    /// Add reserve ammo, capped at `max_reserve`
    pub fn resupply(&mut self) {
        self.reserve = (self.reserve + self.resupply).min(self.max_reserve);
    }
}

/// The player character
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    /// Facing direction (unit length, kept while standing still)
    pub dir: Vec2,
    pub radius: f32,
    pub base_speed: f32,
    pub sprint_boost: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub health: f32,
    pub score: u64,
    pub fire_cooldown: f32,
    /// Hit immunity remaining
    pub hit_cooldown: f32,
    /// Reload countdown (0 = not reloading)
    pub reload_timer: f32,
    /// Fire lockout after a weapon switch
    pub switch_lockout: f32,
    pub weapons: [Weapon; 3],
    pub current_weapon: usize,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            dir: Vec2::X,
            radius: PLAYER_RADIUS,
            base_speed: PLAYER_BASE_SPEED,
            sprint_boost: PLAYER_SPRINT_BOOST,
            stamina: PLAYER_MAX_STAMINA,
            max_stamina: PLAYER_MAX_STAMINA,
            health: PLAYER_MAX_HEALTH,
            score: 0,
            fire_cooldown: 0.0,
            hit_cooldown: 0.0,
            reload_timer: 0.0,
            switch_lockout: 0.0,
            weapons: Weapon::loadout(),
            current_weapon: 0,
        }
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapons[self.current_weapon]
    }

    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.current_weapon]
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Hostile agent variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentVariant {
    Standard,
    Heavy,
    Boss,
}

/// A hostile agent
#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub variant: AgentVariant,
    pub alive: bool,
    /// Time until the next contact attack
    pub attack_cd: f32,
    pub attack_damage: f32,
    /// Cooldown applied after each contact attack
    pub attack_interval: f32,
    pub score_value: u64,
    /// Heading (radians) used while the player is out of range
    pub wander: f32,
    /// Facing direction (unit length)
    pub dir: Vec2,
}

impl Agent {
    /// Apply damage, clamping at zero. Returns true if this hit was lethal.
    pub fn take_damage(&mut self, damage: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = (self.hp - damage.max(0.0)).max(0.0);
        if self.hp <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// A live projectile
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before expiry
    pub life: f32,
    pub radius: f32,
    pub damage: f32,
    pub kind: DischargeKind,
    pub tint: u32,
}

/// Health cache dropped on kill milestones
#[derive(Debug, Clone, Serialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub radius: f32,
    pub heal: f32,
    pub taken: bool,
}

impl Pickup {
    pub fn health_cache(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PICKUP_RADIUS,
            heal: PICKUP_HEAL,
            taken: false,
        }
    }
}

/// Cosmetic particle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParticleKind {
    /// Ejected shell casing
    Shell,
    Blood,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub kind: ParticleKind,
}

/// Discrete things that happened during a tick, for presentation (audio,
/// muzzle flash, screen effects). Cleared at the start of every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Discharge { weapon: usize, kind: DischargeKind },
    AgentKilled { id: u32, variant: AgentVariant, pos: Vec2 },
    PickupTaken { pos: Vec2, heal: f32 },
    PlayerHit { damage: f32, health: f32 },
    WaveStarted { wave: u32, boss: bool },
    GameOver { wave: u32, score: u64 },
}

/// Owner of every live entity collection
#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    pub agents: Vec<Agent>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    /// Cosmetic particles beyond this count are dropped
    pub max_particles: usize,
    next_agent_id: u32,
}

impl Registry {
    pub fn new(max_particles: usize) -> Self {
        Self {
            agents: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            max_particles,
            next_agent_id: 1,
        }
    }

    /// Insert an agent, assigning it a fresh id
    pub fn insert_agent(&mut self, mut agent: Agent) -> &Agent {
        agent.id = self.next_agent_id;
        self.next_agent_id += 1;
        self.agents.push(agent);
        &self.agents[self.agents.len() - 1]
    }

    pub fn insert_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn insert_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    /// Insert a particle unless the cosmetic budget is spent
    pub fn insert_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    pub fn live_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.alive)
    }

    pub fn live_agents_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut().filter(|a| a.alive)
    }

    pub fn live_agent_count(&self) -> usize {
        self.live_agents().count()
    }

    pub fn live_pickups(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter().filter(|p| !p.taken)
    }

    /// Drop every agent at once (wave transition). Storage is reused.
    pub fn clear_agents(&mut self) {
        self.agents.clear();
    }
}

/// Complete simulation context (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub world: World,
    pub player: Player,
    pub registry: Registry,
    pub waves: WaveDirector,
    /// Total agents killed this run
    pub kills: u32,
    /// Frames simulated this run
    pub frame: u64,
    pub game_over: bool,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a run on the standard city and start wave 1
    pub fn new(seed: u64) -> Self {
        Self::with_world(seed, World::city(), crate::QualityPreset::default().max_particles())
    }

    /// Create a run on a custom world and start wave 1
    pub fn with_world(seed: u64, world: World, max_particles: usize) -> Self {
        let mut state = Self::idle(seed, world, max_particles);
        super::wave::start_wave(&mut state, 1);
        state
    }

    /// Create a run with no wave started (nothing spawned yet)
    pub fn idle(seed: u64, world: World, max_particles: usize) -> Self {
        let player = Player::new(Vec2::new(world.width * 0.5, world.height * 0.55));
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            world,
            player,
            registry: Registry::new(max_particles),
            waves: WaveDirector::default(),
            kills: 0,
            frame: 0,
            game_over: false,
            events: Vec::new(),
        }
    }

    /// Current wave number (1-based)
    pub fn wave(&self) -> u32 {
        self.waves.wave
    }
}
