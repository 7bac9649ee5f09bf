//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]; restarting a run is a
//! single [`GameState::reset`].

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::TrackClock;
use super::wave::EnemyTemplate;
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Run not started yet
    Ready,
    /// Active gameplay
    Playing,
    /// Frozen by the pause key or by focus loss
    Paused,
    /// Run ended
    Over(RunOutcome),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The track played to its natural end
    Won,
    /// The player was caught
    Lost(LossCause),
}

/// What caught the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    Contact(EnemyKind),
    Projectile,
}

/// Enemy behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Homing,
    Wander,
    Bouncer,
    Charger,
    Shielded,
    Aura,
    Shooter,
    Splitter,
    Orbiter,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 9] = [
        EnemyKind::Homing,
        EnemyKind::Wander,
        EnemyKind::Bouncer,
        EnemyKind::Charger,
        EnemyKind::Shielded,
        EnemyKind::Aura,
        EnemyKind::Shooter,
        EnemyKind::Splitter,
        EnemyKind::Orbiter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Homing => "homing",
            EnemyKind::Wander => "wander",
            EnemyKind::Bouncer => "bouncer",
            EnemyKind::Charger => "charger",
            EnemyKind::Shielded => "shielded",
            EnemyKind::Aura => "aura",
            EnemyKind::Shooter => "shooter",
            EnemyKind::Splitter => "splitter",
            EnemyKind::Orbiter => "orbiter",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Slot in the behavior dispatch table
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Charger timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargerTuning {
    pub dash_length: f32,
    pub cooldown_ms: f64,
    pub telegraph_ms: f64,
}

impl Default for ChargerTuning {
    fn default() -> Self {
        Self {
            dash_length: CHARGER_DASH_LENGTH,
            cooldown_ms: CHARGER_COOLDOWN_MS,
            telegraph_ms: CHARGER_TELEGRAPH_MS,
        }
    }
}

/// Charger sub-state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChargePhase {
    Resting,
    /// Flashing in place, aiming at `angle`
    Telegraph { started_ms: f64, angle: f32 },
    /// Moving at a fixed velocity away from `origin`
    Dashing { origin: Vec2, velocity: Vec2 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargerState {
    pub phase: ChargePhase,
    /// End of the previous dash (set on the first update)
    pub last_dash_ms: Option<f64>,
    pub tuning: ChargerTuning,
}

impl ChargerState {
    pub fn new(tuning: ChargerTuning) -> Self {
        Self {
            phase: ChargePhase::Resting,
            last_dash_ms: None,
            tuning,
        }
    }

    pub fn is_telegraphing(&self) -> bool {
        matches!(self.phase, ChargePhase::Telegraph { .. })
    }
}

/// Result of one particle hit on an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable enemy, nothing changed
    Immune,
    /// A shield charge absorbed the hit
    Shielded,
    /// Health dropped but the enemy survives
    Damaged,
    /// Health reached zero
    Killed,
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Motion used by a splitter (stationary when absent)
    pub split_base: Option<EnemyKind>,
    pub pos: Vec2,
    /// Wander/bouncer direction, or the current dash velocity
    pub vel: Vec2,
    /// Orbiter heading
    pub angle: f32,
    pub size: f32,
    pub speed: f32,
    pub health: u32,
    /// Captured the first time a health bar is shown
    pub max_health: Option<u32>,
    pub shield: u32,
    pub reward: u32,
    pub aura_radius: f32,
    pub invulnerable: bool,
    pub charger: ChargerState,
    pub alive: bool,
}

impl Enemy {
    /// Behavior actually driving this enemy's motion
    pub fn motion_kind(&self) -> Option<EnemyKind> {
        match self.kind {
            EnemyKind::Splitter => self.split_base,
            kind => Some(kind),
        }
    }

    /// Apply one particle hit: invulnerability, then shield, then health
    pub fn apply_hit(&mut self) -> HitOutcome {
        if self.invulnerable {
            return HitOutcome::Immune;
        }
        debug_assert!(
            self.alive && self.health > 0,
            "hit on dead enemy {} (health {})",
            self.id,
            self.health
        );
        if !self.alive || self.health == 0 {
            log::warn!("Ignoring hit on dead enemy {}", self.id);
            return HitOutcome::Immune;
        }

        if self.shield > 0 {
            self.shield -= 1;
            return HitOutcome::Shielded;
        }

        self.health -= 1;
        if self.health == 0 {
            self.alive = false;
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged
        }
    }
}

/// An orbiting particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub angle: f32,
    pub base_radius: f32,
    /// Radians per tick at speed level 1
    pub angular_speed: f32,
    /// Hue in degrees
    pub hue: f32,
    pub alive: bool,
    /// World position from the last orbit update
    pub pos: Vec2,
}

/// A shooter projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub speed: f32,
}

/// Upgrade tracks sold in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Particles,
    Speed,
    Regen,
}

/// Upgrade levels and their current prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrades {
    /// Maximum alive particles
    pub particles: u32,
    /// Orbit speed multiplier
    pub speed: f32,
    /// Regeneration level
    pub regen: u32,
    pub particle_cost: u32,
    pub speed_cost: u32,
    pub regen_cost: u32,
}

impl Upgrades {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            particles: tuning.start_particles,
            speed: tuning.start_speed,
            regen: tuning.start_regen,
            particle_cost: tuning.particle_upgrade.base_cost,
            speed_cost: tuning.speed_upgrade.base_cost,
            regen_cost: tuning.regen_upgrade.base_cost,
        }
    }

    pub fn cost(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Particles => self.particle_cost,
            UpgradeKind::Speed => self.speed_cost,
            UpgradeKind::Regen => self.regen_cost,
        }
    }
}

/// Score, currency and energy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    pub score: u64,
    pub currency: u32,
    pub energy: f32,
    pub boost_active: bool,
    pub upgrades: Upgrades,
}

impl Economy {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            currency: 0,
            energy: tuning.max_energy,
            boost_active: false,
            upgrades: Upgrades::new(tuning),
        }
    }
}

/// Faded marker for an enemy about to spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPreview {
    pub wave: usize,
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub size: f32,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted,
    WaveSpawned { index: usize, count: usize },
    EnemyKilled { id: u32, kind: EnemyKind, reward: u32 },
    EnemySplit { id: u32, children: usize },
    ParticleRegenerated,
    UpgradePurchased(UpgradeKind),
    Paused { by_focus: bool },
    Resumed,
    RunEnded(RunOutcome),
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Set when the current pause came from focus loss
    pub paused_by_focus: bool,
    pub clock: TrackClock,
    /// Track position read this tick (seconds)
    pub elapsed: f64,
    /// Track length (seconds)
    pub duration: f64,
    /// Wall-clock timestamp of this tick (ms)
    pub now_ms: f64,
    pub time_ticks: u64,
    pub player: Vec2,
    pub particles: Vec<Particle>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub economy: Economy,
    /// Orbit radius multiplier shared by every particle
    pub radius_scale: f32,
    /// Earliest wall-clock time the next particle may regenerate
    pub next_regen_ms: Option<f64>,
    /// Wave indices that have already spawned
    pub spawned_waves: BTreeSet<usize>,
    /// Random anchors rolled for waves without fixed coordinates
    pub rolled_anchors: BTreeMap<usize, Vec2>,
    /// Previews recomputed every tick
    pub previews: Vec<SpawnPreview>,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh, not-yet-started run
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            economy: Economy::new(&tuning),
            player: Vec2::new(tuning.field_width / 2.0, tuning.field_height / 2.0),
            tuning,
            phase: GamePhase::Ready,
            paused_by_focus: false,
            clock: TrackClock::default(),
            elapsed: 0.0,
            duration: 0.0,
            now_ms: 0.0,
            time_ticks: 0,
            particles: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            radius_scale: 1.0,
            next_regen_ms: None,
            spawned_waves: BTreeSet::new(),
            rolled_anchors: BTreeMap::new(),
            previews: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        for _ in 0..state.economy.upgrades.particles {
            state.spawn_particle();
        }

        state
    }

    /// Return every collection and counter to its start-of-run value
    pub fn reset(&mut self) {
        *self = Self::new(self.seed, self.tuning.clone());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn alive_particles(&self) -> usize {
        self.particles.iter().filter(|p| p.alive).count()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Over(_))
    }

    /// Uniformly random point on the play field
    pub fn random_field_point(&mut self) -> Vec2 {
        let x = self.rng.random::<f32>() * self.tuning.field_width;
        let y = self.rng.random::<f32>() * self.tuning.field_height;
        Vec2::new(x, y)
    }

    /// Add a particle with a random orbit
    pub fn spawn_particle(&mut self) {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let base_radius = self.rng.random_range(80.0..120.0);
        let angular_speed = self.rng.random_range(0.01..0.02);
        let hue = self.rng.random_range(0.0..360.0);
        let pos = self.player + polar_to_cartesian(base_radius * self.radius_scale, angle);
        self.particles.push(Particle {
            angle,
            base_radius,
            angular_speed,
            hue,
            alive: true,
            pos,
        });
    }

    /// Create an enemy from a template near `pos`
    ///
    /// Positions inside the player's safe zone (or non-finite formula
    /// results) are re-rolled uniformly over the field until they are valid.
    pub fn spawn_enemy(&mut self, template: &EnemyTemplate, pos: Vec2) -> u32 {
        let mut pos = pos;
        while !pos.is_finite() || pos.distance(self.player) < self.tuning.spawn_safe_distance {
            pos = self.random_field_point();
        }

        let dx = template
            .dx
            .unwrap_or_else(|| self.rng.random_range(-1.0..1.0));
        let dy = template
            .dy
            .unwrap_or_else(|| self.rng.random_range(-1.0..1.0));
        let size = template
            .size
            .unwrap_or_else(|| self.rng.random_range(10.0..20.0));
        let speed = template
            .speed
            .unwrap_or_else(|| self.rng.random_range(1.0..2.0));

        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            kind: template.kind,
            split_base: template.split_base,
            pos,
            vel: Vec2::new(dx, dy),
            angle: template.angle,
            size,
            speed,
            health: template.health,
            max_health: None,
            shield: template.shield,
            reward: template.reward,
            aura_radius: template.aura_radius,
            invulnerable: template.invulnerable,
            charger: ChargerState::new(template.charger),
            alive: true,
        });
        id
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
