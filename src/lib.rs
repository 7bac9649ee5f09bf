//! Orbit Rush - a music-synchronised orbit survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (waves, enemy behaviors, particle economy, collisions)
//! - `tuning`: Data-driven game balance
//! - `view`: Per-tick presentation snapshot for an external renderer

pub mod sim;
pub mod tuning;
pub mod view;

pub use tuning::{Tuning, TuningError};
pub use view::{FrameView, Hud};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play-field extent (game units)
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const FIELD_HEIGHT: f32 = 720.0;

    /// Energy pool
    pub const MAX_ENERGY: f32 = 10.0;
    /// Energy drained per tick while boosting
    pub const BOOST_DRAIN: f32 = 0.02;
    /// Energy regenerated per tick while not boosting
    pub const ENERGY_REGEN: f32 = 0.01;
    /// Energy drained per alive particle per tick while the orbit is widened
    pub const HOLD_DRAIN_PER_PARTICLE: f32 = 0.001;
    /// Energy drained per tick inside an aura
    pub const AURA_DRAIN: f32 = 0.035;
    /// Orbit speed multiplier while boosting
    pub const BOOST_SPEED_MULTIPLIER: f32 = 5.0;

    /// Orbit radius scale while widened, and smoothing per tick
    pub const WIDE_RADIUS_SCALE: f32 = 1.5;
    pub const RADIUS_SMOOTHING: f32 = 0.01;

    /// Particle regeneration delay: max(BASE - (level - 1) * STEP, MIN) ms
    pub const REGEN_BASE_DELAY_MS: f64 = 500.0;
    pub const REGEN_DELAY_STEP_MS: f64 = 21.0;
    pub const REGEN_MIN_DELAY_MS: f64 = 80.0;

    /// Enemies never spawn closer than this to the player
    pub const SPAWN_SAFE_DISTANCE: f32 = 100.0;
    /// Seconds before a wave triggers that its preview is shown
    pub const PREVIEW_LEAD_SECS: f64 = 0.75;

    /// Extra reach added to enemy size for particle hits
    pub const PARTICLE_HIT_PADDING: f32 = 3.0;
    /// Particle draw radius
    pub const PARTICLE_RADIUS: f32 = 3.0;
    /// Player draw radius
    pub const PLAYER_RADIUS: f32 = 8.0;

    /// Shooter enemies
    pub const SHOOTER_FIRE_CHANCE: f32 = 0.01;
    pub const PROJECTILE_SPEED: f32 = 3.0;
    pub const PROJECTILE_HIT_RADIUS: f32 = 8.0;

    /// Charger enemies (ms / game units)
    pub const CHARGER_DASH_LENGTH: f32 = 300.0;
    pub const CHARGER_COOLDOWN_MS: f64 = 750.0;
    pub const CHARGER_TELEGRAPH_MS: f64 = 325.0;
    pub const CHARGER_DASH_SPEED_FACTOR: f32 = 6.0;
    pub const CHARGER_FLASH_PERIOD_MS: f64 = 100.0;
    pub const CHARGER_INDICATOR_LENGTH: f32 = 50.0;

    /// Orbiter heading change per tick (radians)
    pub const ORBITER_TURN_RATE: f32 = 0.02;

    /// Splitter children
    pub const SPLIT_CHILDREN: usize = 3;
    pub const SPLIT_CHILD_SPEED: f32 = 1.5;
    pub const SPLIT_CHILD_REWARD: u32 = 2;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Clamp a point to the play-field rectangle `[0, width] x [0, height]`
#[inline]
pub fn clamp_to_field(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(pos.x.clamp(0.0, width), pos.y.clamp(0.0, height))
}

/// Format seconds as `m:ss`
pub fn format_time(secs: f64) -> String {
    let secs = secs.max(0.0);
    let m = (secs / 60.0).floor() as u64;
    let s = (secs % 60.0).floor() as u64;
    format!("{}:{:02}", m, s)
}
