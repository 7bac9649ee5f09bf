//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`]. A
//! tuning file only needs the keys it wants to override.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Cost and cap settings for one upgrade track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeTuning {
    /// Price of the first purchase
    pub base_cost: u32,
    /// Multiplier applied (then floored) after each purchase
    pub cost_growth: f32,
}

/// Runtime-tunable gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Energy ===
    pub max_energy: f32,
    pub boost_drain: f32,
    pub energy_regen: f32,
    pub hold_drain_per_particle: f32,
    pub aura_drain: f32,
    pub boost_speed_multiplier: f32,
    pub wide_radius_scale: f32,
    pub radius_smoothing: f32,

    // === Starting upgrades ===
    pub start_particles: u32,
    pub start_speed: f32,
    pub start_regen: u32,

    // === Upgrade shop ===
    pub particle_upgrade: UpgradeTuning,
    pub speed_upgrade: UpgradeTuning,
    pub regen_upgrade: UpgradeTuning,
    /// Particle cap gained per purchase
    pub particle_step: u32,
    pub max_particles: u32,
    /// Speed level gained per purchase
    pub speed_step: f32,
    pub max_regen: u32,

    // === Regeneration delay (ms) ===
    pub regen_base_delay_ms: f64,
    pub regen_delay_step_ms: f64,
    pub regen_min_delay_ms: f64,

    // === Spawning ===
    pub spawn_safe_distance: f32,
    pub preview_lead_secs: f64,

    // === Combat ===
    pub particle_hit_padding: f32,
    pub shooter_fire_chance: f32,
    pub projectile_speed: f32,
    pub projectile_hit_radius: f32,
    pub orbiter_turn_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            max_energy: MAX_ENERGY,
            boost_drain: BOOST_DRAIN,
            energy_regen: ENERGY_REGEN,
            hold_drain_per_particle: HOLD_DRAIN_PER_PARTICLE,
            aura_drain: AURA_DRAIN,
            boost_speed_multiplier: BOOST_SPEED_MULTIPLIER,
            wide_radius_scale: WIDE_RADIUS_SCALE,
            radius_smoothing: RADIUS_SMOOTHING,

            start_particles: 5,
            start_speed: 1.0,
            start_regen: 1,

            particle_upgrade: UpgradeTuning {
                base_cost: 20,
                cost_growth: 1.3,
            },
            speed_upgrade: UpgradeTuning {
                base_cost: 15,
                cost_growth: 1.3,
            },
            regen_upgrade: UpgradeTuning {
                base_cost: 50,
                cost_growth: 1.2,
            },
            particle_step: 3,
            max_particles: 30,
            speed_step: 0.2,
            max_regen: 20,

            regen_base_delay_ms: REGEN_BASE_DELAY_MS,
            regen_delay_step_ms: REGEN_DELAY_STEP_MS,
            regen_min_delay_ms: REGEN_MIN_DELAY_MS,

            spawn_safe_distance: SPAWN_SAFE_DISTANCE,
            preview_lead_secs: PREVIEW_LEAD_SECS,

            particle_hit_padding: PARTICLE_HIT_PADDING,
            shooter_fire_chance: SHOOTER_FIRE_CHANCE,
            projectile_speed: PROJECTILE_SPEED,
            projectile_hit_radius: PROJECTILE_HIT_RADIUS,
            orbiter_turn_rate: ORBITER_TURN_RATE,
        }
    }
}

/// Errors raised while loading a tuning file
#[derive(Debug)]
pub enum TuningError {
    /// The file is not valid tuning JSON
    Json(serde_json::Error),
    /// A value is outside the range the simulation can work with
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid tuning json: {err}"),
            Self::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "tuning value {field}={value} out of range (expected {expected})"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: field {}x{}, max energy {}",
            tuning.field_width,
            tuning.field_height,
            tuning.max_energy
        );
        Ok(tuning)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::OutOfRange {
                    field,
                    value,
                    expected: "> 0",
                })
            }
        }

        positive("fieldWidth", self.field_width as f64)?;
        positive("fieldHeight", self.field_height as f64)?;
        positive("maxEnergy", self.max_energy as f64)?;
        positive("regenMinDelayMs", self.regen_min_delay_ms)?;
        positive("previewLeadSecs", self.preview_lead_secs)?;

        // Respawn re-rolls forever if the safe zone covers the whole field.
        let safe = self.spawn_safe_distance;
        if safe < 0.0 || 2.0 * safe >= self.field_width.min(self.field_height) {
            return Err(TuningError::OutOfRange {
                field: "spawnSafeDistance",
                value: safe as f64,
                expected: "0 <= d < half the shorter field side",
            });
        }
        if !(0.0..=1.0).contains(&self.radius_smoothing) {
            return Err(TuningError::OutOfRange {
                field: "radiusSmoothing",
                value: self.radius_smoothing as f64,
                expected: "0..=1",
            });
        }
        if !(0.0..=1.0).contains(&self.shooter_fire_chance) {
            return Err(TuningError::OutOfRange {
                field: "shooterFireChance",
                value: self.shooter_fire_chance as f64,
                expected: "0..=1",
            });
        }
        if self.start_particles > self.max_particles {
            return Err(TuningError::OutOfRange {
                field: "startParticles",
                value: self.start_particles as f64,
                expected: "<= maxParticles",
            });
        }
        if self.start_regen == 0 || self.start_regen > self.max_regen {
            return Err(TuningError::OutOfRange {
                field: "startRegen",
                value: self.start_regen as f64,
                expected: "1..=maxRegen",
            });
        }
        Ok(())
    }

    /// Particle regeneration delay for a regen upgrade level
    pub fn regen_delay_ms(&self, level: u32) -> f64 {
        let steps = level.saturating_sub(1) as f64;
        (self.regen_base_delay_ms - steps * self.regen_delay_step_ms).max(self.regen_min_delay_ms)
    }
}
