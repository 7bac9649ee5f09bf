//! Presentation snapshot
//!
//! Everything a renderer needs to draw one frame, derived from the game state
//! without mutating it. Colors are CSS color names.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::format_time;
use crate::sim::economy::can_purchase;
use crate::sim::state::{
    ChargePhase, Enemy, EnemyKind, GamePhase, GameState, LossCause, RunOutcome, UpgradeKind,
};

/// Opacity of spawn previews
pub const PREVIEW_ALPHA: f32 = 0.3;
/// Charger aim line
pub const INDICATOR_COLOR: &str = "yellow";

/// Base color per enemy kind
pub fn enemy_color(kind: EnemyKind) -> &'static str {
    match kind {
        EnemyKind::Homing => "red",
        EnemyKind::Wander => "lime",
        EnemyKind::Bouncer => "cyan",
        EnemyKind::Charger => "orange",
        EnemyKind::Shielded => "purple",
        EnemyKind::Aura => "magenta",
        EnemyKind::Shooter => "olive",
        EnemyKind::Splitter => "crimson",
        EnemyKind::Orbiter => "red",
    }
}

/// How an enemy is drawn this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", rename_all = "camelCase")]
pub enum EnemyVisual {
    /// Regular filled circle with outline
    Body {
        color: &'static str,
        /// Remaining health fraction, shown when max health > 1
        health_bar: Option<f32>,
    },
    /// Charger winding up: flashing body plus aim line
    Telegraph {
        color: &'static str,
        indicator_end: Vec2,
        indicator_color: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyView {
    pub pos: Vec2,
    pub size: f32,
    pub visual: EnemyVisual,
    /// Drawn as a faint ring
    pub aura_radius: Option<f32>,
}

impl EnemyView {
    pub fn from_enemy(enemy: &Enemy, now_ms: f64) -> Self {
        // Splitters are drawn like the kind they move as
        let motion = enemy.motion_kind();
        let aura_radius = (motion == Some(EnemyKind::Aura) && enemy.aura_radius > 0.0)
            .then_some(enemy.aura_radius);

        let visual = match enemy.charger.phase {
            ChargePhase::Telegraph { started_ms, angle } if motion == Some(EnemyKind::Charger) => {
                let flashes = ((now_ms - started_ms) / CHARGER_FLASH_PERIOD_MS).floor() as i64;
                let color = if flashes % 2 == 0 {
                    "white"
                } else {
                    enemy_color(enemy.kind)
                };
                EnemyVisual::Telegraph {
                    color,
                    indicator_end: enemy.pos
                        + crate::polar_to_cartesian(CHARGER_INDICATOR_LENGTH, angle),
                    indicator_color: INDICATOR_COLOR,
                }
            }
            _ => {
                let color = if enemy.shield > 0 {
                    "blue"
                } else {
                    enemy_color(enemy.kind)
                };
                let health_bar = enemy
                    .max_health
                    .filter(|&max| max > 1)
                    .map(|max| enemy.health as f32 / max as f32);
                EnemyVisual::Body { color, health_bar }
            }
        };

        Self {
            pos: enemy.pos,
            size: enemy.size,
            visual,
            aura_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleView {
    pub pos: Vec2,
    pub hue: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewView {
    pub pos: Vec2,
    pub size: f32,
    pub color: &'static str,
    pub alpha: f32,
}

/// One upgrade shop card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCard {
    pub key: char,
    pub name: &'static str,
    pub level: String,
    pub cost: u32,
    pub available: bool,
    pub extra: Option<String>,
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hud {
    pub score: u64,
    pub currency: u32,
    pub energy_fraction: f32,
    pub progress_percent: f32,
    /// `m:ss / m:ss`
    pub time_text: String,
    pub upgrades: Vec<UpgradeCard>,
    pub end_message: Option<&'static str>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let economy = &state.economy;
        let upgrades = &economy.upgrades;
        let tuning = &state.tuning;
        let progress = if state.duration > 0.0 {
            (state.elapsed / state.duration * 100.0).min(100.0) as f32
        } else {
            0.0
        };

        let cards = vec![
            UpgradeCard {
                key: 'Z',
                name: "Particles",
                level: format!("{}/{}", upgrades.particles, tuning.max_particles),
                cost: upgrades.particle_cost,
                available: can_purchase(state, UpgradeKind::Particles),
                extra: Some(format!("Alive: {}", state.alive_particles())),
            },
            UpgradeCard {
                key: 'X',
                name: "Speed",
                level: format!("{:.1}", upgrades.speed),
                cost: upgrades.speed_cost,
                available: can_purchase(state, UpgradeKind::Speed),
                extra: None,
            },
            UpgradeCard {
                key: 'C',
                name: "Regen",
                level: format!("{}/{}", upgrades.regen, tuning.max_regen),
                cost: upgrades.regen_cost,
                available: can_purchase(state, UpgradeKind::Regen),
                extra: Some(format!("{} ms", tuning.regen_delay_ms(upgrades.regen).round())),
            },
        ];

        let end_message = match state.phase {
            GamePhase::Over(RunOutcome::Won) => Some("You survived until the end! You win!"),
            GamePhase::Over(RunOutcome::Lost(LossCause::Projectile)) => {
                Some("Game Over - shot down")
            }
            GamePhase::Over(RunOutcome::Lost(LossCause::Contact(_))) => Some("Game Over"),
            _ => None,
        };

        Self {
            score: economy.score,
            currency: economy.currency,
            energy_fraction: (economy.energy / tuning.max_energy).clamp(0.0, 1.0),
            progress_percent: progress,
            time_text: format!(
                "{} / {}",
                format_time(state.elapsed),
                format_time(state.duration)
            ),
            upgrades: cards,
            end_message,
        }
    }
}

/// Everything drawn for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameView {
    pub player: Vec2,
    pub particles: Vec<ParticleView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<Vec2>,
    pub previews: Vec<PreviewView>,
    pub hud: Hud,
}

impl FrameView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            player: state.player,
            particles: state
                .particles
                .iter()
                .filter(|p| p.alive)
                .map(|p| ParticleView {
                    pos: p.pos,
                    hue: p.hue,
                })
                .collect(),
            enemies: state
                .enemies
                .iter()
                .filter(|e| e.alive)
                .map(|e| EnemyView::from_enemy(e, state.now_ms))
                .collect(),
            projectiles: state.projectiles.iter().map(|p| p.pos).collect(),
            previews: state
                .previews
                .iter()
                .map(|p| PreviewView {
                    pos: p.pos,
                    size: p.size,
                    color: enemy_color(p.kind),
                    alpha: PREVIEW_ALPHA,
                })
                .collect(),
            hud: Hud::from_state(state),
        }
    }
}
