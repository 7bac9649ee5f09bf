//! Enemy behaviors
//!
//! Every enemy kind has one update function, looked up through a fixed
//! table indexed by [`EnemyKind::index`]. An update moves the enemy one tick
//! and reports whether it caught the player.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{ChargePhase, Enemy, EnemyKind, GameState, Projectile};
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Shared inputs and outputs for one behavior pass
pub struct BehaviorCtx<'a> {
    pub player: Vec2,
    /// Wall-clock time of this tick (ms)
    pub now_ms: f64,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
    pub energy: &'a mut f32,
    /// Projectiles fired this tick
    pub fired: &'a mut Vec<Projectile>,
}

/// Advance one enemy; `true` if it touched the player
pub type BehaviorFn = fn(&mut Enemy, &mut BehaviorCtx) -> bool;

/// Dispatch table, in [`EnemyKind`] declaration order
const BEHAVIORS: [BehaviorFn; 9] = [
    update_homing,
    update_wander,
    update_bouncer,
    update_charger,
    update_shielded,
    update_aura,
    update_shooter,
    update_splitter,
    update_orbiter,
];

#[inline]
pub fn behavior_for(kind: EnemyKind) -> BehaviorFn {
    BEHAVIORS[kind.index()]
}

fn touching(enemy: &Enemy, player: Vec2) -> bool {
    enemy.pos.distance(player) < enemy.size
}

/// Flip velocity components that carried the enemy outside the field
fn reflect_off_field(enemy: &mut Enemy, tuning: &Tuning, inclusive: bool) {
    let (w, h) = (tuning.field_width, tuning.field_height);
    let Vec2 { x, y } = enemy.pos;
    let (out_x, out_y) = if inclusive {
        (x <= 0.0 || x >= w, y <= 0.0 || y >= h)
    } else {
        (x < 0.0 || x > w, y < 0.0 || y > h)
    };
    if out_x {
        enemy.vel.x = -enemy.vel.x;
    }
    if out_y {
        enemy.vel.y = -enemy.vel.y;
    }
}

fn update_homing(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    let to_player = ctx.player - enemy.pos;
    let dist = to_player.length();
    if dist > 0.0 {
        enemy.pos += to_player / dist * enemy.speed;
    }
    dist < enemy.size
}

fn update_wander(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    enemy.pos += enemy.vel;
    reflect_off_field(enemy, ctx.tuning, false);
    touching(enemy, ctx.player)
}

fn update_bouncer(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    enemy.pos += enemy.vel * enemy.speed;
    reflect_off_field(enemy, ctx.tuning, true);
    touching(enemy, ctx.player)
}

fn update_shielded(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    update_wander(enemy, ctx)
}

fn update_aura(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    if enemy.aura_radius > 0.0 && enemy.pos.distance(ctx.player) < enemy.aura_radius {
        *ctx.energy = (*ctx.energy - ctx.tuning.aura_drain).max(0.0);
    }
    false
}

fn update_shooter(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    if ctx.rng.random::<f32>() < ctx.tuning.shooter_fire_chance {
        let dir = (ctx.player - enemy.pos).normalize_or_zero();
        if dir != Vec2::ZERO {
            ctx.fired.push(Projectile {
                pos: enemy.pos,
                dir,
                speed: ctx.tuning.projectile_speed,
            });
        }
    }
    false
}

fn update_orbiter(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    enemy.angle += ctx.tuning.orbiter_turn_rate;
    enemy.pos += polar_to_cartesian(enemy.speed, enemy.angle);
    false
}

fn update_splitter(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    match enemy.motion_kind() {
        Some(EnemyKind::Splitter) | None => false,
        Some(base) => behavior_for(base)(enemy, ctx),
    }
}

/// Resting -> telegraph -> dashing -> resting
///
/// A telegraphing charger skips the contact check for that tick.
fn update_charger(enemy: &mut Enemy, ctx: &mut BehaviorCtx) -> bool {
    let now = ctx.now_ms;
    let to_player = ctx.player - enemy.pos;
    let dist = to_player.length();
    let tuning = enemy.charger.tuning;
    let last_dash = *enemy.charger.last_dash_ms.get_or_insert(now);

    match enemy.charger.phase {
        ChargePhase::Resting => {
            if now - last_dash >= tuning.cooldown_ms {
                let angle = to_player.y.atan2(to_player.x);
                enemy.charger.phase = ChargePhase::Telegraph {
                    started_ms: now,
                    angle,
                };
                log::debug!("Charger {} telegraphing", enemy.id);
            }
        }
        ChargePhase::Telegraph { started_ms, angle } => {
            if now - started_ms >= tuning.telegraph_ms {
                let velocity =
                    polar_to_cartesian(enemy.speed * CHARGER_DASH_SPEED_FACTOR, angle);
                enemy.vel = velocity;
                enemy.charger.phase = ChargePhase::Dashing {
                    origin: enemy.pos,
                    velocity,
                };
                log::debug!("Charger {} dashing", enemy.id);
            }
            return false;
        }
        ChargePhase::Dashing { origin, velocity } => {
            enemy.pos += velocity;
            if enemy.pos.distance(origin) >= tuning.dash_length {
                enemy.charger.phase = ChargePhase::Resting;
                enemy.charger.last_dash_ms = Some(now);
                enemy.vel = Vec2::ZERO;
            }
        }
    }

    dist < enemy.size
}

/// Advance every enemy one tick
///
/// Returns the kind of the first enemy that caught the player, if any. All
/// enemies still finish their update for the tick.
pub fn update_enemies(state: &mut GameState) -> Option<EnemyKind> {
    let mut fired = Vec::new();
    let mut caught_by = None;

    let GameState {
        enemies,
        economy,
        rng,
        tuning,
        player,
        now_ms,
        ..
    } = state;
    let mut ctx = BehaviorCtx {
        player: *player,
        now_ms: *now_ms,
        tuning,
        rng,
        energy: &mut economy.energy,
        fired: &mut fired,
    };

    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        let telegraphing_before = enemy.charger.is_telegraphing();
        if behavior_for(enemy.kind)(enemy, &mut ctx) && caught_by.is_none() {
            caught_by = Some(enemy.kind);
        }

        // Enemies drawn through the normal path capture their health bar max
        let drawn = !(enemy.motion_kind() == Some(EnemyKind::Charger) && telegraphing_before);
        if drawn && enemy.health > 1 && enemy.max_health.is_none() {
            enemy.max_health = Some(enemy.health);
        }
    }

    state.projectiles.append(&mut fired);
    caught_by
}
