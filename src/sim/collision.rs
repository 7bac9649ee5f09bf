//! Collision detection and scoring
//!
//! Particles chip at enemies (shield first, then health) and die on impact.
//! Kills pay out score and currency; splitters leave homing children behind.
//! Dead entities are compacted after the pass so iteration never skips or
//! revisits anything.

use glam::Vec2;

use super::state::{EnemyKind, GameEvent, GameState, HitOutcome};
use super::wave::EnemyTemplate;
use crate::consts::SPLIT_CHILDREN;

/// Summary of one particle pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    /// Particles spent this tick
    pub particles_used: usize,
    pub shield_hits: usize,
    pub kills: usize,
    /// Children spawned by dying splitters
    pub children: usize,
}

/// Circle overlap test used by every collision in the game
#[inline]
pub fn within(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) < reach
}

/// Resolve particle hits against every live enemy
pub fn resolve_particle_hits(state: &mut GameState) -> HitReport {
    let mut report = HitReport::default();
    // (parent id, position, size) of splitters that died this pass
    let mut splits: Vec<(u32, Vec2, f32)> = Vec::new();
    let padding = state.tuning.particle_hit_padding;

    for enemy in state.enemies.iter_mut() {
        for particle in state.particles.iter_mut() {
            if !enemy.alive {
                break;
            }
            if !particle.alive || !within(particle.pos, enemy.pos, enemy.size + padding) {
                continue;
            }

            particle.alive = false;
            report.particles_used += 1;

            match enemy.apply_hit() {
                HitOutcome::Immune | HitOutcome::Damaged => {}
                HitOutcome::Shielded => report.shield_hits += 1,
                HitOutcome::Killed => {
                    report.kills += 1;
                    state.economy.score += 1;
                    state.economy.currency = state.economy.currency.saturating_add(enemy.reward);
                    state.events.push(GameEvent::EnemyKilled {
                        id: enemy.id,
                        kind: enemy.kind,
                        reward: enemy.reward,
                    });
                    log::debug!(
                        "Killed {} {} (+{} currency)",
                        enemy.kind.as_str(),
                        enemy.id,
                        enemy.reward
                    );
                    if enemy.kind == EnemyKind::Splitter {
                        splits.push((enemy.id, enemy.pos, enemy.size));
                    }
                }
            }
        }
    }

    state.enemies.retain(|e| e.alive);
    state.particles.retain(|p| p.alive);

    for (id, pos, size) in splits {
        let child = EnemyTemplate::split_child(size);
        for _ in 0..SPLIT_CHILDREN {
            state.spawn_enemy(&child, pos);
        }
        report.children += SPLIT_CHILDREN;
        state.events.push(GameEvent::EnemySplit {
            id,
            children: SPLIT_CHILDREN,
        });
    }

    report
}

/// Move projectiles; `true` if one reached the player
pub fn update_projectiles(state: &mut GameState) -> bool {
    let reach = state.tuning.projectile_hit_radius;
    let mut hit = false;
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.dir * projectile.speed;
        if within(projectile.pos, state.player, reach) {
            hit = true;
        }
    }
    hit
}
