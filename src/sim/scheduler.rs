//! Wave scheduler
//!
//! Each tick, every wave that has not spawned yet is checked against the
//! track time. Inside the preview window it produces faded markers at the
//! positions it would spawn at; once its trigger time passes it spawns for
//! real, exactly once.

use glam::Vec2;

use super::state::{GameEvent, GameState, SpawnPreview};
use super::wave::{Schedule, Wave};

/// Anchor for a wave, resolved against the player's current position
///
/// Random coordinates are rolled once per wave so previews and the real
/// spawn agree.
fn resolve_anchor(state: &mut GameState, index: usize, wave: &Wave) -> Vec2 {
    let random = if wave.needs_random_anchor() {
        match state.rolled_anchors.get(&index) {
            Some(anchor) => *anchor,
            None => {
                let anchor = state.random_field_point();
                state.rolled_anchors.insert(index, anchor);
                anchor
            }
        }
    } else {
        Vec2::ZERO
    };

    Vec2::new(
        wave.x.resolve(state.player, random.x),
        wave.y.resolve(state.player, random.y),
    )
}

/// Spawn positions for a wave at this instant
pub fn wave_positions(state: &mut GameState, index: usize, wave: &Wave) -> Vec<Vec2> {
    let anchor = resolve_anchor(state, index, wave);
    wave.pattern.expand(anchor, state.player)
}

/// Run the scheduler for the current tick
pub fn update_waves(state: &mut GameState, schedule: &Schedule) {
    state.previews.clear();
    let now = state.elapsed;
    let lead = state.tuning.preview_lead_secs;

    for (index, wave) in schedule.waves().iter().enumerate() {
        // Sorted by time, so nothing later can be in its window yet
        if now < wave.time - lead {
            break;
        }
        if state.spawned_waves.contains(&index) {
            continue;
        }

        let positions = wave_positions(state, index, wave);
        if now >= wave.time {
            for &pos in &positions {
                state.spawn_enemy(&wave.template, pos);
            }
            state.spawned_waves.insert(index);
            state.rolled_anchors.remove(&index);
            state.events.push(GameEvent::WaveSpawned {
                index,
                count: positions.len(),
            });
            log::info!(
                "Wave {} spawned at {:.2}s: {} x {} ({})",
                index,
                now,
                positions.len(),
                wave.template.kind.as_str(),
                wave.pattern.name()
            );
        } else {
            let size = wave.template.preview_size();
            state
                .previews
                .extend(positions.into_iter().map(|pos| SpawnPreview {
                    wave: index,
                    pos,
                    kind: wave.template.kind,
                    size,
                }));
        }
    }
}
