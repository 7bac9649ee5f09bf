//! Simulation tick
//!
//! Core game loop: one call per rendered frame. The pause/game-over gate is
//! checked once on entry; a gated tick changes nothing.

use glam::Vec2;

use super::behavior::update_enemies;
use super::clock::Transport;
use super::collision::{resolve_particle_hits, update_projectiles};
use super::economy::{AbilityInput, purchase_upgrade, update_economy};
use super::scheduler::update_waves;
use super::state::{GameEvent, GamePhase, GameState, LossCause, RunOutcome, UpgradeKind};
use super::wave::Schedule;
use crate::clamp_to_field;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in field coordinates
    pub pointer: Option<Vec2>,
    /// Widen-orbit button held
    pub hold: bool,
    /// Boost key held
    pub boost: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Upgrade purchases (edges)
    pub buy_particles: bool,
    pub buy_speed: bool,
    pub buy_regen: bool,
    /// Wall-clock timestamp of this frame (ms)
    pub now_ms: f64,
}

/// Begin (or restart) a run from scratch
pub fn start_run(state: &mut GameState, transport: &mut dyn Transport) {
    state.reset();
    transport.play_from_start();
    state.duration = transport.duration_seconds();
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::RunStarted);
    log::info!(
        "Run started (seed {}, track {:.1}s)",
        state.seed,
        state.duration
    );
}

/// End the run and tear down playback
pub fn end_run(state: &mut GameState, transport: &mut dyn Transport, outcome: RunOutcome) {
    if state.is_over() {
        return;
    }
    transport.stop();
    state.clock.freeze(transport);
    state.phase = GamePhase::Over(outcome);
    state.paused_by_focus = false;
    state.events.push(GameEvent::RunEnded(outcome));
    log::info!(
        "Run ended: {:?} at {:.2}s, score {}",
        outcome,
        state.elapsed,
        state.economy.score
    );
}

fn pause(state: &mut GameState, transport: &mut dyn Transport, by_focus: bool) {
    state.clock.freeze(transport);
    transport.suspend();
    state.phase = GamePhase::Paused;
    state.paused_by_focus = by_focus;
    state.events.push(GameEvent::Paused { by_focus });
    log::info!("Paused{}", if by_focus { " (focus lost)" } else { "" });
}

fn resume(state: &mut GameState, transport: &mut dyn Transport) {
    transport.resume();
    state.clock.unfreeze();
    state.phase = GamePhase::Playing;
    state.paused_by_focus = false;
    state.events.push(GameEvent::Resumed);
    log::info!("Resumed");
}

/// Manual pause toggle; no effect before the run starts or after it ends
pub fn toggle_pause(state: &mut GameState, transport: &mut dyn Transport) {
    match state.phase {
        GamePhase::Playing => pause(state, transport, false),
        GamePhase::Paused => resume(state, transport),
        GamePhase::Ready | GamePhase::Over(_) => {}
    }
}

/// Window lost focus: pause, remembering why
pub fn focus_lost(state: &mut GameState, transport: &mut dyn Transport) {
    if state.phase == GamePhase::Playing {
        pause(state, transport, true);
    }
}

/// Window regained focus: resume only a focus-triggered pause
pub fn focus_gained(state: &mut GameState, transport: &mut dyn Transport) {
    if state.phase == GamePhase::Paused && state.paused_by_focus {
        resume(state, transport);
    }
}

/// Advance the game state by one tick
pub fn tick(
    state: &mut GameState,
    schedule: &Schedule,
    transport: &mut dyn Transport,
    input: &TickInput,
) {
    if input.pause {
        toggle_pause(state, transport);
    }

    // Don't tick if paused, over or not started
    if state.phase != GamePhase::Playing {
        return;
    }

    if transport.has_ended() {
        end_run(state, transport, RunOutcome::Won);
        return;
    }

    state.time_ticks += 1;
    state.now_ms = input.now_ms;
    state.elapsed = state.clock.now(transport);
    if let Some(pointer) = input.pointer {
        state.player = clamp_to_field(
            pointer,
            state.tuning.field_width,
            state.tuning.field_height,
        );
    }

    for (wanted, kind) in [
        (input.buy_particles, UpgradeKind::Particles),
        (input.buy_speed, UpgradeKind::Speed),
        (input.buy_regen, UpgradeKind::Regen),
    ] {
        if wanted {
            purchase_upgrade(state, kind);
        }
    }

    update_waves(state, schedule);

    if let Some(kind) = update_enemies(state) {
        end_run(state, transport, RunOutcome::Lost(LossCause::Contact(kind)));
        return;
    }

    update_economy(
        state,
        AbilityInput {
            hold: input.hold,
            boost: input.boost,
        },
    );

    resolve_particle_hits(state);
    if update_projectiles(state) {
        end_run(state, transport, RunOutcome::Lost(LossCause::Projectile));
    }
}
