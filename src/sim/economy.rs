//! Particle orbit and energy economy
//!
//! Particles circle the player at a radius scaled by one shared factor.
//! Energy pays for the wide orbit (per particle) and for boost (flat); it
//! refills when boost is off. New particles regrow on a wall-clock timer.

use super::state::{GameEvent, GameState, UpgradeKind};
use crate::polar_to_cartesian;

/// Held inputs the economy reacts to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AbilityInput {
    /// Widen the orbit
    pub hold: bool,
    /// Speed up the orbit
    pub boost: bool,
}

/// Advance orbit, energy and regeneration by one tick
pub fn update_economy(state: &mut GameState, input: AbilityInput) {
    let tuning = &state.tuning;
    let economy = &mut state.economy;

    if !input.boost {
        economy.boost_active = false;
    } else if economy.energy > 0.0 {
        economy.boost_active = true;
    }

    // One shared scale, eased toward its target
    let widened = input.hold && economy.energy > 0.0;
    let target = if widened { tuning.wide_radius_scale } else { 1.0 };
    state.radius_scale += (target - state.radius_scale) * tuning.radius_smoothing;

    let speed_factor = economy.upgrades.speed
        * if economy.boost_active {
            tuning.boost_speed_multiplier
        } else {
            1.0
        };

    for particle in state.particles.iter_mut().filter(|p| p.alive) {
        particle.angle += particle.angular_speed * speed_factor;
        let radius = particle.base_radius * state.radius_scale;
        particle.pos = state.player + polar_to_cartesian(radius, particle.angle);
        if input.hold && economy.energy > 0.0 {
            economy.energy = (economy.energy - tuning.hold_drain_per_particle).max(0.0);
        }
    }

    if economy.boost_active {
        economy.energy -= tuning.boost_drain;
        if economy.energy <= 0.0 {
            economy.energy = 0.0;
            economy.boost_active = false;
            log::debug!("Boost depleted");
        }
    } else if economy.energy < tuning.max_energy {
        economy.energy = (economy.energy + tuning.energy_regen).min(tuning.max_energy);
    }

    regenerate_particles(state);
}

/// Add one particle when the regeneration timer allows and the cap has room
fn regenerate_particles(state: &mut GameState) {
    let now = state.now_ms;
    let delay = state.tuning.regen_delay_ms(state.economy.upgrades.regen);

    match state.next_regen_ms {
        None => state.next_regen_ms = Some(now + delay),
        Some(due) if now >= due => {
            if state.alive_particles() < state.economy.upgrades.particles as usize {
                state.spawn_particle();
                state.events.push(GameEvent::ParticleRegenerated);
            }
            state.next_regen_ms = Some(now + delay);
        }
        Some(_) => {}
    }
}

/// Whether an upgrade can be bought right now
pub fn can_purchase(state: &GameState, kind: UpgradeKind) -> bool {
    let upgrades = &state.economy.upgrades;
    let affordable = state.economy.currency >= upgrades.cost(kind);
    let below_cap = match kind {
        UpgradeKind::Particles => upgrades.particles < state.tuning.max_particles,
        UpgradeKind::Speed => true,
        UpgradeKind::Regen => upgrades.regen < state.tuning.max_regen,
    };
    affordable && below_cap
}

fn grow(cost: u32, factor: f32) -> u32 {
    (cost as f32 * factor).floor() as u32
}

/// Buy an upgrade; returns false (and changes nothing) if unavailable
pub fn purchase_upgrade(state: &mut GameState, kind: UpgradeKind) -> bool {
    if !can_purchase(state, kind) {
        return false;
    }

    let tuning = &state.tuning;
    let upgrades = &mut state.economy.upgrades;
    let cost = upgrades.cost(kind);
    match kind {
        UpgradeKind::Particles => {
            upgrades.particles = (upgrades.particles + tuning.particle_step).min(tuning.max_particles);
            upgrades.particle_cost = grow(cost, tuning.particle_upgrade.cost_growth);
        }
        UpgradeKind::Speed => {
            upgrades.speed += tuning.speed_step;
            upgrades.speed_cost = grow(cost, tuning.speed_upgrade.cost_growth);
        }
        UpgradeKind::Regen => {
            upgrades.regen += 1;
            upgrades.regen_cost = grow(cost, tuning.regen_upgrade.cost_growth);
        }
    }
    state.economy.currency = state.economy.currency.saturating_sub(cost);
    state.events.push(GameEvent::UpgradePurchased(kind));
    log::debug!("Bought {:?} for {}", kind, cost);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(9, Tuning::default())
    }

    #[test]
    fn test_orbit_positions_follow_player() {
        let mut state = state();
        update_economy(&mut state, AbilityInput::default());
        for p in &state.particles {
            let r = p.pos.distance(state.player);
            assert!((r - p.base_radius).abs() < 1e-3);
        }
    }

    #[test]
    fn test_radius_scale_is_smoothed() {
        let mut state = state();
        let hold = AbilityInput {
            hold: true,
            boost: false,
        };
        update_economy(&mut state, hold);
        assert!((state.radius_scale - 1.005).abs() < 1e-6);
        for _ in 0..2000 {
            update_economy(&mut state, hold);
            state.economy.energy = MAX_ENERGY;
        }
        assert!((state.radius_scale - WIDE_RADIUS_SCALE).abs() < 1e-3);

        // Without energy the orbit relaxes back
        state.economy.energy = 0.0;
        state.tuning.energy_regen = 0.0;
        update_economy(&mut state, hold);
        assert!(state.radius_scale < WIDE_RADIUS_SCALE - 1e-4);
    }

    #[test]
    fn test_hold_drains_per_alive_particle() {
        let hold = AbilityInput {
            hold: true,
            boost: false,
        };
        let mut full = state();
        full.economy.energy = 5.0;
        update_economy(&mut full, hold);
        let expected = 5.0 - 5.0 * HOLD_DRAIN_PER_PARTICLE + ENERGY_REGEN;
        assert!((full.economy.energy - expected).abs() < 1e-5);

        // Dead particles cost nothing
        let mut fewer = state();
        fewer.particles[0].alive = false;
        fewer.particles[1].alive = false;
        fewer.economy.energy = 5.0;
        update_economy(&mut fewer, hold);
        let expected = 5.0 - 3.0 * HOLD_DRAIN_PER_PARTICLE + ENERGY_REGEN;
        assert!((fewer.economy.energy - expected).abs() < 1e-5);
    }

    #[test]
    fn test_hold_drain_stops_at_zero() {
        let mut state = state();
        state.tuning.energy_regen = 0.0;
        // Enough for two and a half particles
        state.economy.energy = 2.5 * HOLD_DRAIN_PER_PARTICLE;
        update_economy(
            &mut state,
            AbilityInput {
                hold: true,
                boost: false,
            },
        );
        assert_eq!(state.economy.energy, 0.0);

        // Regen resumes from zero on the next tick
        state.tuning.energy_regen = ENERGY_REGEN;
        update_economy(&mut state, AbilityInput::default());
        assert!((state.economy.energy - ENERGY_REGEN).abs() < 1e-6);
    }

    #[test]
    fn test_boost_speeds_orbit_and_drains() {
        let mut state = state();
        let before: Vec<f32> = state.particles.iter().map(|p| p.angle).collect();
        update_economy(
            &mut state,
            AbilityInput {
                hold: false,
                boost: true,
            },
        );
        assert!(state.economy.boost_active);
        for (p, a) in state.particles.iter().zip(before) {
            assert!((p.angle - a - p.angular_speed * BOOST_SPEED_MULTIPLIER).abs() < 1e-5);
        }
        assert!((state.economy.energy - (MAX_ENERGY - BOOST_DRAIN)).abs() < 1e-5);
    }

    #[test]
    fn test_boost_deactivates_at_zero() {
        let mut state = state();
        state.economy.energy = 0.015;
        let boost = AbilityInput {
            hold: false,
            boost: true,
        };
        update_economy(&mut state, boost);
        assert_eq!(state.economy.energy, 0.0);
        assert!(!state.economy.boost_active);
    }

    #[test]
    fn test_regen_is_time_gated() {
        let mut state = state();
        state.particles[0].alive = false;
        state.particles[1].alive = false;

        state.now_ms = 1000.0;
        update_economy(&mut state, AbilityInput::default());
        assert_eq!(state.next_regen_ms, Some(1500.0));
        assert_eq!(state.alive_particles(), 3);

        // Many ticks inside the window add nothing
        for t in 0..50 {
            state.now_ms = 1000.0 + t as f64 * 9.0;
            update_economy(&mut state, AbilityInput::default());
        }
        assert_eq!(state.alive_particles(), 3);

        state.now_ms = 1500.0;
        update_economy(&mut state, AbilityInput::default());
        assert_eq!(state.alive_particles(), 4);
        assert_eq!(state.next_regen_ms, Some(2000.0));
    }

    #[test]
    fn test_regen_respects_cap() {
        let mut state = state();
        state.next_regen_ms = Some(0.0);
        state.now_ms = 10.0;
        update_economy(&mut state, AbilityInput::default());
        assert_eq!(state.alive_particles(), 5);
        assert_eq!(state.particles.len(), 5);
    }

    #[test]
    fn test_upgrade_purchases() {
        let mut state = state();
        assert!(!purchase_upgrade(&mut state, UpgradeKind::Speed));

        state.economy.currency = 100;
        assert!(purchase_upgrade(&mut state, UpgradeKind::Speed));
        assert_eq!(state.economy.currency, 85);
        assert!((state.economy.upgrades.speed - 1.2).abs() < 1e-6);
        assert_eq!(state.economy.upgrades.speed_cost, 19);

        assert!(purchase_upgrade(&mut state, UpgradeKind::Particles));
        assert_eq!(state.economy.upgrades.particles, 8);
        assert_eq!(state.economy.upgrades.particle_cost, 26);
        assert_eq!(state.economy.currency, 65);

        assert!(purchase_upgrade(&mut state, UpgradeKind::Regen));
        assert_eq!(state.economy.upgrades.regen, 2);
        assert_eq!(state.economy.upgrades.regen_cost, 60);
        assert_eq!(state.economy.currency, 15);
    }

    #[test]
    fn test_upgrade_caps() {
        let mut state = state();
        state.economy.currency = u32::MAX / 2;
        while purchase_upgrade(&mut state, UpgradeKind::Particles) {}
        assert_eq!(state.economy.upgrades.particles, 30);
        while purchase_upgrade(&mut state, UpgradeKind::Regen) {}
        assert_eq!(state.economy.upgrades.regen, 20);
    }

    proptest! {
        #[test]
        fn prop_energy_stays_in_bounds(
            inputs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..400),
            start in 0.0f32..=10.0,
        ) {
            let mut state = GameState::new(1, Tuning::default());
            state.economy.energy = start;
            for (hold, boost) in inputs {
                update_economy(&mut state, AbilityInput { hold, boost });
                prop_assert!(state.economy.energy >= 0.0);
                prop_assert!(state.economy.energy <= MAX_ENERGY);
            }
        }
    }
}
