//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time comes from the tick input and the audio transport, never the system
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod clock;
pub mod collision;
pub mod economy;
pub mod expr;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod wave;

pub use behavior::update_enemies;
pub use clock::{ManualTransport, TrackClock, Transport};
pub use collision::{HitReport, resolve_particle_hits, update_projectiles};
pub use economy::{AbilityInput, can_purchase, purchase_upgrade, update_economy};
pub use expr::{Expr, ExprError};
pub use scheduler::{update_waves, wave_positions};
pub use state::{
    ChargePhase, Enemy, EnemyKind, GameEvent, GamePhase, GameState, LossCause, Particle,
    Projectile, RunOutcome, SpawnPreview, UpgradeKind,
};
pub use tick::{TickInput, end_run, focus_gained, focus_lost, start_run, tick, toggle_pause};
pub use wave::{Coord, EnemyTemplate, Pattern, Schedule, ScheduleError, Wave};
