//! Orbit Rush headless runner
//!
//! Plays one run against a simulated audio transport with a scripted
//! autopilot and prints the final HUD as JSON. Useful for balancing wave
//! schedules and tuning files without a renderer.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::f32::consts::TAU;
    use std::{fs, process};

    use clap::Parser;
    use glam::Vec2;
    use orbit_rush::sim::{
        GameEvent, GameState, ManualTransport, Schedule, TickInput, UpgradeKind, can_purchase,
        start_run, tick,
    };
    use orbit_rush::{FrameView, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(name = "orbit-rush")]
    #[command(about = "Play one headless Orbit Rush run and print the final HUD as JSON")]
    struct Cli {
        /// Wave schedule JSON; the built-in schedule when omitted
        schedule: Option<String>,

        /// Seed for spawn positions and enemy rolls
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Tuning overrides JSON
        #[arg(long)]
        tuning: Option<String>,

        /// Track length in seconds; defaults to a few seconds past the last wave
        #[arg(long, value_parser = parse_duration)]
        duration: Option<f64>,

        /// Print a frame snapshot every second of track time
        #[arg(long)]
        frames: bool,
    }

    fn parse_duration(value: &str) -> Result<f64, String> {
        let secs: f64 = value
            .parse()
            .map_err(|_| format!("not a number: {value}"))?;
        if secs > 0.0 && secs.is_finite() {
            Ok(secs)
        } else {
            Err(format!("must be positive, got {value}"))
        }
    }

    fn load_schedule(path: Option<&str>) -> Result<Schedule, String> {
        match path {
            None => Schedule::builtin().map_err(|e| format!("built-in schedule: {e}")),
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
                Schedule::from_json(&json).map_err(|e| format!("{path}: {e}"))
            }
        }
    }

    fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
        match path {
            None => Ok(Tuning::default()),
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
                Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))
            }
        }
    }

    /// Scripted input: sweep a figure-eight, widen the orbit in bursts,
    /// boost when energy is high and buy whatever is affordable.
    fn autopilot(state: &GameState, frame: u64) -> TickInput {
        let t = frame as f32 / 60.0;
        let center = Vec2::new(state.tuning.field_width, state.tuning.field_height) / 2.0;
        let sweep = Vec2::new((t * TAU / 12.0).sin() * 380.0, (t * TAU / 6.0).sin() * 200.0);

        let energy = state.economy.energy / state.tuning.max_energy;
        TickInput {
            pointer: Some(center + sweep),
            hold: (frame / 90) % 3 == 0,
            boost: energy > 0.6 && (frame / 45) % 4 == 0,
            buy_particles: can_purchase(state, UpgradeKind::Particles),
            buy_speed: frame % 600 == 0 && can_purchase(state, UpgradeKind::Speed),
            buy_regen: can_purchase(state, UpgradeKind::Regen),
            ..Default::default()
        }
    }

    fn log_events(state: &mut GameState) {
        for event in state.drain_events() {
            match event {
                GameEvent::EnemyKilled { .. } | GameEvent::ParticleRegenerated => {
                    log::trace!("{event:?}")
                }
                _ => log::debug!("{event:?}"),
            }
        }
    }

    fn run(cli: Cli) -> Result<(), String> {
        let schedule = load_schedule(cli.schedule.as_deref())?;
        let tuning = load_tuning(cli.tuning.as_deref())?;
        let duration = cli.duration.unwrap_or(schedule.last_time() + 10.0);

        let mut transport = ManualTransport::new(duration);
        let mut state = GameState::new(cli.seed, tuning);
        start_run(&mut state, &mut transport);

        // A little slack past the track end so the win is observed
        let max_frames = (duration * 60.0).ceil() as u64 + 120;
        let mut now_ms = 0.0;
        for frame in 0..max_frames {
            transport.advance(FRAME_MS / 1000.0);
            now_ms += FRAME_MS;
            let mut input = autopilot(&state, frame);
            input.now_ms = now_ms;

            tick(&mut state, &schedule, &mut transport, &input);
            log_events(&mut state);

            if cli.frames && frame % 60 == 0 {
                let view = FrameView::from_state(&state);
                println!("{}", serde_json::to_string(&view).map_err(|e| e.to_string())?);
            }
            if state.is_over() {
                break;
            }
        }

        let hud = FrameView::from_state(&state).hud;
        println!(
            "{}",
            serde_json::to_string_pretty(&hud).map_err(|e| e.to_string())?
        );
        Ok(())
    }

    pub fn main() {
        env_logger::init();
        log::info!("Orbit Rush (headless) starting...");

        if let Err(err) = run(Cli::parse()) {
            log::error!("{err}");
            eprintln!("error: {err}");
            process::exit(1);
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on the web
}
