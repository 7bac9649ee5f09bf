use glam::Vec2;
use orbit_rush::sim::*;
use orbit_rush::{FrameView, Tuning};

const FRAME_MS: f64 = 1000.0 / 60.0;

struct Run {
    state: GameState,
    schedule: Schedule,
    transport: ManualTransport,
    now_ms: f64,
}

impl Run {
    fn new(json: &str, seed: u64, duration: f64) -> Self {
        let schedule = Schedule::from_json(json).unwrap();
        let mut transport = ManualTransport::new(duration);
        let mut state = GameState::new(seed, Tuning::default());
        start_run(&mut state, &mut transport);
        Self {
            state,
            schedule,
            transport,
            now_ms: 0.0,
        }
    }

    fn step(&mut self, mut input: TickInput) -> Vec<GameEvent> {
        self.transport.advance(FRAME_MS / 1000.0);
        self.now_ms += FRAME_MS;
        input.now_ms = self.now_ms;
        tick(&mut self.state, &self.schedule, &mut self.transport, &input);
        self.state.drain_events()
    }
}

/// Track that ends the moment it starts
struct SilentTrack {
    started: bool,
}

impl Transport for SilentTrack {
    fn playback_seconds(&self) -> f64 {
        0.0
    }
    fn duration_seconds(&self) -> f64 {
        0.0
    }
    fn has_ended(&self) -> bool {
        self.started
    }
    fn play_from_start(&mut self) {
        self.started = true;
    }
    fn suspend(&mut self) {}
    fn resume(&mut self) {}
    fn stop(&mut self) {}
}

#[test]
fn preview_precedes_spawn() {
    let mut run = Run::new(
        r#"[{ "time": 1.0, "pattern": "line", "count": 3, "x": 100, "y": 100, "type": "splitter" }]"#,
        3,
        10.0,
    );

    let mut saw_preview = false;
    for _ in 0..120 {
        let events = run.step(TickInput::default());
        if run.state.enemies.is_empty() {
            if !run.state.previews.is_empty() {
                saw_preview = true;
                assert!(run.state.elapsed >= 0.25 - 1e-9);
                assert_eq!(run.state.previews.len(), 3);
            }
        } else {
            assert!(events.contains(&GameEvent::WaveSpawned { index: 0, count: 3 }));
            assert!(run.state.previews.is_empty());
            break;
        }
    }
    assert!(saw_preview);
    assert_eq!(run.state.enemies.len(), 3);
    assert_eq!(run.state.enemies[1].pos, Vec2::new(150.0, 100.0));

    // Never again
    for _ in 0..60 {
        run.step(TickInput::default());
    }
    assert_eq!(run.state.spawned_waves.len(), 1);
}

#[test]
fn orbit_kills_splitter_and_pays_out() {
    // Stationary splitter right on the orbit ring
    let mut run = Run::new(
        r#"[{ "time": 0, "type": "splitter", "x": 740, "y": 360, "size": 20, "reward": 7 }]"#,
        5,
        60.0,
    );

    let mut split = false;
    for _ in 0..1200 {
        let events = run.step(TickInput::default());
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemySplit { children: 3, .. }))
        {
            split = true;
            break;
        }
    }
    assert!(split, "orbit never reached the splitter");
    assert_eq!(run.state.economy.score, 1);
    assert_eq!(run.state.economy.currency, 7);
    assert!(
        run.state
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Homing)
            .count()
            >= 3
    );
    assert!(run.state.alive_particles() < 5);
}

#[test]
fn custom_transport_drives_the_run() {
    let mut transport = SilentTrack { started: false };
    let mut state = GameState::new(1, Tuning::default());
    start_run(&mut state, &mut transport);
    tick(&mut state, &Schedule::default(), &mut transport, &TickInput::default());
    assert_eq!(state.phase, GamePhase::Over(RunOutcome::Won));
    assert_eq!(
        FrameView::from_state(&state).hud.end_message,
        Some("You survived until the end! You win!")
    );
}

#[test]
fn builtin_schedule_is_deterministic() {
    let play = |seed: u64| {
        let json = include_str!("../assets/waves.json");
        let mut run = Run::new(json, seed, 75.0);
        for frame in 0..75 * 60 + 60 {
            let t = frame as f32 / 60.0;
            let pointer = Vec2::new(640.0 + t.sin() * 300.0, 360.0 + (t * 0.7).cos() * 150.0);
            run.step(TickInput {
                pointer: Some(pointer),
                hold: frame % 200 < 80,
                buy_particles: true,
                ..Default::default()
            });
            if run.state.is_over() {
                break;
            }
        }
        (run.state.phase, run.state.time_ticks, run.state.economy.clone())
    };

    let a = play(42);
    let b = play(42);
    assert_eq!(a, b);
    assert!(matches!(a.0, GamePhase::Over(_)));
}

#[test]
fn focus_pause_then_restart() {
    let mut run = Run::new(r#"[{ "time": 0, "x": 100, "y": 100, "type": "bouncer" }]"#, 8, 30.0);
    for _ in 0..30 {
        run.step(TickInput::default());
    }
    let elapsed = run.state.elapsed;

    focus_lost(&mut run.state, &mut run.transport);
    for _ in 0..30 {
        run.step(TickInput::default());
    }
    assert_eq!(run.state.elapsed, elapsed);
    focus_gained(&mut run.state, &mut run.transport);
    run.step(TickInput::default());
    assert!(run.state.elapsed > elapsed);

    start_run(&mut run.state, &mut run.transport);
    assert_eq!(run.state.phase, GamePhase::Playing);
    assert!(run.state.enemies.is_empty());
    assert!(run.state.spawned_waves.is_empty());
    assert_eq!(run.state.time_ticks, 0);
}

#[test]
fn schedule_errors_are_descriptive() {
    let err = Schedule::from_json(r#"[{ "time": 0, "pattern": "spiral" }]"#).unwrap_err();
    assert!(err.to_string().contains("spiral"));

    let err = Schedule::from_json(r#"[{ "time": 0, "x": "player.z + 1" }]"#).unwrap_err();
    assert!(matches!(err, ScheduleError::Formula { axis: 'x', .. }));

    let err = Schedule::from_json(r#"[{ "time": 0, "pattern": "circle" }]"#).unwrap_err();
    assert!(err.to_string().contains("count"));
}
