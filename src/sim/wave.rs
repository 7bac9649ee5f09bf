//! Wave schedule
//!
//! The schedule is a time-ordered JSON list of wave descriptors. Everything
//! is validated up front: unknown patterns or enemy kinds, missing pattern
//! parameters and bad position formulas are load errors, never silent
//! no-ops during a run.

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec2;
use serde::Deserialize;

use super::expr::{Expr, ExprError};
use super::state::{ChargerTuning, EnemyKind};
use crate::consts::*;

/// Built-in schedule shipped with the game
const BUILTIN_SCHEDULE: &str = include_str!("../../assets/waves.json");

/// Spawn coordinate on one axis
#[derive(Debug, Clone, PartialEq)]
pub enum Coord {
    /// Uniformly random over the field
    Random,
    Literal(f32),
    /// Evaluated against the player's position when resolved
    Formula(Expr),
}

impl Coord {
    /// Resolve against the player, using `random` for unset coordinates
    pub fn resolve(&self, player: Vec2, random: f32) -> f32 {
        match self {
            Coord::Random => random,
            Coord::Literal(v) => *v,
            Coord::Formula(expr) => expr.eval(player),
        }
    }
}

/// Spawn layout
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// One enemy at the anchor
    Single,
    Line { count: u32, dir: Vec2, spacing: f32 },
    Column { count: u32, spacing: f32 },
    Circle { count: u32, radius: f32 },
    Grid { rows: u32, cols: u32, spacing: Vec2 },
    /// Ring around the player rather than the anchor
    Surround { count: u32, radius: f32 },
}

impl Pattern {
    /// Concrete spawn positions for this pattern
    pub fn expand(&self, anchor: Vec2, player: Vec2) -> Vec<Vec2> {
        match *self {
            Pattern::Single => vec![anchor],
            Pattern::Line {
                count,
                dir,
                spacing,
            } => (0..count)
                .map(|i| anchor + dir * spacing * i as f32)
                .collect(),
            Pattern::Column { count, spacing } => (0..count)
                .map(|i| anchor + Vec2::new(0.0, spacing * i as f32))
                .collect(),
            Pattern::Circle { count, radius } => ring(anchor, count, radius),
            Pattern::Grid {
                rows,
                cols,
                spacing,
            } => (0..rows)
                .flat_map(|r| {
                    (0..cols).map(move |c| anchor + Vec2::new(c as f32, r as f32) * spacing)
                })
                .collect(),
            Pattern::Surround { count, radius } => ring(player, count, radius),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Single => "single",
            Pattern::Line { .. } => "line",
            Pattern::Column { .. } => "column",
            Pattern::Circle { .. } => "circle",
            Pattern::Grid { .. } => "grid",
            Pattern::Surround { .. } => "surround",
        }
    }
}

fn ring(center: Vec2, count: u32, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            center + crate::polar_to_cartesian(radius, angle)
        })
        .collect()
}

/// Non-positional enemy fields shared by every spawn of a wave
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    pub split_base: Option<EnemyKind>,
    /// Random in [10, 20) when unset
    pub size: Option<f32>,
    /// Random in [1, 2) when unset
    pub speed: Option<f32>,
    /// Random in [-1, 1) when unset
    pub dx: Option<f32>,
    pub dy: Option<f32>,
    pub health: u32,
    pub reward: u32,
    pub shield: u32,
    pub aura_radius: f32,
    pub invulnerable: bool,
    /// Starting orbiter heading
    pub angle: f32,
    pub charger: ChargerTuning,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            kind: EnemyKind::Homing,
            split_base: None,
            size: None,
            speed: None,
            dx: None,
            dy: None,
            health: 1,
            reward: 1,
            shield: 0,
            aura_radius: 0.0,
            invulnerable: false,
            angle: 0.0,
            charger: ChargerTuning::default(),
        }
    }
}

impl EnemyTemplate {
    /// Homing child left behind by a dying splitter
    pub fn split_child(parent_size: f32) -> Self {
        Self {
            kind: EnemyKind::Homing,
            size: Some(parent_size / 2.0),
            speed: Some(SPLIT_CHILD_SPEED),
            health: 1,
            reward: SPLIT_CHILD_REWARD,
            ..Self::default()
        }
    }

    /// Size drawn for previews when the real size is rolled at spawn
    pub fn preview_size(&self) -> f32 {
        self.size.unwrap_or(15.0)
    }
}

/// One scheduled wave
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    /// Track time in seconds
    pub time: f64,
    pub pattern: Pattern,
    pub x: Coord,
    pub y: Coord,
    pub template: EnemyTemplate,
}

impl Wave {
    /// Whether the anchor needs a rolled random coordinate
    pub fn needs_random_anchor(&self) -> bool {
        matches!(self.x, Coord::Random) || matches!(self.y, Coord::Random)
    }

    /// Check the ranges the simulation relies on
    pub fn validate(&self, index: usize) -> Result<(), ScheduleError> {
        let invalid = |param: &'static str, reason: &'static str| -> Result<(), ScheduleError> {
            Err(ScheduleError::InvalidParam {
                index,
                param,
                reason,
            })
        };

        if !self.time.is_finite() || self.time < 0.0 {
            return invalid("time", "must be a non-negative number");
        }
        let empty = match self.pattern {
            Pattern::Single => None,
            Pattern::Line { count, .. }
            | Pattern::Column { count, .. }
            | Pattern::Circle { count, .. }
            | Pattern::Surround { count, .. } => (count == 0).then_some("count"),
            Pattern::Grid { rows, cols, .. } => {
                (rows == 0).then_some("rows").or((cols == 0).then_some("cols"))
            }
        };
        if let Some(param) = empty {
            return invalid(param, "must be at least 1");
        }

        let template = &self.template;
        if template.health == 0 {
            return invalid("health", "must be at least 1");
        }
        if template.size.is_some_and(|size| !(size > 0.0 && size.is_finite())) {
            return invalid("size", "must be positive");
        }
        if template.kind == EnemyKind::Splitter && template.split_base == Some(EnemyKind::Splitter)
        {
            return Err(ScheduleError::InvalidSplitBase {
                index,
                reason: "a splitter cannot move like a splitter",
            });
        }

        let charges = template.kind == EnemyKind::Charger
            || (template.kind == EnemyKind::Splitter
                && template.split_base == Some(EnemyKind::Charger));
        if charges {
            let charger = &template.charger;
            if !(charger.dash_length > 0.0 && charger.dash_length.is_finite()) {
                return invalid("dashLength", "must be positive");
            }
            if !(charger.telegraph_ms > 0.0 && charger.telegraph_ms.is_finite()) {
                return invalid("telegraphTime", "must be positive");
            }
            if !(charger.cooldown_ms >= 0.0 && charger.cooldown_ms.is_finite()) {
                return invalid("dashCooldown", "must be a non-negative number");
            }
            // A stationary dash never covers its length
            if template.speed.is_some_and(|speed| speed <= 0.0) {
                return invalid("speed", "must be positive for chargers");
            }
        }
        Ok(())
    }

    /// Whether spawn positions depend on where the player is
    pub fn follows_player(&self) -> bool {
        let formula = |c: &Coord| matches!(c, Coord::Formula(e) if e.depends_on_player());
        matches!(self.pattern, Pattern::Surround { .. }) || formula(&self.x) || formula(&self.y)
    }
}

/// Schedule load failure
#[derive(Debug)]
pub enum ScheduleError {
    Json(serde_json::Error),
    UnknownPattern {
        index: usize,
        pattern: String,
    },
    UnknownEnemyKind {
        index: usize,
        kind: String,
    },
    MissingParam {
        index: usize,
        pattern: &'static str,
        param: &'static str,
    },
    InvalidParam {
        index: usize,
        param: &'static str,
        reason: &'static str,
    },
    Formula {
        index: usize,
        axis: char,
        err: ExprError,
    },
    InvalidSplitBase {
        index: usize,
        reason: &'static str,
    },
    Unsorted {
        index: usize,
        time: f64,
        previous: f64,
    },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid schedule json: {err}"),
            Self::UnknownPattern { index, pattern } => {
                write!(f, "wave {index}: unknown pattern '{pattern}'")
            }
            Self::UnknownEnemyKind { index, kind } => {
                write!(f, "wave {index}: unknown enemy type '{kind}'")
            }
            Self::MissingParam {
                index,
                pattern,
                param,
            } => write!(f, "wave {index}: {pattern} pattern requires '{param}'"),
            Self::InvalidParam {
                index,
                param,
                reason,
            } => write!(f, "wave {index}: '{param}' {reason}"),
            Self::Formula { index, axis, err } => {
                write!(f, "wave {index}: bad {axis} formula: {err}")
            }
            Self::InvalidSplitBase { index, reason } => {
                write!(f, "wave {index}: invalid splitter base: {reason}")
            }
            Self::Unsorted {
                index,
                time,
                previous,
            } => write!(
                f,
                "wave {index}: time {time} is earlier than previous wave at {previous}"
            ),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Formula { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCoord {
    Num(f32),
    Formula(String),
}

/// Wave descriptor as written in the schedule file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawWave {
    time: f64,
    pattern: Option<String>,
    count: Option<u32>,
    spacing: Option<f32>,
    dx: Option<f32>,
    dy: Option<f32>,
    radius: Option<f32>,
    rows: Option<u32>,
    cols: Option<u32>,
    spacing_x: Option<f32>,
    spacing_y: Option<f32>,
    x: Option<RawCoord>,
    y: Option<RawCoord>,
    #[serde(rename = "type")]
    kind: Option<String>,
    base: Option<String>,
    size: Option<f32>,
    speed: Option<f32>,
    health: Option<u32>,
    reward: Option<u32>,
    shield: Option<u32>,
    aura_radius: Option<f32>,
    invulnerable: Option<bool>,
    angle: Option<f32>,
    dash_length: Option<f32>,
    dash_cooldown: Option<f64>,
    telegraph_time: Option<f64>,
}

fn parse_coord(index: usize, axis: char, raw: Option<RawCoord>) -> Result<Coord, ScheduleError> {
    match raw {
        None => Ok(Coord::Random),
        Some(RawCoord::Num(v)) => Ok(Coord::Literal(v)),
        Some(RawCoord::Formula(src)) => Expr::parse(&src)
            .map(Coord::Formula)
            .map_err(|err| ScheduleError::Formula { index, axis, err }),
    }
}

fn parse_kind(index: usize, name: &str) -> Result<EnemyKind, ScheduleError> {
    EnemyKind::from_name(name).ok_or_else(|| ScheduleError::UnknownEnemyKind {
        index,
        kind: name.to_string(),
    })
}

fn positive_count(
    index: usize,
    pattern: &'static str,
    param: &'static str,
    value: Option<u32>,
) -> Result<u32, ScheduleError> {
    match value {
        None => Err(ScheduleError::MissingParam {
            index,
            pattern,
            param,
        }),
        Some(0) => Err(ScheduleError::InvalidParam {
            index,
            param,
            reason: "must be at least 1",
        }),
        Some(n) => Ok(n),
    }
}

fn finite(index: usize, param: &'static str, value: f32) -> Result<f32, ScheduleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScheduleError::InvalidParam {
            index,
            param,
            reason: "must be a finite number",
        })
    }
}

impl RawWave {
    /// Ranges are checked afterwards by [`Wave::validate`]
    fn into_wave(self, index: usize) -> Result<Wave, ScheduleError> {
        let pattern = match self.pattern.as_deref() {
            None | Some("single") => Pattern::Single,
            Some("line") => Pattern::Line {
                count: positive_count(index, "line", "count", self.count)?,
                dir: Vec2::new(
                    finite(index, "dx", self.dx.unwrap_or(1.0))?,
                    finite(index, "dy", self.dy.unwrap_or(0.0))?,
                ),
                spacing: finite(index, "spacing", self.spacing.unwrap_or(50.0))?,
            },
            Some("column") => Pattern::Column {
                count: positive_count(index, "column", "count", self.count)?,
                spacing: finite(index, "spacing", self.spacing.unwrap_or(50.0))?,
            },
            Some("circle") => Pattern::Circle {
                count: positive_count(index, "circle", "count", self.count)?,
                radius: finite(index, "radius", self.radius.unwrap_or(100.0))?,
            },
            Some("grid") => Pattern::Grid {
                rows: positive_count(index, "grid", "rows", Some(self.rows.unwrap_or(3)))?,
                cols: positive_count(index, "grid", "cols", Some(self.cols.unwrap_or(3)))?,
                spacing: Vec2::new(
                    finite(index, "spacingX", self.spacing_x.unwrap_or(50.0))?,
                    finite(index, "spacingY", self.spacing_y.unwrap_or(50.0))?,
                ),
            },
            Some("surround") => Pattern::Surround {
                count: positive_count(index, "surround", "count", Some(self.count.unwrap_or(6)))?,
                radius: finite(index, "radius", self.radius.unwrap_or(150.0))?,
            },
            Some(other) => {
                return Err(ScheduleError::UnknownPattern {
                    index,
                    pattern: other.to_string(),
                });
            }
        };

        let kind = match self.kind.as_deref() {
            Some(name) => parse_kind(index, name)?,
            None => EnemyKind::Homing,
        };
        let split_base = match (kind, self.base.as_deref()) {
            (_, None) => None,
            (EnemyKind::Splitter, Some(name)) => match parse_kind(index, name)? {
                EnemyKind::Splitter => {
                    return Err(ScheduleError::InvalidSplitBase {
                        index,
                        reason: "a splitter cannot move like a splitter",
                    });
                }
                base => Some(base),
            },
            (_, Some(_)) => {
                return Err(ScheduleError::InvalidSplitBase {
                    index,
                    reason: "'base' is only valid for splitters",
                });
            }
        };

        let defaults = ChargerTuning::default();
        let template = EnemyTemplate {
            kind,
            split_base,
            size: self.size,
            speed: self.speed.map(|s| finite(index, "speed", s)).transpose()?,
            dx: self.dx.map(|v| finite(index, "dx", v)).transpose()?,
            dy: self.dy.map(|v| finite(index, "dy", v)).transpose()?,
            health: self.health.unwrap_or(1),
            reward: self.reward.unwrap_or(1),
            shield: self.shield.unwrap_or(0),
            aura_radius: finite(index, "auraRadius", self.aura_radius.unwrap_or(0.0))?,
            invulnerable: self.invulnerable.unwrap_or(false),
            angle: finite(index, "angle", self.angle.unwrap_or(0.0))?,
            charger: ChargerTuning {
                dash_length: self.dash_length.unwrap_or(defaults.dash_length),
                cooldown_ms: self.dash_cooldown.unwrap_or(defaults.cooldown_ms),
                telegraph_ms: self.telegraph_time.unwrap_or(defaults.telegraph_ms),
            },
        };

        Ok(Wave {
            time: self.time,
            pattern,
            x: parse_coord(index, 'x', self.x)?,
            y: parse_coord(index, 'y', self.y)?,
            template,
        })
    }
}

/// Validated, time-ordered wave list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    waves: Vec<Wave>,
}

impl Schedule {
    /// Build from already-constructed waves, checking each wave and the ordering
    pub fn new(waves: Vec<Wave>) -> Result<Self, ScheduleError> {
        for (index, wave) in waves.iter().enumerate() {
            wave.validate(index)?;
        }
        for (index, pair) in waves.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(ScheduleError::Unsorted {
                    index: index + 1,
                    time: pair[1].time,
                    previous: pair[0].time,
                });
            }
        }
        Ok(Self { waves })
    }

    /// Parse and validate a JSON schedule
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let raw: Vec<RawWave> = serde_json::from_str(json)?;
        let waves = raw
            .into_iter()
            .enumerate()
            .map(|(index, wave)| wave.into_wave(index))
            .collect::<Result<Vec<_>, _>>()?;
        let schedule = Self::new(waves)?;
        log::info!(
            "Loaded schedule: {} waves ({} player-relative), last at {:.2}s",
            schedule.len(),
            schedule.waves.iter().filter(|w| w.follows_player()).count(),
            schedule.last_time()
        );
        Ok(schedule)
    }

    /// The schedule embedded in the binary
    pub fn builtin() -> Result<Self, ScheduleError> {
        Self::from_json(BUILTIN_SCHEDULE)
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Trigger time of the last wave
    pub fn last_time(&self) -> f64 {
        self.waves.last().map(|w| w.time).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_line_pattern() {
        let line = Pattern::Line {
            count: 3,
            dir: Vec2::new(1.0, 0.0),
            spacing: 50.0,
        };
        assert_eq!(
            line.expand(Vec2::new(100.0, 100.0), Vec2::ZERO),
            vec![
                Vec2::new(100.0, 100.0),
                Vec2::new(150.0, 100.0),
                Vec2::new(200.0, 100.0)
            ]
        );
    }

    #[test]
    fn test_circle_pattern() {
        let circle = Pattern::Circle {
            count: 4,
            radius: 100.0,
        };
        let pts = circle.expand(Vec2::ZERO, Vec2::new(500.0, 500.0));
        let expected = [
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(-100.0, 0.0),
            Vec2::new(0.0, -100.0),
        ];
        assert_eq!(pts.len(), 4);
        for (p, e) in pts.iter().zip(expected) {
            assert!(approx(*p, e), "{p} != {e}");
        }
    }

    #[test]
    fn test_grid_column_and_surround() {
        let grid = Pattern::Grid {
            rows: 2,
            cols: 3,
            spacing: Vec2::new(10.0, 20.0),
        };
        let pts = grid.expand(Vec2::new(1.0, 1.0), Vec2::ZERO);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Vec2::new(1.0, 1.0));
        assert_eq!(pts[2], Vec2::new(21.0, 1.0));
        assert_eq!(pts[5], Vec2::new(21.0, 21.0));

        let column = Pattern::Column {
            count: 3,
            spacing: 50.0,
        };
        assert_eq!(
            column.expand(Vec2::new(5.0, 0.0), Vec2::ZERO)[2],
            Vec2::new(5.0, 100.0)
        );

        // Surround ignores the anchor and rings the player
        let surround = Pattern::Surround {
            count: 6,
            radius: 150.0,
        };
        let player = Vec2::new(400.0, 300.0);
        for p in surround.expand(Vec2::new(9999.0, 9999.0), player) {
            assert!((p.distance(player) - 150.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_parse_defaults() {
        let schedule = Schedule::from_json(
            r#"[
                { "time": 1.0 },
                { "time": 2.0, "pattern": "line", "count": 3, "x": 100, "y": "player.y - 50",
                  "type": "wander", "health": 2 },
                { "time": 3.0, "pattern": "surround", "type": "charger", "dashLength": 120 }
            ]"#,
        )
        .unwrap();
        assert_eq!(schedule.len(), 3);

        let single = &schedule.waves()[0];
        assert_eq!(single.pattern, Pattern::Single);
        assert_eq!(single.x, Coord::Random);
        assert_eq!(single.template.kind, EnemyKind::Homing);
        assert_eq!(single.template.health, 1);
        assert_eq!(single.template.reward, 1);

        let line = &schedule.waves()[1];
        assert_eq!(
            line.pattern,
            Pattern::Line {
                count: 3,
                dir: Vec2::new(1.0, 0.0),
                spacing: 50.0
            }
        );
        assert_eq!(line.x, Coord::Literal(100.0));
        assert_eq!(line.y.resolve(Vec2::new(0.0, 300.0), 0.0), 250.0);
        assert_eq!(line.template.kind, EnemyKind::Wander);

        let surround = &schedule.waves()[2];
        assert_eq!(
            surround.pattern,
            Pattern::Surround {
                count: 6,
                radius: 150.0
            }
        );
        assert_eq!(surround.template.charger.dash_length, 120.0);
        assert_eq!(surround.template.charger.cooldown_ms, CHARGER_COOLDOWN_MS);
    }

    #[test]
    fn test_load_errors_fail_fast() {
        let err = Schedule::from_json(r#"[{ "time": 1, "pattern": "spiral", "count": 2 }]"#)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownPattern { index: 0, .. }));

        let err = Schedule::from_json(r#"[{ "time": 1 }, { "time": 2, "pattern": "line" }]"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::MissingParam {
                index: 1,
                param: "count",
                ..
            }
        ));

        let err = Schedule::from_json(r#"[{ "time": 1, "type": "dragon" }]"#).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownEnemyKind { .. }));

        let err = Schedule::from_json(r#"[{ "time": 1, "x": "window.innerWidth" }]"#).unwrap_err();
        assert!(matches!(err, ScheduleError::Formula { axis: 'x', .. }));
        assert!(err.to_string().contains("window.innerWidth"));

        let err = Schedule::from_json(r#"[{ "time": 5 }, { "time": 2 }]"#).unwrap_err();
        assert!(matches!(err, ScheduleError::Unsorted { index: 1, .. }));

        let err = Schedule::from_json(r#"[{ "time": 1, "type": "homing", "base": "wander" }]"#)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSplitBase { .. }));

        let err = Schedule::from_json(r#"[{ "time": 1, "colour": "red" }]"#).unwrap_err();
        assert!(matches!(err, ScheduleError::Json(_)));

        let err = Schedule::from_json(r#"[{ "time": 1, "health": 0 }]"#).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidParam { param: "health", .. }));
    }

    #[test]
    fn test_new_validates_built_waves() {
        let wave = |pattern, template| Wave {
            time: 1.0,
            pattern,
            x: Coord::Literal(10.0),
            y: Coord::Literal(10.0),
            template,
        };

        let err = Schedule::new(vec![wave(
            Pattern::Single,
            EnemyTemplate {
                health: 0,
                ..EnemyTemplate::default()
            },
        )])
        .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidParam { param: "health", .. }));

        let err = Schedule::new(vec![
            wave(Pattern::Single, EnemyTemplate::default()),
            wave(
                Pattern::Grid {
                    rows: 2,
                    cols: 0,
                    spacing: Vec2::splat(50.0),
                },
                EnemyTemplate::default(),
            ),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InvalidParam {
                index: 1,
                param: "cols",
                ..
            }
        ));

        assert!(Schedule::new(vec![wave(Pattern::Single, EnemyTemplate::default())]).is_ok());
    }

    #[test]
    fn test_charger_ranges_checked() {
        let param = |json: &str| match Schedule::from_json(json) {
            Err(ScheduleError::InvalidParam { param, .. }) => param,
            other => panic!("expected InvalidParam, got {other:?}"),
        };

        assert_eq!(
            param(r#"[{ "time": 0, "type": "charger", "dashLength": 0 }]"#),
            "dashLength"
        );
        assert_eq!(
            param(r#"[{ "time": 0, "type": "charger", "telegraphTime": -5 }]"#),
            "telegraphTime"
        );
        assert_eq!(
            param(r#"[{ "time": 0, "type": "charger", "dashCooldown": -1 }]"#),
            "dashCooldown"
        );
        assert_eq!(
            param(r#"[{ "time": 0, "type": "charger", "speed": 0 }]"#),
            "speed"
        );
        assert_eq!(
            param(r#"[{ "time": 0, "type": "splitter", "base": "charger", "speed": 0 }]"#),
            "speed"
        );

        // Only chargers need to move to finish a dash
        assert!(Schedule::from_json(r#"[{ "time": 0, "type": "homing", "speed": 0 }]"#).is_ok());
        assert!(Schedule::from_json(r#"[{ "time": 0, "type": "charger", "dashCooldown": 0 }]"#)
            .is_ok());
    }

    #[test]
    fn test_follows_player() {
        let schedule = Schedule::from_json(
            r#"[
                { "time": 0, "x": 10, "y": "5 * 2" },
                { "time": 1, "x": "player.x + 10", "y": 0 },
                { "time": 2, "pattern": "surround" }
            ]"#,
        )
        .unwrap();
        let follows: Vec<bool> = schedule.waves().iter().map(Wave::follows_player).collect();
        assert_eq!(follows, [false, true, true]);
    }

    #[test]
    fn test_builtin_schedule_loads() {
        let schedule = Schedule::builtin().unwrap();
        assert!(!schedule.is_empty());
        let kinds: std::collections::BTreeSet<_> =
            schedule.waves().iter().map(|w| w.template.kind).collect();
        assert_eq!(kinds.len(), EnemyKind::ALL.len());
    }
}
