//! One tick of the core: dedup, track, pause check, speed update, select.

use crate::error::Result;
use crate::tracker::config::TrackerConfig;
use crate::tracker::dedup::deduplicate;
use crate::tracker::matching::Detection;
use crate::tracker::pause::{PauseMonitor, PauseState};
use crate::tracker::point::Position;
use crate::tracker::point_tracker::{Association, TrackerState};
use crate::tracker::selector::{SelectionState, Selector, Target};
use crate::tracker::velocity::VelocityEstimator;

/// All state carried from one tick to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    pub tracker: TrackerState,
    pub pause: PauseState,
    pub selection: SelectionState,
    last_timestamp: Option<f64>,
    last_paused: bool,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the last processed tick.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}

/// What the loop should do with the actuator this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Nothing to pursue.
    Idle,
    /// The stream is paused; nothing is selected.
    Paused,
    /// A target exists but is not yet within pursuit range.
    Track { id: u64, x: f64 },
    /// Move the actuator to `x`.
    Actuate { id: u64, x: f64 },
}

impl Action {
    /// The x-coordinate to actuate to, if any.
    pub fn actuation(&self) -> Option<f64> {
        match *self {
            Self::Actuate { x, .. } => Some(x),
            _ => None,
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub frame_index: u64,
    pub action: Action,
    pub target: Option<Target>,
    pub paused: bool,
    /// Raw detections received
    pub detections: usize,
    /// Live tracks after association
    pub tracks: usize,
}

/// Run one tick over `state`.
///
/// `raw` is this frame's detector output in any order, possibly with
/// duplicates or non-finite points. `now` is a monotonic timestamp in
/// seconds.
pub fn step(
    config: &TrackerConfig,
    state: &mut EngineState,
    raw: &[Position],
    now: f64,
) -> TickReport {
    let unique = deduplicate(raw, config.min_separation);

    let frame_index = state.tracker.next_frame();
    let detections: Vec<Detection> = unique
        .iter()
        .map(|&p| Detection::from_position(p, frame_index))
        .collect();
    let association = Association {
        max_distance: config.association_distance,
        metric: config.association_metric,
    };
    state.tracker.update(&detections, &association);

    let paused =
        PauseMonitor::new(config.pause).observe(&mut state.pause, &state.tracker, now);

    // Speeds need two consecutive running frames; otherwise the last known
    // value is kept.
    if !paused && !state.last_paused {
        let elapsed = state.last_timestamp.map_or(f64::NAN, |t| now - t);
        VelocityEstimator::new(config.min_speed, config.max_speed)
            .apply(&mut state.tracker, elapsed);
    }

    let target =
        Selector::from_config(config).select(&mut state.selection, &state.tracker, paused);

    let action = match target {
        _ if paused => Action::Paused,
        None => Action::Idle,
        Some(t) if t.in_range => Action::Actuate { id: t.id, x: t.x },
        Some(t) => Action::Track { id: t.id, x: t.x },
    };

    state.last_timestamp = Some(now);
    state.last_paused = paused;

    tracing::debug!(
        frame_index,
        raw = raw.len(),
        unique = unique.len(),
        tracks = state.tracker.tracks().len(),
        paused,
        locked = ?state.selection.locked_id,
        action = ?action,
        "tick"
    );

    TickReport {
        frame_index,
        action,
        target,
        paused,
        detections: raw.len(),
        tracks: state.tracker.tracks().len(),
    }
}

/// Pure form of [`step`]: consume the state and return the next one along
/// with the action.
pub fn tick(
    config: &TrackerConfig,
    mut state: EngineState,
    raw: &[Position],
    now: f64,
) -> (EngineState, Action) {
    let report = step(config, &mut state, raw, now);
    (state, report.action)
}

/// Validated configuration bundled with its state.
#[derive(Debug, Clone)]
pub struct Engine {
    config: TrackerConfig,
    state: EngineState,
}

impl Engine {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: EngineState::new(),
        })
    }

    pub fn step(&mut self, raw: &[Position], now: f64) -> TickReport {
        step(&self.config, &mut self.state, raw, now)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Forget all tracks, the lock and pause history. Ids keep increasing.
    pub fn reset(&mut self) {
        let tracker = std::mem::take(&mut self.state.tracker);
        self.state = EngineState::new();
        self.state.tracker = tracker.cleared();
    }
}
