//! Stall detection on the detection stream.
//!
//! Two signals are available. The motion signal flags a pause when every
//! matched track sits at exactly the same `y` as in the previous frame, and
//! clears on the first frame where any matched track moves. The interval
//! signal assumes pauses arrive on a schedule: once `check_interval` seconds
//! have passed since the last pause, the stream is treated as paused for
//! `hold` seconds.

use serde::{Deserialize, Serialize};

use crate::tracker::point_tracker::TrackerState;

/// Which pause signals are active.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PausePolicy {
    /// Never pause.
    Disabled,
    /// Pause while tracked positions are frozen.
    #[default]
    Motion,
    /// Pause for `hold` seconds every `check_interval` seconds.
    Interval { check_interval: f64, hold: f64 },
    /// Paused while either signal is raised. A motion pause restarts the
    /// interval clock.
    Both { check_interval: f64, hold: f64 },
}

/// Pause flag plus the bookkeeping behind it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PauseState {
    pub is_paused: bool,
    /// Timestamp of the last change of `is_paused`; `None` before the first
    /// observation.
    pub last_change_timestamp: Option<f64>,
    motion_paused: bool,
    interval_paused: bool,
    interval_anchor: Option<f64>,
}

impl PauseState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Frozen-motion check over this frame's matched tracks.
///
/// `None` when no track was matched, since nothing can be compared.
fn motion_stalled(tracks: &TrackerState) -> Option<bool> {
    let mut any = false;
    for track in tracks.tracks().values().filter(|t| t.is_matched()) {
        let Some(prev) = track.previous_position else {
            continue;
        };
        any = true;
        if prev.y.to_bits() != track.position.y.to_bits() {
            return Some(false);
        }
    }
    any.then_some(true)
}

/// Applies a [`PausePolicy`] to each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseMonitor {
    policy: PausePolicy,
}

impl PauseMonitor {
    pub fn new(policy: PausePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PausePolicy {
        self.policy
    }

    /// Update `state` from this tick's tracks and return the pause flag.
    pub fn observe(&self, state: &mut PauseState, tracks: &TrackerState, now: f64) -> bool {
        if state.last_change_timestamp.is_none() {
            state.last_change_timestamp = Some(now);
        }

        let (use_motion, interval) = match self.policy {
            PausePolicy::Disabled => (false, None),
            PausePolicy::Motion => (true, None),
            PausePolicy::Interval {
                check_interval,
                hold,
            } => (false, Some((check_interval, hold))),
            PausePolicy::Both {
                check_interval,
                hold,
            } => (true, Some((check_interval, hold))),
        };

        if use_motion {
            let was = state.motion_paused;
            if let Some(stalled) = motion_stalled(tracks) {
                state.motion_paused = stalled;
            }
            if state.motion_paused && !was {
                // A detected pause restarts the schedule.
                state.interval_anchor = Some(now);
                state.interval_paused = false;
            }
        }

        if let Some((check_interval, hold)) = interval {
            let anchor = *state.interval_anchor.get_or_insert(now);
            let since = now - anchor;
            if state.interval_paused {
                if since >= hold {
                    state.interval_paused = false;
                    state.interval_anchor = Some(now);
                }
            } else if since >= check_interval {
                state.interval_paused = true;
                state.interval_anchor = Some(now);
            }
        }

        let paused = state.motion_paused || state.interval_paused;
        if paused != state.is_paused {
            state.is_paused = paused;
            state.last_change_timestamp = Some(now);
            if paused {
                tracing::info!(now, "detection stream paused");
            } else {
                tracing::info!(now, "detection stream resumed");
            }
        }
        paused
    }
}
