//! Vertical speed estimation from matched positions.

use std::collections::BTreeMap;

use crate::tracker::point::Position;
use crate::tracker::point_tracker::TrackerState;

/// Estimates vertical speed from two consecutive positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityEstimator {
    /// Floor applied to every estimate; falling objects that have not moved
    /// yet are slow, not stalled.
    pub min_speed: f64,
    /// Estimates above this are treated as mismatched pairs and discarded.
    pub max_speed: f64,
}

impl VelocityEstimator {
    pub fn new(min_speed: f64, max_speed: f64) -> Self {
        Self {
            min_speed,
            max_speed,
        }
    }

    /// Speed in pixels per second, or `None` when it cannot be trusted.
    ///
    /// Returns `None` for a non-positive or non-finite `elapsed` and for
    /// speeds above `max_speed`. Negative and zero speeds are raised to
    /// `min_speed`.
    pub fn estimate(&self, previous_y: f64, current_y: f64, elapsed: f64) -> Option<f64> {
        if !(elapsed.is_finite() && elapsed > 0.0) {
            return None;
        }
        let speed = (current_y - previous_y) / elapsed;
        if !speed.is_finite() || speed > self.max_speed {
            return None;
        }
        Some(speed.max(self.min_speed))
    }

    /// Estimate speeds for every id present in both maps.
    ///
    /// Ids missing from the result have unknown speed.
    pub fn estimate_all(
        &self,
        previous: &BTreeMap<u64, Position>,
        current: &BTreeMap<u64, Position>,
        elapsed: f64,
    ) -> BTreeMap<u64, f64> {
        current
            .iter()
            .filter_map(|(id, cur)| {
                let prev = previous.get(id)?;
                self.estimate(prev.y, cur.y, elapsed).map(|s| (*id, s))
            })
            .collect()
    }

    /// Refresh the velocity of every matched track in place.
    ///
    /// New tracks stay unknown. A matched track whose estimate is rejected
    /// becomes unknown for this frame.
    pub fn apply(&self, state: &mut TrackerState, elapsed: f64) {
        for track in state.tracks_mut() {
            let Some(prev) = track.previous_position.filter(|_| track.is_matched()) else {
                track.velocity = None;
                continue;
            };
            track.velocity = self.estimate(prev.y, track.position.y, elapsed);
            if track.velocity.is_none() {
                tracing::debug!(
                    id = track.id,
                    dy = track.position.y - prev.y,
                    elapsed,
                    "speed discarded"
                );
            }
        }
    }
}
