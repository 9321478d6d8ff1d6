//! Target selection with lock hysteresis.
//!
//! The selector is a two-state machine. While unlocked it ranks every live,
//! not-yet-missed track and reports the best one; once that candidate reaches
//! the lock line its id is locked and every other candidate is ignored until
//! the locked track disappears or falls past the drop line.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::tracker::config::TrackerConfig;
use crate::tracker::point_tracker::TrackerState;
use crate::tracker::track::Track;

/// How unlocked candidates are ranked. Both orders break ties on distance to
/// the collection line, then on the lower id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// Soonest estimated arrival at the collection line.
    #[default]
    TimeToReach,
    /// Smallest vertical distance to the collection line.
    NearestToLine,
}

/// Selector state carried across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub locked_id: Option<u64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked_id.is_some()
    }
}

/// The track chosen this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    /// Estimated seconds until the track reaches the collection line
    pub time_to_reach: f64,
    /// Whether the target is held by the lock
    pub locked: bool,
    /// Whether the target is close enough to the collection line to pursue
    pub in_range: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selector {
    pub collection_y: f64,
    pub lock_threshold_y: f64,
    pub drop_threshold_y: f64,
    pub pursuit_margin: f64,
    pub default_speed: f64,
    pub ranking: Ranking,
}

impl Selector {
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            collection_y: config.collection_y,
            lock_threshold_y: config.lock_threshold_y,
            drop_threshold_y: config.drop_threshold_y,
            pursuit_margin: config.pursuit_margin,
            default_speed: config.default_speed,
            ranking: config.ranking,
        }
    }

    /// Vertical distance between a track and the collection line.
    #[inline]
    pub fn line_distance(&self, track: &Track) -> f64 {
        (self.collection_y - track.y()).abs()
    }

    /// Seconds until `track` reaches the collection line, using the default
    /// speed when the track's own speed is unknown.
    pub fn time_to_reach(&self, track: &Track) -> f64 {
        let speed = track
            .velocity
            .filter(|v| *v > 0.0)
            .unwrap_or(self.default_speed);
        self.line_distance(track) / speed
    }

    /// Whether the track has fallen past the point it can be caught.
    #[inline]
    pub fn is_missed(&self, track: &Track) -> bool {
        track.y() >= self.drop_threshold_y
    }

    #[inline]
    pub fn in_range(&self, track: &Track) -> bool {
        self.collection_y - track.y() <= self.pursuit_margin
    }

    fn rank(&self, a: &Track, b: &Track) -> Ordering {
        let by_line = self
            .line_distance(a)
            .total_cmp(&self.line_distance(b))
            .then(a.id.cmp(&b.id));
        match self.ranking {
            Ranking::TimeToReach => self
                .time_to_reach(a)
                .total_cmp(&self.time_to_reach(b))
                .then(by_line),
            Ranking::NearestToLine => by_line,
        }
    }

    fn target(&self, track: &Track, locked: bool) -> Target {
        Target {
            id: track.id,
            x: track.x(),
            y: track.y(),
            time_to_reach: self.time_to_reach(track),
            locked,
            in_range: self.in_range(track),
        }
    }

    /// Choose at most one target among the live tracks.
    ///
    /// A stale lock is released before anything else, even while paused.
    /// Nothing is selected while `paused`.
    pub fn select(
        &self,
        state: &mut SelectionState,
        tracks: &TrackerState,
        paused: bool,
    ) -> Option<Target> {
        if let Some(id) = state.locked_id {
            match tracks.get(id) {
                Some(track) if !self.is_missed(track) => {
                    if paused {
                        return None;
                    }
                    return Some(self.target(track, true));
                }
                Some(track) => {
                    tracing::info!(id, y = track.y(), "lock released: target missed");
                    state.locked_id = None;
                }
                None => {
                    tracing::info!(id, "lock released: target lost");
                    state.locked_id = None;
                }
            }
        }

        if paused {
            return None;
        }

        let best = tracks
            .tracks()
            .values()
            .filter(|t| !self.is_missed(t))
            .min_by(|a, b| self.rank(a, b))?;

        let locked = best.y() >= self.lock_threshold_y;
        if locked {
            state.locked_id = Some(best.id);
            tracing::info!(id = best.id, y = best.y(), "target locked");
        }
        Some(self.target(best, locked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::matching::Detection;
    use crate::tracker::point::DistanceMetric;
    use crate::tracker::point_tracker::Association;

    const ASSOC: Association = Association {
        max_distance: 60.0,
        metric: DistanceMetric::Euclidean,
    };

    fn feed(tracks: &mut TrackerState, points: &[(f64, f64)]) {
        let frame = tracks.next_frame();
        let dets: Vec<Detection> = points
            .iter()
            .map(|&(x, y)| Detection::new(x, y, frame))
            .collect();
        tracks.update(&dets, &ASSOC);
    }

    fn selector() -> Selector {
        Selector::from_config(&TrackerConfig::default())
    }

    #[test]
    fn test_empty_tracks_no_target() {
        let mut state = SelectionState::new();
        let tracks = TrackerState::new();
        assert_eq!(selector().select(&mut state, &tracks, false), None);
    }

    #[test]
    fn test_closest_arrival_wins() {
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();
        feed(&mut tracks, &[(100.0, 300.0), (400.0, 800.0)]);

        let target = selector().select(&mut state, &tracks, false).unwrap();
        assert_eq!(target.id, 1);
        assert_eq!(target.x, 400.0);
        assert!(!target.locked);
        assert!(target.in_range);
        assert_eq!(state.locked_id, None);
    }

    #[test]
    fn test_known_speed_beats_distance() {
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();
        feed(&mut tracks, &[(100.0, 300.0), (400.0, 700.0)]);
        for track in tracks.tracks_mut() {
            track.velocity = Some(if track.id == 0 { 2000.0 } else { 100.0 });
        }

        // 650 / 2000 = 0.325s versus 250 / 100 = 2.5s
        let target = selector().select(&mut state, &tracks, false).unwrap();
        assert_eq!(target.id, 0);
    }

    #[test]
    fn test_nearest_to_line_ignores_speed() {
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();
        feed(&mut tracks, &[(100.0, 300.0), (400.0, 700.0)]);
        for track in tracks.tracks_mut() {
            track.velocity = Some(if track.id == 0 { 2000.0 } else { 100.0 });
        }

        let sel = Selector {
            ranking: Ranking::NearestToLine,
            ..selector()
        };
        assert_eq!(sel.select(&mut state, &tracks, false).unwrap().id, 1);
    }

    #[test]
    fn test_tie_breaks_on_lower_id() {
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();
        feed(&mut tracks, &[(400.0, 600.0), (100.0, 600.0)]);

        assert_eq!(selector().select(&mut state, &tracks, false).unwrap().id, 0);
    }

    #[test]
    fn test_out_of_range_target_reported_not_pursued() {
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();
        feed(&mut tracks, &[(100.0, 100.0)]);

        let target = selector().select(&mut state, &tracks, false).unwrap();
        assert!(!target.in_range);
    }

    #[test]
    fn test_lock_holds_against_better_candidate() {
        let sel = selector();
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();

        feed(&mut tracks, &[(300.0, 860.0)]);
        let a = sel.select(&mut state, &tracks, false).unwrap();
        assert!(a.locked);
        assert_eq!(state.locked_id, Some(a.id));

        // B is closer to the collection line but A stays locked.
        feed(&mut tracks, &[(300.0, 900.0), (700.0, 930.0)]);
        let held = sel.select(&mut state, &tracks, false).unwrap();
        assert_eq!(held.id, a.id);
        assert!(held.locked);

        feed(&mut tracks, &[(300.0, 955.0), (700.0, 940.0)]);
        assert!(tracks.get(a.id).is_some());
        let next = sel.select(&mut state, &tracks, false).unwrap();
        assert_ne!(next.id, a.id);
        assert_eq!(state.locked_id, Some(next.id));
    }

    #[test]
    fn test_lock_released_when_track_vanishes() {
        let sel = selector();
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();

        feed(&mut tracks, &[(300.0, 860.0)]);
        sel.select(&mut state, &tracks, false);
        assert!(state.is_locked());

        feed(&mut tracks, &[]);
        assert_eq!(sel.select(&mut state, &tracks, true), None);
        assert!(!state.is_locked());
    }

    #[test]
    fn test_paused_selects_nothing_but_keeps_lock() {
        let sel = selector();
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();

        feed(&mut tracks, &[(300.0, 860.0)]);
        sel.select(&mut state, &tracks, false);

        feed(&mut tracks, &[(300.0, 860.0)]);
        assert_eq!(sel.select(&mut state, &tracks, true), None);
        assert!(state.is_locked());
    }

    #[test]
    fn test_missed_tracks_never_selected() {
        let mut state = SelectionState::new();
        let mut tracks = TrackerState::new();
        feed(&mut tracks, &[(300.0, 960.0)]);

        assert_eq!(selector().select(&mut state, &tracks, false), None);
    }
}
