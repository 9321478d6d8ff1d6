//! Frame-to-frame identity association.

use std::collections::BTreeMap;

use crate::tracker::matching::{self, AssignmentResult, Detection};
use crate::tracker::point::{DistanceMetric, Position};
use crate::tracker::track::Track;

/// Parameters controlling how detections inherit track ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Association {
    pub max_distance: f64,
    pub metric: DistanceMetric,
}

/// Live tracks and the id counter.
///
/// Ids are issued from `next_id` in increasing order and never reused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    tracks: BTreeMap<u64, Track>,
    next_id: u64,
    frame_index: u64,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live tracks keyed by id.
    pub fn tracks(&self) -> &BTreeMap<u64, Track> {
        &self.tracks
    }

    pub(crate) fn tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.values_mut()
    }

    pub fn get(&self, id: u64) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// The id the next new track will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Index of the most recently processed frame (0 before the first).
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Index the next call to [`update`](Self::update) will process.
    pub fn next_frame(&self) -> u64 {
        self.frame_index + 1
    }

    /// Current position of every live track.
    pub fn positions(&self) -> BTreeMap<u64, Position> {
        self.tracks
            .iter()
            .map(|(&id, t)| (id, t.position))
            .collect()
    }

    /// Drop every live track while keeping the id counter and frame index.
    pub fn cleared(self) -> Self {
        Self {
            tracks: BTreeMap::new(),
            ..self
        }
    }

    fn issue_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Associate this frame's detections with the live tracks.
    ///
    /// Matched detections keep the track id, unmatched detections open new
    /// tracks and unmatched tracks are dropped. Previous tracks are scanned in
    /// id order so equal distances resolve to the oldest track.
    pub fn update(&mut self, detections: &[Detection], association: &Association) {
        self.frame_index = self.next_frame();
        let frame_index = self.frame_index;

        let previous: Vec<Track> = std::mem::take(&mut self.tracks).into_values().collect();

        let prev_points: Vec<Position> = previous.iter().map(|t| t.position).collect();
        let det_points: Vec<Position> = detections.iter().map(|d| d.position).collect();
        let dists = matching::position_distance(&prev_points, &det_points, association.metric);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&dists, association.max_distance);

        let mut previous: Vec<Option<Track>> = previous.into_iter().map(Some).collect();

        for (itrack, idet) in matches {
            if let Some(mut track) = previous[itrack].take() {
                let det = &detections[idet];
                track.update(det.position, frame_index);
                self.tracks.insert(track.id, track);
            }
        }

        for idet in unmatched_detections {
            let id = self.issue_id();
            let det = &detections[idet];
            self.tracks
                .insert(id, Track::new(id, det.position, frame_index));
            tracing::trace!(id, x = det.position.x, y = det.position.y, "new track");
        }

        for itrack in unmatched_tracks {
            if let Some(track) = &previous[itrack] {
                tracing::trace!(id = track.id, "track dropped");
            }
        }
    }
}

/// Standalone point tracker owning its state.
#[derive(Debug, Clone)]
pub struct PointTracker {
    state: TrackerState,
    association: Association,
}

impl PointTracker {
    pub fn new(association: Association) -> Self {
        Self {
            state: TrackerState::new(),
            association,
        }
    }

    /// Process one frame of (already deduplicated) positions and return the
    /// live tracks in id order.
    pub fn update(&mut self, positions: &[Position]) -> Vec<Track> {
        let frame_index = self.state.next_frame();
        let detections: Vec<Detection> = positions
            .iter()
            .map(|&p| Detection::from_position(p, frame_index))
            .collect();
        self.state.update(&detections, &self.association);
        self.state.tracks().values().cloned().collect()
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::point::position;

    fn tracker() -> PointTracker {
        PointTracker::new(Association {
            max_distance: 60.0,
            metric: DistanceMetric::Euclidean,
        })
    }

    #[test]
    fn test_identity_is_stable() {
        let mut tracker = tracker();
        let t1 = tracker.update(&[position(500.0, 100.0)]);
        let t2 = tracker.update(&[position(505.0, 140.0)]);

        assert_eq!(t1.len(), 1);
        assert_eq!(t2.len(), 1);
        assert_eq!(t1[0].id, t2[0].id);
        assert_eq!(t2[0].previous_position, Some(position(500.0, 100.0)));
        assert!(t2[0].is_matched());
    }

    #[test]
    fn test_far_detection_gets_new_id() {
        let mut tracker = tracker();
        let t1 = tracker.update(&[position(500.0, 100.0)]);
        let t2 = tracker.update(&[position(500.0, 400.0)]);

        assert_ne!(t1[0].id, t2[0].id);
        assert!(!t2[0].is_matched());
    }

    #[test]
    fn test_empty_frame_drops_all_and_keeps_counter() {
        let mut tracker = tracker();
        tracker.update(&[position(100.0, 100.0), position(300.0, 100.0)]);
        let next_id = tracker.state().next_id();

        let tracks = tracker.update(&[]);
        assert!(tracks.is_empty());
        assert_eq!(tracker.state().next_id(), next_id);

        // Reappearing objects never get recycled ids.
        let tracks = tracker.update(&[position(100.0, 110.0)]);
        assert_eq!(tracks[0].id, next_id);
    }

    #[test]
    fn test_no_ghost_tracks() {
        let mut tracker = tracker();
        let t1 = tracker.update(&[position(100.0, 100.0), position(400.0, 100.0)]);
        let gone = t1[1].id;

        let t2 = tracker.update(&[position(100.0, 120.0)]);
        assert_eq!(t2.len(), 1);
        assert!(tracker.state().get(gone).is_none());
    }

    #[test]
    fn test_horizontal_metric_tolerates_large_fall() {
        let mut tracker = PointTracker::new(Association {
            max_distance: 20.0,
            metric: DistanceMetric::Horizontal,
        });
        let t1 = tracker.update(&[position(300.0, 100.0)]);
        let t2 = tracker.update(&[position(305.0, 300.0)]);
        assert_eq!(t1[0].id, t2[0].id);
    }

    #[test]
    fn test_positions_map() {
        let mut tracker = tracker();
        tracker.update(&[position(10.0, 20.0), position(200.0, 20.0)]);
        let positions = tracker.state().positions();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[&0], position(10.0, 20.0));
        assert_eq!(positions[&1], position(200.0, 20.0));
    }
}
