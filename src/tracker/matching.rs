//! Matching utilities for frame-to-frame association.

use ndarray::Array2;

use crate::tracker::point::{DistanceMetric, Position, distance_batch};

/// Detection input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Center of the detected object
    pub position: Position,
    /// Index of the frame the detection came from
    pub frame_index: u64,
}

impl Detection {
    pub fn new(x: f64, y: f64, frame_index: u64) -> Self {
        Self {
            position: Position::new(x, y),
            frame_index,
        }
    }

    pub fn from_position(position: Position, frame_index: u64) -> Self {
        Self {
            position,
            frame_index,
        }
    }
}

/// Compute the distance matrix between track positions and detections.
pub fn position_distance(
    track_points: &[Position],
    det_points: &[Position],
    metric: DistanceMetric,
) -> Array2<f64> {
    distance_batch(track_points, det_points, metric)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    /// `(track_index, detection_index)` pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy assignment in detection-scan order.
///
/// Each detection (column) claims the nearest still-unclaimed track (row)
/// whose cost is within `thresh`. Equal costs resolve to the lower row index.
/// A claimed track is unavailable to later detections.
pub fn greedy_assignment(cost_matrix: &Array2<f64>, thresh: f64) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut claimed = vec![false; num_rows];
    let mut matches = Vec::new();
    let mut unmatched_detections = Vec::new();

    for col in 0..num_cols {
        let mut best: Option<(usize, f64)> = None;
        for row in 0..num_rows {
            if claimed[row] {
                continue;
            }
            let cost = cost_matrix[[row, col]];
            if cost.is_nan() || cost > thresh {
                continue;
            }
            if best.is_none_or(|(_, c)| cost < c) {
                best = Some((row, cost));
            }
        }

        match best {
            Some((row, _)) => {
                claimed[row] = true;
                matches.push((row, col));
            }
            None => unmatched_detections.push(col),
        }
    }

    let unmatched_tracks = claimed
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| if c { None } else { Some(i) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}
