//! Greedy collapse of near-duplicate detections within one frame.

use crate::tracker::point::{Position, is_finite};

/// Collapse near-duplicate points.
///
/// Points are scanned in input order and accepted only if they are farther
/// than `min_separation` from every point already accepted. The first point
/// seen wins; rejected points are never reconsidered. Non-finite points are
/// dropped before comparison.
pub fn deduplicate(points: &[Position], min_separation: f64) -> Vec<Position> {
    let mut unique: Vec<Position> = Vec::with_capacity(points.len());
    let mut malformed = 0usize;

    for p in points {
        if !is_finite(p) {
            malformed += 1;
            continue;
        }
        if unique
            .iter()
            .all(|u| nalgebra::distance(u, p) > min_separation)
        {
            unique.push(*p);
        }
    }

    if malformed > 0 {
        tracing::warn!(malformed, "rejected non-finite detections");
    }
    tracing::trace!(raw = points.len(), unique = unique.len(), "deduplicated");

    unique
}
