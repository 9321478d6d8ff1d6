//! Point representation and distance utilities.
//!
//! Positions are screen-space pixel coordinates with `y` growing downward,
//! so falling objects have increasing `y` over time.

use nalgebra::Point2;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A 2D position in pixels.
pub type Position = Point2<f64>;

/// Build a position from raw coordinates.
#[inline]
pub fn position(x: f64, y: f64) -> Position {
    Point2::new(x, y)
}

/// Whether both coordinates are finite (not NaN or infinite).
#[inline]
pub fn is_finite(p: &Position) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// How distance between a track and a detection is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Full Euclidean distance.
    #[default]
    Euclidean,
    /// Horizontal offset only. Falling objects move mostly along `y`, so
    /// `|dx|` alone separates columns of objects cheaply.
    Horizontal,
}

impl DistanceMetric {
    #[inline]
    pub fn distance(self, a: &Position, b: &Position) -> f64 {
        match self {
            Self::Euclidean => nalgebra::distance(a, b),
            Self::Horizontal => (a.x - b.x).abs(),
        }
    }
}

/// Calculate the distance matrix between two sets of points.
///
/// Returns a matrix of shape (M, N) where M is the length of `points_a`
/// and N is the length of `points_b`.
pub fn distance_batch(
    points_a: &[Position],
    points_b: &[Position],
    metric: DistanceMetric,
) -> Array2<f64> {
    let mut dists = Array2::zeros((points_a.len(), points_b.len()));
    for (i, a) in points_a.iter().enumerate() {
        for (j, b) in points_b.iter().enumerate() {
            dists[[i, j]] = metric.distance(a, b);
        }
    }
    dists
}
