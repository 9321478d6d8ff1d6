//! Trait for object detection backends.

use crate::tracker::{Position, position};

/// Trait for detection backends.
///
/// Implement this trait to connect a screen grabber plus matcher (template
/// matching, a neural detector, ...) to the tracking loop. Each call captures
/// one frame and reports object centers in any order.
///
/// # Example
///
/// ```ignore
/// use catchtrack_rs::{DetectionSource, Position};
///
/// struct TemplateMatcher {
///     // capture region, template image, threshold
/// }
///
/// impl DetectionSource for TemplateMatcher {
///     type Error = std::io::Error;
///
///     fn detect(&mut self) -> Result<Vec<Position>, Self::Error> {
///         // Grab the region and return match centers
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for capture or detection failures.
    type Error: std::fmt::Display;

    /// Capture the next frame and return raw detection centers.
    ///
    /// The result may be empty, unsorted or contain near-duplicates.
    fn detect(&mut self) -> Result<Vec<Position>, Self::Error>;
}

/// Helper trait for converting backend-specific outputs to raw positions.
pub trait IntoDetections {
    /// Convert the output into a vector of positions.
    fn into_detections(self) -> Vec<Position>;
}

impl IntoDetections for Vec<Position> {
    fn into_detections(self) -> Vec<Position> {
        self
    }
}

impl IntoDetections for Vec<(f64, f64)> {
    fn into_detections(self) -> Vec<Position> {
        self.into_iter().map(|(x, y)| position(x, y)).collect()
    }
}

impl IntoDetections for Vec<[f64; 2]> {
    fn into_detections(self) -> Vec<Position> {
        self.into_iter().map(|[x, y]| position(x, y)).collect()
    }
}

impl IntoDetections for Vec<(i32, i32)> {
    fn into_detections(self) -> Vec<Position> {
        self.into_iter()
            .map(|(x, y)| position(f64::from(x), f64::from(y)))
            .collect()
    }
}
