//! Builder for raw detection points from matcher output.

use crate::tracker::{Position, position};

/// Builds a raw detection center from the formats matchers report.
///
/// Template matchers return the top-left corner of each match; adding half
/// the template size gives the object center. Capture regions report
/// region-local coordinates, so an optional origin shifts the point into
/// screen space.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionBuilder {
    x: f64,
    y: f64,
    template_w: f64,
    template_h: f64,
    origin_x: f64,
    origin_y: f64,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the object center directly.
    pub fn center(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self.template_w = 0.0;
        self.template_h = 0.0;
        self
    }

    /// Set the top-left corner of a template match.
    pub fn top_left(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the template size used with [`top_left`](Self::top_left).
    pub fn template_size(mut self, width: u32, height: u32) -> Self {
        self.template_w = f64::from(width);
        self.template_h = f64::from(height);
        self
    }

    /// Offset by the capture region's top-left corner on screen.
    pub fn region_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Build the final center point.
    pub fn build(self) -> Position {
        // Integer halving matches how matchers report pixel centers.
        let half_w = (self.template_w / 2.0).floor();
        let half_h = (self.template_h / 2.0).floor();
        position(
            self.origin_x + self.x + half_w,
            self.origin_y + self.y + half_h,
        )
    }
}
