//! Integration module for connecting detectors and actuators to the tracker.
//!
//! This module provides the traits at the edges of the tick loop (detection,
//! actuation, time and cancellation) and the loop itself.

mod actuator;
mod builder;
mod detector;
mod pipeline;

pub use actuator::{ActuationMode, Actuator};
pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::{Clock, MonotonicClock, StopSignal, TrackerPipeline};
