//! Point tracking and target selection for catching falling objects.
//!
//! Each tick takes the raw object centers reported by a detector, collapses
//! near-duplicates, associates them with the previous frame's tracks,
//! estimates vertical speeds, checks whether the stream has stalled and picks
//! at most one target to steer an actuator toward. A lock keeps the chosen
//! target once it is close to the collection line so the actuator does not
//! flip between candidates.

mod error;
pub mod integration;
pub mod tracker;

pub use error::{Error, Result};
pub use integration::{
    ActuationMode, Actuator, Clock, DetectionBuilder, DetectionSource, IntoDetections,
    MonotonicClock, StopSignal, TrackerPipeline,
};
pub use tracker::{
    Action, Detection, Engine, EngineState, PausePolicy, Position, Ranking, TickReport, Track,
    TrackerConfig, TrackerState, position,
};
