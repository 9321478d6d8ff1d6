mod config;
mod dedup;
mod engine;
mod matching;
mod pause;
mod point;
mod point_tracker;
mod selector;
mod track;
mod track_state;
mod velocity;

pub use config::TrackerConfig;
pub use dedup::deduplicate;
pub use engine::{Action, Engine, EngineState, TickReport, step, tick};
pub use matching::{AssignmentResult, Detection, greedy_assignment, position_distance};
pub use pause::{PauseMonitor, PausePolicy, PauseState};
pub use point::{DistanceMetric, Position, distance_batch, is_finite, position};
pub use point_tracker::{Association, PointTracker, TrackerState};
pub use selector::{Ranking, SelectionState, Selector, Target};
pub use track::Track;
pub use track_state::TrackState;
pub use velocity::VelocityEstimator;
