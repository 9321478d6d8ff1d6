//! Single tracked point.

use crate::tracker::point::Position;
use crate::tracker::track_state::TrackState;

/// A detection with a stable identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique track identifier, never reused
    pub id: u64,
    /// Current lifecycle state
    pub state: TrackState,
    /// Position in the most recent frame
    pub position: Position,
    /// Position in the frame before, if the track was matched across frames
    pub previous_position: Option<Position>,
    /// Vertical speed in pixels per second; `None` while unknown
    pub velocity: Option<f64>,
    /// Frame index of the most recent match
    pub last_seen_frame: u64,
    /// Frame index when the track was created
    pub start_frame: u64,
}

impl Track {
    pub(crate) fn new(id: u64, position: Position, frame_index: u64) -> Self {
        Self {
            id,
            state: TrackState::New,
            position,
            previous_position: None,
            velocity: None,
            last_seen_frame: frame_index,
            start_frame: frame_index,
        }
    }

    /// Move the track to a newly matched position, keeping its velocity until
    /// the estimator replaces it.
    pub(crate) fn update(&mut self, position: Position, frame_index: u64) {
        self.previous_position = Some(self.position);
        self.position = position;
        self.last_seen_frame = frame_index;
        self.state = TrackState::Tracked;
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Number of frames this track has been alive for.
    pub fn age(&self) -> u64 {
        self.last_seen_frame - self.start_frame
    }

    /// Whether the track was matched to a detection this frame rather than
    /// created from one.
    pub fn is_matched(&self) -> bool {
        self.state == TrackState::Tracked
    }
}
