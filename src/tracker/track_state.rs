/// Lifecycle of a track within the live set.
///
/// There is no lost state: a track that misses a frame is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Created this frame from an unmatched detection
    #[default]
    New,
    /// Matched to a detection in at least two consecutive frames
    Tracked,
}
