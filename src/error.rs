//! Error types for configuration and the tick loop.

use thiserror::Error;

/// Errors surfaced by the crate.
///
/// The tracking core itself never fails; only configuration validation and
/// the orchestration loop return these.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The external actuator rejected a movement request.
    #[error("actuation failed: {0}")]
    Actuation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
