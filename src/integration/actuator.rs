//! Trait for pointer-like actuators and the policy for driving them.

use serde::{Deserialize, Serialize};

/// An output device that can be steered horizontally, such as a mouse
/// cursor controlling a catcher.
pub trait Actuator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Move to absolute screen x.
    fn move_to(&mut self, x: f64) -> Result<(), Self::Error>;

    /// Move horizontally by `dx`.
    fn move_by(&mut self, dx: f64) -> Result<(), Self::Error>;

    /// Current x of whatever catches the objects, used by relative moves.
    /// `None` when it cannot be located this frame.
    fn anchor_x(&mut self) -> Option<f64> {
        None
    }
}

/// How a target x is turned into an actuator call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuationMode {
    /// Move to the target x shifted by the capture region's left edge.
    Absolute { origin_x: f64 },
    /// Move by the offset between the target and the anchor, skipping
    /// offsets no larger than `deadband`.
    Relative { deadband: f64 },
}

impl Default for ActuationMode {
    fn default() -> Self {
        Self::Absolute { origin_x: 0.0 }
    }
}

impl ActuationMode {
    /// Issue at most one movement toward `x`. Returns whether a move was sent.
    pub fn drive<A: Actuator>(&self, actuator: &mut A, x: f64) -> Result<bool, A::Error> {
        match *self {
            Self::Absolute { origin_x } => {
                actuator.move_to(origin_x + x)?;
                Ok(true)
            }
            Self::Relative { deadband } => {
                let Some(anchor) = actuator.anchor_x() else {
                    tracing::warn!("actuator anchor not found, skipping move");
                    return Ok(false);
                };
                let offset = x - anchor;
                if offset.abs() <= deadband {
                    return Ok(false);
                }
                actuator.move_by(offset)?;
                Ok(true)
            }
        }
    }
}
