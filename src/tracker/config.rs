//! Tunable thresholds for the tracking core and tick loop.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::pause::PausePolicy;
use crate::tracker::point::DistanceMetric;
use crate::tracker::selector::Ranking;

/// Configuration for the tracker, velocity estimator, pause monitor and
/// selector.
///
/// Distances are in pixels, speeds in pixels per second and times in seconds.
/// Screen `y` grows downward: the lock line sits above the collection line,
/// which sits above the drop line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Detections closer than this in one frame are collapsed into one.
    pub min_separation: f64,
    /// Maximum track-to-detection distance for the detection to keep the id.
    pub association_distance: f64,
    pub association_metric: DistanceMetric,
    /// Speed assumed for tracks whose velocity is unknown.
    pub default_speed: f64,
    /// Floor applied to estimated speeds.
    pub min_speed: f64,
    /// Estimated speeds above this are discarded as mismatches.
    pub max_speed: f64,
    /// Line at which objects are caught.
    pub collection_y: f64,
    /// A candidate at or below this line becomes locked.
    pub lock_threshold_y: f64,
    /// Objects at or below this line are missed.
    pub drop_threshold_y: f64,
    /// Only targets within this distance above the collection line are
    /// actuated on.
    pub pursuit_margin: f64,
    pub ranking: Ranking,
    pub pause: PausePolicy,
    /// Sleep between ticks of the run loop.
    pub tick_interval: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_separation: 10.0,
            association_distance: 60.0,
            association_metric: DistanceMetric::Euclidean,
            default_speed: 300.0,
            min_speed: 1e-3,
            max_speed: 3000.0,
            collection_y: 950.0,
            lock_threshold_y: 850.0,
            drop_threshold_y: 955.0,
            pursuit_margin: 200.0,
            ranking: Ranking::TimeToReach,
            pause: PausePolicy::Motion,
            tick_interval: 0.05,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

impl TrackerConfig {
    /// Check that every value is in range and the lines are ordered.
    pub fn validate(&self) -> Result<()> {
        positive("min_separation", self.min_separation)?;
        positive("association_distance", self.association_distance)?;
        positive("default_speed", self.default_speed)?;
        positive("min_speed", self.min_speed)?;
        positive("max_speed", self.max_speed)?;
        positive("tick_interval", self.tick_interval)?;
        finite("collection_y", self.collection_y)?;
        finite("lock_threshold_y", self.lock_threshold_y)?;
        finite("drop_threshold_y", self.drop_threshold_y)?;
        finite("pursuit_margin", self.pursuit_margin)?;

        if self.min_speed > self.max_speed {
            return Err(Error::InvalidConfig(format!(
                "min_speed ({}) exceeds max_speed ({})",
                self.min_speed, self.max_speed
            )));
        }
        if !(self.min_speed..=self.max_speed).contains(&self.default_speed) {
            return Err(Error::InvalidConfig(format!(
                "default_speed ({}) must lie within [{}, {}]",
                self.default_speed, self.min_speed, self.max_speed
            )));
        }
        if self.lock_threshold_y > self.drop_threshold_y {
            return Err(Error::InvalidConfig(format!(
                "lock_threshold_y ({}) is below drop_threshold_y ({})",
                self.lock_threshold_y, self.drop_threshold_y
            )));
        }
        if self.pursuit_margin < 0.0 {
            return Err(Error::InvalidConfig(
                "pursuit_margin must be non-negative".to_string(),
            ));
        }
        if let PausePolicy::Interval {
            check_interval,
            hold,
        }
        | PausePolicy::Both {
            check_interval,
            hold,
        } = self.pause
        {
            positive("pause.check_interval", check_interval)?;
            positive("pause.hold", hold)?;
        }

        Ok(())
    }
}
