//! TrackerPipeline for driving detection, tracking and actuation per tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::tracker::{Engine, TickReport, TrackerConfig};

use super::{ActuationMode, Actuator, DetectionSource};

/// Monotonic time source in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// [`Clock`] backed by [`Instant`], counting from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Cooperative cancellation, polled once per tick.
pub trait StopSignal {
    fn should_stop(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<S: StopSignal + ?Sized> StopSignal for Arc<S> {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

impl<S: StopSignal + ?Sized> StopSignal for &S {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

/// Single-threaded tick loop: detect, run the engine, actuate, sleep.
///
/// Every step of a tick runs in order on the calling thread. The stop signal
/// is checked before each capture, never mid-tick.
pub struct TrackerPipeline<D: DetectionSource, A: Actuator, C: Clock = MonotonicClock> {
    detector: D,
    actuator: A,
    clock: C,
    engine: Engine,
    mode: ActuationMode,
}

impl<D: DetectionSource, A: Actuator> TrackerPipeline<D, A, MonotonicClock> {
    /// Create a pipeline using the system monotonic clock.
    pub fn new(detector: D, actuator: A, config: TrackerConfig) -> Result<Self> {
        Self::with_clock(detector, actuator, MonotonicClock::default(), config)
    }

    /// Create a pipeline with the default configuration.
    pub fn with_default_config(detector: D, actuator: A) -> Result<Self> {
        Self::new(detector, actuator, TrackerConfig::default())
    }
}

impl<D: DetectionSource, A: Actuator, C: Clock> TrackerPipeline<D, A, C> {
    /// Create a pipeline with an explicit time source.
    pub fn with_clock(
        detector: D,
        actuator: A,
        clock: C,
        config: TrackerConfig,
    ) -> Result<Self> {
        Ok(Self {
            detector,
            actuator,
            clock,
            engine: Engine::new(config)?,
            mode: ActuationMode::default(),
        })
    }

    /// Set how target positions are turned into actuator calls.
    pub fn with_actuation(mut self, mode: ActuationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run one tick.
    ///
    /// A failing detector counts as an empty frame. Actuator failures are
    /// returned.
    pub fn process_frame(&mut self) -> Result<TickReport> {
        let points = match self.detector.detect() {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!(error = %e, "detection failed, treating frame as empty");
                Vec::new()
            }
        };

        let report = self.engine.step(&points, self.clock.now());

        if let Some(x) = report.action.actuation() {
            self.mode
                .drive(&mut self.actuator, x)
                .map_err(|e| Error::Actuation(Box::new(e)))?;
        }

        Ok(report)
    }

    /// Tick until `stop` is raised, sleeping the configured interval between
    /// ticks. Returns the number of ticks run.
    pub fn run<S: StopSignal>(&mut self, stop: &S) -> Result<u64> {
        let interval = Duration::from_secs_f64(self.engine.config().tick_interval);
        tracing::info!(?interval, "tracking loop started");

        let mut ticks = 0u64;
        while !stop.should_stop() {
            self.process_frame()?;
            ticks += 1;
            std::thread::sleep(interval);
        }

        tracing::info!(ticks, "tracking loop stopped");
        Ok(ticks)
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying actuator.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Get a mutable reference to the underlying actuator.
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    /// Get a reference to the tracking engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Get a mutable reference to the tracking engine.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::actuator::tests::RecordingActuator;
    use crate::tracker::{Action, Position, position};
    use std::cell::Cell;
    use std::collections::VecDeque;

    struct ScriptedDetector {
        frames: VecDeque<std::result::Result<Vec<Position>, String>>,
        done: Arc<AtomicBool>,
    }

    impl DetectionSource for ScriptedDetector {
        type Error = String;

        fn detect(&mut self) -> std::result::Result<Vec<Position>, Self::Error> {
            let frame = self.frames.pop_front().unwrap_or_else(|| Ok(Vec::new()));
            if self.frames.is_empty() {
                self.done.store(true, Ordering::Relaxed);
            }
            frame
        }
    }

    /// Advances by a fixed step on every read.
    struct StepClock {
        t: Cell<f64>,
        step: f64,
    }

    impl Clock for StepClock {
        fn now(&self) -> f64 {
            let t = self.t.get();
            self.t.set(t + self.step);
            t
        }
    }

    fn pipeline(
        frames: Vec<std::result::Result<Vec<Position>, String>>,
    ) -> (
        TrackerPipeline<ScriptedDetector, RecordingActuator, StepClock>,
        Arc<AtomicBool>,
    ) {
        let done = Arc::new(AtomicBool::new(false));
        let detector = ScriptedDetector {
            frames: frames.into(),
            done: done.clone(),
        };
        let clock = StepClock {
            t: Cell::new(0.0),
            step: 0.05,
        };
        let config = TrackerConfig {
            tick_interval: 0.001,
            ..Default::default()
        };
        let pipeline =
            TrackerPipeline::with_clock(detector, RecordingActuator::default(), clock, config)
                .unwrap();
        (pipeline, done)
    }

    #[test]
    fn test_process_frame_actuates() {
        let (mut pipeline, _) = pipeline(vec![Ok(vec![position(420.0, 800.0)])]);
        let report = pipeline.process_frame().unwrap();

        assert_eq!(report.action, Action::Actuate { id: 0, x: 420.0 });
        assert_eq!(pipeline.actuator().absolute, vec![420.0]);
    }

    #[test]
    fn test_detector_error_is_empty_frame() {
        let (mut pipeline, _) = pipeline(vec![Err("capture failed".to_string())]);
        let report = pipeline.process_frame().unwrap();

        assert_eq!(report.action, Action::Idle);
        assert!(pipeline.actuator().absolute.is_empty());
    }

    #[test]
    fn test_run_until_stopped() {
        let frames = vec![
            Ok(vec![position(300.0, 100.0)]),
            Ok(vec![position(300.0, 115.0)]),
            Ok(vec![position(300.0, 800.0)]),
        ];
        let (mut pipeline, done) = pipeline(frames);
        let ticks = pipeline.run(&done).unwrap();

        assert_eq!(ticks, 3);
        assert_eq!(pipeline.actuator().absolute, vec![300.0]);
    }

    #[test]
    fn test_stop_before_first_tick() {
        let (mut pipeline, _) = pipeline(vec![Ok(vec![position(300.0, 800.0)])]);
        let stop = AtomicBool::new(true);
        assert_eq!(pipeline.run(&stop).unwrap(), 0);
        assert!(pipeline.actuator().absolute.is_empty());
    }

    #[test]
    fn test_relative_mode_uses_anchor() {
        let (pipeline, _) = pipeline(vec![Ok(vec![position(420.0, 800.0)])]);
        let mut pipeline = pipeline.with_actuation(ActuationMode::Relative { deadband: 10.0 });
        pipeline.actuator_mut().anchor = Some(400.0);

        pipeline.process_frame().unwrap();
        assert_eq!(pipeline.actuator().relative, vec![20.0]);
    }
}
