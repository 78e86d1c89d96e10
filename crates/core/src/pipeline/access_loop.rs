use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::access::domain::enrolled_identity::EnrolledIdentity;
use crate::access::domain::identity_matcher::IdentityMatcher;
use crate::access::domain::verdict::{AccessState, Verdict};
use crate::camera::domain::frame_source::FrameSource;
use crate::detection::domain::face_analyzer::FaceAnalyzer;
use crate::detection::domain::face_observation::FaceObservation;
use crate::display::domain::display::Display;
use crate::imaging::downscaler::Downscaler;
use crate::imaging::frame_transform::{into_rgb, mirror_horizontal};
use crate::rendering::domain::decision_renderer::DecisionRenderer;
use crate::shared::face_region::FaceRegion;

use super::config::{AccessConfig, ConfigError};
use super::enroll_identity_use_case::EnrollIdentityUseCase;
use super::loop_logger::LoopLogger;
use super::startup_error::StartupError;

/// Lifecycle of an [`AccessLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Running,
    Stopped,
}

/// What one call to [`AccessLoop::run_cycle`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Capture failed; nothing was analyzed or shown.
    Skipped,
    Completed(AccessState),
}

/// The capture → analyze → decide → display loop.
///
/// Owns every collaborator and the enrolled identity. Single-threaded: each
/// cycle finishes before the next one begins, and the only waits are the
/// pause after a failed capture and whatever the display does while polling
/// for quit.
pub struct AccessLoop {
    source: Box<dyn FrameSource>,
    analyzer: Box<dyn FaceAnalyzer>,
    enrollment: EnrollIdentityUseCase,
    renderer: DecisionRenderer,
    display: Box<dyn Display>,
    logger: Box<dyn LoopLogger>,
    matcher: IdentityMatcher,
    downscaler: Downscaler,
    enrollment_path: PathBuf,
    retry_delay: Duration,
    quit_key: char,
    pause: Box<dyn Fn(Duration) + Send>,
    identity: Option<EnrolledIdentity>,
    state: LoopState,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl AccessLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &AccessConfig,
        source: Box<dyn FrameSource>,
        analyzer: Box<dyn FaceAnalyzer>,
        enrollment: EnrollIdentityUseCase,
        renderer: DecisionRenderer,
        display: Box<dyn Display>,
        logger: Box<dyn LoopLogger>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let downscaler = Downscaler::new(config.downscale_factor)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            source,
            analyzer,
            enrollment,
            renderer,
            display,
            logger,
            matcher: IdentityMatcher::new(config.tolerance),
            downscaler,
            enrollment_path: config.enrollment_path.clone(),
            retry_delay: config.retry_delay(),
            quit_key: config.quit_key,
            pause: Box::new(std::thread::sleep),
            identity: None,
            state: LoopState::Starting,
        })
    }

    /// Replaces how the loop waits after a failed capture.
    pub fn with_pause(mut self, pause: Box<dyn Fn(Duration) + Send>) -> Self {
        self.pause = pause;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn identity(&self) -> Option<&EnrolledIdentity> {
        self.identity.as_ref()
    }

    /// Enrolls the owner, then starts the frame source.
    ///
    /// The enrollment photo is checked before the camera is touched, so a
    /// missing or faceless photo never opens the device.
    pub fn start(&mut self) -> Result<(), StartupError> {
        if self.state != LoopState::Starting {
            return Ok(());
        }

        self.logger.info("Initializing camera...");
        let identity = self.enrollment.execute(
            &self.enrollment_path,
            self.analyzer.as_mut(),
            self.logger.as_mut(),
        )?;
        self.identity = Some(identity);

        self.source.start().map_err(StartupError::CameraInit)?;
        self.state = LoopState::Running;
        self.logger.info(&format!(
            "Camera started! Press '{}' to quit.",
            self.quit_key
        ));
        Ok(())
    }

    /// Runs cycles until the display asks to quit, then shuts down.
    ///
    /// Quit is only polled after a completed cycle; failed captures go
    /// straight to the retry pause.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.state != LoopState::Running {
            return Err("Access loop is not running".into());
        }

        let result = loop {
            match self.run_cycle() {
                Ok(CycleOutcome::Skipped) => continue,
                Ok(CycleOutcome::Completed(_)) => {
                    if self.display.quit_requested() {
                        break Ok(());
                    }
                }
                Err(e) => break Err(e),
            }
        };

        self.shutdown();
        result
    }

    /// Executes a single cycle.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, Box<dyn std::error::Error>> {
        let Some(identity) = self.identity.as_ref() else {
            return Err("Access loop has not been started".into());
        };

        let t0 = Instant::now();
        let mut frame = match self.source.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Capture failed, retrying: {e}");
                self.logger.capture_retry();
                (self.pause)(self.retry_delay);
                return Ok(CycleOutcome::Skipped);
            }
        };
        self.logger.timing("capture", elapsed_ms(t0));

        let t0 = Instant::now();
        mirror_horizontal(&mut frame);
        let small = into_rgb(self.downscaler.downscale(&frame)?);
        let observations = match self.analyzer.observe(&small) {
            Ok(observations) => observations,
            Err(e) => {
                log::warn!("Face analysis failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };
        self.logger.timing("analyze", elapsed_ms(t0));
        self.logger.metric("faces", observations.len() as f64);

        let outcome = self.matcher.evaluate(identity.encoding(), &observations);
        let verdict = Verdict::new(outcome, observations);
        self.logger.decision(verdict.state);

        let t0 = Instant::now();
        let regions = FaceRegion::scale_all(
            &FaceObservation::regions(&verdict.observations),
            self.downscaler.inverse_factor(),
        );
        let surfaces = self.renderer.render(&verdict, frame, &regions);
        self.logger.timing("render", elapsed_ms(t0));

        let t0 = Instant::now();
        self.display.present(&surfaces)?;
        self.logger.timing("display", elapsed_ms(t0));

        Ok(CycleOutcome::Completed(verdict.state))
    }

    /// Releases the frame source and display. Runs once; later calls are
    /// ignored.
    pub fn shutdown(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.source.stop();
        self.display.close();
        self.logger.summary();
        self.state = LoopState::Stopped;
    }
}
