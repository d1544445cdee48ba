//! Capture controller: detection ticks in, at most one submission out.
//!
//! The session is an owned state machine with a single entry point,
//! [`CaptureSession::on_frame`]; no shared flags and no hidden lifetime
//! coupling to the hosting view. The phase field is the sole
//! synchronization primitive: while a capture is in flight, further ticks
//! are dropped, not queued.

use crate::config::Config;
use crate::encode::{self, EncodeError, EncodedImage};
use nictate_client::{BiometricBackend, ClientError, FailureKind};
use nictate_core::adapter::{DetectionAdapter, FaceDetector};
use nictate_core::blink::{BlinkConfig, BlinkDetector, BlinkTick};
use nictate_core::ear::combined_ear;
use nictate_core::{Detection, Frame};
use std::time::{Duration, Instant};

const STATUS_READY: &str = "Camera ready. Blink to capture.";
const STATUS_WAITING: &str = "Waiting for face. Position your face clearly.";
const STATUS_WAITING_DARK: &str = "Waiting for face. Adjust the lighting.";
const STATUS_SUBMITTING: &str = "Face captured. Submitting...";
const STATUS_ENROLLED: &str = "Face registered. Continuing...";
const STATUS_VERIFIED: &str = "Face verified. Continuing...";

/// What the captured still is submitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Register a new biometric reference.
    Enrollment,
    /// Check the live subject against an existing reference.
    Verification,
}

/// Controller phase. `Succeeded` is terminal for the session; `Idle` is
/// re-entrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Capturing,
    Succeeded,
}

/// Classified failure handed to the hosting page.
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub kind: FailureKind,
    pub message: String,
}

/// Hosting page callback surface.
///
/// `on_capture_success` fires at most once per session and is terminal.
/// `on_capture_failure` reports the first classified failure only; later
/// failures land on [`CaptureSession::error`] and the status line, so a
/// burst of qualifying blinks can never produce repeated callbacks.
/// `on_overlay` receives a diagnostic frame from the runner on every tick
/// that carried a detection.
pub trait CaptureObserver {
    fn on_capture_success(&mut self) {}
    fn on_capture_failure(&mut self, _error: &ErrorInfo) {}
    fn on_overlay(&mut self, _frame: &Frame) {}
}

/// Per-session tuning, derived from [`Config`] for a given mode.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mode: CaptureMode,
    pub blink: BlinkConfig,
    pub detection_thresholds: Vec<f32>,
    pub crop_padding: f32,
    pub jpeg_quality: u8,
    pub success_delay: Duration,
}

impl SessionConfig {
    pub fn for_mode(config: &Config, mode: CaptureMode) -> Self {
        let (jpeg_quality, delay_ms) = match mode {
            CaptureMode::Enrollment => {
                (config.enroll_jpeg_quality, config.enroll_success_delay_ms)
            }
            CaptureMode::Verification => {
                (config.verify_jpeg_quality, config.verify_success_delay_ms)
            }
        };

        Self {
            mode,
            blink: config.blink_config(),
            detection_thresholds: config.detection_thresholds.clone(),
            crop_padding: config.crop_padding,
            jpeg_quality,
            success_delay: Duration::from_millis(delay_ms),
        }
    }
}

/// One capture session: lives while the hosting view is mounted.
pub struct CaptureSession<D, B> {
    config: SessionConfig,
    adapter: DetectionAdapter,
    blink: BlinkDetector,
    detector: D,
    backend: B,
    token: String,
    phase: Phase,
    status: String,
    error: Option<ErrorInfo>,
    failure_reported: bool,
    last_detection: Option<Detection>,
}

impl<D: FaceDetector, B: BiometricBackend> CaptureSession<D, B> {
    pub fn new(config: SessionConfig, detector: D, backend: B, token: impl Into<String>) -> Self {
        let adapter = DetectionAdapter::new(config.detection_thresholds.clone());
        let blink = BlinkDetector::new(config.blink.clone());

        Self {
            config,
            adapter,
            blink,
            detector,
            backend,
            token: token.into(),
            phase: Phase::Idle,
            status: STATUS_READY.to_string(),
            error: None,
            failure_reported: false,
            last_detection: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn blink_count(&self) -> u32 {
        self.blink.blink_count()
    }

    pub fn required_blinks(&self) -> u32 {
        self.config.blink.required_blinks
    }

    /// Latest detection, for the overlay renderer.
    pub fn last_detection(&self) -> Option<&Detection> {
        self.last_detection.as_ref()
    }

    /// One detection tick.
    ///
    /// The only suspension points are the endpoint submission and the
    /// post-success display delay; everything else is synchronous.
    pub async fn on_frame(
        &mut self,
        frame: &Frame,
        now: Instant,
        observer: &mut impl CaptureObserver,
    ) {
        if self.phase != Phase::Idle {
            // Mutual exclusion: qualifying events during an in-flight
            // capture (or after terminal success) are dropped, not queued.
            return;
        }

        let Some(detection) = self.adapter.detect(&mut self.detector, frame) else {
            self.last_detection = None;
            self.status = if frame.is_low_light() {
                STATUS_WAITING_DARK.to_string()
            } else {
                STATUS_WAITING.to_string()
            };
            return;
        };

        let ear = match combined_ear(&detection.landmarks.left_eye, &detection.landmarks.right_eye)
        {
            Ok(ear) => ear,
            Err(err) => {
                // Ambiguous geometry must never masquerade as a blink:
                // skip the tick, keep prior blink state.
                tracing::trace!(error = %err, "unusable eye landmarks, skipping tick");
                self.last_detection = Some(detection);
                return;
            }
        };

        let tick = self.blink.tick(ear, now);

        if tick == BlinkTick::Qualifying {
            self.last_detection = Some(detection.clone());
            self.capture(frame, &detection, observer).await;
        } else {
            self.last_detection = Some(detection);
        }
    }

    async fn capture(
        &mut self,
        frame: &Frame,
        detection: &Detection,
        observer: &mut impl CaptureObserver,
    ) {
        self.phase = Phase::Capturing;
        self.status = STATUS_SUBMITTING.to_string();
        tracing::info!(
            mode = ?self.config.mode,
            score = detection.score,
            "qualifying blink, capturing"
        );

        let encoded = match self.encode(frame, detection) {
            Ok(encoded) => encoded,
            Err(err) => {
                self.fail(
                    ErrorInfo {
                        kind: FailureKind::Submission,
                        message: format!("Failed to encode the capture: {err}"),
                    },
                    observer,
                );
                return;
            }
        };

        match self.submit(&encoded).await {
            Ok(true) => {
                self.phase = Phase::Succeeded;
                self.status = match self.config.mode {
                    CaptureMode::Enrollment => STATUS_ENROLLED.to_string(),
                    CaptureMode::Verification => STATUS_VERIFIED.to_string(),
                };
                tracing::info!(mode = ?self.config.mode, "capture accepted");

                // Short display delay so the operator sees the outcome
                // before the hosting page moves on.
                tokio::time::sleep(self.config.success_delay).await;
                observer.on_capture_success();
            }
            Ok(false) => {
                // Endpoint answered but set no success indicator.
                let kind = match self.config.mode {
                    CaptureMode::Enrollment => FailureKind::Submission,
                    CaptureMode::Verification => FailureKind::NotVerified,
                };
                self.fail(
                    ErrorInfo {
                        kind,
                        message: kind.message().to_string(),
                    },
                    observer,
                );
            }
            Err(err) => {
                let kind = err.kind();
                tracing::warn!(error = %err, ?kind, "submission failed");
                self.fail(
                    ErrorInfo {
                        kind,
                        message: kind.message().to_string(),
                    },
                    observer,
                );
            }
        }
    }

    fn encode(&self, frame: &Frame, detection: &Detection) -> Result<EncodedImage, EncodeError> {
        match self.config.mode {
            CaptureMode::Enrollment => encode::encode_enrollment(
                frame,
                &detection.bbox,
                self.config.crop_padding,
                self.config.jpeg_quality,
            ),
            CaptureMode::Verification => encode::encode_full(frame, self.config.jpeg_quality),
        }
    }

    async fn submit(&self, image: &EncodedImage) -> Result<bool, ClientError> {
        match self.config.mode {
            CaptureMode::Enrollment => Ok(self
                .backend
                .enroll(&image.data, &self.token)
                .await?
                .succeeded()),
            CaptureMode::Verification => Ok(self
                .backend
                .verify(&image.data, &self.token)
                .await?
                .succeeded()),
        }
    }

    /// Every non-success path lands here: record the failure, notify the
    /// page (first failure only), and return to a retryable idle state.
    fn fail(&mut self, error: ErrorInfo, observer: &mut impl CaptureObserver) {
        self.status = format!("{} Blink to try again.", error.message);
        if !self.failure_reported {
            observer.on_capture_failure(&error);
            self.failure_reported = true;
        }
        self.error = Some(error);
        self.blink.reset();
        self.phase = Phase::Idle;
    }
}
