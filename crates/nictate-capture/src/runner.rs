//! Session runner: fixed-interval cooperative polling.
//!
//! One timer drives the whole pipeline; there is no parallel execution of
//! detection ticks. While a submission is in flight the controller drops
//! ticks, and missed timer slots are skipped rather than queued: the
//! newest frame after resolution is as good as any queued one.

use crate::session::{CaptureObserver, CaptureSession, Phase};
use nictate_client::BiometricBackend;
use nictate_core::adapter::FaceDetector;
use nictate_core::{overlay, FrameSource};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Why the run loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Terminal success was signalled to the hosting page.
    Completed,
    /// The hosting view tore the session down.
    Cancelled,
}

/// Drive a capture session from a frame source at a fixed tick interval.
///
/// Ticks are processed in arrival order. Teardown is signalled by sending
/// on (or dropping) the `shutdown` channel; the loop stops at the next
/// tick boundary, so an in-flight submission resolves on its own and its
/// result dies with the session. No state update can outlive the runner.
///
/// On every tick that carried a detection, a diagnostic copy of the frame
/// gets the overlay rendered into it and is handed to
/// `observer.on_overlay`; the session itself never sees that copy.
pub async fn run_session<S, D, B>(
    session: &mut CaptureSession<D, B>,
    source: &mut S,
    tick_interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
    observer: &mut impl CaptureObserver,
) -> RunOutcome
where
    S: FrameSource,
    D: FaceDetector,
    B: BiometricBackend,
{
    let mut ticks = tokio::time::interval(tick_interval);
    ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Teardown wins over a pending tick, and the completed shutdown
            // future is never polled twice.
            biased;
            _ = &mut shutdown => {
                tracing::info!("capture session torn down");
                return RunOutcome::Cancelled;
            }
            _ = ticks.tick() => {
                let Some(frame) = source.frame() else {
                    // No frame source output yet (warm-up or stream gone):
                    // keep polling, exactly like a frame with no face.
                    continue;
                };

                session.on_frame(&frame, Instant::now(), observer).await;

                if let Some(detection) = session.last_detection() {
                    let mut diagnostic = frame;
                    overlay::render_overlay(
                        &mut diagnostic,
                        detection,
                        session.blink_count(),
                        session.required_blinks(),
                    );
                    observer.on_overlay(&diagnostic);
                }

                if session.phase() == Phase::Succeeded {
                    return RunOutcome::Completed;
                }
            }
        }
    }
}
