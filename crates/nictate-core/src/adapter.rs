//! Detection adapter: progressive-threshold retry over the external
//! detector.
//!
//! The ladder trades precision for recall: this pipeline needs *a* face
//! more than it needs the best face, so each miss retries at a more
//! lenient confidence threshold.

use crate::frame::Frame;
use crate::types::Detection;
use thiserror::Error;

/// Score thresholds tried in order, strictest first.
pub const DEFAULT_THRESHOLDS: [f32; 3] = [0.15, 0.10, 0.05];

#[derive(Error, Debug)]
pub enum DetectorError {
    /// The underlying model call failed for this frame.
    #[error("detector failure: {0}")]
    Transient(String),
}

/// External face landmark detector, one inference per call.
///
/// May fail transiently; the adapter tolerates that and moves on.
pub trait FaceDetector {
    fn detect_at(
        &mut self,
        frame: &Frame,
        score_threshold: f32,
    ) -> Result<Vec<Detection>, DetectorError>;
}

/// Wraps the detector with the threshold ladder and a warm-up guard.
#[derive(Debug, Clone)]
pub struct DetectionAdapter {
    thresholds: Vec<f32>,
}

impl Default for DetectionAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLDS.to_vec())
    }
}

impl DetectionAdapter {
    pub fn new(thresholds: Vec<f32>) -> Self {
        Self { thresholds }
    }

    /// Detect the best face in `frame`, or `None`.
    ///
    /// Stops at the first threshold yielding at least one detection and
    /// returns the highest-confidence one. A transient detector failure at
    /// one threshold is treated exactly like an empty result; nothing
    /// propagates to the caller.
    pub fn detect<D: FaceDetector>(&self, detector: &mut D, frame: &Frame) -> Option<Detection> {
        if frame.width == 0 || frame.height == 0 {
            // Camera still warming up; do not touch the detector.
            return None;
        }

        for &threshold in &self.thresholds {
            let detections = match detector.detect_at(frame, threshold) {
                Ok(d) => d,
                Err(err) => {
                    tracing::debug!(threshold, error = %err, "detector failed, trying next threshold");
                    continue;
                }
            };

            if let Some(best) = detections.into_iter().max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }) {
                return Some(best);
            }
        }

        None
    }
}
