//! nictate-core — Blink-gated liveness pipeline primitives.
//!
//! Consumes per-frame face detections, scores eye openness via the eye
//! aspect ratio (EAR), and runs a hysteresis state machine that emits one
//! qualifying-blink event per deliberate blink. Everything here is
//! synchronous and side-effect free; the capture controller lives in
//! `nictate-capture`.

pub mod adapter;
pub mod blink;
pub mod ear;
pub mod frame;
pub mod geometry;
pub mod overlay;
pub mod types;

pub use adapter::{DetectionAdapter, DetectorError, FaceDetector};
pub use blink::{BlinkConfig, BlinkDetector, BlinkTick};
pub use frame::{Frame, FrameSource};
pub use types::{BoundingBox, Detection, FaceLandmarks, Point2D};
