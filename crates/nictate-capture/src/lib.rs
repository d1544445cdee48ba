//! nictate-capture — Blink-gated capture controller.
//!
//! Owns the per-session state machine: detection ticks flow through the
//! adapter, EAR evaluator, and blink machine from `nictate-core`; one
//! qualifying blink freezes the pipeline, encodes a still, and submits it
//! through `nictate-client`. The session returns to a retryable idle state
//! on every path that does not end in terminal success.

pub mod config;
pub mod encode;
pub mod runner;
pub mod session;

pub use config::Config;
pub use encode::{CropRect, EncodeError, EncodedImage};
pub use runner::{run_session, RunOutcome};
pub use session::{
    CaptureMode, CaptureObserver, CaptureSession, ErrorInfo, Phase, SessionConfig,
};
