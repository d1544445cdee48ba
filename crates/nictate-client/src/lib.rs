//! nictate-client — HTTP client for the voting portal's biometric
//! endpoints.
//!
//! Submits captured stills for enrollment or verification and classifies
//! endpoint rejections into a small set of user-facing failure categories.

pub mod api;
pub mod error;

pub use api::{BiometricBackend, BiometricClient, EnrollAck, FaceStatus, VerifyAck};
pub use error::{ClientError, FailureKind};
