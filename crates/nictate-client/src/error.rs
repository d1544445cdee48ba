//! Submission error types and failure classification.

use thiserror::Error;

/// User-facing failure category for a capture submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The endpoint compared the face and declined the match.
    NotVerified,
    /// No face is registered for this account yet.
    NotEnrolled,
    /// The face matched no enrolled reference.
    NotRecognized,
    /// The gated action was already performed (e.g. already voted).
    AlreadyCompleted,
    /// The endpoint found no face in the submitted still.
    NoFaceInImage,
    /// The still was too poor to extract a reference from.
    QualityTooLow,
    /// Network failure or an unclassifiable endpoint error.
    Submission,
}

impl FailureKind {
    /// Classify a structured error code from the endpoint.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "not_verified" | "face_mismatch" => Some(Self::NotVerified),
            "not_enrolled" => Some(Self::NotEnrolled),
            "not_recognized" => Some(Self::NotRecognized),
            "already_completed" | "already_voted" => Some(Self::AlreadyCompleted),
            "no_face" => Some(Self::NoFaceInImage),
            "low_quality" => Some(Self::QualityTooLow),
            _ => None,
        }
    }

    /// Legacy shim: classify by pattern-matching the endpoint's free-text
    /// detail. Older portal builds return no `code` field, only prose.
    pub fn from_detail(detail: &str) -> Self {
        if detail.contains("not recognized") {
            Self::NotRecognized
        } else if detail.contains("does not match") {
            Self::NotVerified
        } else if detail.contains("already voted") {
            Self::AlreadyCompleted
        } else if detail.contains("haven't registered") {
            Self::NotEnrolled
        } else if detail.contains("No face detected") {
            Self::NoFaceInImage
        } else if detail.contains("quality too low") {
            Self::QualityTooLow
        } else {
            Self::Submission
        }
    }

    /// Structured code wins; free-text matching is the fallback.
    pub fn classify(code: Option<&str>, detail: &str) -> Self {
        code.and_then(Self::from_code)
            .unwrap_or_else(|| Self::from_detail(detail))
    }

    /// Message shown to the operator for this category.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotVerified => {
                "Your face does not match the registered face. Please try again."
            }
            Self::NotEnrolled => {
                "You need to register your face first. Please go back and register."
            }
            Self::NotRecognized => {
                "Your face is not recognized. Please register your face first."
            }
            Self::AlreadyCompleted => "This action has already been completed for your account.",
            Self::NoFaceInImage => {
                "No face was found in the captured image. Please adjust your position."
            }
            Self::QualityTooLow => "Face quality too low. Please improve the lighting.",
            Self::Submission => "Error submitting the capture. Please try again.",
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint rejected the submission ({status}): {detail}")]
    Endpoint {
        status: u16,
        kind: FailureKind,
        detail: String,
    },
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Submission,
            Self::Endpoint { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_code_wins_over_detail() {
        let kind = FailureKind::classify(Some("already_voted"), "Face not recognized");
        assert_eq!(kind, FailureKind::AlreadyCompleted);
    }

    #[test]
    fn test_unknown_code_falls_back_to_detail() {
        let kind = FailureKind::classify(Some("mystery"), "Your face does not match");
        assert_eq!(kind, FailureKind::NotVerified);
    }

    #[test]
    fn test_legacy_detail_patterns() {
        let cases = [
            (
                "Face not recognized. Please register your face first.",
                FailureKind::NotRecognized,
            ),
            (
                "Face verification failed. The face does not match your registered face.",
                FailureKind::NotVerified,
            ),
            (
                "You have already voted in this election.",
                FailureKind::AlreadyCompleted,
            ),
            (
                "You haven't registered your face yet. Please register during login.",
                FailureKind::NotEnrolled,
            ),
            (
                "No face detected in image. Please provide a clear face photo.",
                FailureKind::NoFaceInImage,
            ),
            (
                "Face quality too low. Please provide a clearer image.",
                FailureKind::QualityTooLow,
            ),
            ("internal server error", FailureKind::Submission),
        ];
        for (detail, expected) in cases {
            assert_eq!(FailureKind::from_detail(detail), expected, "{detail}");
        }
    }

    #[test]
    fn test_every_kind_has_a_message() {
        for kind in [
            FailureKind::NotVerified,
            FailureKind::NotEnrolled,
            FailureKind::NotRecognized,
            FailureKind::AlreadyCompleted,
            FailureKind::NoFaceInImage,
            FailureKind::QualityTooLow,
            FailureKind::Submission,
        ] {
            assert!(!kind.message().is_empty());
        }
    }
}
