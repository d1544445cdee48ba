//! Eye-aspect-ratio (EAR) evaluation.
//!
//! EAR is the mean vertical lid separation normalized by horizontal eye
//! width; low values mean closed lids. One score per eye from the six-point
//! contour, averaged across both eyes for the blink machine.

use crate::geometry::distance;
use crate::types::Point2D;
use thiserror::Error;

/// Points the EAR formula reads from an eye contour.
const EYE_CONTOUR_POINTS: usize = 6;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarError {
    /// The detector returned too few lid points to score openness.
    /// Callers skip the frame — a short contour is never a closed-eye
    /// signal.
    #[error("eye contour has {0} points, need {EYE_CONTOUR_POINTS}")]
    InsufficientLandmarks(usize),
    /// Eye corner points coincide; the ratio is undefined.
    #[error("degenerate eye width")]
    DegenerateEyeWidth,
}

/// Openness score for one eye.
///
/// `(d(p1,p5) + d(p2,p4)) / (2 * d(p0,p3))` — upper/lower lid pairs over
/// corner-to-corner width.
pub fn eye_aspect_ratio(eye: &[Point2D]) -> Result<f32, EarError> {
    if eye.len() < EYE_CONTOUR_POINTS {
        return Err(EarError::InsufficientLandmarks(eye.len()));
    }

    let vertical = distance(eye[1], eye[5]) + distance(eye[2], eye[4]);
    let horizontal = distance(eye[0], eye[3]);
    if horizontal <= f32::EPSILON {
        return Err(EarError::DegenerateEyeWidth);
    }

    Ok(vertical / (2.0 * horizontal))
}

/// Combined openness score: mean of both eyes.
pub fn combined_ear(left: &[Point2D], right: &[Point2D]) -> Result<f32, EarError> {
    Ok((eye_aspect_ratio(left)? + eye_aspect_ratio(right)?) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Symmetric eye contour: corners `width` apart, both lid pairs
    /// separated by `lid_gap`. EAR = lid_gap / width.
    fn eye(width: f32, lid_gap: f32) -> Vec<Point2D> {
        let half = lid_gap / 2.0;
        vec![
            Point2D { x: 0.0, y: 0.0 },
            Point2D { x: width / 3.0, y: -half },
            Point2D { x: 2.0 * width / 3.0, y: -half },
            Point2D { x: width, y: 0.0 },
            Point2D { x: 2.0 * width / 3.0, y: half },
            Point2D { x: width / 3.0, y: half },
        ]
    }

    #[test]
    fn test_open_eye_ratio() {
        let ear = eye_aspect_ratio(&eye(30.0, 12.0)).unwrap();
        assert!((ear - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_closed_eye_ratio() {
        let ear = eye_aspect_ratio(&eye(30.0, 0.0)).unwrap();
        assert!(ear.abs() < 1e-6);
    }

    #[test]
    fn test_short_contour_skipped_not_closed() {
        for len in 0..EYE_CONTOUR_POINTS {
            let contour: Vec<Point2D> = eye(30.0, 12.0).into_iter().take(len).collect();
            assert_eq!(
                eye_aspect_ratio(&contour),
                Err(EarError::InsufficientLandmarks(len)),
                "length {len} must fail, not score"
            );
        }
    }

    #[test]
    fn test_degenerate_width() {
        let mut contour = eye(30.0, 12.0);
        contour[3] = contour[0];
        assert_eq!(
            eye_aspect_ratio(&contour),
            Err(EarError::DegenerateEyeWidth)
        );
    }

    #[test]
    fn test_combined_is_mean() {
        let ear = combined_ear(&eye(30.0, 12.0), &eye(30.0, 6.0)).unwrap();
        // (0.4 + 0.2) / 2
        assert!((ear - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_combined_propagates_short_contour() {
        let short: Vec<Point2D> = eye(30.0, 12.0).into_iter().take(3).collect();
        assert!(combined_ear(&eye(30.0, 12.0), &short).is_err());
    }
}
