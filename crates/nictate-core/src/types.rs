use serde::{Deserialize, Serialize};

/// A landmark coordinate in frame pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

/// Bounding box for a detected face.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Facial landmarks for one detection.
///
/// Eye contours follow the 68-point model convention: six points per eye,
/// indices 0 and 3 are the corners, 1 and 2 the upper lid, 4 and 5 the
/// lower lid. Contours shorter than that make the frame unusable for blink
/// scoring — callers skip it rather than guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub left_eye: Vec<Point2D>,
    pub right_eye: Vec<Point2D>,
    /// Full landmark set, drawn by the overlay renderer.
    pub all_positions: Vec<Point2D>,
}

/// One detected face: bounding box, confidence score, landmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub score: f32,
    pub landmarks: FaceLandmarks,
}
