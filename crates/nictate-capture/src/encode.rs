//! Still-image extraction: crop, JPEG encode, base64.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use nictate_core::{BoundingBox, Frame};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("frame has no usable pixels")]
    EmptyFrame,
    #[error("jpeg encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
}

/// Crop rectangle in frame pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A capture payload ready for submission.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Base64 JPEG payload.
    pub data: String,
    /// Crop applied before encoding (enrollment mode only).
    pub crop: Option<CropRect>,
}

/// Expand the detection box by `padding` per side and clamp to the frame.
pub fn padded_crop(
    bbox: &BoundingBox,
    frame_width: u32,
    frame_height: u32,
    padding: f32,
) -> CropRect {
    let x = (bbox.x - bbox.width * padding).max(0.0);
    let y = (bbox.y - bbox.height * padding).max(0.0);
    let width = (bbox.width * (1.0 + 2.0 * padding)).min(frame_width as f32 - x);
    let height = (bbox.height * (1.0 + 2.0 * padding)).min(frame_height as f32 - y);

    CropRect {
        x: x as u32,
        y: y as u32,
        width: width.max(0.0) as u32,
        height: height.max(0.0) as u32,
    }
}

/// Enrollment still: the padded face region at high JPEG quality, so the
/// enrollment service keeps enough biometric detail to build a reference.
pub fn encode_enrollment(
    frame: &Frame,
    bbox: &BoundingBox,
    padding: f32,
    quality: u8,
) -> Result<EncodedImage, EncodeError> {
    check_frame(frame)?;

    let crop = padded_crop(bbox, frame.width, frame.height, padding);
    if crop.width == 0 || crop.height == 0 {
        return Err(EncodeError::EmptyFrame);
    }

    let pixels = crop_pixels(frame, &crop);
    let data = jpeg_base64(&pixels, crop.width, crop.height, quality)?;

    Ok(EncodedImage {
        data,
        crop: Some(crop),
    })
}

/// Verification still: the entire frame, uncropped.
pub fn encode_full(frame: &Frame, quality: u8) -> Result<EncodedImage, EncodeError> {
    check_frame(frame)?;
    let data = jpeg_base64(&frame.data, frame.width, frame.height, quality)?;
    Ok(EncodedImage { data, crop: None })
}

fn check_frame(frame: &Frame) -> Result<(), EncodeError> {
    let expected = frame.width as usize * frame.height as usize * 3;
    if expected == 0 || frame.data.len() < expected {
        return Err(EncodeError::EmptyFrame);
    }
    Ok(())
}

fn crop_pixels(frame: &Frame, crop: &CropRect) -> Vec<u8> {
    let mut out = Vec::with_capacity((crop.width * crop.height * 3) as usize);
    for row in crop.y..crop.y + crop.height {
        let start = ((row * frame.width + crop.x) * 3) as usize;
        let end = start + (crop.width * 3) as usize;
        out.extend_from_slice(&frame.data[start..end]);
    }
    out
}

fn jpeg_base64(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<String, EncodeError> {
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder.encode(pixels, width, height, ExtendedColorType::Rgb8)?;
    Ok(BASE64.encode(&jpeg))
}
