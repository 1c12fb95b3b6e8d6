//! Mapping from the square model input back to original image pixels.
//!
//! Inputs are stretched to `image_size x image_size` before inference, so the
//! horizontal and vertical factors differ whenever the original image is not
//! square.

use crate::detector::Detection;
use crate::util::{GridYoloError, GridYoloResult};

/// Per-axis factors from model space to original image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    /// `img_w / image_size`.
    pub x: f32,
    /// `img_h / image_size`.
    pub y: f32,
}

impl ScaleFactors {
    pub fn new(image_size: u32, img_w: u32, img_h: u32) -> GridYoloResult<Self> {
        if image_size == 0 {
            return Err(GridYoloError::InvalidConfig {
                field: "image_size",
                reason: "must be positive",
            });
        }
        if img_w == 0 || img_h == 0 {
            return Err(GridYoloError::InvalidImageSize {
                width: img_w,
                height: img_h,
            });
        }
        let size = image_size as f32;
        Ok(Self {
            x: img_w as f32 / size,
            y: img_h as f32 / size,
        })
    }

    pub fn is_identity(&self) -> bool {
        self.x == 1.0 && self.y == 1.0
    }
}

/// Rescales model-space detections in place to an `img_w x img_h` image.
pub fn rescale_detections(
    detections: &mut [Detection],
    image_size: u32,
    img_w: u32,
    img_h: u32,
) -> GridYoloResult<()> {
    let factors = ScaleFactors::new(image_size, img_w, img_h)?;
    if factors.is_identity() {
        return Ok(());
    }
    for detection in detections.iter_mut() {
        detection.bbox = detection.bbox.scaled(factors.x, factors.y);
    }
    Ok(())
}
