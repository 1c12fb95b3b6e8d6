//! Conversion of decoded images into model input tensors.
//!
//! Available when the `image-io` feature is enabled. Images are stretched to
//! the square model input with bilinear filtering and mapped from `[0, 255]`
//! to `[-1, 1]` in RGB channel order.

use crate::detector::InputTensor;
use crate::util::{GridYoloError, GridYoloResult};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::borrow::Cow;

/// Maps an 8-bit channel value to `[-1, 1]`.
#[inline]
pub fn normalize_channel(value: u8) -> f32 {
    (value as f32 / 255.0) * 2.0 - 1.0
}

/// Builds an input tensor from an RGB image of any size.
pub fn input_from_rgb_image(img: &RgbImage, image_size: u32) -> GridYoloResult<InputTensor> {
    if img.width() == 0 || img.height() == 0 {
        return Err(GridYoloError::InvalidImageSize {
            width: img.width(),
            height: img.height(),
        });
    }

    let resized: Cow<'_, RgbImage> = if img.width() == image_size && img.height() == image_size {
        Cow::Borrowed(img)
    } else {
        Cow::Owned(imageops::resize(
            img,
            image_size,
            image_size,
            FilterType::Triangle,
        ))
    };

    let data = resized
        .as_raw()
        .iter()
        .copied()
        .map(normalize_channel)
        .collect();
    InputTensor::new(data, image_size)
}

/// Builds an input tensor from any decoded image, converting it to RGB first.
///
/// Returns the tensor with the original `(width, height)` for rescaling.
pub fn input_from_dynamic_image(
    img: &DynamicImage,
    image_size: u32,
) -> GridYoloResult<(InputTensor, u32, u32)> {
    let rgb = img.to_rgb8();
    let tensor = input_from_rgb_image(&rgb, image_size)?;
    Ok((tensor, rgb.width(), rgb.height()))
}
