#![cfg(feature = "image-io")]

use gridyolo::image::{input_from_dynamic_image, input_from_rgb_image, normalize_channel};
use gridyolo::GridYoloError;
use image::{DynamicImage, Rgb, RgbImage};

#[test]
fn channel_normalization_spans_minus_one_to_one() {
    assert_eq!(normalize_channel(0), -1.0);
    assert_eq!(normalize_channel(255), 1.0);
    assert!(normalize_channel(128) > 0.0);
    assert!(normalize_channel(127) < 0.0);
}

#[test]
fn same_size_image_keeps_pixel_layout() {
    let img = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 60) as u8, (y * 60) as u8, 255]));
    let tensor = input_from_rgb_image(&img, 4).unwrap();

    assert_eq!(tensor.shape(), [1, 4, 4, 3]);
    let data = tensor.as_slice();
    // Pixel (x = 2, y = 1) sits at (1 * 4 + 2) * 3 in NHWC order.
    let idx = (4 + 2) * 3;
    assert_eq!(data[idx], normalize_channel(120));
    assert_eq!(data[idx + 1], normalize_channel(60));
    assert_eq!(data[idx + 2], 1.0);
}

#[test]
fn uniform_image_stays_uniform_after_resize() {
    let img = RgbImage::from_pixel(30, 10, Rgb([255, 0, 255]));
    let tensor = input_from_rgb_image(&img, 8).unwrap();

    assert_eq!(tensor.as_slice().len(), 8 * 8 * 3);
    for pixel in tensor.as_slice().chunks_exact(3) {
        assert_eq!(pixel, &[1.0, -1.0, 1.0]);
    }
}

#[test]
fn dynamic_image_reports_original_size() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([0, 0, 0])));
    let (tensor, width, height) = input_from_dynamic_image(&img, 16).unwrap();
    assert_eq!((width, height), (64, 32));
    assert_eq!(tensor.image_size(), 16);
}

#[test]
fn empty_image_is_rejected() {
    let img = RgbImage::new(0, 0);
    let err = input_from_rgb_image(&img, 16).err().unwrap();
    assert_eq!(
        err,
        GridYoloError::InvalidImageSize {
            width: 0,
            height: 0,
        }
    );
}
