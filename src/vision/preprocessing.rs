// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the detection model.
//!
//! Uploads are letterboxed to the square input size the model was exported
//! with, then converted to a normalized NCHW tensor.

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

/// Gray value used for letterbox padding, the YOLO training convention.
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Geometry of a letterboxed image, needed to map detections back into
/// original-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Uniform scale applied to the original image.
    pub scale: f32,
    /// Horizontal padding (pixels) on the left edge of the model input.
    pub pad_x: f32,
    /// Vertical padding (pixels) on the top edge of the model input.
    pub pad_y: f32,
}

impl Letterbox {
    /// Map a point in model-input space back to original-image space.
    pub fn to_original(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Letterbox an image to `size`x`size` and convert it to a `[1, 3, size,
/// size]` tensor with pixel values scaled to `[0, 1]`.
pub fn letterbox_to_tensor(image: &DynamicImage, size: u32) -> (Array4<f32>, Letterbox) {
    let (orig_w, orig_h) = image.dimensions();

    let scale = (size as f32 / orig_w.max(1) as f32).min(size as f32 / orig_h.max(1) as f32);
    let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, size);
    let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, size);

    let resized = image.resize_exact(new_w, new_h, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let pad_x = (size - new_w) / 2;
    let pad_y = (size - new_h) / 2;

    let mut tensor = Array4::from_elem((1, 3, size as usize, size as usize), PAD_VALUE);

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let tx = (x + pad_x) as usize;
        let ty = (y + pad_y) as usize;
        for c in 0..3 {
            tensor[[0, c, ty, tx]] = pixel[c] as f32 / 255.0;
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    )
}
