// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Draws detection boxes and labels onto an image.

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;

use super::postprocess::Detection;

const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_TEXT_HEIGHT: i32 = 18;
// Average glyph width, rough estimate for the background strip.
const LABEL_CHAR_WIDTH: f32 = 9.0;
const BOX_THICKNESS: i32 = 2;

/// Per-class box color palette, cycled by class id.
const PALETTE: [[u8; 3]; 6] = [
    [230, 57, 70],
    [29, 53, 87],
    [69, 123, 157],
    [42, 157, 143],
    [233, 196, 106],
    [231, 111, 81],
];

/// Renders detections onto a copy of the source image.
///
/// Label text is only drawn when a font was configured; boxes are always
/// drawn.
pub struct Annotator {
    font: Option<FontVec>,
}

impl Annotator {
    /// Create an annotator, optionally loading a TTF/OTF font for labels.
    ///
    /// A missing or unparseable font downgrades to box-only annotation with a
    /// warning rather than failing startup.
    pub fn new(font_path: Option<&Path>) -> Self {
        let font = font_path.and_then(|path| match std::fs::read(path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    tracing::info!(path = %path.display(), "label font loaded");
                    Some(font)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "invalid label font: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not read label font: {}", e);
                None
            }
        });

        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw all detections onto a copy of `image`.
    pub fn annotate(&self, image: &DynamicImage, detections: &[Detection]) -> RgbImage {
        let mut canvas = image.to_rgb8();
        for detection in detections {
            self.draw_detection(&mut canvas, detection);
        }
        canvas
    }

    fn draw_detection(&self, canvas: &mut RgbImage, detection: &Detection) {
        let (img_w, img_h) = (canvas.width() as i32, canvas.height() as i32);

        let x = (detection.x.floor() as i32).clamp(0, img_w - 1);
        let y = (detection.y.floor() as i32).clamp(0, img_h - 1);
        let w = (detection.width.ceil() as i32).min(img_w - x);
        let h = (detection.height.ceil() as i32).min(img_h - y);

        if w <= 0 || h <= 0 {
            return;
        }

        let color = Rgb(PALETTE[detection.class_id % PALETTE.len()]);

        for inset in 0..BOX_THICKNESS {
            let bw = w - 2 * inset;
            let bh = h - 2 * inset;
            if bw <= 0 || bh <= 0 {
                break;
            }
            let rect = Rect::at(x + inset, y + inset).of_size(bw as u32, bh as u32);
            draw_hollow_rect_mut(canvas, rect, color);
        }

        if let Some(ref font) = self.font {
            let label = format!("{} {:.2}", detection.label, detection.confidence);

            let text_width = ((label.len() as f32 * LABEL_CHAR_WIDTH) as i32).min(img_w - x);
            let label_y = (y - LABEL_TEXT_HEIGHT).max(0);

            if text_width > 0 {
                let background =
                    Rect::at(x, label_y).of_size(text_width as u32, LABEL_TEXT_HEIGHT as u32);
                draw_filled_rect_mut(canvas, background, color);
                draw_text_mut(
                    canvas,
                    Rgb([255, 255, 255]),
                    x,
                    label_y,
                    PxScale::from(LABEL_FONT_SIZE),
                    font,
                    &label,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(x: f32, y: f32, w: f32, h: f32) -> Detection {
        Detection {
            class_id: 0,
            label: "plastic".to_string(),
            confidence: 0.9,
            x,
            y,
            width: w,
            height: h,
        }
    }

    #[test]
    fn test_no_font_configured() {
        let annotator = Annotator::new(None);
        assert!(!annotator.has_font());
    }

    #[test]
    fn test_missing_font_downgrades() {
        let annotator = Annotator::new(Some(Path::new("/nonexistent/font.ttf")));
        assert!(!annotator.has_font());
    }

    #[test]
    fn test_annotate_draws_box_border() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([0, 0, 0])));
        let annotator = Annotator::new(None);

        let annotated = annotator.annotate(&image, &[detection(10.0, 10.0, 30.0, 30.0)]);

        // Border pixel recolored, interior untouched.
        assert_ne!(*annotated.get_pixel(10, 10), Rgb([0, 0, 0]));
        assert_eq!(*annotated.get_pixel(25, 25), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_annotate_without_detections_is_identity() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([7, 8, 9])));
        let annotator = Annotator::new(None);

        let annotated = annotator.annotate(&image, &[]);
        assert_eq!(annotated, image.to_rgb8());
    }

    #[test]
    fn test_annotate_clamps_out_of_bounds_box() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(50, 50));
        let annotator = Annotator::new(None);

        // Must not panic on a box exceeding image bounds.
        let _ = annotator.annotate(&image, &[detection(40.0, 40.0, 100.0, 100.0)]);
        let _ = annotator.annotate(&image, &[detection(-5.0, -5.0, 10.0, 10.0)]);
    }
}
