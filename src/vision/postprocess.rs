// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of raw detection model output into scored bounding boxes.
//!
//! The exported YOLO detection head emits a `[1, 4 + num_classes, N]` tensor:
//! rows 0-3 are box center/size in model-input pixels, the remaining rows are
//! per-class scores. Decoding takes the best class per anchor, filters by
//! confidence, maps boxes back through the letterbox geometry and suppresses
//! overlaps.

use anyhow::Result;
use ndarray::ArrayViewD;
use serde::Serialize;

use super::labels::ClassLabels;
use super::preprocessing::Letterbox;

/// IoU threshold used for non-max suppression.
pub const NMS_IOU_THRESHOLD: f32 = 0.45;

/// A detected object in original-image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class_id: usize,
    pub label: String,
    pub confidence: f32,
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Detection {
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.confidence > 0.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Intersection-over-union with another box.
    pub fn iou(&self, other: &Detection) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

/// Decode a raw output tensor into confidence-filtered, NMS-suppressed
/// detections in original-image coordinates.
pub fn decode_predictions(
    output: ArrayViewD<'_, f32>,
    letterbox: &Letterbox,
    orig_width: u32,
    orig_height: u32,
    confidence_threshold: f32,
    labels: &ClassLabels,
) -> Result<Vec<Detection>> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 || shape[1] <= 4 {
        anyhow::bail!(
            "Unexpected detection output shape: {:?}, expected [1, 4+classes, anchors]",
            shape
        );
    }

    let num_classes = shape[1] - 4;
    let num_anchors = shape[2];
    let (orig_w, orig_h) = (orig_width as f32, orig_height as f32);

    let mut detections = Vec::new();

    for anchor in 0..num_anchors {
        // Best class for this anchor.
        let mut class_id = 0;
        let mut score = f32::MIN;
        for class in 0..num_classes {
            let value = output[[0, 4 + class, anchor]];
            if value > score {
                score = value;
                class_id = class;
            }
        }

        if score < confidence_threshold {
            continue;
        }

        let cx = output[[0, 0, anchor]];
        let cy = output[[0, 1, anchor]];
        let w = output[[0, 2, anchor]];
        let h = output[[0, 3, anchor]];

        // Model-input space -> original-image space.
        let (x1, y1) = letterbox.to_original(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_original(cx + w / 2.0, cy + h / 2.0);

        let x1 = x1.clamp(0.0, orig_w);
        let y1 = y1.clamp(0.0, orig_h);
        let x2 = x2.clamp(0.0, orig_w);
        let y2 = y2.clamp(0.0, orig_h);

        let detection = Detection {
            class_id,
            label: labels.name(class_id),
            confidence: score,
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        };

        if detection.is_valid() {
            detections.push(detection);
        }
    }

    Ok(nms(detections, NMS_IOU_THRESHOLD))
}

/// Greedy per-class non-max suppression.
pub fn nms(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());

    for candidate in detections {
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}
