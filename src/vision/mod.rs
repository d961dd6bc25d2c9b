// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection pipeline: image decode, preprocessing, ONNX inference,
//! postprocessing and annotation.

pub mod annotate;
pub mod image_utils;
pub mod labels;
pub mod model;
pub mod postprocess;
pub mod preprocessing;

pub use annotate::Annotator;
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use labels::ClassLabels;
pub use model::{Detector, YoloModel};
pub use postprocess::Detection;
