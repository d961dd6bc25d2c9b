// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection model loading and inference.

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::labels::ClassLabels;
use super::postprocess::{self, Detection};
use super::preprocessing;

/// An inference backend producing detections for an image.
///
/// Behind a trait so tests can substitute a mock without a model file on
/// disk.
pub trait Detector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

/// YOLO-family detection model backed by an ONNX Runtime session.
///
/// Loaded once per process and shared; the session itself is serialized
/// behind a mutex, so concurrent requests queue on inference.
#[derive(Clone)]
pub struct YoloModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    labels: ClassLabels,
    confidence_threshold: f32,
    input_size: u32,
}

impl std::fmt::Debug for YoloModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloModel")
            .field("input_name", &self.input_name)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("input_size", &self.input_size)
            .finish_non_exhaustive()
    }
}

impl YoloModel {
    /// Load the detection model from an ONNX file.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        labels: ClassLabels,
        confidence_threshold: f32,
        input_size: u32,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        info!("Loading detection model from {}", model_path.display());

        // CPU-only execution; the demo deployment has no dedicated GPU for
        // serving.
        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        debug!("Detection model loaded - input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels,
            confidence_threshold: confidence_threshold.clamp(0.0, 1.0),
            input_size,
        })
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }
}

impl Detector for YoloModel {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (tensor, letterbox) = preprocessing::letterbox_to_tensor(image, self.input_size);

        let mut session = self.session.lock().unwrap();

        let input_value = Value::from_array(tensor).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Detection inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Detection output shape: {:?}", output_tensor.shape());

        let detections = postprocess::decode_predictions(
            output_tensor.view(),
            &letterbox,
            image.width(),
            image.height(),
            self.confidence_threshold,
            &self.labels,
        )?;

        debug!("Detected {} objects", detections.len());

        Ok(detections)
    }
}
