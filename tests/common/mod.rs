// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Shared fixtures for integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::DynamicImage;
use tempfile::TempDir;

use waste_detect_node::api::http_server::AppState;
use waste_detect_node::auth::{StaticCredentialStore, TokenService};
use waste_detect_node::config::AppConfig;
use waste_detect_node::vision::{Annotator, Detection, Detector};

pub const TEST_SECRET: &str = "test_secret";
pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Detector double that records call counts and returns a fixed result.
pub struct CountingDetector {
    pub calls: AtomicUsize,
    detections: Vec<Detection>,
}

impl CountingDetector {
    pub fn new(detections: Vec<Detection>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            detections,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Detector for CountingDetector {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detections.clone())
    }
}

pub fn sample_detection() -> Detection {
    Detection {
        class_id: 0,
        label: "plastic".to_string(),
        confidence: 0.87,
        x: 1.0,
        y: 1.0,
        width: 4.0,
        height: 4.0,
    }
}

/// A node under test: router state plus the temp directories it writes into.
pub struct TestNode {
    pub state: AppState,
    pub dirs: TempDir,
}

pub fn test_state(detector: Option<Arc<CountingDetector>>) -> TestNode {
    let dirs = TempDir::new().unwrap();

    let mut config = AppConfig::default();
    config.secret_key = TEST_SECRET.to_string();
    config.upload_dir = dirs.path().join("uploads");
    config.runs_dir = dirs.path().join("runs");

    let tokens = TokenService::new(&config.secret_key, config.token_ttl_secs);

    let state = AppState {
        config: Arc::new(config),
        credentials: Arc::new(StaticCredentialStore::seeded()),
        tokens,
        detector: detector.map(|d| d as Arc<dyn Detector>),
        annotator: Arc::new(Annotator::new(None)),
    };

    TestNode { state, dirs }
}

/// Minimal valid PNG payload (8x8 solid color).
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 30, 30]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Build a multipart/form-data body with a single field.
pub fn multipart_body(field_name: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field_name, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n", field_name).as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
