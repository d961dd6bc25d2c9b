// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration, read from environment variables with `.env` support.
//!
//! Every value has a default matching the demo deployment, so the node starts
//! with no configuration at all. The signing secret should always be
//! overridden outside of local development.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default signing secret, only acceptable for local development.
const DEV_SECRET_KEY: &str = "your_secret_key";

/// Runtime configuration for the serving process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// HMAC secret used to sign identity tokens.
    pub secret_key: String,
    /// Token validity window in seconds.
    pub token_ttl_secs: u64,
    /// Path to the ONNX detection model.
    pub model_path: PathBuf,
    /// Optional path to a newline-separated class label file.
    pub labels_path: Option<PathBuf>,
    /// Optional path to a TTF/OTF font used for label rendering.
    pub font_path: Option<PathBuf>,
    /// Directory uploaded images are written to.
    pub upload_dir: PathBuf,
    /// Directory annotated output images are written to.
    pub runs_dir: PathBuf,
    /// Confidence threshold for detections.
    pub confidence_threshold: f32,
    /// Square input size the model expects.
    pub input_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".parse().expect("valid default bind address"),
            secret_key: DEV_SECRET_KEY.to_string(),
            token_ttl_secs: 3600,
            model_path: PathBuf::from("runs/detect/custom_model_gpu_final/weights/best.onnx"),
            labels_path: None,
            font_path: None,
            upload_dir: PathBuf::from("uploads"),
            runs_dir: PathBuf::from("runs/detect"),
            confidence_threshold: 0.1,
            input_size: 640,
        }
    }
}

impl AppConfig {
    /// Build a configuration from environment variables, falling back to
    /// the defaults above for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(addr) => addr
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid BIND_ADDR: {}", addr))?,
            Err(_) => defaults.bind_addr,
        };

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("SECRET_KEY not set, using development secret");
            defaults.secret_key
        });

        let token_ttl_secs = match env::var("TOKEN_TTL_SECS") {
            Ok(ttl) => ttl
                .parse::<u64>()
                .with_context(|| format!("Invalid TOKEN_TTL_SECS: {}", ttl))?,
            Err(_) => defaults.token_ttl_secs,
        };

        let confidence_threshold = match env::var("CONFIDENCE") {
            Ok(conf) => conf
                .parse::<f32>()
                .with_context(|| format!("Invalid CONFIDENCE: {}", conf))?,
            Err(_) => defaults.confidence_threshold,
        };

        let input_size = match env::var("INPUT_SIZE") {
            Ok(size) => size
                .parse::<u32>()
                .with_context(|| format!("Invalid INPUT_SIZE: {}", size))?,
            Err(_) => defaults.input_size,
        };

        Ok(Self {
            bind_addr,
            secret_key,
            token_ttl_secs,
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            labels_path: env::var("LABELS_PATH").ok().map(PathBuf::from),
            font_path: env::var("FONT_PATH").ok().map(PathBuf::from),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            runs_dir: env::var("RUNS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.runs_dir),
            confidence_threshold,
            input_size,
        })
    }
}
