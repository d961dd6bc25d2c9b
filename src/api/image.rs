// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Protected image endpoint: accepts a multipart upload, runs detection and
//! returns the annotated image.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::auth::AuthedUser;
use crate::uploads;
use crate::vision::image_utils;

use super::errors::ApiError;
use super::http_server::AppState;

/// Subdirectory of the runs directory that annotated outputs land in. Fixed
/// name, overwritten on repeat runs.
const PREDICT_DIR: &str = "predict";

/// POST /api/image
///
/// Multipart form with a `file` field. 200 with the annotated image bytes on
/// success; 400 when the file part is missing, unnamed or undecodable; 503
/// when the model never loaded.
pub async fn image_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (filename, data) = read_file_field(multipart).await?;

    if filename.is_empty() {
        return Err(ApiError::EmptyFilename);
    }

    let upload_path = uploads::save_upload(&state.config.upload_dir, &filename, &data)?;
    tracing::info!(
        user = %user.0,
        path = %upload_path.display(),
        bytes = data.len(),
        "image uploaded"
    );

    let detector = state.detector.clone().ok_or(ApiError::ModelUnavailable)?;

    let (image, info) = image_utils::decode_image_bytes(&data)
        .map_err(|e| ApiError::InvalidImage(e.to_string()))?;

    let detections = detector
        .detect(&image)
        .map_err(|e| ApiError::Internal(format!("{:#}", e)))?;

    tracing::info!(
        user = %user.0,
        detections = detections.len(),
        "inference complete"
    );

    let annotated = state.annotator.annotate(&image, &detections);

    // Re-encode in the uploaded format and persist the artifact alongside the
    // run outputs before answering.
    let mut encoded = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(annotated)
        .write_to(&mut encoded, info.format)
        .map_err(|e| ApiError::Internal(format!("Failed to encode annotated image: {}", e)))?;
    let encoded = Bytes::from(encoded.into_inner());

    let artifact = artifact_path(&state.config.runs_dir, &upload_path)?;
    fs::write(&artifact, &encoded).map_err(|e| {
        ApiError::Internal(format!(
            "Failed to write artifact {}: {}",
            artifact.display(),
            e
        ))
    })?;
    tracing::debug!(path = %artifact.display(), "annotated artifact written");

    let content_type = image_utils::format_content_type(info.format);
    Ok(([(header::CONTENT_TYPE, content_type)], encoded).into_response())
}

/// Pull the `file` field out of the multipart stream.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        return Ok((filename, data));
    }

    Err(ApiError::MissingFile)
}

/// Output path for the annotated artifact: `<runs_dir>/predict/<filename>`,
/// creating directories as needed.
fn artifact_path(runs_dir: &Path, upload_path: &Path) -> Result<PathBuf, ApiError> {
    let filename = upload_path
        .file_name()
        .ok_or_else(|| ApiError::Internal("upload path has no file name".to_string()))?;

    let dir = runs_dir.join(PREDICT_DIR);
    fs::create_dir_all(&dir).map_err(|e| {
        ApiError::Internal(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    Ok(dir.join(filename))
}
