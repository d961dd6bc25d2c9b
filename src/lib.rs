// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod auth;
pub mod config;
pub mod uploads;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{ApiError, ErrorResponse};
pub use auth::{Claims, CredentialLookup, StaticCredentialStore, TokenError, TokenService};
pub use config::AppConfig;
pub use vision::{Annotator, ClassLabels, Detection, Detector, YoloModel};
