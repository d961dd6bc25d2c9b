// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod image;
pub mod login;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_router, start_server, AppState};
pub use image::image_handler;
pub use login::{login_handler, LoginRequest, LoginResponse};
