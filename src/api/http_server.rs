// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server assembly: shared state, router and serve loop.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{self, CredentialLookup, StaticCredentialStore, TokenService};
use crate::config::AppConfig;
use crate::version;
use crate::vision::{Annotator, ClassLabels, Detector, YoloModel};

use super::{image, login};

/// Shared per-process state behind the router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<dyn CredentialLookup>,
    pub tokens: TokenService,
    /// Process-wide shared model handle, loaded once at startup. `None` when
    /// the model file was absent or failed to load; the image endpoint
    /// answers 503 in that case.
    pub detector: Option<Arc<dyn Detector>>,
    pub annotator: Arc<Annotator>,
}

impl AppState {
    /// Assemble state from configuration, loading labels and the detection
    /// model. A missing model degrades to an unavailable detector instead of
    /// failing startup.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let labels = match config.labels_path {
            Some(ref path) => ClassLabels::from_file(path).unwrap_or_else(|e| {
                tracing::warn!("falling back to placeholder labels: {:#}", e);
                ClassLabels::default()
            }),
            None => ClassLabels::default(),
        };

        let detector: Option<Arc<dyn Detector>> = match YoloModel::load(
            &config.model_path,
            labels,
            config.confidence_threshold,
            config.input_size,
        ) {
            Ok(model) => {
                tracing::info!(path = %config.model_path.display(), "detection model ready");
                Some(Arc::new(model))
            }
            Err(e) => {
                tracing::warn!("detection model unavailable: {:#}", e);
                None
            }
        };

        let annotator = Arc::new(Annotator::new(config.font_path.as_deref()));
        let tokens = TokenService::new(&config.secret_key, config.token_ttl_secs);

        Ok(Self {
            config: Arc::new(config),
            credentials: Arc::new(StaticCredentialStore::seeded()),
            tokens,
            detector,
            annotator,
        })
    }
}

/// Build the application router. Split out from [`start_server`] so tests can
/// drive it directly.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/image", post(image::image_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/login", post(login::login_handler))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_addr;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": version::VERSION_NUMBER,
        "model_loaded": state.detector.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
