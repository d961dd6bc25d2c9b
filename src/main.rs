// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use waste_detect_node::api::http_server::{start_server, AppState};
use waste_detect_node::config::AppConfig;
use waste_detect_node::version;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("{}", version::get_version_string());

    let config = AppConfig::from_env()?;
    tracing::info!(
        bind = %config.bind_addr,
        model = %config.model_path.display(),
        uploads = %config.upload_dir.display(),
        "configuration loaded"
    );

    let state = AppState::from_config(config)?;

    start_server(state).await
}
