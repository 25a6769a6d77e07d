use std::sync::Arc;

mod app;
mod auth;
mod chirps;
mod config;
mod db;
mod error;
#[cfg(test)]
mod memory;
mod ops;
mod state;
mod users;
mod webhooks;

use crate::{config::AppConfig, db::PgStore, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "chirpy=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let pool = db::connect(&config.database_url).await?;
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let port = config.port;
    let state = AppState::new(config, Arc::new(PgStore::new(pool)));
    tracing::info!(
        port,
        server_dir = %state.config.file_path_root,
        "starting the server"
    );

    app::serve(app::build_app(state), port).await
}
