use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    // External auth/CORS policy is a collaborator concern; stay permissive.
    CorsLayer::very_permissive()
}

/// Public entry: load configuration, open the store connection, bring the
/// schema up to date and serve until interrupted.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    // A missing database URL is fatal here, before anything binds.
    let cfg = configs::AppConfig::load_and_validate()?;

    let db = models::db::connect(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("schema migrations applied");

    let state = AppState { db };
    let app: Router = routes::build_router(
        state,
        build_cors(),
        Duration::from_secs(cfg.server.request_timeout_secs),
    );

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting user directory server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    } else {
        info!("received Ctrl+C, shutting down");
    }
}
