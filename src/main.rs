use std::net::SocketAddr;
use std::sync::Arc;

// Import axum routing utilities and Router
use axum::{routing::get, Router};
use tower_http::services::ServeDir; // Used to serve static files (HTML/CSS/JS)

use study_planner::config::PlannerConfig;
use study_planner::logging;
use study_planner::routes_plan::{self, AppState};
use study_planner::routes_schedule;

#[tokio::main]
async fn main() {
    let config = match PlannerConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            std::process::exit(1);
        }
    };
    logging::init_logging(config.log_level());

    let addr: SocketAddr = match config.server.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(
                bind_addr = %config.server.bind_addr,
                error = %e,
                "invalid bind address"
            );
            std::process::exit(1);
        }
    };
    let static_dir = config.server.static_dir.clone();
    let state = Arc::new(AppState { config });

    let api = Router::new()
        // plan
        .route("/plan/today", get(routes_plan::get_today_plan))
        .route("/plan/week", get(routes_plan::get_week_plan))
        .route("/guidance", get(routes_plan::get_guidance))
        // schedules
        .route("/schedules", get(routes_schedule::get_schedules))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api)
        .nest_service("/", ServeDir::new(static_dir));

    tracing::info!(%addr, "server running");
    tracing::info!("API base: http://{}/api", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind failed");

    axum::serve(listener, app).await.expect("server error");
}
