pub mod api;
pub mod ui;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // JSON
        .route("/api/status", get(api::handle_status))
        .route("/api/snapshot", get(api::handle_snapshot))
        // Health
        .route("/healthz", get(api::handle_healthz))
        // Dashboard UI
        .route("/ui/", get(ui::handle_dashboard))
        .route("/ui/refresh", post(ui::handle_refresh))
        .route(
            "/ui/drilldown/jobs/{cluster}/{job_id}",
            post(ui::handle_job_drilldown),
        )
        .route(
            "/ui/drilldown/jobs/{cluster}/{job_id}/servers/{server}",
            post(ui::handle_server_drilldown),
        )
        .route("/ui/assistant", post(ui::handle_assistant))
        // Static files
        .nest_service("/ui/static", ServeDir::new("static"))
        // Root redirect
        .route(
            "/",
            get(|| async {
                axum::response::Redirect::to("/ui/")
            }),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
