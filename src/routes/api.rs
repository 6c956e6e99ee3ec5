use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;
use crate::clients::refresh::RefreshState;

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub state: RefreshState,
    pub last_update: String,
    pub api_origin: String,
    pub api_reachable: bool,
    pub last_contact: Option<DateTime<Utc>>,
}

pub async fn handle_status(State(state): State<AppState>) -> Json<StatusView> {
    let dashboard = &state.dashboard;
    let page = dashboard.page().await;
    Json(StatusView {
        state: dashboard.state().await,
        last_update: page.last_update.clone(),
        api_origin: dashboard.client().origin().to_string(),
        api_reachable: dashboard.client().is_reachable(),
        last_contact: dashboard.client().last_contact(),
    })
}

pub async fn handle_snapshot(State(state): State<AppState>) -> Response {
    match state.dashboard.cache().read().await {
        Ok(Some(snapshot)) => Json(snapshot).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "no snapshot stored\n").into_response(),
        Err(e) => {
            tracing::warn!("snapshot unreadable: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn handle_healthz() -> &'static str {
    "ok\n"
}
