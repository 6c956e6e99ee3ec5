use std::sync::Arc;

use askama::Template;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::AppState;
use crate::clients::drilldown::{DetailView, ToggleOutcome};
use crate::clients::refresh::RefreshOutcome;
use crate::drilldown::{DrillAction, JobKey, ServerKey};
use crate::export::{build_context, failure_report, share_context};
use crate::models::views::{JobObjectsView, SqlDatabasesView};
use crate::render::DashboardPage;

pub const EXPANSION_HEADER: &str = "x-expansion";
/// Per-browser id the page script sends with drill-down requests.
pub const VIEWER_HEADER: &str = "x-viewer";
const MAX_VIEWER_LEN: usize = 64;

pub(crate) fn render_template(tmpl: &impl Template) -> Response {
    match tmpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

// --- Dashboard ---

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub page: Arc<DashboardPage>,
    pub chart_json: String,
}

impl DashboardTemplate {
    pub fn new(page: Arc<DashboardPage>) -> Self {
        Self {
            title: "Capacity Dashboard".to_string(),
            chart_json: page.chart_json(),
            page,
        }
    }
}

pub async fn handle_dashboard(State(state): State<AppState>) -> Response {
    let page = state.dashboard.page().await;
    render_template(&DashboardTemplate::new(page))
}

pub async fn handle_refresh(State(state): State<AppState>) -> Redirect {
    match state.dashboard.refresh().await {
        RefreshOutcome::AlreadyRunning => info!("manual refresh skipped, one is running"),
        outcome => info!(?outcome, "manual refresh finished"),
    }
    Redirect::to("/ui/")
}

// --- Drill-down fragments ---

#[derive(Template)]
#[template(path = "job_objects.html")]
pub struct JobObjectsTemplate {
    pub view: JobObjectsView,
}

#[derive(Template)]
#[template(path = "sql_databases.html")]
pub struct SqlDatabasesTemplate {
    pub view: SqlDatabasesView,
}

#[derive(Template)]
#[template(path = "drilldown_error.html")]
pub struct DrilldownErrorTemplate {
    pub message: String,
    pub nested: bool,
}

#[derive(Debug, Deserialize)]
pub struct DrillParams {
    #[serde(default)]
    pub action: DrillAction,
}

/// Requests without a viewer id share one anonymous scope.
fn viewer(headers: &HeaderMap) -> String {
    headers
        .get(VIEWER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(MAX_VIEWER_LEN).collect())
        .unwrap_or_default()
}

pub async fn handle_job_drilldown(
    State(state): State<AppState>,
    Path((cluster, job_id)): Path<(String, String)>,
    Query(params): Query<DrillParams>,
    headers: HeaderMap,
) -> Response {
    let outcome = state
        .drilldown
        .drill_job(&viewer(&headers), JobKey { cluster, job_id }, params.action)
        .await;
    fragment_response(outcome, false)
}

pub async fn handle_server_drilldown(
    State(state): State<AppState>,
    Path((cluster, job_id, server)): Path<(String, String, String)>,
    Query(params): Query<DrillParams>,
    headers: HeaderMap,
) -> Response {
    let key = ServerKey {
        job: JobKey { cluster, job_id },
        server,
    };
    let outcome = state
        .drilldown
        .drill_server(&viewer(&headers), key, params.action)
        .await;
    fragment_response(outcome, true)
}

fn fragment_response(outcome: ToggleOutcome, nested: bool) -> Response {
    let header = HeaderValue::from_static(outcome.header_value());
    let mut resp = match outcome {
        ToggleOutcome::Expanded(DetailView::Job(view)) => {
            render_template(&JobObjectsTemplate { view })
        }
        ToggleOutcome::Expanded(DetailView::Server(view)) => {
            render_template(&SqlDatabasesTemplate { view })
        }
        ToggleOutcome::Failed(message) => {
            render_template(&DrilldownErrorTemplate { message, nested })
        }
        ToggleOutcome::Collapsed | ToggleOutcome::Stale => Html(String::new()).into_response(),
    };
    resp.headers_mut().insert(EXPANSION_HEADER, header);
    resp
}

// --- Assistant ---

pub async fn handle_assistant(State(state): State<AppState>) -> Response {
    let page = state.dashboard.page().await;
    let text = build_context(&page);
    let clipboard = state.clipboard.clone();
    let launcher = state.launcher.clone();
    let uris = state.config.assistant.launch_uris.clone();

    let result = tokio::task::spawn_blocking(move || {
        share_context(&text, clipboard.as_ref(), launcher.as_ref(), &uris)
    })
    .await;

    match result {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(e)) => {
            warn!("context export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failure_report(&e))).into_response()
        }
        Err(e) => {
            warn!("context export task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
