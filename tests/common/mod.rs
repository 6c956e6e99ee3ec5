//! In-process stand-in for the analytics API.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use capacity_console::cache::SnapshotCache;
use capacity_console::clients::AnalyticsClient;
use capacity_console::clients::drilldown::Drilldown;
use capacity_console::clients::refresh::Dashboard;
use capacity_console::config::default_tenants;

#[derive(Default)]
pub struct StubApi {
    pub fail_capacity: AtomicBool,
    pub fail_storage: AtomicBool,
    pub fail_jobs: AtomicBool,
    pub slow_capacity: AtomicBool,
    pub capacity_hits: AtomicUsize,
}

impl StubApi {
    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }
}

async fn feed(State(stub): State<Arc<StubApi>>, Path(feed): Path<String>) -> Response {
    match feed.as_str() {
        "capacity" => {
            stub.capacity_hits.fetch_add(1, Ordering::SeqCst);
            if stub.slow_capacity.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(400)).await;
            }
            if stub.fail_capacity.load(Ordering::SeqCst) {
                return (StatusCode::INTERNAL_SERVER_ERROR, "capacity offline").into_response();
            }
            Json(json!({
                "clusters": [
                    {
                        "name": "PROD-A",
                        "usedTB": 412.5,
                        "utilization": 82.4,
                        "daysTo80": 0,
                        "dailyGrowth": "0.45",
                        "monthlyGrowth": "13.5"
                    },
                    {
                        "name": "DR-B",
                        "usedTB": "120.0",
                        "utilization": "41.0",
                        "daysTo80": "N/A"
                    }
                ],
                "summary": {
                    "totalClusters": 2,
                    "aggregateUsedTB": 532.5,
                    "aggregateCapacityTB": 1000,
                    "aggregatePercentUsed": 53.25,
                    "criticalClusters": 1
                },
                "recommendations": ["Expand PROD-A before quarter end"]
            }))
            .into_response()
        }
        "storage-health" if stub.fail_storage.load(Ordering::SeqCst) => {
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
        "consumers" => Json(json!({
            "topConsumers": [
                {
                    "id": 42,
                    "name": "SQL-Nightly",
                    "clusterName": "PROD-A",
                    "storageConsumedTB": "18.20",
                    "logicalSizeTB": "96.00",
                    "dedupRatio": 5.3,
                    "numFiles": 120
                }
            ],
            "summary": {
                "totalStorageConsumedTB": "18.20",
                "totalLogicalTB": "96.00",
                "totalJobs": 1,
                "overallDedupRatio": "5.27"
            }
        }))
        .into_response(),
        "trends" => Json(json!({
            "clusters": [
                {
                    "cluster": "PROD-A",
                    "trends": [
                        { "date": "2026-10-14", "usedTB": 410.0 },
                        { "date": "2026-10-15", "usedTB": 412.5 }
                    ]
                }
            ]
        }))
        .into_response(),
        _ => Json(json!({})).into_response(),
    }
}

async fn job_objects(
    State(stub): State<Arc<StubApi>>,
    Path((_cluster, _job_id)): Path<(String, String)>,
) -> Response {
    if stub.fail_jobs.load(Ordering::SeqCst) {
        return (StatusCode::BAD_GATEWAY, "cluster unreachable").into_response();
    }
    Json(json!({
        "objects": [
            { "name": "sql01.corp.local", "type": "kPhysical", "logicalGB": "512.0", "physicalGB": "96.0", "status": "Protected" },
            { "name": "fileserver", "type": "kVMware", "logicalGB": "128.0", "physicalGB": "40.0", "status": "Protected" }
        ],
        "totalObjects": 2
    }))
    .into_response()
}

/// Serve the stub on an ephemeral port and return its origin.
pub async fn spawn_stub(stub: Arc<StubApi>) -> String {
    let router = Router::new()
        .route("/api/job-objects/{cluster}/{job_id}", get(job_objects))
        .route("/api/{feed}", get(feed))
        .with_state(stub);
    serve(router).await
}

pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub struct Harness {
    pub stub: Arc<StubApi>,
    pub origin: String,
    pub dashboard: Arc<Dashboard>,
    pub drilldown: Arc<Drilldown>,
    pub cache_dir: tempfile::TempDir,
}

pub async fn harness() -> Harness {
    let stub = Arc::new(StubApi::default());
    let origin = spawn_stub(stub.clone()).await;
    let cache_dir = tempfile::tempdir().unwrap();

    let client = Arc::new(AnalyticsClient::new(origin.clone(), Duration::from_secs(5)).unwrap());
    let drilldown = Arc::new(Drilldown::new(client.clone()));
    let dashboard = Arc::new(Dashboard::new(
        client,
        SnapshotCache::new(cache_dir.path().join("dashboard.json")),
        drilldown.clone(),
        default_tenants(),
        2,
    ));

    Harness {
        stub,
        origin,
        dashboard,
        drilldown,
        cache_dir,
    }
}
