pub mod drilldown;
pub mod refresh;

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::try_join;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{FetchError, ParseError};
use crate::models::api::{
    CapacityReport, ConsumerReport, FailureReport, GrowthWindows, JobObjectList, M365Failures,
    M365Summary, M365TopUsers, SqlDatabaseList, SqlGrowthReport, StorageHealth, SystemAnalysis,
    TopGrowingReport, TrendsReport,
};

/// Typed access to the analytics API, one method per endpoint.
pub struct AnalyticsClient {
    origin: String,
    http: Client,
    state: Mutex<ClientState>,
}

struct ClientState {
    reachable: bool,
    last_contact: Option<DateTime<Utc>>,
}

impl AnalyticsClient {
    pub fn new(origin: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            origin: origin.into(),
            http,
            state: Mutex::new(ClientState {
                reachable: true,
                last_contact: None,
            }),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether the last request got an HTTP response at all.
    pub fn is_reachable(&self) -> bool {
        self.state.lock().map(|s| s.reachable).unwrap_or(false)
    }

    pub fn last_contact(&self) -> Option<DateTime<Utc>> {
        self.state.lock().ok().and_then(|s| s.last_contact)
    }

    pub async fn capacity(&self) -> Result<CapacityReport, FetchError> {
        self.get_json(&["capacity"], &[]).await
    }

    pub async fn trends(&self, days: u32) -> Result<TrendsReport, FetchError> {
        self.get_json(&["trends"], &[("days", days.to_string())]).await
    }

    pub async fn failures(&self, days: u32) -> Result<FailureReport, FetchError> {
        self.get_json(&["failures"], &[("days", days.to_string())])
            .await
    }

    pub async fn system_analysis(&self) -> Result<SystemAnalysis, FetchError> {
        self.get_json(&["system-analysis"], &[]).await
    }

    pub async fn top_growing(&self, days: u32, limit: u32) -> Result<TopGrowingReport, FetchError> {
        self.get_json(
            &["top-growing"],
            &[("days", days.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// The 1, 7 and 30 day top-growing lists, fetched together. Any window
    /// failing fails the group.
    pub async fn growth_windows(&self, limit: u32) -> Result<GrowthWindows, FetchError> {
        let (data1day, data7day, data30day) = try_join!(
            self.top_growing(1, limit),
            self.top_growing(7, limit),
            self.top_growing(30, limit),
        )?;
        Ok(GrowthWindows {
            data1day,
            data7day,
            data30day,
        })
    }

    pub async fn sql_top_growers(&self, top_n: u32) -> Result<SqlGrowthReport, FetchError> {
        self.get_json(&["sql-top-growers"], &[("topN", top_n.to_string())])
            .await
    }

    pub async fn consumers(&self, limit: u32) -> Result<ConsumerReport, FetchError> {
        self.get_json(&["consumers"], &[("limit", limit.to_string())])
            .await
    }

    pub async fn m365_summary(&self) -> Result<M365Summary, FetchError> {
        self.get_json(&["m365-summary"], &[]).await
    }

    pub async fn m365_top_users(&self, top_n: u32) -> Result<M365TopUsers, FetchError> {
        self.get_json(&["m365-top-users"], &[("topN", top_n.to_string())])
            .await
    }

    pub async fn m365_failures(&self, days: u32) -> Result<M365Failures, FetchError> {
        self.get_json(&["m365-failures"], &[("days", days.to_string())])
            .await
    }

    pub async fn storage_health(&self) -> Result<StorageHealth, FetchError> {
        self.get_json(&["storage-health"], &[]).await
    }

    pub async fn job_objects(
        &self,
        cluster: &str,
        job_id: &str,
        top_n: u32,
    ) -> Result<JobObjectList, FetchError> {
        self.get_json(
            &["job-objects", cluster, job_id],
            &[("topN", top_n.to_string())],
        )
        .await
    }

    pub async fn sql_databases(
        &self,
        cluster: &str,
        job_id: &str,
        server: &str,
        top_n: u32,
    ) -> Result<SqlDatabaseList, FetchError> {
        self.get_json(
            &["sql-databases", cluster, job_id, server],
            &[("topN", top_n.to_string())],
        )
        .await
    }

    /// `{origin}/api/{segments...}?{query}` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.origin).map_err(|e| FetchError::Url(format!("{}: {}", self.origin, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(self.origin.clone()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(segments, query)?;
        debug!(%url, "fetching");

        let resp = self
            .http
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| {
                self.mark(false);
                FetchError::Transport {
                    url: url.to_string(),
                    source,
                }
            })?;
        self.mark(true);

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| {
            FetchError::Parse(ParseError {
                url: url.to_string(),
                source,
            })
        })
    }

    fn mark(&self, reachable: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.reachable = reachable;
            if reachable {
                state.last_contact = Some(Utc::now());
            }
        }
    }
}
