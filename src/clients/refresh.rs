use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use futures_util::{join, try_join};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::time::{self, Duration};
use tracing::{error, info, warn};

use crate::cache::{CachedSnapshot, SnapshotCache};
use crate::config::TenantDef;
use crate::error::FetchError;
use crate::helpers::timestamp_label;
use crate::models::api::DashboardFeeds;
use crate::render::{DashboardPage, LOADING_LABEL, NO_CACHE_LABEL, render_cached, render_live};

use super::AnalyticsClient;
use super::drilldown::Drilldown;

const FAILURE_DAYS: u32 = 7;
const GROWTH_LIMIT: u32 = 20;
const SQL_TOP_N: u32 = 5;
const CONSUMER_LIMIT: u32 = 15;
const M365_TOP_USERS: u32 = 10;
const TREND_DAYS: u32 = 30;
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Idle,
    Loading,
    Rendered,
    CacheFallback,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered,
    CacheFallback,
    Empty,
    AlreadyRunning,
}

/// Owns the published dashboard page and the refresh cycle that replaces it.
pub struct Dashboard {
    client: Arc<AnalyticsClient>,
    cache: SnapshotCache,
    drilldown: Arc<Drilldown>,
    tenants: Vec<TenantDef>,
    refresh_hour: u32,
    page: RwLock<Arc<DashboardPage>>,
    state: RwLock<RefreshState>,
    refresh_lock: Mutex<()>,
}

impl Dashboard {
    pub fn new(
        client: Arc<AnalyticsClient>,
        cache: SnapshotCache,
        drilldown: Arc<Drilldown>,
        tenants: Vec<TenantDef>,
        refresh_hour: u32,
    ) -> Self {
        Self {
            client,
            cache,
            drilldown,
            tenants,
            refresh_hour,
            page: RwLock::new(Arc::new(DashboardPage::default())),
            state: RwLock::new(RefreshState::Idle),
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn page(&self) -> Arc<DashboardPage> {
        self.page.read().await.clone()
    }

    pub async fn state(&self) -> RefreshState {
        *self.state.read().await
    }

    pub fn client(&self) -> &AnalyticsClient {
        &self.client
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Run one refresh cycle. A call made while another is in flight returns
    /// `AlreadyRunning` and leaves the page alone.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            info!("refresh already in progress");
            return RefreshOutcome::AlreadyRunning;
        };

        self.set_state(RefreshState::Loading).await;
        let mut loading = (*self.page().await).clone();
        loading.last_update = LOADING_LABEL.to_string();
        self.publish(loading).await;
        self.drilldown.clear();

        match self.fetch_feeds().await {
            Ok(feeds) => {
                let now = Local::now();
                let mut page = DashboardPage::default();
                render_live(&feeds, &self.tenants, &mut page);
                page.last_update = timestamp_label(&now);
                self.publish(page).await;

                if let Err(e) = self.cache.save(&CachedSnapshot::from_feeds(&feeds, now)).await {
                    warn!("failed to persist snapshot: {}", e);
                }

                self.set_state(RefreshState::Rendered).await;
                info!(
                    clusters = feeds.capacity.clusters.len(),
                    consumers = feeds.consumers.top_consumers.len(),
                    "dashboard refreshed"
                );
                RefreshOutcome::Rendered
            }
            Err(e) => {
                error!("dashboard refresh failed: {}", e);
                match self.cache.load().await {
                    Some(snapshot) => {
                        let mut page = DashboardPage::default();
                        render_cached(&snapshot, &mut page);
                        self.publish(page).await;
                        self.set_state(RefreshState::CacheFallback).await;
                        info!(
                            taken = %timestamp_label(&snapshot.timestamp),
                            "showing cached snapshot"
                        );
                        RefreshOutcome::CacheFallback
                    }
                    None => {
                        self.publish(DashboardPage::with_label(NO_CACHE_LABEL)).await;
                        self.set_state(RefreshState::Empty).await;
                        RefreshOutcome::Empty
                    }
                }
            }
        }
    }

    /// Refresh at the configured hour of local time, then every 24 hours,
    /// until `shutdown` fires.
    pub async fn run_scheduler(self: Arc<Self>, mut shutdown: watch::Receiver<()>) {
        let delay = delay_until_next(&Local::now(), self.refresh_hour);
        info!(
            "next scheduled refresh in {}h{:02}m",
            delay.as_secs() / 3600,
            (delay.as_secs() % 3600) / 60
        );

        tokio::select! {
            _ = time::sleep(delay) => {}
            _ = shutdown.changed() => {
                info!("refresh scheduler shutting down");
                return;
            }
        }

        let mut interval = time::interval(DAY);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.refresh().await;
                }
                _ = shutdown.changed() => {
                    info!("refresh scheduler shutting down");
                    return;
                }
            }
        }
    }

    async fn fetch_feeds(&self) -> Result<DashboardFeeds, FetchError> {
        let c = &self.client;

        let mandatory = async {
            try_join!(
                c.capacity(),
                c.failures(FAILURE_DAYS),
                c.system_analysis(),
                c.growth_windows(GROWTH_LIMIT),
                c.sql_top_growers(SQL_TOP_N),
                c.consumers(CONSUMER_LIMIT),
            )
        };
        let optional = async {
            join!(
                c.m365_summary(),
                c.m365_top_users(M365_TOP_USERS),
                c.m365_failures(FAILURE_DAYS),
                c.storage_health(),
                c.trends(TREND_DAYS),
            )
        };

        let (mandatory, (m365_summary, m365_top_users, m365_failures, storage_health, trends)) =
            join!(mandatory, optional);
        let (capacity, failures, analysis, growth, sql_growth, consumers) = mandatory?;

        Ok(DashboardFeeds {
            capacity,
            trends: optional_feed("trends", trends),
            failures,
            analysis,
            growth,
            sql_growth,
            consumers,
            m365_summary: optional_feed("m365-summary", m365_summary),
            m365_top_users: optional_feed("m365-top-users", m365_top_users),
            m365_failures: optional_feed("m365-failures", m365_failures),
            storage_health: optional_feed("storage-health", storage_health),
        })
    }

    async fn publish(&self, page: DashboardPage) {
        *self.page.write().await = Arc::new(page);
    }

    async fn set_state(&self, state: RefreshState) {
        *self.state.write().await = state;
    }
}

fn optional_feed<T: Default>(feed: &str, result: Result<T, FetchError>) -> T {
    result.unwrap_or_else(|e| {
        warn!(feed, "optional feed unavailable, using empty default: {}", e);
        T::default()
    })
}

/// Time from `now` until the next `hour`:00 on the wall clock of `now`'s zone.
/// An hour that has already passed today means tomorrow.
pub fn delay_until_next<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Duration {
    let Some(mut target) = now.date_naive().and_hms_opt(hour, 0, 0) else {
        return DAY;
    };
    let local_now = now.naive_local();
    if target <= local_now {
        target += chrono::Duration::days(1);
    }

    let delta = match now.timezone().from_local_datetime(&target).earliest() {
        Some(at) => at.signed_duration_since(now.clone()),
        None => target - local_now,
    };
    delta.to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn before_the_hour_waits_until_today() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 1, 0, 0).unwrap();
        assert_eq!(delay_until_next(&now, 2), Duration::from_secs(3600));
    }

    #[test]
    fn at_or_after_the_hour_waits_until_tomorrow() {
        let at = Utc.with_ymd_and_hms(2026, 1, 10, 2, 0, 0).unwrap();
        assert_eq!(delay_until_next(&at, 2), DAY);

        let after = Utc.with_ymd_and_hms(2026, 1, 10, 3, 30, 0).unwrap();
        assert_eq!(
            delay_until_next(&after, 2),
            Duration::from_secs(22 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn uses_the_wall_clock_of_the_zone() {
        let zone = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = zone.with_ymd_and_hms(2026, 1, 10, 23, 0, 0).unwrap();
        assert_eq!(delay_until_next(&now, 2), Duration::from_secs(3 * 3600));
    }

    #[test]
    fn optional_feed_falls_back_to_default() {
        let err = FetchError::Url("nowhere".to_string());
        let v: Vec<u32> = optional_feed("test", Err(err));
        assert!(v.is_empty());
        assert_eq!(optional_feed("test", Ok(vec![1u32])), vec![1]);
    }
}
