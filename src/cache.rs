use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::models::api::{
    CapacityReport, ConsumerReport, DashboardFeeds, GrowthWindows, TrendsReport,
};

/// The part of a successful refresh kept on disk for the fallback page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    pub timestamp: DateTime<Local>,
    #[serde(default)]
    pub capacity: CapacityReport,
    #[serde(default)]
    pub trends: TrendsReport,
    #[serde(default)]
    pub top_growing: GrowthWindows,
    #[serde(default)]
    pub consumers: ConsumerReport,
}

impl CachedSnapshot {
    pub fn from_feeds(feeds: &DashboardFeeds, timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            capacity: feeds.capacity.clone(),
            trends: feeds.trends.clone(),
            top_growing: feeds.growth.clone(),
            consumers: feeds.consumers.clone(),
        }
    }
}

/// One JSON document on local disk, overwritten on every successful refresh.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
}

impl SnapshotCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, snapshot: &CachedSnapshot) -> Result<(), CacheError> {
        let data = serde_json::to_vec(snapshot).map_err(|source| CacheError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| CacheError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&self.path, data)
            .await
            .map_err(|source| CacheError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    pub async fn read(&self) -> Result<Option<CachedSnapshot>, CacheError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| CacheError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// The stored snapshot, or `None` when there is none or it cannot be read.
    pub async fn load(&self) -> Option<CachedSnapshot> {
        match self.read().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("ignoring unreadable snapshot: {}", e);
                None
            }
        }
    }
}
