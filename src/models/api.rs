use serde::{Deserialize, Serialize};

// Payloads published by the analytics API. Every field defaults so that a
// partial or older document still deserializes; rendering decides what an
// absent value looks like.

// --- Capacity ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityReport {
    #[serde(deserialize_with = "lenient::or_default")]
    pub clusters: Vec<ClusterCapacity>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub summary: CapacitySummary,
    pub hottest_cluster: Option<HottestCluster>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterCapacity {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "usedTB", deserialize_with = "lenient::f64")]
    pub used_tb: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub utilization: f64,
    #[serde(rename = "daysTo80", deserialize_with = "lenient::opt_days")]
    pub days_to_80: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub daily_growth: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub monthly_growth: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacitySummary {
    #[serde(deserialize_with = "lenient::u32")]
    pub total_clusters: u32,
    #[serde(rename = "aggregateUsedTB", deserialize_with = "lenient::f64")]
    pub aggregate_used_tb: f64,
    #[serde(rename = "aggregateCapacityTB", deserialize_with = "lenient::f64")]
    pub aggregate_capacity_tb: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub aggregate_percent_used: f64,
    #[serde(deserialize_with = "lenient::u32")]
    pub critical_clusters: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HottestCluster {
    #[serde(deserialize_with = "lenient::text")]
    pub cluster_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub current: HottestCurrent,
    #[serde(deserialize_with = "lenient::or_default")]
    pub forecast: HottestForecast,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HottestCurrent {
    #[serde(deserialize_with = "lenient::f64")]
    pub utilization_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HottestForecast {
    #[serde(rename = "daysTo80Percent", deserialize_with = "lenient::opt_days")]
    pub days_to_80_percent: Option<String>,
}

// --- Capacity trends ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendsReport {
    #[serde(deserialize_with = "lenient::or_default")]
    pub clusters: Vec<ClusterTrend>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterTrend {
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub trends: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendPoint {
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(rename = "usedTB", deserialize_with = "lenient::f64")]
    pub used_tb: f64,
}

// --- Backup failures ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FailureReport {
    #[serde(deserialize_with = "lenient::or_default")]
    pub failures: Vec<FailureRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FailureRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub job_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub object_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: String,
    #[serde(deserialize_with = "lenient::text")]
    pub error: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub hours_ago: f64,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub start_time: Option<String>,
}

// --- System analysis ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemAnalysis {
    #[serde(deserialize_with = "lenient::or_default")]
    pub unprotected_resources: Vec<UnprotectedResource>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub duplicate_backups: Vec<DuplicateBackup>,
    #[serde(deserialize_with = "lenient::u32")]
    pub unprotected_count: u32,
    #[serde(deserialize_with = "lenient::u32")]
    pub duplicate_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UnprotectedResource {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicateBackup {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub jobs: Vec<String>,
}

// --- Growth ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TopGrowingReport {
    #[serde(deserialize_with = "lenient::or_default")]
    pub top_growing: Vec<GrowingResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GrowingResource {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub daily_growth: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub size: f64,
}

/// The three `top-growing` windows, in the shape the snapshot cache stores.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrowthWindows {
    #[serde(deserialize_with = "lenient::or_default")]
    pub data1day: TopGrowingReport,
    #[serde(deserialize_with = "lenient::or_default")]
    pub data7day: TopGrowingReport,
    #[serde(deserialize_with = "lenient::or_default")]
    pub data30day: TopGrowingReport,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlGrowthReport {
    #[serde(deserialize_with = "lenient::u32")]
    pub total_databases: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub top1day: Vec<SqlGrower>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub top7day: Vec<SqlGrower>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub top30day: Vec<SqlGrower>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlGrower {
    /// `instance/database` as reported by the API.
    #[serde(deserialize_with = "lenient::text")]
    pub database: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: String,
    #[serde(rename = "growthGB", deserialize_with = "lenient::f64")]
    pub growth_gb: f64,
    #[serde(rename = "currentSizeGB", deserialize_with = "lenient::f64")]
    pub current_size_gb: f64,
}

impl SqlGrower {
    pub fn display_name(&self) -> &str {
        match self.database.split('/').nth(1) {
            Some(name) if !name.is_empty() => name,
            _ => &self.database,
        }
    }
}

// --- Consumers and drill-down ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsumerReport {
    #[serde(deserialize_with = "lenient::or_default")]
    pub top_consumers: Vec<ConsumerRecord>,
    pub summary: Option<ConsumerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsumerRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster_name: String,
    #[serde(rename = "storageConsumedTB", deserialize_with = "lenient::text")]
    pub storage_consumed_tb: String,
    #[serde(rename = "logicalSizeTB", deserialize_with = "lenient::text")]
    pub logical_size_tb: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub dedup_ratio: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub num_files: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsumerSummary {
    #[serde(rename = "totalStorageConsumedTB", deserialize_with = "lenient::text")]
    pub total_storage_consumed_tb: String,
    #[serde(rename = "totalLogicalTB", deserialize_with = "lenient::text")]
    pub total_logical_tb: String,
    #[serde(deserialize_with = "lenient::text")]
    pub total_jobs: String,
    #[serde(deserialize_with = "lenient::text")]
    pub overall_dedup_ratio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobObjectList {
    #[serde(deserialize_with = "lenient::or_default")]
    pub objects: Vec<JobObject>,
    #[serde(deserialize_with = "lenient::u64")]
    pub total_objects: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobObject {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(rename = "logicalGB", deserialize_with = "lenient::text")]
    pub logical_gb: String,
    #[serde(rename = "physicalGB", deserialize_with = "lenient::text")]
    pub physical_gb: String,
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlDatabaseList {
    #[serde(deserialize_with = "lenient::or_default")]
    pub databases: Vec<SqlDatabase>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlDatabase {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub instance: String,
    #[serde(rename = "logicalGB", deserialize_with = "lenient::opt_f64")]
    pub logical_gb: Option<f64>,
    #[serde(rename = "growth1day", deserialize_with = "lenient::opt_f64")]
    pub growth_1day: Option<f64>,
    #[serde(rename = "growth7day", deserialize_with = "lenient::opt_f64")]
    pub growth_7day: Option<f64>,
    #[serde(rename = "growth30day", deserialize_with = "lenient::opt_f64")]
    pub growth_30day: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
}

// --- M365 ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct M365Summary {
    #[serde(deserialize_with = "lenient::u32")]
    pub tenants: u32,
    #[serde(deserialize_with = "lenient::u64")]
    pub protected_objects: u64,
    #[serde(rename = "totalCapacityGB", deserialize_with = "lenient::f64")]
    pub total_capacity_gb: f64,
    #[serde(deserialize_with = "lenient::u32")]
    pub failed_runs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct M365TopUsers {
    #[serde(deserialize_with = "lenient::or_default")]
    pub top_users: Vec<TenantObject>,
}

/// One per-tenant object-type row. `kind == "Total"` carries the tenant totals.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantObject {
    #[serde(deserialize_with = "lenient::text")]
    pub tenant: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::u64")]
    pub count: u64,
    #[serde(rename = "sizeGB", deserialize_with = "lenient::text")]
    pub size_gb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct M365Failures {
    #[serde(deserialize_with = "lenient::or_default")]
    pub failures: Vec<M365Failure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct M365Failure {
    pub tenant: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub protection_group_name: String,
    pub start_time: Option<String>,
    #[serde(deserialize_with = "lenient::u64")]
    pub objects_failed_count: u64,
}

// --- Storage health ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageHealth {
    #[serde(deserialize_with = "lenient::or_default")]
    pub summary: StorageHealthSummary,
    #[serde(deserialize_with = "lenient::or_default")]
    pub deleted_jobs: Vec<DeletedJob>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cluster_storage: Vec<ClusterStorage>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub stale_snapshots: Vec<StaleSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageHealthSummary {
    #[serde(deserialize_with = "lenient::u64")]
    pub deleted_job_count: u64,
    #[serde(deserialize_with = "lenient::u64")]
    pub orphaned_snapshots: u64,
    #[serde(rename = "orphanedStorageTB", deserialize_with = "lenient::f64")]
    pub orphaned_storage_tb: f64,
    #[serde(rename = "totalUsedTB", deserialize_with = "lenient::f64")]
    pub total_used_tb: f64,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub avg_dedupe_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DeletedJob {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: String,
    #[serde(deserialize_with = "lenient::u64")]
    pub snapshots: u64,
    #[serde(rename = "storageTB", deserialize_with = "lenient::f64")]
    pub storage_tb: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub age: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterStorage {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "usedTB", deserialize_with = "lenient::text")]
    pub used_tb: String,
    #[serde(rename = "capacityTB", deserialize_with = "lenient::text")]
    pub capacity_tb: String,
    #[serde(deserialize_with = "lenient::text")]
    pub used_pct: String,
    #[serde(deserialize_with = "lenient::text")]
    pub dedup_ratio: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub status: StorageStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageStatus {
    #[default]
    Ok,
    Warning,
    Critical,
    #[serde(other)]
    Unknown,
}

impl StorageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageStatus::Ok => "OK",
            StorageStatus::Warning => "WARNING",
            StorageStatus::Critical => "CRITICAL",
            StorageStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StaleSnapshot {
    #[serde(deserialize_with = "lenient::text")]
    pub job_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: String,
    #[serde(deserialize_with = "lenient::u64")]
    pub total_snapshots: u64,
    #[serde(deserialize_with = "lenient::u64")]
    pub stale_snapshots: u64,
    #[serde(deserialize_with = "lenient::text")]
    pub oldest_age: String,
}

/// Everything one refresh fetches. Optional feeds hold their empty default
/// when the API could not provide them.
#[derive(Debug, Clone, Default)]
pub struct DashboardFeeds {
    pub capacity: CapacityReport,
    pub trends: TrendsReport,
    pub failures: FailureReport,
    pub analysis: SystemAnalysis,
    pub growth: GrowthWindows,
    pub sql_growth: SqlGrowthReport,
    pub consumers: ConsumerReport,
    pub m365_summary: M365Summary,
    pub m365_top_users: M365TopUsers,
    pub m365_failures: M365Failures,
    pub storage_health: StorageHealth,
}

/// Deserializers for fields the API ships either as numbers or as numeric strings.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(number(&Value::deserialize(d)?).unwrap_or(0.0))
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(number(&Value::deserialize(d)?))
    }

    /// `null` reads as the type's default, as an absent key would.
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    // Float to int casts saturate; negatives and NaN become 0.
    pub fn u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(number(&Value::deserialize(d)?).unwrap_or(0.0) as u32)
    }

    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(number(&Value::deserialize(d)?).unwrap_or(0.0) as u64)
    }

    /// A day count where zero means "no forecast".
    pub fn opt_days<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(opt_text(d)?.filter(|s| s.trim().parse::<f64>().map_or(true, |n| n != 0.0)))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_text(d)?.unwrap_or_default())
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    fn number(v: &Value) -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => leading_number(s),
            _ => None,
        }
    }

    // Accepts "12.5", " 12.5 GB" and "-3"; stops at the first character
    // that cannot continue a decimal number.
    fn leading_number(s: &str) -> Option<f64> {
        let s = s.trim_start();
        let mut end = 0;
        for (i, c) in s.char_indices() {
            let sign = (c == '-' || c == '+') && i == 0;
            if c.is_ascii_digit() || c == '.' || sign {
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        s[..end].parse().ok()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_are_accepted() {
        let doc = r#"{"topGrowing":[{"name":"vm1","cluster":"c1","type":"kVMware","dailyGrowth":"4.5","size":"120.0 GB"}]}"#;
        let report: TopGrowingReport = serde_json::from_str(doc).unwrap();
        assert_eq!(report.top_growing[0].daily_growth, 4.5);
        assert_eq!(report.top_growing[0].size, 120.0);
        assert_eq!(report.top_growing[0].kind, "kVMware");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let health: StorageHealth = serde_json::from_str("{}").unwrap();
        assert!(health.deleted_jobs.is_empty());
        assert!(health.cluster_storage.is_empty());
        assert_eq!(health.summary.avg_dedupe_ratio, None);

        let capacity: CapacityReport = serde_json::from_str("{}").unwrap();
        assert!(capacity.clusters.is_empty());
        assert!(capacity.hottest_cluster.is_none());
    }

    #[test]
    fn null_collections_read_as_empty() {
        let doc = r#"{"unprotectedResources":null,"duplicateBackups":[],"unprotectedCount":null}"#;
        let analysis: SystemAnalysis = serde_json::from_str(doc).unwrap();
        assert!(analysis.unprotected_resources.is_empty());
        assert_eq!(analysis.unprotected_count, 0);

        let doc = r#"{"clusters":null,"summary":null,"recommendations":null}"#;
        let capacity: CapacityReport = serde_json::from_str(doc).unwrap();
        assert!(capacity.clusters.is_empty());
        assert!(capacity.recommendations.is_empty());
        assert_eq!(capacity.summary.total_clusters, 0);

        let doc = r#"{"summary":{"deletedJobCount":null},"deletedJobs":null,"clusterStorage":[{"name":null,"status":null}]}"#;
        let health: StorageHealth = serde_json::from_str(doc).unwrap();
        assert!(health.deleted_jobs.is_empty());
        assert_eq!(health.cluster_storage[0].name, "");
        assert_eq!(health.cluster_storage[0].status, StorageStatus::Ok);
    }

    #[test]
    fn counts_accept_strings_and_floats() {
        let doc = r#"{"totalClusters":"4","criticalClusters":1.0}"#;
        let summary: CapacitySummary = serde_json::from_str(doc).unwrap();
        assert_eq!(summary.total_clusters, 4);
        assert_eq!(summary.critical_clusters, 1);

        let doc = r#"{"tenants":"2","protectedObjects":300.0,"failedRuns":-1}"#;
        let m365: M365Summary = serde_json::from_str(doc).unwrap();
        assert_eq!(m365.tenants, 2);
        assert_eq!(m365.protected_objects, 300);
        assert_eq!(m365.failed_runs, 0);
    }

    #[test]
    fn zero_days_to_80_is_no_forecast() {
        let c: ClusterCapacity = serde_json::from_str(r#"{"daysTo80":0,"utilization":85}"#).unwrap();
        assert_eq!(c.days_to_80, None);
        let c: ClusterCapacity = serde_json::from_str(r#"{"daysTo80":"0"}"#).unwrap();
        assert_eq!(c.days_to_80, None);
        let c: ClusterCapacity = serde_json::from_str(r#"{"daysTo80":45}"#).unwrap();
        assert_eq!(c.days_to_80.as_deref(), Some("45"));
        let c: ClusterCapacity = serde_json::from_str(r#"{"daysTo80":"N/A"}"#).unwrap();
        assert_eq!(c.days_to_80.as_deref(), Some("N/A"));

        let f: HottestForecast = serde_json::from_str(r#"{"daysTo80Percent":0}"#).unwrap();
        assert_eq!(f.days_to_80_percent, None);
    }

    #[test]
    fn consumer_ids_may_be_numbers() {
        let doc = r#"{"topConsumers":[{"id":42,"name":"SQL-Prod","clusterName":"c1","storageConsumedTB":1.25,"logicalSizeTB":"30.1","dedupRatio":24.1,"numFiles":1200}]}"#;
        let report: ConsumerReport = serde_json::from_str(doc).unwrap();
        let c = &report.top_consumers[0];
        assert_eq!(c.id, "42");
        assert_eq!(c.storage_consumed_tb, "1.25");
        assert_eq!(c.logical_size_tb, "30.1");
        assert!(report.summary.is_none());
    }

    #[test]
    fn unknown_storage_status_is_tolerated() {
        let doc = r#"[{"name":"a","status":"WARNING"},{"name":"b","status":"DEGRADED"}]"#;
        let rows: Vec<ClusterStorage> = serde_json::from_str(doc).unwrap();
        assert_eq!(rows[0].status, StorageStatus::Warning);
        assert_eq!(rows[1].status, StorageStatus::Unknown);
    }

    #[test]
    fn sql_display_name_drops_instance() {
        let g = SqlGrower {
            database: "MSSQLSERVER/Orders".to_string(),
            ..Default::default()
        };
        assert_eq!(g.display_name(), "Orders");
        let bare = SqlGrower {
            database: "Orders".to_string(),
            ..Default::default()
        };
        assert_eq!(bare.display_name(), "Orders");
    }
}
