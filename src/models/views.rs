use serde::Serialize;

/// Rows of one dashboard table. An empty table renders a single row holding
/// `empty_message` instead of nothing.
#[derive(Debug, Clone, Serialize)]
pub struct TableView<R> {
    pub rows: Vec<R>,
    pub empty_message: String,
}

impl<R> TableView<R> {
    pub fn new(rows: Vec<R>, empty_message: impl Into<String>) -> Self {
        Self {
            rows,
            empty_message: empty_message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of `<tr>` the table produces, counting the no-data row.
    pub fn rendered_rows(&self) -> usize {
        self.rows.len().max(1)
    }
}

impl<R> Default for TableView<R> {
    fn default() -> Self {
        Self::new(Vec::new(), "No data available")
    }
}

// --- Capacity ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UtilizationStatus {
    Optimal,
    Monitor,
    Critical,
    OverCapacity,
}

impl UtilizationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UtilizationStatus::Optimal => "OPTIMAL",
            UtilizationStatus::Monitor => "MONITOR",
            UtilizationStatus::Critical => "CRITICAL",
            UtilizationStatus::OverCapacity => "OVER CAPACITY",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            UtilizationStatus::Optimal => "status-healthy",
            UtilizationStatus::Monitor => "status-warning",
            UtilizationStatus::Critical | UtilizationStatus::OverCapacity => "status-critical",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterCardView {
    pub name: String,
    pub utilization: String,
    pub used_of_total: String,
    pub bar_width: String,
    pub status: UtilizationStatus,
    pub status_text: String,
    pub status_class: String,
    pub days_to_80: String,
    pub over_capacity: bool,
    pub daily_growth: String,
    pub monthly_growth: String,
}

impl ClusterCardView {
    /// The card's text content flattened to one line.
    pub fn plain_text(&self) -> String {
        let mut line = format!(
            "{} {} {} DAYS TO 80% {}",
            self.name, self.utilization, self.used_of_total, self.days_to_80
        );
        if self.over_capacity {
            line.push_str(&format!(" STATUS {}", self.status_text));
        }
        line
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub text: String,
    pub alert: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryPanel {
    pub lines: Vec<SummaryLine>,
}

impl Default for SummaryPanel {
    fn default() -> Self {
        Self {
            lines: vec![SummaryLine {
                text: "No capacity data available".to_string(),
                alert: false,
            }],
        }
    }
}

impl SummaryPanel {
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CapacityChart {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub color: String,
    pub data: Vec<Option<f64>>,
}

// --- Backup failures ---

#[derive(Debug, Clone, Default, Serialize)]
pub struct FailuresPanel {
    pub stats: String,
    pub table: TableView<FailureRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureRowView {
    pub age: String,
    pub recent: bool,
    pub job_name: String,
    pub object_name: String,
    pub cluster: String,
    pub error: String,
}

// --- System analysis ---

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemAnalysisPanel {
    pub healthy: bool,
    pub stats: String,
    pub unprotected: TableView<ResourceRowView>,
    pub duplicates: TableView<DuplicateRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceRowView {
    pub name: String,
    pub kind: String,
    pub cluster: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateRowView {
    pub name: String,
    pub kind: String,
    pub jobs: Vec<String>,
}

// --- Growth ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GrowthWindow {
    Day,
    Week,
    Month,
}

impl GrowthWindow {
    pub const ALL: [GrowthWindow; 3] = [GrowthWindow::Day, GrowthWindow::Week, GrowthWindow::Month];

    pub fn days(&self) -> u32 {
        match self {
            GrowthWindow::Day => 1,
            GrowthWindow::Week => 7,
            GrowthWindow::Month => 30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthWindow::Day => "24 Hours",
            GrowthWindow::Week => "7 Days",
            GrowthWindow::Month => "30 Days",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GrowthPanel {
    pub stats: String,
    pub windows: Vec<GrowthWindowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowthWindowView {
    pub window: GrowthWindow,
    pub label: String,
    pub table: TableView<GrowthRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowthRowView {
    pub name: String,
    pub source: String,
    pub is_sql: bool,
    pub cluster: String,
    pub growth: String,
    pub size: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SqlInsightsPanel {
    pub stats: String,
    pub windows: Vec<SqlWindowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlWindowView {
    pub window: GrowthWindow,
    pub label: String,
    pub table: TableView<SqlGrowerRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlGrowerRowView {
    pub name: String,
    pub cluster: String,
    pub growth: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopGrowingRowView {
    pub rank: usize,
    pub name: String,
    pub kind: String,
    pub cluster: String,
    pub daily: String,
    pub week: String,
    pub month: String,
    pub size: String,
}

// --- Consumers and drill-down ---

#[derive(Debug, Clone, Serialize)]
pub struct ConsumersPanel {
    pub stats: String,
    pub table: TableView<ConsumerRowView>,
}

impl Default for ConsumersPanel {
    fn default() -> Self {
        Self {
            stats: "NO DATA AVAILABLE".to_string(),
            table: TableView::new(Vec::new(), "No consumer data available"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumerRowView {
    pub rank: usize,
    pub job_id: String,
    pub cluster: String,
    pub name: String,
    pub consumed_tb: String,
    pub logical_tb: String,
    pub dedup: String,
    pub dedup_class: String,
    pub files: String,
    pub drill_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobObjectsView {
    pub heading: String,
    pub table: TableView<JobObjectRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobObjectRowView {
    pub name: String,
    pub kind: String,
    pub logical: String,
    pub physical: String,
    pub status: String,
    pub status_class: String,
    pub sql_host: bool,
    pub drill_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlDatabasesView {
    pub heading: String,
    pub table: TableView<SqlDatabaseRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlDatabaseRowView {
    pub name: String,
    pub instance: String,
    pub size: String,
    pub day: String,
    pub day_class: String,
    pub week: String,
    pub week_class: String,
    pub month: String,
    pub month_class: String,
    pub status: String,
    pub status_class: String,
}

// --- M365 tenants ---

#[derive(Debug, Clone, Default, Serialize)]
pub struct TenantsPanel {
    pub healthy: bool,
    pub stats: String,
    pub tenants: String,
    pub protected_objects: String,
    pub capacity: String,
    pub failed_runs: String,
    pub buckets: Vec<TenantBucketView>,
    pub unbucketed: usize,
    pub failures: TableView<TenantFailureRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TenantBucketView {
    pub domain: String,
    pub label: String,
    pub accent: String,
    pub users: String,
    pub capacity: String,
    pub protected: String,
    pub objects: TableView<TenantObjectRowView>,
    pub total: Option<TenantObjectRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TenantObjectRowView {
    pub icon: String,
    pub kind: String,
    pub count: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TenantFailureRowView {
    pub tenant: String,
    pub accent: String,
    pub protection_group: String,
    pub time: String,
    pub objects_failed: String,
}

// --- Storage health ---

#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageHealthPanel {
    pub healthy: bool,
    pub stats: String,
    pub deleted_job_count: String,
    pub orphaned_snapshots: String,
    pub orphaned_storage: String,
    pub total_used: String,
    pub dedupe_ratio: String,
    pub deleted_jobs: TableView<DeletedJobRowView>,
    pub clusters: TableView<ClusterStorageRowView>,
    pub stale_snapshots: TableView<StaleSnapshotRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedJobRowView {
    pub name: String,
    pub kind: String,
    pub cluster: String,
    pub snapshots: String,
    pub storage: String,
    pub age: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterStorageRowView {
    pub name: String,
    pub used: String,
    pub capacity: String,
    pub used_pct: String,
    pub dedup: String,
    pub status: String,
    pub status_class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaleSnapshotRowView {
    pub job_name: String,
    pub cluster: String,
    pub total: String,
    pub stale: String,
    pub oldest_age: String,
}
