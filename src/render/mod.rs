//! Payload to view-model shaping for every dashboard panel.
//!
//! The `build_*` functions in the submodules are pure. [`render_live`] and
//! [`render_cached`] feed their output into a [`PanelSink`]; the console's
//! sink is [`DashboardPage`], which the askama templates read.

pub mod analysis;
pub mod capacity;
pub mod consumers;
pub mod growth;
pub mod tenants;

use serde::Serialize;

use crate::cache::CachedSnapshot;
use crate::config::TenantDef;
use crate::helpers::timestamp_label;
use crate::models::api::{DashboardFeeds, GrowthWindows, SqlGrowthReport};
use crate::models::views::{
    CapacityChart, ClusterCardView, ConsumersPanel, FailuresPanel, GrowthPanel, SqlInsightsPanel,
    StorageHealthPanel, SummaryPanel, SystemAnalysisPanel, TableView, TenantsPanel,
    TopGrowingRowView,
};

pub const LOADING_LABEL: &str = "Loading...";
pub const NO_CACHE_LABEL: &str = "No cached data available";

/// Receives one call per dashboard panel.
pub trait PanelSink {
    fn last_update(&mut self, label: String);
    fn clusters(&mut self, cards: TableView<ClusterCardView>);
    fn executive_summary(&mut self, summary: SummaryPanel);
    fn recommendations(&mut self, recommendations: TableView<String>);
    fn capacity_chart(&mut self, chart: CapacityChart);
    fn failures(&mut self, panel: FailuresPanel);
    fn system_analysis(&mut self, panel: SystemAnalysisPanel);
    fn growth(&mut self, panel: GrowthPanel);
    fn sql_insights(&mut self, panel: SqlInsightsPanel);
    fn top_growing(&mut self, table: TableView<TopGrowingRowView>);
    fn consumers(&mut self, panel: ConsumersPanel);
    fn tenants(&mut self, panel: TenantsPanel);
    fn storage_health(&mut self, panel: StorageHealthPanel);
}

/// The rendered dashboard. Panels a render pass did not reach keep their
/// defaults, which show as no-data rows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub last_update: String,
    pub clusters: TableView<ClusterCardView>,
    pub executive_summary: SummaryPanel,
    pub recommendations: TableView<String>,
    pub capacity_chart: CapacityChart,
    pub failures: FailuresPanel,
    pub system_analysis: SystemAnalysisPanel,
    pub growth: GrowthPanel,
    pub sql_insights: SqlInsightsPanel,
    pub top_growing: TableView<TopGrowingRowView>,
    pub consumers: ConsumersPanel,
    pub tenants: TenantsPanel,
    pub storage_health: StorageHealthPanel,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self {
            last_update: LOADING_LABEL.to_string(),
            clusters: TableView::new(Vec::new(), "No cluster capacity data available"),
            executive_summary: SummaryPanel::default(),
            recommendations: TableView::new(Vec::new(), "No recommendations available"),
            capacity_chart: CapacityChart::default(),
            failures: FailuresPanel::default(),
            system_analysis: SystemAnalysisPanel::default(),
            growth: growth::build_growth_panel(
                &GrowthWindows::default(),
                &SqlGrowthReport::default(),
            ),
            sql_insights: growth::build_sql_insights(&SqlGrowthReport::default()),
            top_growing: TableView::new(Vec::new(), "No growing resources found"),
            consumers: ConsumersPanel::default(),
            tenants: TenantsPanel::default(),
            storage_health: StorageHealthPanel::default(),
        }
    }
}

impl DashboardPage {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            last_update: label.into(),
            ..Self::default()
        }
    }

    /// Chart series as JSON for the page script; `null` marks a gap. Safe to
    /// embed in a `<script>` element.
    pub fn chart_json(&self) -> String {
        serde_json::to_string(&self.capacity_chart)
            .map(|json| json.replace("</", "<\\/"))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

impl PanelSink for DashboardPage {
    fn last_update(&mut self, label: String) {
        self.last_update = label;
    }

    fn clusters(&mut self, cards: TableView<ClusterCardView>) {
        self.clusters = cards;
    }

    fn executive_summary(&mut self, summary: SummaryPanel) {
        self.executive_summary = summary;
    }

    fn recommendations(&mut self, recommendations: TableView<String>) {
        self.recommendations = recommendations;
    }

    fn capacity_chart(&mut self, chart: CapacityChart) {
        self.capacity_chart = chart;
    }

    fn failures(&mut self, panel: FailuresPanel) {
        self.failures = panel;
    }

    fn system_analysis(&mut self, panel: SystemAnalysisPanel) {
        self.system_analysis = panel;
    }

    fn growth(&mut self, panel: GrowthPanel) {
        self.growth = panel;
    }

    fn sql_insights(&mut self, panel: SqlInsightsPanel) {
        self.sql_insights = panel;
    }

    fn top_growing(&mut self, table: TableView<TopGrowingRowView>) {
        self.top_growing = table;
    }

    fn consumers(&mut self, panel: ConsumersPanel) {
        self.consumers = panel;
    }

    fn tenants(&mut self, panel: TenantsPanel) {
        self.tenants = panel;
    }

    fn storage_health(&mut self, panel: StorageHealthPanel) {
        self.storage_health = panel;
    }
}

/// Renders every panel from a complete refresh. The caller sets the label.
pub fn render_live(feeds: &DashboardFeeds, tenants: &[TenantDef], sink: &mut dyn PanelSink) {
    sink.clusters(capacity::build_cluster_cards(&feeds.capacity));
    sink.executive_summary(capacity::build_executive_summary(&feeds.capacity));
    sink.recommendations(capacity::build_recommendations(&feeds.capacity));
    sink.capacity_chart(capacity::build_capacity_chart(&feeds.trends));
    sink.failures(analysis::build_failures(&feeds.failures));
    sink.system_analysis(analysis::build_system_analysis(&feeds.analysis));
    sink.growth(growth::build_growth_panel(&feeds.growth, &feeds.sql_growth));
    sink.sql_insights(growth::build_sql_insights(&feeds.sql_growth));
    sink.top_growing(growth::build_top_growing(&feeds.growth));
    sink.consumers(consumers::build_consumers(&feeds.consumers));
    sink.tenants(tenants::build_tenants(
        &feeds.m365_summary,
        &feeds.m365_top_users,
        &feeds.m365_failures,
        tenants,
    ));
    sink.storage_health(analysis::build_storage_health(&feeds.storage_health));
}

/// Renders the subset of panels a snapshot carries and labels the page as cached.
pub fn render_cached(snapshot: &CachedSnapshot, sink: &mut dyn PanelSink) {
    sink.last_update(format!(
        "{} (cached)",
        timestamp_label(&snapshot.timestamp)
    ));
    sink.clusters(capacity::build_cluster_cards(&snapshot.capacity));
    sink.executive_summary(capacity::build_executive_summary(&snapshot.capacity));
    sink.recommendations(capacity::build_recommendations(&snapshot.capacity));
    sink.capacity_chart(capacity::build_capacity_chart(&snapshot.trends));
    sink.growth(growth::build_growth_panel(
        &snapshot.top_growing,
        &SqlGrowthReport::default(),
    ));
    sink.top_growing(growth::build_top_growing(&snapshot.top_growing));
    sink.consumers(consumers::build_consumers(&snapshot.consumers));
}
