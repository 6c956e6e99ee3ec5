use crate::models::api::{CapacityReport, TrendsReport};
use crate::models::views::{
    CapacityChart, ChartDataset, ClusterCardView, SummaryLine, SummaryPanel, TableView,
    UtilizationStatus,
};

const CHART_COLORS: [&str; 4] = ["#00ffff", "#ff00ff", "#00ff00", "#ffff00"];

pub fn utilization_status(utilization: f64) -> UtilizationStatus {
    if utilization > 100.0 {
        UtilizationStatus::OverCapacity
    } else if utilization > 80.0 {
        UtilizationStatus::Critical
    } else if utilization > 70.0 {
        UtilizationStatus::Monitor
    } else {
        UtilizationStatus::Optimal
    }
}

pub fn build_cluster_cards(report: &CapacityReport) -> TableView<ClusterCardView> {
    let cards = report
        .clusters
        .iter()
        .map(|c| {
            let status = utilization_status(c.utilization);
            let total_tb = if c.utilization > 0.0 {
                c.used_tb / (c.utilization / 100.0)
            } else {
                0.0
            };
            ClusterCardView {
                name: c.name.clone(),
                utilization: format!("{:.1}%", c.utilization),
                used_of_total: format!("{:.0} / {:.0} TB USED", c.used_tb, total_tb),
                bar_width: format!("{:.1}", c.utilization.clamp(0.0, 100.0)),
                status,
                status_text: status.label().to_string(),
                status_class: status.css_class().to_string(),
                days_to_80: c
                    .days_to_80
                    .clone()
                    .unwrap_or_else(|| status.label().to_string()),
                over_capacity: status == UtilizationStatus::OverCapacity,
                daily_growth: c.daily_growth.clone().unwrap_or_else(|| "0 GB/day".to_string()),
                monthly_growth: c
                    .monthly_growth
                    .clone()
                    .unwrap_or_else(|| "0 GB/mo".to_string()),
            }
        })
        .collect();

    TableView::new(cards, "No cluster capacity data available")
}

pub fn build_executive_summary(report: &CapacityReport) -> SummaryPanel {
    let s = &report.summary;
    let mut lines = vec![SummaryLine {
        text: format!(
            "Overall Status: Managing {} clusters with {:.1} TB of {:.1} TB used ({:.1}% utilization).",
            s.total_clusters, s.aggregate_used_tb, s.aggregate_capacity_tb, s.aggregate_percent_used
        ),
        alert: false,
    }];

    if s.critical_clusters > 0 {
        lines.push(SummaryLine {
            text: format!(
                "⚠️ {} cluster(s) require immediate attention due to high utilization.",
                s.critical_clusters
            ),
            alert: true,
        });
    }

    if let Some(hot) = &report.hottest_cluster {
        let forecast = match &hot.forecast.days_to_80_percent {
            Some(days) => format!(", projected to reach 80% in {} days", days),
            None => String::new(),
        };
        lines.push(SummaryLine {
            text: format!(
                "Hottest Cluster: {} at {:.1}% capacity{}.",
                hot.cluster_name, hot.current.utilization_pct, forecast
            ),
            alert: false,
        });
    }

    let health = if s.critical_clusters == 0 {
        "🟢 All clusters operating within normal parameters."
    } else {
        "🔴 Capacity planning action required for flagged clusters."
    };
    lines.push(SummaryLine {
        text: format!("Environment Health: {}", health),
        alert: s.critical_clusters > 0,
    });

    SummaryPanel { lines }
}

pub fn build_recommendations(report: &CapacityReport) -> TableView<String> {
    TableView::new(
        report.recommendations.clone(),
        "✓ ALL SYSTEMS OPTIMAL // NO ACTION REQUIRED",
    )
}

/// One line per cluster over the sorted union of trend dates; a cluster
/// without a point on a date gets a gap.
pub fn build_capacity_chart(trends: &TrendsReport) -> CapacityChart {
    let mut labels: Vec<String> = Vec::new();
    let mut series: Vec<(String, Vec<(String, f64)>)> = Vec::new();

    for item in &trends.clusters {
        let idx = match series.iter().position(|(name, _)| *name == item.cluster) {
            Some(i) => i,
            None => {
                series.push((item.cluster.clone(), Vec::new()));
                series.len() - 1
            }
        };
        for point in &item.trends {
            if !labels.contains(&point.date) {
                labels.push(point.date.clone());
            }
            series[idx].1.push((point.date.clone(), point.used_tb));
        }
    }

    labels.sort();

    let datasets = series
        .into_iter()
        .enumerate()
        .map(|(i, (label, points))| ChartDataset {
            label,
            color: CHART_COLORS[i % CHART_COLORS.len()].to_string(),
            data: labels
                .iter()
                .map(|date| points.iter().find(|(d, _)| d == date).map(|(_, v)| *v))
                .collect(),
        })
        .collect();

    CapacityChart { labels, datasets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::{
        CapacitySummary, ClusterCapacity, ClusterTrend, HottestCluster, TrendPoint,
    };

    fn cluster(name: &str, used: f64, util: f64) -> ClusterCapacity {
        ClusterCapacity {
            name: name.to_string(),
            used_tb: used,
            utilization: util,
            ..Default::default()
        }
    }

    #[test]
    fn utilization_thresholds() {
        assert_eq!(utilization_status(50.0).label(), "OPTIMAL");
        assert_eq!(utilization_status(70.0).label(), "OPTIMAL");
        assert_eq!(utilization_status(75.0).label(), "MONITOR");
        assert_eq!(utilization_status(85.0).label(), "CRITICAL");
        assert_eq!(utilization_status(105.0).label(), "OVER CAPACITY");
        assert_eq!(utilization_status(85.0).css_class(), "status-critical");
        assert_eq!(utilization_status(75.0).css_class(), "status-warning");
        assert_eq!(utilization_status(50.0).css_class(), "status-healthy");
    }

    #[test]
    fn cards_derive_total_and_cap_the_bar() {
        let report = CapacityReport {
            clusters: vec![cluster("prod-a", 40.0, 80.0), cluster("prod-b", 63.0, 105.0)],
            ..Default::default()
        };
        let cards = build_cluster_cards(&report);
        assert_eq!(cards.rows[0].used_of_total, "40 / 50 TB USED");
        assert_eq!(cards.rows[0].utilization, "80.0%");
        assert_eq!(cards.rows[0].days_to_80, "MONITOR");
        assert!(!cards.rows[0].over_capacity);
        assert_eq!(cards.rows[1].bar_width, "100.0");
        assert!(cards.rows[1].over_capacity);
        assert_eq!(cards.rows[1].status_class, "status-critical");
    }

    #[test]
    fn zero_days_to_80_shows_the_status() {
        let doc = r#"{"clusters":[{"name":"prod-a","usedTB":85,"utilization":85,"daysTo80":0}]}"#;
        let report: CapacityReport = serde_json::from_str(doc).unwrap();
        let cards = build_cluster_cards(&report);
        assert_eq!(cards.rows[0].days_to_80, "CRITICAL");
    }

    #[test]
    fn empty_capacity_renders_no_data_rows() {
        let report = CapacityReport::default();
        let cards = build_cluster_cards(&report);
        assert!(cards.is_empty());
        assert_eq!(cards.rendered_rows(), 1);
        let recs = build_recommendations(&report);
        assert_eq!(recs.empty_message, "✓ ALL SYSTEMS OPTIMAL // NO ACTION REQUIRED");
        let chart = build_capacity_chart(&TrendsReport::default());
        assert!(chart.labels.is_empty() && chart.datasets.is_empty());
    }

    #[test]
    fn summary_flags_critical_clusters_and_hottest() {
        let report = CapacityReport {
            summary: CapacitySummary {
                total_clusters: 3,
                aggregate_used_tb: 120.0,
                aggregate_capacity_tb: 200.0,
                aggregate_percent_used: 60.0,
                critical_clusters: 1,
            },
            hottest_cluster: Some(HottestCluster {
                cluster_name: "prod-a".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let panel = build_executive_summary(&report);
        assert_eq!(panel.lines.len(), 4);
        assert!(panel.lines[1].alert);
        assert!(panel.lines[2].text.starts_with("Hottest Cluster: prod-a at 0.0% capacity."));
        assert!(panel.plain_text().contains("120.0 TB of 200.0 TB used"));
    }

    #[test]
    fn chart_aligns_series_on_sorted_dates() {
        let trends = TrendsReport {
            clusters: vec![
                ClusterTrend {
                    cluster: "b".to_string(),
                    trends: vec![
                        TrendPoint { date: "2026-01-02".to_string(), used_tb: 2.0 },
                        TrendPoint { date: "2026-01-01".to_string(), used_tb: 1.0 },
                    ],
                },
                ClusterTrend {
                    cluster: "a".to_string(),
                    trends: vec![TrendPoint { date: "2026-01-03".to_string(), used_tb: 5.0 }],
                },
            ],
        };
        let chart = build_capacity_chart(&trends);
        assert_eq!(chart.labels, vec!["2026-01-01", "2026-01-02", "2026-01-03"]);
        assert_eq!(chart.datasets[0].label, "b");
        assert_eq!(chart.datasets[0].data, vec![Some(1.0), Some(2.0), None]);
        assert_eq!(chart.datasets[1].data, vec![None, None, Some(5.0)]);
        assert_eq!(chart.datasets[1].color, "#ff00ff");
    }
}
