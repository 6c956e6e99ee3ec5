use std::collections::HashMap;

use crate::helpers::{format_growth, format_size_column, format_storage_size};
use crate::models::api::{GrowthWindows, SqlGrower, SqlGrowthReport, TopGrowingReport};
use crate::models::views::{
    GrowthPanel, GrowthRowView, GrowthWindow, GrowthWindowView, SqlGrowerRowView,
    SqlInsightsPanel, SqlWindowView, TableView, TopGrowingRowView,
};

/// Rows kept per window in the merged growth tables.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthSource {
    Resource,
    SqlDatabase,
}

impl GrowthSource {
    pub fn label(&self) -> &'static str {
        match self {
            GrowthSource::Resource => "Resource",
            GrowthSource::SqlDatabase => "SQL DB",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrowthSample {
    pub name: String,
    pub source: GrowthSource,
    pub cluster: String,
    pub growth_gb: f64,
    pub size_gb: f64,
}

pub fn resources_for(windows: &GrowthWindows, window: GrowthWindow) -> &TopGrowingReport {
    match window {
        GrowthWindow::Day => &windows.data1day,
        GrowthWindow::Week => &windows.data7day,
        GrowthWindow::Month => &windows.data30day,
    }
}

pub fn databases_for(sql: &SqlGrowthReport, window: GrowthWindow) -> &[SqlGrower] {
    match window {
        GrowthWindow::Day => &sql.top1day,
        GrowthWindow::Week => &sql.top7day,
        GrowthWindow::Month => &sql.top30day,
    }
}

/// Resources and SQL databases ranked together by growth, largest first.
///
/// The sort is stable: equal growth keeps input order, resources ahead of
/// databases and each in API order.
pub fn merge_growth(
    resources: &TopGrowingReport,
    databases: &[SqlGrower],
    top_n: usize,
) -> Vec<GrowthSample> {
    let mut merged: Vec<GrowthSample> = resources
        .top_growing
        .iter()
        .map(|r| GrowthSample {
            name: r.name.clone(),
            source: GrowthSource::Resource,
            cluster: r.cluster.clone(),
            growth_gb: r.daily_growth,
            size_gb: r.size,
        })
        .chain(databases.iter().map(|db| GrowthSample {
            name: db.display_name().to_string(),
            source: GrowthSource::SqlDatabase,
            cluster: db.cluster.clone(),
            growth_gb: db.growth_gb,
            size_gb: db.current_size_gb,
        }))
        .collect();

    merged.sort_by(|a, b| b.growth_gb.total_cmp(&a.growth_gb));
    merged.truncate(top_n);
    merged
}

pub fn build_growth_panel(windows: &GrowthWindows, sql: &SqlGrowthReport) -> GrowthPanel {
    let views = GrowthWindow::ALL
        .iter()
        .map(|&window| {
            let rows = merge_growth(
                resources_for(windows, window),
                databases_for(sql, window),
                TOP_N,
            )
            .into_iter()
            .map(|s| GrowthRowView {
                name: s.name,
                source: s.source.label().to_string(),
                is_sql: s.source == GrowthSource::SqlDatabase,
                cluster: s.cluster,
                growth: format!("+{}", format_growth(s.growth_gb)),
                size: format_size_column(s.size_gb),
            })
            .collect();
            GrowthWindowView {
                window,
                label: window.label().to_string(),
                table: TableView::new(rows, "No growth detected"),
            }
        })
        .collect();

    let week = windows.data7day.top_growing.len();
    let month = windows.data30day.top_growing.len();

    GrowthPanel {
        stats: format!(
            "{} resources + {} SQL databases monitored | Growth detected: {} (7d) / {} (30d)",
            week, sql.total_databases, week, month
        ),
        windows: views,
    }
}

pub fn build_sql_insights(sql: &SqlGrowthReport) -> SqlInsightsPanel {
    let windows = GrowthWindow::ALL
        .iter()
        .map(|&window| {
            let rows = databases_for(sql, window)
                .iter()
                .map(|db| SqlGrowerRowView {
                    name: db.display_name().to_string(),
                    cluster: db.cluster.clone(),
                    growth: format!("+{}", format_growth(db.growth_gb)),
                    size: format_size_column(db.current_size_gb),
                })
                .collect();
            SqlWindowView {
                window,
                label: window.label().to_string(),
                table: TableView::new(rows, "No growth detected"),
            }
        })
        .collect();

    SqlInsightsPanel {
        stats: format!(
            "{} databases tracked | Active growers: {} (24h) / {} (7d) / {} (30d)",
            sql.total_databases,
            sql.top1day.len(),
            sql.top7day.len(),
            sql.top30day.len()
        ),
        windows,
    }
}

/// The 7-day list with its daily rate projected to 7-day and 30-day totals.
/// The 30-day total comes from the same resource's 30-day rate when present.
pub fn build_top_growing(windows: &GrowthWindows) -> TableView<TopGrowingRowView> {
    let month: HashMap<(&str, &str), f64> = windows
        .data30day
        .top_growing
        .iter()
        .map(|r| ((r.name.as_str(), r.cluster.as_str()), r.daily_growth))
        .collect();

    let rows = windows
        .data7day
        .top_growing
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let month_total = month
                .get(&(r.name.as_str(), r.cluster.as_str()))
                .map(|daily| daily * 30.0)
                .unwrap_or(0.0);
            TopGrowingRowView {
                rank: i + 1,
                name: r.name.clone(),
                kind: r.kind.clone(),
                cluster: r.cluster.clone(),
                daily: format_storage_size(r.daily_growth),
                week: format_storage_size(r.daily_growth * 7.0),
                month: if month_total > 0.0 {
                    format_storage_size(month_total)
                } else {
                    "N/A".to_string()
                },
                size: format_storage_size(r.size),
            }
        })
        .collect();

    TableView::new(rows, "No growing resources found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::GrowingResource;

    fn resource(name: &str, growth: f64) -> GrowingResource {
        GrowingResource {
            name: name.to_string(),
            cluster: "c1".to_string(),
            kind: "kVMware".to_string(),
            daily_growth: growth,
            size: 100.0,
        }
    }

    fn database(name: &str, growth: f64) -> SqlGrower {
        SqlGrower {
            database: format!("MSSQLSERVER/{}", name),
            cluster: "c2".to_string(),
            growth_gb: growth,
            current_size_gb: 2048.0,
        }
    }

    #[test]
    fn sql_database_outranks_smaller_resource() {
        let resources = TopGrowingReport {
            top_growing: vec![resource("A", 5.0)],
        };
        let merged = merge_growth(&resources, &[database("B", 8.0)], TOP_N);
        assert_eq!(merged[0].name, "B");
        assert_eq!(merged[0].source, GrowthSource::SqlDatabase);
        assert_eq!(merged[1].name, "A");
    }

    #[test]
    fn ties_keep_input_order() {
        let resources = TopGrowingReport {
            top_growing: vec![resource("r1", 3.0), resource("r2", 3.0)],
        };
        let merged = merge_growth(&resources, &[database("d1", 3.0)], TOP_N);
        let names: Vec<_> = merged.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["r1", "r2", "d1"]);
    }

    #[test]
    fn merged_list_is_truncated() {
        let resources = TopGrowingReport {
            top_growing: (0..8).map(|i| resource(&format!("r{}", i), i as f64)).collect(),
        };
        let dbs: Vec<_> = (0..8).map(|i| database(&format!("d{}", i), i as f64 + 0.5)).collect();
        let merged = merge_growth(&resources, &dbs, TOP_N);
        assert_eq!(merged.len(), TOP_N);
        assert_eq!(merged[0].name, "d7");
        assert!(merged.windows(2).all(|w| w[0].growth_gb >= w[1].growth_gb));
    }

    #[test]
    fn panel_formats_rows_per_window() {
        let windows = GrowthWindows {
            data7day: TopGrowingReport {
                top_growing: vec![resource("A", 5.0)],
            },
            ..Default::default()
        };
        let sql = SqlGrowthReport {
            total_databases: 12,
            top7day: vec![database("B", 0.5)],
            ..Default::default()
        };
        let panel = build_growth_panel(&windows, &sql);
        assert_eq!(panel.windows.len(), 3);
        assert!(panel.windows[0].table.is_empty());
        assert_eq!(panel.windows[0].table.empty_message, "No growth detected");
        let week = &panel.windows[1].table.rows;
        assert_eq!(week[0].name, "A");
        assert_eq!(week[0].growth, "+5.0 GB");
        assert_eq!(week[1].growth, "+512 MB");
        assert_eq!(week[1].size, "2.0 TB");
        assert!(week[1].is_sql);
        assert_eq!(
            panel.stats,
            "1 resources + 12 SQL databases monitored | Growth detected: 1 (7d) / 0 (30d)"
        );
    }

    #[test]
    fn empty_sql_insights_show_no_growth_rows() {
        let panel = build_sql_insights(&SqlGrowthReport::default());
        assert!(panel.windows.iter().all(|w| w.table.rendered_rows() == 1));
        assert!(panel.stats.starts_with("0 databases tracked"));
    }

    #[test]
    fn top_growing_projects_totals() {
        let windows = GrowthWindows {
            data7day: TopGrowingReport {
                top_growing: vec![resource("A", 2.0), resource("B", 1.0)],
            },
            data30day: TopGrowingReport {
                top_growing: vec![resource("A", 1.5)],
            },
            ..Default::default()
        };
        let table = build_top_growing(&windows);
        assert_eq!(table.rows[0].rank, 1);
        assert_eq!(table.rows[0].week, "14.0 GB");
        assert_eq!(table.rows[0].month, "45.0 GB");
        assert_eq!(table.rows[1].month, "N/A");
        assert!(build_top_growing(&GrowthWindows::default()).is_empty());
    }
}
