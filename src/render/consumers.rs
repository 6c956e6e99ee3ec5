use crate::drilldown::{ExpansionKey, JobKey, ServerKey, is_sql_host, toggle_path};
use crate::helpers::{format_delta, format_storage_size, strip_kind_prefix, thousands, trim_float};
use crate::models::api::{ConsumerReport, JobObjectList, SqlDatabaseList};
use crate::models::views::{
    ConsumerRowView, ConsumersPanel, JobObjectRowView, JobObjectsView, SqlDatabaseRowView,
    SqlDatabasesView, TableView,
};

pub fn dedup_class(ratio: f64) -> &'static str {
    if ratio >= 20.0 {
        "status-healthy"
    } else if ratio >= 10.0 {
        "status-warning"
    } else {
        "status-critical"
    }
}

fn run_status_class(status: &str) -> &'static str {
    match status {
        "kSuccess" => "status-healthy",
        "kWarning" => "status-warning",
        _ => "status-critical",
    }
}

pub fn build_consumers(report: &ConsumerReport) -> ConsumersPanel {
    if report.top_consumers.is_empty() {
        return ConsumersPanel::default();
    }

    let stats = match &report.summary {
        Some(s) => format!(
            "TOTAL: {} TB physical / {} TB logical across {} jobs ({}x dedup)",
            s.total_storage_consumed_tb, s.total_logical_tb, s.total_jobs, s.overall_dedup_ratio
        ),
        None => format!("{} top consumers", report.top_consumers.len()),
    };

    let rows = report
        .top_consumers
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let key = ExpansionKey::Job(JobKey {
                cluster: c.cluster_name.clone(),
                job_id: c.id.clone(),
            });
            ConsumerRowView {
                rank: i + 1,
                job_id: c.id.clone(),
                cluster: c.cluster_name.clone(),
                name: c.name.clone(),
                consumed_tb: format!("{} TB", c.storage_consumed_tb),
                logical_tb: format!("{} TB", c.logical_size_tb),
                dedup: format!("{}x", trim_float(c.dedup_ratio)),
                dedup_class: dedup_class(c.dedup_ratio).to_string(),
                files: thousands(c.num_files),
                drill_url: toggle_path(&key),
            }
        })
        .collect();

    ConsumersPanel {
        stats,
        table: TableView::new(rows, "No consumer data available"),
    }
}

pub fn build_job_objects(job: &JobKey, list: &JobObjectList) -> JobObjectsView {
    let rows = list
        .objects
        .iter()
        .map(|obj| {
            let sql_host = is_sql_host(obj);
            let drill_url = if sql_host {
                toggle_path(&ExpansionKey::Server(ServerKey {
                    job: job.clone(),
                    server: obj.name.clone(),
                }))
            } else {
                String::new()
            };
            JobObjectRowView {
                name: obj.name.clone(),
                kind: strip_kind_prefix(&obj.kind).to_string(),
                logical: format!("{} GB", obj.logical_gb),
                physical: format!("{} GB", obj.physical_gb),
                status: strip_kind_prefix(&obj.status).to_string(),
                status_class: run_status_class(&obj.status).to_string(),
                sql_host,
                drill_url,
            }
        })
        .collect::<Vec<_>>();

    let heading = if rows.is_empty() {
        String::new()
    } else {
        format!("Top {} Objects (of {} total)", rows.len(), list.total_objects)
    };

    JobObjectsView {
        heading,
        table: TableView::new(rows, "No objects found or unable to retrieve details."),
    }
}

pub fn build_sql_databases(server: &str, list: &SqlDatabaseList) -> SqlDatabasesView {
    let rows = list
        .databases
        .iter()
        .map(|db| {
            let (day, day_trend) = format_delta(db.growth_1day);
            let (week, week_trend) = format_delta(db.growth_7day);
            let (month, month_trend) = format_delta(db.growth_30day);
            SqlDatabaseRowView {
                name: db.name.clone(),
                instance: db.instance.clone(),
                size: db
                    .logical_gb
                    .map(format_storage_size)
                    .unwrap_or_else(|| "N/A".to_string()),
                day,
                day_class: day_trend.css_class().to_string(),
                week,
                week_class: week_trend.css_class().to_string(),
                month,
                month_class: month_trend.css_class().to_string(),
                status: strip_kind_prefix(&db.status).to_string(),
                status_class: run_status_class(&db.status).to_string(),
            }
        })
        .collect::<Vec<_>>();

    let heading = if rows.is_empty() {
        String::new()
    } else {
        format!("{} Database(s) on {}", rows.len(), server)
    };

    SqlDatabasesView {
        heading,
        table: TableView::new(rows, "No databases found."),
    }
}
