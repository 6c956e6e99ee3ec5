use crate::helpers::{format_retained_tb, hours_ago, strip_kind_prefix, trim_float};
use crate::models::api::{FailureReport, StorageHealth, StorageStatus, SystemAnalysis};
use crate::models::views::{
    ClusterStorageRowView, DeletedJobRowView, DuplicateRowView, FailureRowView, FailuresPanel,
    ResourceRowView, StaleSnapshotRowView, StorageHealthPanel, SystemAnalysisPanel, TableView,
};

pub fn build_failures(report: &FailureReport) -> FailuresPanel {
    let failures = &report.failures;
    let recent = failures.iter().filter(|f| f.hours_ago <= 24.0).count();

    let stats = if failures.is_empty() {
        "No backup failures in the last 7 days".to_string()
    } else {
        format!(
            "{} failures in last 24 hours | {} total in last 7 days",
            recent,
            failures.len()
        )
    };

    let rows = failures
        .iter()
        .map(|f| {
            let is_recent = f.hours_ago <= 24.0;
            let age = hours_ago(f.hours_ago);
            FailureRowView {
                age: if f.hours_ago < 24.0 { format!("⚠ {}", age) } else { age },
                recent: is_recent,
                job_name: f.job_name.clone(),
                object_name: f.object_name.clone(),
                cluster: f.cluster.clone(),
                error: f.error.clone(),
            }
        })
        .collect();

    FailuresPanel {
        stats,
        table: TableView::new(rows, "✓ No backup failures in the last 7 days"),
    }
}

pub fn build_system_analysis(analysis: &SystemAnalysis) -> SystemAnalysisPanel {
    let unprotected_count = if analysis.unprotected_count > 0 {
        analysis.unprotected_count as usize
    } else {
        analysis.unprotected_resources.len()
    };
    let duplicate_count = if analysis.duplicate_count > 0 {
        analysis.duplicate_count as usize
    } else {
        analysis.duplicate_backups.len()
    };
    let healthy = unprotected_count + duplicate_count == 0;

    let stats = if healthy {
        "✓ No issues detected - All resources protected, no duplicates found".to_string()
    } else {
        format!(
            "{} unprotected resources | {} resources backed up by multiple clusters",
            unprotected_count, duplicate_count
        )
    };

    let unprotected = analysis
        .unprotected_resources
        .iter()
        .map(|r| ResourceRowView {
            name: r.name.clone(),
            kind: strip_kind_prefix(&r.kind).to_string(),
            cluster: r.cluster.clone(),
        })
        .collect();

    let duplicates = analysis
        .duplicate_backups
        .iter()
        .map(|d| DuplicateRowView {
            name: d.name.clone().unwrap_or_else(|| "Unknown".to_string()),
            kind: d
                .kind
                .as_deref()
                .map(strip_kind_prefix)
                .unwrap_or("Unknown")
                .to_string(),
            jobs: if d.jobs.is_empty() {
                vec!["Unknown".to_string()]
            } else {
                d.jobs.clone()
            },
        })
        .collect();

    SystemAnalysisPanel {
        healthy,
        stats,
        unprotected: TableView::new(unprotected, "✓ No unprotected resources found"),
        duplicates: TableView::new(duplicates, "✓ No duplicate backups found"),
    }
}

fn storage_status_class(status: StorageStatus) -> &'static str {
    match status {
        StorageStatus::Ok => "status-healthy",
        StorageStatus::Warning => "status-warning",
        StorageStatus::Critical => "status-critical",
        StorageStatus::Unknown => "status-unknown",
    }
}

pub fn build_storage_health(health: &StorageHealth) -> StorageHealthPanel {
    let s = &health.summary;
    let healthy = s.deleted_job_count == 0;

    let stats = if healthy {
        "✓ No orphaned data detected - All storage is actively protected".to_string()
    } else {
        format!(
            "{} deleted jobs with retained data | {:.2} TB potentially reclaimable",
            s.deleted_job_count, s.orphaned_storage_tb
        )
    };

    let deleted_jobs = health
        .deleted_jobs
        .iter()
        .map(|j| DeletedJobRowView {
            name: j.name.clone(),
            kind: j.kind.clone(),
            cluster: j.cluster.clone(),
            snapshots: j.snapshots.to_string(),
            storage: format_retained_tb(j.storage_tb),
            age: j.age.clone(),
        })
        .collect();

    let clusters = health
        .cluster_storage
        .iter()
        .map(|c| ClusterStorageRowView {
            name: c.name.clone(),
            used: format!("{} TB", c.used_tb),
            capacity: format!("{} TB", c.capacity_tb),
            used_pct: format!("{}%", c.used_pct),
            dedup: format!("{}x", c.dedup_ratio),
            status: c.status.as_str().to_string(),
            status_class: storage_status_class(c.status).to_string(),
        })
        .collect();

    let stale_snapshots = health
        .stale_snapshots
        .iter()
        .map(|s| StaleSnapshotRowView {
            job_name: s.job_name.clone(),
            cluster: s.cluster.clone(),
            total: s.total_snapshots.to_string(),
            stale: s.stale_snapshots.to_string(),
            oldest_age: s.oldest_age.clone(),
        })
        .collect();

    StorageHealthPanel {
        healthy,
        stats,
        deleted_job_count: s.deleted_job_count.to_string(),
        orphaned_snapshots: s.orphaned_snapshots.to_string(),
        orphaned_storage: format!("{} TB", trim_float(s.orphaned_storage_tb)),
        total_used: format!("{} TB", trim_float(s.total_used_tb)),
        dedupe_ratio: format!("{}x", trim_float(s.avg_dedupe_ratio.unwrap_or(1.0))),
        deleted_jobs: TableView::new(deleted_jobs, "✓ No deleted jobs with retained snapshots"),
        clusters: TableView::new(clusters, "No cluster storage data available"),
        stale_snapshots: TableView::new(stale_snapshots, "✓ No stale snapshots detected"),
    }
}
