use tracing::debug;

use crate::config::TenantDef;
use crate::helpers::{local_time, trim_float};
use crate::models::api::{M365Failures, M365Summary, M365TopUsers, TenantObject};
use crate::models::views::{
    TableView, TenantBucketView, TenantFailureRowView, TenantObjectRowView, TenantsPanel,
};

const TOTAL_KIND: &str = "Total";
const UNMAPPED_ACCENT: &str = "#ffffff";

fn kind_icon(kind: &str) -> &'static str {
    match kind {
        "Mailbox" => "📧",
        "OneDrive" => "📁",
        "SharePoint" => "🌐",
        _ => "",
    }
}

/// Splits top-user records into one bucket per configured tenant, in
/// configuration order. Records from unknown domains land in no bucket;
/// their count is returned alongside.
pub fn partition_tenants<'a>(
    records: &'a [TenantObject],
    tenants: &'a [TenantDef],
) -> (Vec<(&'a TenantDef, Vec<&'a TenantObject>)>, usize) {
    let mut buckets: Vec<(&TenantDef, Vec<&TenantObject>)> =
        tenants.iter().map(|t| (t, Vec::new())).collect();
    let mut unbucketed = 0;

    for record in records {
        match buckets.iter_mut().find(|(t, _)| t.domain == record.tenant) {
            Some((_, objects)) => objects.push(record),
            None => {
                debug!(tenant = %record.tenant, kind = %record.kind, "m365 record from unmapped tenant");
                unbucketed += 1;
            }
        }
    }

    (buckets, unbucketed)
}

fn object_row(obj: &TenantObject) -> TenantObjectRowView {
    TenantObjectRowView {
        icon: kind_icon(&obj.kind).to_string(),
        kind: obj.kind.clone(),
        count: obj.count.to_string(),
        size: format!("{} GB", obj.size_gb),
    }
}

fn bucket_view(tenant: &TenantDef, objects: &[&TenantObject]) -> TenantBucketView {
    let total = objects.iter().find(|o| o.kind == TOTAL_KIND);

    let rows = objects
        .iter()
        .filter(|o| o.kind != TOTAL_KIND)
        .map(|o| object_row(o))
        .collect();

    let (users, capacity) = match total {
        Some(t) => (t.count.to_string(), format!("{} GB", t.size_gb)),
        None => ("0".to_string(), "0 GB".to_string()),
    };

    TenantBucketView {
        domain: tenant.domain.clone(),
        label: tenant.label.clone(),
        accent: tenant.accent.clone(),
        protected: users.clone(),
        users,
        capacity,
        objects: TableView::new(rows, "No protected objects"),
        total: total.map(|t| TenantObjectRowView {
            icon: "📊".to_string(),
            kind: "TOTAL".to_string(),
            count: t.count.to_string(),
            size: format!("{} GB", t.size_gb),
        }),
    }
}

pub fn build_tenants(
    summary: &M365Summary,
    top_users: &M365TopUsers,
    failures: &M365Failures,
    tenants: &[TenantDef],
) -> TenantsPanel {
    let healthy = summary.failed_runs == 0;
    let stats = if healthy {
        format!(
            "✓ All M365 backups healthy - {} tenants, {} users protected",
            summary.tenants, summary.protected_objects
        )
    } else {
        format!(
            "{} recent failures | {} tenants | {} users protected",
            summary.failed_runs, summary.tenants, summary.protected_objects
        )
    };

    let (partitioned, unbucketed) = partition_tenants(&top_users.top_users, tenants);
    let buckets = partitioned
        .iter()
        .map(|(tenant, objects)| bucket_view(tenant, objects))
        .collect();

    let failure_rows = failures
        .failures
        .iter()
        .map(|f| {
            let mapped = f
                .tenant
                .as_deref()
                .and_then(|domain| tenants.iter().find(|t| t.domain == domain));
            let (tenant, accent) = match (mapped, f.tenant.as_deref()) {
                (Some(t), _) => (t.label.clone(), t.accent.clone()),
                (None, Some(domain)) if !domain.is_empty() => {
                    (domain.to_string(), UNMAPPED_ACCENT.to_string())
                }
                _ => ("Unknown".to_string(), UNMAPPED_ACCENT.to_string()),
            };
            TenantFailureRowView {
                tenant,
                accent,
                protection_group: f.protection_group_name.clone(),
                time: local_time(&f.start_time),
                objects_failed: f.objects_failed_count.to_string(),
            }
        })
        .collect();

    TenantsPanel {
        healthy,
        stats,
        tenants: summary.tenants.to_string(),
        protected_objects: summary.protected_objects.to_string(),
        capacity: format!("{} GB", trim_float(summary.total_capacity_gb)),
        failed_runs: summary.failed_runs.to_string(),
        buckets,
        unbucketed,
        failures: TableView::new(failure_rows, "✓ No recent failures"),
    }
}
