//! Service Relabeler
//!
//! Repoints the database Service's pod selector from the legacy operator's
//! label convention to the one the successor's database pods carry. Two
//! phases, in order: strip the six ownership keys one merge patch at a time,
//! then install the two new selector entries. The order matters: a selector
//! is a logical AND, so stale keys left behind would make the Service match
//! zero pods once the database pod's labels change.

use tracing::info;

use crate::cluster::ClusterOps;
use crate::context::MigrationContext;
use crate::Result;

/// Ownership selector keys stripped in phase 1, in patch order
pub const LEGACY_SELECTOR_KEYS: [&str; 6] = [
    "app.kubernetes.io/instance",
    "app.kubernetes.io/component",
    "app.kubernetes.io/managed-by",
    "app.kubernetes.io/name",
    "app.kubernetes.io/part-of",
    "app.kubernetes.io/version",
];

/// Repoint the database Service selector to the successor's convention
pub async fn repoint_database_service<C: ClusterOps>(
    cluster: &C,
    ctx: &MigrationContext,
) -> Result<()> {
    println!(
        "  Updating {} Database Service ...",
        ctx.db_service_name
    );

    // Phase 1: one removal patch per legacy key (selector key set to null)
    for key in LEGACY_SELECTOR_KEYS {
        let patch = serde_json::json!({"spec": {"selector": {key: null}}});
        cluster
            .patch_service(&ctx.namespace, &ctx.db_service_name, patch)
            .await?;
        info!(key = key, "Removed legacy selector key");
    }

    // Phase 2: the new database pods are selected by the chart's app marker
    // and the CR-name key the successor operator stamps on them
    let new_entries = [
        ("app", "postgresql".to_string()),
        ("pulp_cr", ctx.new_resource_name.clone()),
    ];
    for (key, value) in new_entries {
        let patch = serde_json::json!({"spec": {"selector": {key: value}}});
        cluster
            .patch_service(&ctx.namespace, &ctx.db_service_name, patch)
            .await?;
        info!(key = key, "Added new selector key");
    }

    Ok(())
}
