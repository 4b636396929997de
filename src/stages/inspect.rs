//! Resource Inspector
//!
//! Discovers the legacy deployment's database child objects by label
//! selector. The Service and StatefulSet are required downstream (the
//! relabel and downscale stages target them by name); the PVC is optional
//! because an object-storage install never provisioned one.

use tracing::{info, warn};

use crate::cluster::ClusterOps;
use crate::context::MigrationContext;
use crate::{Error, Result};

fn database_selector(ctx: &MigrationContext) -> String {
    format!(
        "app.kubernetes.io/component=database,app.kubernetes.io/managed-by={}",
        ctx.old_subscription_name
    )
}

/// Discover the database PVC, Service, and StatefulSet names
///
/// Fills the corresponding context fields with the first match per kind.
/// No matching Service or StatefulSet is fatal; no matching PVC leaves the
/// field empty. No side effects on the cluster.
pub async fn discover_database<C: ClusterOps>(
    cluster: &C,
    ctx: &mut MigrationContext,
) -> Result<()> {
    let selector = database_selector(ctx);

    println!("  Looking for the Database PVC ...");
    let pvcs = cluster.list_pvc_names(&ctx.namespace, &selector).await?;
    match pvcs.into_iter().next() {
        Some(name) => {
            info!(pvc = %name, "Found database PVC");
            ctx.db_pvc_name = name;
        }
        None => {
            // Not fatal: with S3/Azure object storage there is no PVC to adopt.
            warn!("No database PVC found; assuming object storage is in use");
        }
    }

    println!("  Looking for the Database Service ...");
    let services = cluster.list_service_names(&ctx.namespace, &selector).await?;
    ctx.db_service_name = services
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found(format!("database Service matching {selector}")))?;
    info!(service = %ctx.db_service_name, "Found database Service");

    println!("  Looking for the Database StatefulSet ...");
    let stateful_sets = cluster
        .list_stateful_set_names(&ctx.namespace, &selector)
        .await?;
    ctx.db_stateful_set_name = stateful_sets
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found(format!("database StatefulSet matching {selector}")))?;
    info!(stateful_set = %ctx.db_stateful_set_name, "Found database StatefulSet");

    Ok(())
}
