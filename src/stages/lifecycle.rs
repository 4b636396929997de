//! Lifecycle Controller
//!
//! Talks to OLM: reads the legacy subscription's resolved CSV, removes the
//! legacy subscription and CSV, installs the successor subscription, and
//! waits for the new custom-resource type to register. Each operation is a
//! single-shot call; only the registration wait polls.

use std::future::Future;

use tracing::info;

use crate::cluster::ClusterOps;
use crate::context::MigrationContext;
use crate::poll::{poll_until, PollConfig};
use crate::schema::olm::Subscription;
use crate::{Error, Result};

/// Read the CSV currently resolved by the legacy subscription
///
/// Stores it in the context for the decommission step. An absent
/// subscription, or one OLM has not resolved yet, is fatal: without the CSV
/// name the old operator cannot be removed cleanly.
pub async fn read_current_version<C: ClusterOps>(
    cluster: &C,
    ctx: &mut MigrationContext,
) -> Result<()> {
    println!(
        "  Retrieving the current CSV from subscription {} ...",
        ctx.old_subscription_name
    );
    let subscription = cluster
        .get_subscription(&ctx.namespace, &ctx.old_subscription_name)
        .await?;
    let current_csv = subscription
        .status
        .map(|status| status.current_csv)
        .unwrap_or_default();
    if current_csv.is_empty() {
        return Err(Error::not_found(format!(
            "resolved CSV on subscription {}",
            ctx.old_subscription_name
        )));
    }
    info!(csv = %current_csv, "Current CSV");
    ctx.current_csv = current_csv;
    Ok(())
}

/// Delete the legacy subscription, then its resolved CSV
///
/// The deletions are independent; either failure aborts the migration with
/// the server's error surfaced.
pub async fn decommission<C: ClusterOps>(cluster: &C, ctx: &MigrationContext) -> Result<()> {
    println!("  Deleting {} Subscription ...", ctx.old_subscription_name);
    cluster
        .delete_subscription(&ctx.namespace, &ctx.old_subscription_name)
        .await?;

    println!("  Deleting {} CSV ...", ctx.current_csv);
    cluster.delete_csv(&ctx.namespace, &ctx.current_csv).await?;
    Ok(())
}

/// Submit the successor operator's subscription
///
/// No idempotency check: re-running against an already-subscribed namespace
/// conflicts, and the conflict is surfaced as-is.
pub async fn subscribe<C: ClusterOps>(cluster: &C, ctx: &MigrationContext) -> Result<()> {
    println!("  Subscribing to the new operator version ...");
    let subscription = Subscription::for_new_operator(ctx);
    info!(
        name = %ctx.new_subscription_name,
        channel = %ctx.new_subscription_channel,
        source = %ctx.new_subscription_source,
        starting_csv = %ctx.new_subscription_starting_csv,
        "Creating subscription"
    );
    cluster.create_subscription(&ctx.namespace, &subscription).await
}

/// Poll until the new custom-resource type is registered
///
/// Any error response counts as a failed attempt; exhausting the configured
/// attempts is a fatal timeout. The cancellation future aborts the wait
/// between attempts.
pub async fn await_new_resource_type<C: ClusterOps>(
    cluster: &C,
    ctx: &MigrationContext,
    config: &PollConfig,
    cancel: impl Future<Output = ()>,
) -> Result<()> {
    let group_version = ctx.new_api.api_version();
    println!("  Waiting for {group_version} to be registered ...");
    poll_until(config, &group_version, cancel, || {
        cluster.probe_api_group(&ctx.new_api)
    })
    .await
}
