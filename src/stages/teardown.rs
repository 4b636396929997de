//! Workload Teardown
//!
//! Deletes the legacy-managed Deployments component by component, then scales
//! the database StatefulSet to zero. The StatefulSet is the one workload that
//! is preserved rather than destroyed: its pod identity and storage must
//! survive for the successor operator to adopt.

use tracing::info;

use crate::cluster::ClusterOps;
use crate::context::MigrationContext;
use crate::Result;

/// Components torn down, in order
///
/// Deletions are issued one selector at a time; any failure aborts the
/// sequence, including a failure on a component that was never deployed.
pub const COMPONENTS: [&str; 5] = ["api", "content-server", "worker", "webserver", "cache"];

/// Delete the legacy Deployments for every component
pub async fn delete_component_deployments<C: ClusterOps>(
    cluster: &C,
    ctx: &MigrationContext,
) -> Result<()> {
    for component in COMPONENTS {
        println!("  Deleting {component} deployment ...");
        let selector = format!("app.kubernetes.io/component={component}");
        cluster.delete_deployments(&ctx.namespace, &selector).await?;
        info!(component = component, "Deleted deployment");
    }
    Ok(())
}

/// Scale the legacy database StatefulSet to zero replicas
///
/// A merge patch against the scale subresource; the object itself, its pods'
/// identity, and the backing PVC stay in place.
pub async fn downscale_database<C: ClusterOps>(
    cluster: &C,
    ctx: &MigrationContext,
) -> Result<()> {
    println!(
        "  Scaling old Database STS {} to 0 replicas ...",
        ctx.db_stateful_set_name
    );
    cluster
        .scale_stateful_set(&ctx.namespace, &ctx.db_stateful_set_name, 0)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::mock::{Call, MockCluster};
    use crate::config::MigrationConfig;
    use clap::Parser;

    fn context() -> MigrationContext {
        let mut ctx = MigrationContext::from_config(MigrationConfig::parse_from([
            "pulp-migrate",
            "--namespace",
            "pulp",
            "--resource-name",
            "example-pulp",
        ]));
        ctx.db_stateful_set_name = "example-pulp-postgres".to_string();
        ctx
    }

    #[tokio::test]
    async fn deletes_every_component_in_order() {
        let cluster = MockCluster::new();
        let ctx = context();

        delete_component_deployments(&cluster, &ctx).await.unwrap();

        let expected: Vec<Call> = ["api", "content-server", "worker", "webserver", "cache"]
            .iter()
            .map(|component| Call::DeleteDeployments {
                selector: format!("app.kubernetes.io/component={component}"),
            })
            .collect();
        assert_eq!(cluster.calls(), expected);
    }

    #[tokio::test]
    async fn a_failed_delete_aborts_the_sequence() {
        let cluster = MockCluster::new().failing(
            "delete_deployments:app.kubernetes.io/component=worker",
            "deployments.apps is forbidden",
        );
        let ctx = context();

        assert!(delete_component_deployments(&cluster, &ctx).await.is_err());

        // api and content-server went through, worker failed, nothing after it
        let selectors: Vec<String> = cluster
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::DeleteDeployments { selector } => selector,
                other => panic!("Unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(
            selectors,
            vec![
                "app.kubernetes.io/component=api",
                "app.kubernetes.io/component=content-server",
                "app.kubernetes.io/component=worker",
            ]
        );
    }

    #[tokio::test]
    async fn downscale_patches_the_discovered_stateful_set_to_zero() {
        let cluster = MockCluster::new();
        let ctx = context();

        downscale_database(&cluster, &ctx).await.unwrap();

        assert_eq!(
            cluster.calls(),
            vec![Call::ScaleStatefulSet {
                name: "example-pulp-postgres".to_string(),
                replicas: 0,
            }]
        );
    }
}
