//! Resource Creator
//!
//! Fetches the live legacy custom resource and submits the translated one.
//! The serialized body is echoed to the console before the create call so an
//! operator can inspect (and if need be re-submit) exactly what was sent;
//! any non-success response is surfaced verbatim with no retry.

use tracing::info;

use crate::cluster::ClusterOps;
use crate::context::MigrationContext;
use crate::schema::{LegacyResource, NewResource};
use crate::Result;

/// Fetch the legacy Pulp custom resource named in the context
pub async fn fetch_legacy_resource<C: ClusterOps>(
    cluster: &C,
    ctx: &MigrationContext,
) -> Result<LegacyResource> {
    println!("  Converting Pulp CR to the new CRD ...");
    cluster
        .get_legacy_resource(&ctx.old_api, &ctx.namespace, &ctx.old_resource_name)
        .await
}

/// Submit the translated custom resource to its namespaced collection
pub async fn submit_new_resource<C: ClusterOps>(
    cluster: &C,
    ctx: &MigrationContext,
    resource: &NewResource,
) -> Result<()> {
    let body = serde_json::to_value(resource)?;
    println!("  Create new CR: {body}");
    info!(
        name = %ctx.new_resource_name,
        api_version = %ctx.new_api.api_version(),
        "Creating translated resource"
    );
    cluster
        .create_resource(&ctx.new_api, &ctx.namespace, &body)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::mock::{Call, MockCluster};
    use crate::config::MigrationConfig;
    use crate::schema::NewSpec;
    use clap::Parser;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn context() -> MigrationContext {
        MigrationContext::from_config(MigrationConfig::parse_from([
            "pulp-migrate",
            "--namespace",
            "pulp",
            "--resource-name",
            "example-pulp",
        ]))
    }

    fn translated() -> NewResource {
        NewResource {
            api_version: "repo-manager.pulpproject.org/v1alpha1".to_string(),
            kind: "Pulp".to_string(),
            metadata: ObjectMeta {
                name: Some("example-pulp".to_string()),
                namespace: Some("pulp".to_string()),
                ..ObjectMeta::default()
            },
            spec: NewSpec {
                deployment_type: "pulp".to_string(),
                ..NewSpec::default()
            },
        }
    }

    #[tokio::test]
    async fn fetches_the_named_legacy_resource() {
        let cluster = MockCluster::new().with_legacy_resource(LegacyResource::default());
        let ctx = context();

        fetch_legacy_resource(&cluster, &ctx).await.unwrap();

        assert_eq!(
            cluster.calls(),
            vec![Call::GetLegacyResource {
                name: "example-pulp".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn absent_legacy_resource_is_fatal() {
        let cluster = MockCluster::new();
        let ctx = context();

        match fetch_legacy_resource(&cluster, &ctx).await {
            Err(crate::Error::NotFound(_)) => {}
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn submits_the_serialized_manifest() {
        let cluster = MockCluster::new();
        let ctx = context();

        submit_new_resource(&cluster, &ctx, &translated())
            .await
            .unwrap();

        let calls = cluster.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::CreateResource { body } => {
                assert_eq!(body["apiVersion"], "repo-manager.pulpproject.org/v1alpha1");
                assert_eq!(body["kind"], "Pulp");
                assert_eq!(body["metadata"]["name"], "example-pulp");
                assert_eq!(body["metadata"]["namespace"], "pulp");
                assert_eq!(body["spec"]["deployment_type"], "pulp");
            }
            other => panic!("Unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn a_rejected_create_surfaces_the_server_error() {
        let cluster =
            MockCluster::new().failing("create_resource", "admission webhook denied the request");
        let ctx = context();

        match submit_new_resource(&cluster, &ctx, &translated()).await {
            Err(crate::Error::Server(msg)) => assert!(msg.contains("denied")),
            other => panic!("Expected Server, got {:?}", other),
        }
    }
}
