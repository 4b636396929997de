//! Shared state for one migration run
//!
//! The context starts as a snapshot of the configuration and is filled in by
//! the stages as they discover names on the live cluster. It is owned by the
//! orchestrator and lives for exactly one run; nothing is persisted.

use crate::config::MigrationConfig;

/// Group/version/kind plus the resource path of a custom-resource endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceApi {
    /// API group, e.g. `repo-manager.pulpproject.org`
    pub group: String,
    /// API version, e.g. `v1alpha1`
    pub version: String,
    /// Object kind, e.g. `Pulp`
    pub kind: String,
    /// Plural resource path, e.g. `pulps`
    pub plural: String,
}

impl ResourceApi {
    /// Render as the `apiVersion` string used in object manifests
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }
}

/// Mutable record threaded through every migration stage
///
/// Configuration-derived fields are set once by [`MigrationContext::from_config`];
/// the discovered fields start empty and are filled in as stages complete.
/// An empty string means "not discovered" (the database PVC legitimately stays
/// empty when object storage is in use).
#[derive(Clone, Debug)]
pub struct MigrationContext {
    /// Namespace of the legacy deployment; the new CR is created here too
    pub namespace: String,
    /// Name of the legacy Pulp custom resource
    pub old_resource_name: String,
    /// Name for the translated custom resource
    pub new_resource_name: String,
    /// Name of the legacy operator subscription
    pub old_subscription_name: String,
    /// Name for the new operator subscription (also the OLM package name)
    pub new_subscription_name: String,
    /// Channel the new subscription tracks
    pub new_subscription_channel: String,
    /// Install-plan approval mode for the new subscription
    pub new_subscription_install_plan_approval: String,
    /// Catalog source providing the new operator package
    pub new_subscription_source: String,
    /// Namespace of the catalog source
    pub new_subscription_source_namespace: String,
    /// CSV the new subscription starts from
    pub new_subscription_starting_csv: String,
    /// Endpoint of the legacy custom resource type
    pub old_api: ResourceApi,
    /// Endpoint of the new custom resource type
    pub new_api: ResourceApi,

    /// Database PVC discovered on the cluster (may stay empty)
    pub db_pvc_name: String,
    /// Database Service discovered on the cluster
    pub db_service_name: String,
    /// Database StatefulSet discovered on the cluster
    pub db_stateful_set_name: String,
    /// CSV currently resolved by the legacy subscription
    pub current_csv: String,
}

impl MigrationContext {
    /// Build the initial context from parsed configuration
    ///
    /// Resolves the "defaults to the legacy value" inputs: the new resource
    /// name, new subscription name, and new resource path each fall back to
    /// their legacy counterpart when unset. The kind is shared by both
    /// schemas, so the legacy endpoint reuses the configured kind.
    pub fn from_config(config: MigrationConfig) -> Self {
        let new_resource_name = config
            .new_resource_name
            .unwrap_or_else(|| config.resource_name.clone());
        let new_subscription_name = config
            .new_subscription_name
            .unwrap_or_else(|| config.subscription_name.clone());
        let new_resource = config
            .new_resource
            .unwrap_or_else(|| config.old_resource.clone());

        Self {
            namespace: config.namespace,
            old_resource_name: config.resource_name,
            new_resource_name,
            old_subscription_name: config.subscription_name,
            new_subscription_name,
            new_subscription_channel: config.new_subscription_channel,
            new_subscription_install_plan_approval: config.new_subscription_install_plan_approval,
            new_subscription_source: config.new_subscription_source,
            new_subscription_source_namespace: config.new_subscription_source_namespace,
            new_subscription_starting_csv: config.new_subscription_starting_csv,
            old_api: ResourceApi {
                group: config.old_api.group,
                version: config.old_api.version,
                kind: config.new_kind.clone(),
                plural: config.old_resource,
            },
            new_api: ResourceApi {
                group: config.new_api.group,
                version: config.new_api.version,
                kind: config.new_kind,
                plural: new_resource,
            },
            db_pvc_name: String::new(),
            db_service_name: String::new(),
            db_stateful_set_name: String::new(),
            current_csv: String::new(),
        }
    }
}
