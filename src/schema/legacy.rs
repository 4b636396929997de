//! The Ansible operator's `Pulp` schema
//!
//! Mirrors the templating-engine configuration surface the legacy operator
//! exposes: snake_case field tags, optional sub-records for tuning, and a
//! number of knobs the successor schema no longer carries. Instances are
//! read-only input to the translator; the migration never writes this type
//! back to the cluster.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::DeploymentStrategy;
use k8s_openapi::api::core::v1::{
    NodeAffinity, ResourceRequirements, Toleration, TopologySpreadConstraint,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// The legacy `Pulp` custom resource as fetched from the cluster
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LegacyResource {
    /// `apiVersion` of the fetched object
    #[serde(rename = "apiVersion", default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Object kind
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Standard object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// The configuration record described by [`LegacySpec`]
    #[serde(default)]
    pub spec: LegacySpec,
}

/// A component sub-record carrying a log level (api, content, redis)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LegacyComponent {
    /// Log level passed to the component
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_level: String,
    /// Replica count; zero means "let the operator default"
    #[serde(default, skip_serializing_if = "crate::schema::is_zero")]
    pub replicas: i32,
    /// Compute resources, absent unless the user tuned them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<ResourceRequirements>,
    /// Deployment strategy, absent unless the user tuned it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DeploymentStrategy>,
}

/// A component sub-record without a log level (resource_manager, web, worker)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LegacyWorkload {
    /// Replica count; zero means "let the operator default"
    #[serde(default, skip_serializing_if = "crate::schema::is_zero")]
    pub replicas: i32,
    /// Compute resources, absent unless the user tuned them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<ResourceRequirements>,
    /// Deployment strategy, absent unless the user tuned it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DeploymentStrategy>,
}

/// The legacy configuration record
///
/// Field tags follow the Ansible operator exactly. Every field is defaulted
/// so a sparse CR deserializes without errors; unknown fields are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LegacySpec {
    /// Secret holding the admin password
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_password_secret: String,
    /// Node affinity (no counterpart in the new schema)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<NodeAffinity>,
    /// API server component tuning
    #[serde(default)]
    pub api: LegacyComponent,
    /// Secret holding the container token keys
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub container_token_secret: String,
    /// Content server component tuning
    #[serde(default)]
    pub content: LegacyComponent,
    /// Secret holding the database field-encryption key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub db_fields_encryption_secret: String,
    /// Declared deployment type; ignored by the translation (inferred instead)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deployment_type: String,
    /// Access mode for the file-storage PVC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_storage_access_mode: String,
    /// Size request for the file-storage PVC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_storage_size: String,
    /// Storage class for the file-storage PVC (never propagated)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_storage_storage_class: String,
    /// Gunicorn worker count for the API server
    #[serde(default, skip_serializing_if = "crate::schema::is_zero")]
    pub gunicorn_api_workers: i32,
    /// Gunicorn worker count for the content server
    #[serde(default, skip_serializing_if = "crate::schema::is_zero")]
    pub gunicorn_content_workers: i32,
    /// Gunicorn request timeout in seconds
    #[serde(default, skip_serializing_if = "crate::schema::is_zero")]
    pub gunicorn_timeout: i32,
    /// HAProxy timeout (route-based installs)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub haproxy_timeout: String,
    /// Container image for the core components
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    /// Image pull policy
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_pull_policy: String,
    /// Image pull secrets (list form)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<String>,
    /// Tag of the core image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_version: String,
    /// Container image for the web front end
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_web: String,
    /// Tag of the web image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_web_version: String,
    /// Annotations applied to the ingress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_annotations: Option<BTreeMap<String, String>>,
    /// TLS secret for the ingress
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ingress_tls_secret: String,
    /// Ingress flavor (route, ingress, nodeport, ...)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ingress_type: String,
    /// Nginx client_max_body_size
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_client_max_body_size: String,
    /// Nginx proxy_connect_timeout
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_proxy_connect_timeout: String,
    /// Nginx proxy_read_timeout
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_proxy_read_timeout: String,
    /// Nginx proxy_send_timeout
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_proxy_send_timeout: String,
    /// Secret with Azure blob storage credentials; non-empty means object storage is in use
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_storage_azure_secret: String,
    /// Secret with S3 storage credentials; non-empty means object storage is in use
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_storage_s3_secret: String,
    /// Postgres data path inside the volume
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_data_path: String,
    /// Extra arguments passed to postgres
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub postgres_extra_args: Vec<String>,
    /// Postgres host auth method
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_host_auth_method: String,
    /// Postgres container image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_image: String,
    /// Arguments passed to initdb
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_initdb_args: String,
    /// Compute resources for the database pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres_resource_requirements: Option<ResourceRequirements>,
    /// Storage class for the database PVC (never propagated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres_storage_class: Option<String>,
    /// Storage request for the database PVC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_storage_requirements: String,
    /// Opaque settings blob handed to the application verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulp_settings: Option<serde_json::Value>,
    /// Redis component tuning
    #[serde(default)]
    pub redis: LegacyComponent,
    /// Redis container image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redis_image: String,
    /// Compute resources for the redis pod (plain record in this schema)
    #[serde(default)]
    pub redis_resource_requirements: ResourceRequirements,
    /// Storage class for the redis PVC (never propagated)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redis_storage_class: String,
    /// Resource manager component tuning (retired component)
    #[serde(default)]
    pub resource_manager: LegacyWorkload,
    /// Hostname for the route
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_host: String,
    /// TLS secret for the route
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_tls_secret: String,
    /// ConfigMap with signing scripts
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signing_scripts_configmap: String,
    /// Secret with signing keys
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signing_secret: String,
    /// Secret with single-sign-on configuration
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sso_secret: String,
    /// Storage backend selector
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_type: String,
    /// Web front-end tuning
    #[serde(default)]
    pub web: LegacyWorkload,
    /// Worker tuning
    #[serde(default)]
    pub worker: LegacyWorkload,
    /// Tolerations applied to the core components
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    /// Topology spread constraints applied to the core components
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topology_spread_constraints: Vec<TopologySpreadConstraint>,
    /// Node selector expression (no counterpart in the new schema)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node_selector: String,
    /// NodePort port (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nodeport_port: String,
    /// Ingress hostname (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    /// Image pull secret (singular legacy form, unioned into the list)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_pull_secret: String,
    /// LoadBalancer port (no counterpart)
    #[serde(default, skip_serializing_if = "crate::schema::is_zero")]
    pub loadbalancer_port: i32,
    /// LoadBalancer protocol (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub loadbalancer_protocol: String,
    /// Ansible no_log toggle (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub no_log: String,
    /// External postgres configuration secret (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_configuration_secret: String,
    /// Keep-PVC-after-upgrade toggle (no counterpart)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub postgres_keep_pvc_after_upgrade: bool,
    /// Postgres label selector (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_label_selector: String,
    /// Postgres migration configuration secret (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_migrant_configuration_secret: String,
    /// Postgres node selector (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_selector: String,
    /// Postgres tolerations (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_tolerations: String,
    /// Route TLS termination mechanism (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_tls_termination_mechanism: String,
    /// Service annotations (no counterpart)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_annotations: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A sparse CR parses with zero-value defaults everywhere
    #[test]
    fn sparse_resource_deserializes_with_defaults() {
        let json = serde_json::json!({
            "apiVersion": "pulp.pulpproject.org/v1beta1",
            "kind": "Pulp",
            "metadata": {"name": "example-pulp", "namespace": "pulp"},
            "spec": {"image": "quay.io/pulp/pulp-minimal:stable"}
        });
        let resource: LegacyResource = serde_json::from_value(json).unwrap();
        assert_eq!(resource.metadata.name.as_deref(), Some("example-pulp"));
        assert_eq!(resource.spec.image, "quay.io/pulp/pulp-minimal:stable");
        assert_eq!(resource.spec.api.replicas, 0);
        assert!(resource.spec.api.resource_requirements.is_none());
        assert!(resource.spec.api.strategy.is_none());
        assert!(resource.spec.postgres_resource_requirements.is_none());
        assert!(resource.spec.pulp_settings.is_none());
    }

    /// Tuned sub-records survive a round through the wire format
    #[test]
    fn tuned_components_deserialize() {
        let json = serde_json::json!({
            "spec": {
                "content": {"replicas": 2, "log_level": "DEBUG"},
                "gunicorn_api_workers": 4,
                "image_pull_secrets": ["a", "b"],
                "image_pull_secret": "c",
                "object_storage_s3_secret": "s3-creds",
                "pulp_settings": {"api_root": "/pulp/"}
            }
        });
        let resource: LegacyResource = serde_json::from_value(json).unwrap();
        assert_eq!(resource.spec.content.replicas, 2);
        assert_eq!(resource.spec.content.log_level, "DEBUG");
        assert_eq!(resource.spec.gunicorn_api_workers, 4);
        assert_eq!(resource.spec.image_pull_secrets, vec!["a", "b"]);
        assert_eq!(resource.spec.image_pull_secret, "c");
        assert_eq!(resource.spec.object_storage_s3_secret, "s3-creds");
        assert!(resource.spec.pulp_settings.is_some());
    }

    /// Fields this tool does not model are ignored rather than rejected
    #[test]
    fn unknown_fields_are_tolerated() {
        let json = serde_json::json!({
            "spec": {"some_future_knob": true, "image": "quay.io/pulp/pulp-minimal:stable"}
        });
        let resource: LegacyResource = serde_json::from_value(json).unwrap();
        assert_eq!(resource.spec.image, "quay.io/pulp/pulp-minimal:stable");
    }
}
