//! The Go operator's `Pulp` schema
//!
//! The translation output. Where the legacy schema uses optional sub-records,
//! this one carries plain records with explicit zero values; where the legacy
//! operator infers storage, this one is handed PVC names explicitly. Field
//! tags follow the successor operator's API types.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::DeploymentStrategy;
use k8s_openapi::api::core::v1::{
    Affinity, Probe, ResourceRequirements, Toleration, TopologySpreadConstraint,
};
use k8s_openapi::api::policy::v1::PodDisruptionBudgetSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::schema::is_zero;

/// The translated `Pulp` custom resource submitted to the cluster
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewResource {
    /// `apiVersion` of the new resource type
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    /// Object kind
    pub kind: String,
    /// Standard object metadata
    pub metadata: ObjectMeta,
    /// The configuration record described by [`NewSpec`]
    pub spec: NewSpec,
}

/// API server settings in the new schema
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Api {
    /// Replica count; zero lets the operator default
    #[serde(default, skip_serializing_if = "is_zero")]
    pub replicas: i32,
    /// Tolerations inherited from the legacy top level
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    /// Topology spread constraints inherited from the legacy top level
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topology_spread_constraints: Vec<TopologySpreadConstraint>,
    /// Gunicorn request timeout in seconds
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gunicorn_timeout: i32,
    /// Gunicorn worker count
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gunicorn_workers: i32,
    /// Compute resources; a zero-value record when the legacy side left it unset
    #[serde(default)]
    pub resource_requirements: ResourceRequirements,
    /// Readiness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    /// Liveness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    /// Pod disruption budget; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdb: Option<PodDisruptionBudgetSpec>,
    /// Deployment strategy; a zero-value record when the legacy side left it unset
    #[serde(default)]
    pub strategy: DeploymentStrategy,
}

/// Content server settings in the new schema (same shape as [`Api`])
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// Replica count; zero lets the operator default
    #[serde(default, skip_serializing_if = "is_zero")]
    pub replicas: i32,
    /// Tolerations inherited from the legacy top level
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    /// Topology spread constraints inherited from the legacy top level
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topology_spread_constraints: Vec<TopologySpreadConstraint>,
    /// Gunicorn request timeout in seconds
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gunicorn_timeout: i32,
    /// Gunicorn worker count
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gunicorn_workers: i32,
    /// Compute resources; zero-value record when unset on the legacy side
    #[serde(default)]
    pub resource_requirements: ResourceRequirements,
    /// Readiness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    /// Liveness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    /// Pod disruption budget; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdb: Option<PodDisruptionBudgetSpec>,
    /// Deployment strategy; zero-value record when unset on the legacy side
    #[serde(default)]
    pub strategy: DeploymentStrategy,
}

/// Worker settings in the new schema
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Worker {
    /// Replica count; zero lets the operator default
    #[serde(default, skip_serializing_if = "is_zero")]
    pub replicas: i32,
    /// Tolerations inherited from the legacy top level
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    /// Topology spread constraints inherited from the legacy top level
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topology_spread_constraints: Vec<TopologySpreadConstraint>,
    /// Compute resources; zero-value record when unset on the legacy side
    #[serde(default)]
    pub resource_requirements: ResourceRequirements,
    /// Readiness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    /// Liveness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    /// Pod disruption budget; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdb: Option<PodDisruptionBudgetSpec>,
    /// Deployment strategy; zero-value record when unset on the legacy side
    #[serde(default)]
    pub strategy: DeploymentStrategy,
}

/// Web front-end settings in the new schema (no strategy knob)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Web {
    /// Replica count; zero lets the operator default
    #[serde(default, skip_serializing_if = "is_zero")]
    pub replicas: i32,
    /// Compute resources; zero-value record when unset on the legacy side
    #[serde(default)]
    pub resource_requirements: ResourceRequirements,
    /// Readiness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    /// Liveness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    /// Pod disruption budget; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdb: Option<PodDisruptionBudgetSpec>,
}

/// Database settings in the new schema
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Database {
    /// Affinity; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    /// Postgres container image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_image: String,
    /// Extra arguments passed to postgres
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub postgres_extra_args: Vec<String>,
    /// Postgres data path inside the volume
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_data_path: String,
    /// Arguments passed to initdb
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_initdb_args: String,
    /// Postgres host auth method
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_host_auth_method: String,
    /// Compute resources; zero-value record when unset on the legacy side
    #[serde(default)]
    pub resource_requirements: ResourceRequirements,
    /// Storage request for the database PVC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postgres_storage_requirements: String,
    /// Storage class; deliberately unset so the operator applies its default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres_storage_class: Option<String>,
    /// Readiness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    /// Liveness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    /// Existing PVC the operator must adopt instead of provisioning one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pvc: String,
}

/// Cache (redis) settings in the new schema
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Cache {
    /// Redis container image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redis_image: String,
    /// Storage class; deliberately empty to defer to PVC defaulting
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redis_storage_class: String,
    /// Compute resources for the redis pod
    #[serde(default)]
    pub redis_resource_requirements: ResourceRequirements,
    /// Readiness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    /// Liveness probe; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    /// Affinity; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    /// Tolerations; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,
    /// Node selector; left to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
    /// Deployment strategy; zero-value record when unset on the legacy side
    #[serde(default)]
    pub strategy: DeploymentStrategy,
    /// Existing PVC the operator must adopt instead of provisioning one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pvc: String,
}

/// The translated configuration record
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewSpec {
    /// Deployment flavor, inferred from the image reference
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deployment_type: String,
    /// Size request for the file-storage PVC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_storage_size: String,
    /// Access mode for the file-storage PVC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_storage_access_mode: String,
    /// Storage class; deliberately empty to defer to PVC defaulting
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_storage_storage_class: String,
    /// File-storage PVC name; empty when object storage is in use
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pvc: String,
    /// Secret with Azure blob storage credentials
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_storage_azure_secret: String,
    /// Secret with S3 storage credentials
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_storage_s3_secret: String,
    /// Secret holding the database field-encryption key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub db_fields_encryption_secret: String,
    /// Secret with signing keys
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signing_secret: String,
    /// ConfigMap with signing scripts
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signing_scripts_configmap: String,
    /// Storage backend selector
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_type: String,
    /// Ingress flavor (route, ingress, nodeport, ...)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ingress_type: String,
    /// Annotations applied to the ingress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_annotations: Option<BTreeMap<String, String>>,
    /// TLS secret for the ingress
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ingress_tls_secret: String,
    /// Hostname for the route
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_host: String,
    /// TLS secret for the route
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route_tls_secret: String,
    /// HAProxy timeout (route-based installs)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub haproxy_timeout: String,
    /// Nginx client_max_body_size
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_client_max_body_size: String,
    /// Nginx proxy body size; the new schema splits this out of the client limit
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_proxy_body_size: String,
    /// Nginx proxy_read_timeout
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_proxy_read_timeout: String,
    /// Nginx proxy_connect_timeout
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_proxy_connect_timeout: String,
    /// Nginx proxy_send_timeout
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nginx_proxy_send_timeout: String,
    /// Secret holding the container token keys
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub container_token_secret: String,
    /// Container image for the core components
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    /// Tag of the core image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_version: String,
    /// Image pull policy
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_pull_policy: String,
    /// Opaque settings blob handed to the application verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulp_settings: Option<serde_json::Value>,
    /// Container image for the web front end
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_web: String,
    /// Tag of the web image
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_web_version: String,
    /// Secret holding the admin password
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_password_secret: String,
    /// Image pull secrets (list and singular legacy forms unioned)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<String>,
    /// Secret with single-sign-on configuration
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sso_secret: String,
    /// API server settings
    #[serde(default)]
    pub api: Api,
    /// Content server settings
    #[serde(default)]
    pub content: Content,
    /// Worker settings
    #[serde(default)]
    pub worker: Worker,
    /// Web front-end settings
    #[serde(default)]
    pub web: Web,
    /// Database settings
    #[serde(default)]
    pub database: Database,
    /// Cache settings
    #[serde(default)]
    pub cache: Cache,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unset counts and empty strings disappear from the wire format so the
    /// operator applies its own defaults
    #[test]
    fn zero_values_are_suppressed_in_output() {
        let spec = NewSpec {
            deployment_type: "pulp".to_string(),
            ..NewSpec::default()
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["deployment_type"], "pulp");
        assert!(value.get("pvc").is_none());
        assert!(value.get("image").is_none());
        assert!(value["api"].get("replicas").is_none());
        assert!(value["api"].get("gunicorn_workers").is_none());
        assert!(value["database"].get("postgres_storage_class").is_none());
    }

    /// Zero-value requirement and strategy records stay present as empty
    /// objects; the schema wants plain records here, not absent fields
    #[test]
    fn zero_value_records_serialize_as_empty_objects() {
        let spec = NewSpec::default();
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value["api"]["resource_requirements"],
            serde_json::json!({})
        );
        assert_eq!(value["api"]["strategy"], serde_json::json!({}));
        assert_eq!(value["web"].get("strategy"), None);
        assert_eq!(
            value["cache"]["redis_resource_requirements"],
            serde_json::json!({})
        );
    }

    /// Set counts survive serialization under the expected tags
    #[test]
    fn set_counts_serialize_under_snake_case_tags() {
        let spec = NewSpec {
            content: Content {
                replicas: 2,
                gunicorn_workers: 4,
                ..Content::default()
            },
            ..NewSpec::default()
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["content"]["replicas"], 2);
        assert_eq!(value["content"]["gunicorn_workers"], 4);
    }
}
