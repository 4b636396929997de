//! Spec Translator
//!
//! Pure projection of a [`LegacyResource`] onto a [`NewResource`]. Every
//! mapping is written out explicitly so the whole table is checked at build
//! time; the handful of non-identity rules (type inference, PVC-name
//! synthesis, storage-class elision, pull-secret union) live in small named
//! functions with their own tests.
//!
//! Nothing here touches the cluster; the only cluster-derived input is the
//! discovered database PVC name carried in the context.

use k8s_openapi::api::apps::v1::DeploymentStrategy;
use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::context::MigrationContext;
use crate::schema::target::{Api, Cache, Content, Database, Web, Worker};
use crate::schema::{LegacyResource, NewResource, NewSpec};

/// Infer the deployment flavor from the configured image reference
///
/// A case-sensitive literal substring test: any image containing "galaxy"
/// is a Galaxy install, everything else is plain Pulp. The legacy schema's
/// declared `deployment_type` field is deliberately ignored.
pub fn deployment_type_for_image(image: &str) -> &'static str {
    if image.contains("galaxy") {
        "galaxy"
    } else {
        "pulp"
    }
}

/// Synthesize the file-storage PVC name, or nothing when object storage is
/// configured (either secret non-empty means there is no PVC to adopt)
pub fn file_storage_pvc_name(
    resource_name: &str,
    azure_secret: &str,
    s3_secret: &str,
) -> String {
    if azure_secret.is_empty() && s3_secret.is_empty() {
        format!("{resource_name}-file-storage")
    } else {
        String::new()
    }
}

/// Synthesize the cache PVC name; the cache always has one
pub fn cache_pvc_name(resource_name: &str) -> String {
    format!("{resource_name}-redis-data")
}

/// Union of the list-form and singular-form image pull secrets
///
/// The singular legacy field is appended when non-empty; order is preserved.
pub fn union_pull_secrets(list: &[String], singular: &str) -> Vec<String> {
    let mut secrets = list.to_vec();
    if !singular.is_empty() {
        secrets.push(singular.to_string());
    }
    secrets
}

fn requirements_or_default(value: &Option<ResourceRequirements>) -> ResourceRequirements {
    value.clone().unwrap_or_default()
}

fn strategy_or_default(value: &Option<DeploymentStrategy>) -> DeploymentStrategy {
    value.clone().unwrap_or_default()
}

/// Translate the legacy resource into the successor schema
///
/// The legacy resource is read-only input. Fields with no counterpart in the
/// new schema (affinity, node selectors, the retired resource-manager
/// record, the postgres selector/toleration knobs) are dropped; the storage
/// classes are elided so the new operator's PVC defaulting applies.
pub fn translate(legacy: &LegacyResource, ctx: &MigrationContext) -> NewResource {
    let spec = &legacy.spec;

    NewResource {
        api_version: ctx.new_api.api_version(),
        kind: ctx.new_api.kind.clone(),
        metadata: ObjectMeta {
            name: Some(ctx.new_resource_name.clone()),
            namespace: Some(ctx.namespace.clone()),
            ..ObjectMeta::default()
        },
        spec: NewSpec {
            deployment_type: deployment_type_for_image(&spec.image).to_string(),
            file_storage_size: spec.file_storage_size.clone(),
            file_storage_access_mode: spec.file_storage_access_mode.clone(),
            // Always empty: a class here would conflict with the PVC
            // defaulting the new operator performs.
            file_storage_storage_class: String::new(),
            pvc: file_storage_pvc_name(
                &ctx.old_resource_name,
                &spec.object_storage_azure_secret,
                &spec.object_storage_s3_secret,
            ),
            object_storage_azure_secret: spec.object_storage_azure_secret.clone(),
            object_storage_s3_secret: spec.object_storage_s3_secret.clone(),
            db_fields_encryption_secret: spec.db_fields_encryption_secret.clone(),
            signing_secret: spec.signing_secret.clone(),
            signing_scripts_configmap: spec.signing_scripts_configmap.clone(),
            storage_type: spec.storage_type.clone(),
            ingress_type: spec.ingress_type.clone(),
            ingress_annotations: spec.ingress_annotations.clone(),
            ingress_tls_secret: spec.ingress_tls_secret.clone(),
            route_host: spec.route_host.clone(),
            route_tls_secret: spec.route_tls_secret.clone(),
            haproxy_timeout: spec.haproxy_timeout.clone(),
            nginx_client_max_body_size: spec.nginx_client_max_body_size.clone(),
            // The new schema splits the proxy body size out of the client
            // limit; both start from the one legacy knob.
            nginx_proxy_body_size: spec.nginx_client_max_body_size.clone(),
            nginx_proxy_read_timeout: spec.nginx_proxy_read_timeout.clone(),
            nginx_proxy_connect_timeout: spec.nginx_proxy_connect_timeout.clone(),
            nginx_proxy_send_timeout: spec.nginx_proxy_send_timeout.clone(),
            container_token_secret: spec.container_token_secret.clone(),
            image: spec.image.clone(),
            image_version: spec.image_version.clone(),
            image_pull_policy: spec.image_pull_policy.clone(),
            pulp_settings: spec.pulp_settings.clone(),
            image_web: spec.image_web.clone(),
            image_web_version: spec.image_web_version.clone(),
            admin_password_secret: spec.admin_password_secret.clone(),
            image_pull_secrets: union_pull_secrets(
                &spec.image_pull_secrets,
                &spec.image_pull_secret,
            ),
            sso_secret: spec.sso_secret.clone(),
            api: Api {
                replicas: spec.api.replicas,
                tolerations: spec.tolerations.clone(),
                topology_spread_constraints: spec.topology_spread_constraints.clone(),
                gunicorn_timeout: spec.gunicorn_timeout,
                gunicorn_workers: spec.gunicorn_api_workers,
                resource_requirements: requirements_or_default(&spec.api.resource_requirements),
                readiness_probe: None,
                liveness_probe: None,
                pdb: None,
                strategy: strategy_or_default(&spec.api.strategy),
            },
            content: Content {
                replicas: spec.content.replicas,
                tolerations: spec.tolerations.clone(),
                topology_spread_constraints: spec.topology_spread_constraints.clone(),
                gunicorn_timeout: spec.gunicorn_timeout,
                gunicorn_workers: spec.gunicorn_content_workers,
                resource_requirements: requirements_or_default(
                    &spec.content.resource_requirements,
                ),
                readiness_probe: None,
                liveness_probe: None,
                pdb: None,
                strategy: strategy_or_default(&spec.content.strategy),
            },
            worker: Worker {
                replicas: spec.worker.replicas,
                tolerations: spec.tolerations.clone(),
                topology_spread_constraints: spec.topology_spread_constraints.clone(),
                resource_requirements: requirements_or_default(
                    &spec.worker.resource_requirements,
                ),
                readiness_probe: None,
                liveness_probe: None,
                pdb: None,
                strategy: strategy_or_default(&spec.worker.strategy),
            },
            web: Web {
                replicas: spec.web.replicas,
                resource_requirements: requirements_or_default(&spec.web.resource_requirements),
                readiness_probe: None,
                liveness_probe: None,
                pdb: None,
            },
            database: Database {
                affinity: None,
                postgres_image: spec.postgres_image.clone(),
                postgres_extra_args: spec.postgres_extra_args.clone(),
                postgres_data_path: spec.postgres_data_path.clone(),
                postgres_initdb_args: spec.postgres_initdb_args.clone(),
                postgres_host_auth_method: spec.postgres_host_auth_method.clone(),
                resource_requirements: requirements_or_default(
                    &spec.postgres_resource_requirements,
                ),
                postgres_storage_requirements: spec.postgres_storage_requirements.clone(),
                // Explicitly unset: the new operator picks the class.
                postgres_storage_class: None,
                readiness_probe: None,
                liveness_probe: None,
                pvc: ctx.db_pvc_name.clone(),
            },
            cache: Cache {
                redis_image: spec.redis_image.clone(),
                redis_storage_class: String::new(),
                redis_resource_requirements: spec.redis_resource_requirements.clone(),
                readiness_probe: None,
                liveness_probe: None,
                affinity: None,
                tolerations: None,
                node_selector: None,
                strategy: strategy_or_default(&spec.redis.strategy),
                pvc: cache_pvc_name(&ctx.old_resource_name),
            },
        },
    }
}
