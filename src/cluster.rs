//! Cluster operations behind a trait seam
//!
//! Every stage talks to the cluster through [`ClusterOps`], so the whole
//! migration can run against a recording mock in tests. [`KubeCluster`] is
//! the real implementation backed by a kube [`Client`]: typed APIs for the
//! core/apps resources, [`DynamicObject`] for the OLM and Pulp
//! custom-resource groups.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
use kube::api::{
    Api, DeleteParams, DynamicObject, GroupVersionKind, ListParams, Patch, PatchParams, PostParams,
};
use kube::discovery::ApiResource;
use kube::Client;
use kube::Resource;

use crate::context::ResourceApi;
use crate::schema::olm::Subscription;
use crate::schema::LegacyResource;
use crate::Result;

/// Field manager sent with the Service selector patches
///
/// Kept identical to what `kubectl label` would send so a later manual
/// `kubectl label` on the Service does not fight over field ownership.
pub const LABEL_FIELD_MANAGER: &str = "kubectl-label";

/// The cluster API surface the migration consumes
///
/// One method per REST interaction described in the design; stages never
/// touch a kube client directly.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// List PersistentVolumeClaim names matching a label selector
    async fn list_pvc_names(&self, namespace: &str, selector: &str) -> Result<Vec<String>>;

    /// List Service names matching a label selector
    async fn list_service_names(&self, namespace: &str, selector: &str) -> Result<Vec<String>>;

    /// List StatefulSet names matching a label selector
    async fn list_stateful_set_names(&self, namespace: &str, selector: &str)
        -> Result<Vec<String>>;

    /// Fetch a named OLM Subscription
    async fn get_subscription(&self, namespace: &str, name: &str) -> Result<Subscription>;

    /// Delete a named OLM Subscription
    async fn delete_subscription(&self, namespace: &str, name: &str) -> Result<()>;

    /// Delete a named ClusterServiceVersion
    async fn delete_csv(&self, namespace: &str, name: &str) -> Result<()>;

    /// Create an OLM Subscription
    async fn create_subscription(&self, namespace: &str, subscription: &Subscription)
        -> Result<()>;

    /// Delete all Deployments matching a label selector
    async fn delete_deployments(&self, namespace: &str, selector: &str) -> Result<()>;

    /// Merge-patch a StatefulSet's scale subresource to the given replica count
    async fn scale_stateful_set(&self, namespace: &str, name: &str, replicas: i32) -> Result<()>;

    /// Merge-patch a Service with the given body (selector label surgery)
    async fn patch_service(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()>;

    /// Probe whether a custom-resource group/version is registered
    async fn probe_api_group(&self, api: &ResourceApi) -> Result<()>;

    /// Fetch the legacy Pulp custom resource by name
    async fn get_legacy_resource(
        &self,
        api: &ResourceApi,
        namespace: &str,
        name: &str,
    ) -> Result<LegacyResource>;

    /// Create a custom resource from an already-serialized manifest
    async fn create_resource(
        &self,
        api: &ResourceApi,
        namespace: &str,
        manifest: &serde_json::Value,
    ) -> Result<()>;
}

/// Real [`ClusterOps`] implementation backed by a kube [`Client`]
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Wrap an authenticated kube client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn olm_api(&self, namespace: &str, kind: &str, plural: &str) -> Api<DynamicObject> {
        let gvk = GroupVersionKind::gvk("operators.coreos.com", "v1alpha1", kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, plural);
        Api::namespaced_with(self.client.clone(), namespace, &resource)
    }

    fn cr_api(&self, api: &ResourceApi, namespace: &str) -> Api<DynamicObject> {
        let gvk = GroupVersionKind::gvk(&api.group, &api.version, &api.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, &api.plural);
        Api::namespaced_with(self.client.clone(), namespace, &resource)
    }
}

fn names_of<K: Resource + Clone>(list: kube::core::ObjectList<K>) -> Vec<String> {
    list.items
        .into_iter()
        .filter_map(|item| item.meta().name.clone())
        .collect()
}

#[async_trait]
impl ClusterOps for KubeCluster {
    async fn list_pvc_names(&self, namespace: &str, selector: &str) -> Result<Vec<String>> {
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default().labels(selector)).await?;
        Ok(names_of(list))
    }

    async fn list_service_names(&self, namespace: &str, selector: &str) -> Result<Vec<String>> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default().labels(selector)).await?;
        Ok(names_of(list))
    }

    async fn list_stateful_set_names(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<String>> {
        let api: Api<StatefulSet> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default().labels(selector)).await?;
        Ok(names_of(list))
    }

    async fn get_subscription(&self, namespace: &str, name: &str) -> Result<Subscription> {
        let api = self.olm_api(namespace, "Subscription", "subscriptions");
        let obj = api.get(name).await?;
        let value = serde_json::to_value(&obj)?;
        Ok(serde_json::from_value(value)?)
    }

    async fn delete_subscription(&self, namespace: &str, name: &str) -> Result<()> {
        let api = self.olm_api(namespace, "Subscription", "subscriptions");
        api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }

    async fn delete_csv(&self, namespace: &str, name: &str) -> Result<()> {
        let api = self.olm_api(namespace, "ClusterServiceVersion", "clusterserviceversions");
        api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }

    async fn create_subscription(
        &self,
        namespace: &str,
        subscription: &Subscription,
    ) -> Result<()> {
        let api = self.olm_api(namespace, "Subscription", "subscriptions");
        let obj: DynamicObject = serde_json::from_value(serde_json::to_value(subscription)?)?;
        api.create(&PostParams::default(), &obj).await?;
        Ok(())
    }

    async fn delete_deployments(&self, namespace: &str, selector: &str) -> Result<()> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        api.delete_collection(
            &DeleteParams::default(),
            &ListParams::default().labels(selector),
        )
        .await?;
        Ok(())
    }

    async fn scale_stateful_set(&self, namespace: &str, name: &str, replicas: i32) -> Result<()> {
        let api: Api<StatefulSet> = Api::namespaced(self.client.clone(), namespace);
        let body = serde_json::json!({"spec": {"replicas": replicas}});
        api.patch_scale(name, &PatchParams::default(), &Patch::Merge(&body))
            .await?;
        Ok(())
    }

    async fn patch_service(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let params = PatchParams {
            field_manager: Some(LABEL_FIELD_MANAGER.to_string()),
            ..PatchParams::default()
        };
        api.patch(name, &params, &Patch::Merge(&patch)).await?;
        Ok(())
    }

    async fn probe_api_group(&self, api: &ResourceApi) -> Result<()> {
        let group = kube::discovery::group(&self.client, &api.group).await?;
        if group.versioned_resources(&api.version).is_empty() {
            return Err(crate::Error::server(format!(
                "group {} has no resources at version {}",
                api.group, api.version
            )));
        }
        Ok(())
    }

    async fn get_legacy_resource(
        &self,
        api: &ResourceApi,
        namespace: &str,
        name: &str,
    ) -> Result<LegacyResource> {
        let obj = self.cr_api(api, namespace).get(name).await?;
        let value = serde_json::to_value(&obj)?;
        Ok(serde_json::from_value(value)?)
    }

    async fn create_resource(
        &self,
        api: &ResourceApi,
        namespace: &str,
        manifest: &serde_json::Value,
    ) -> Result<()> {
        let obj: DynamicObject = serde_json::from_value(manifest.clone())?;
        self.cr_api(api, namespace)
            .create(&PostParams::default(), &obj)
            .await?;
        Ok(())
    }
}


// =============================================================================
// Recording Mock for Tests
// =============================================================================
//
// A scriptable ClusterOps that records every call in order. Stage and
// orchestrator tests assert on the recorded sequence; responses are seeded
// through the builder methods and failures injected per operation key.

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::Error;

    /// One recorded cluster interaction
    #[derive(Clone, Debug, PartialEq)]
    pub enum Call {
        ListPvcs { selector: String },
        ListServices { selector: String },
        ListStatefulSets { selector: String },
        GetSubscription { name: String },
        DeleteSubscription { name: String },
        DeleteCsv { name: String },
        CreateSubscription { name: String },
        DeleteDeployments { selector: String },
        ScaleStatefulSet { name: String, replicas: i32 },
        PatchService { name: String, body: serde_json::Value },
        ProbeApiGroup { group_version: String },
        GetLegacyResource { name: String },
        CreateResource { body: serde_json::Value },
    }

    /// Scriptable, recording [`ClusterOps`] implementation
    #[derive(Default)]
    pub struct MockCluster {
        calls: Mutex<Vec<Call>>,
        pvcs: Vec<String>,
        services: Vec<String>,
        stateful_sets: Vec<String>,
        subscription: Option<Subscription>,
        legacy: Option<LegacyResource>,
        probe_failures: AtomicU32,
        fail: Mutex<HashMap<String, String>>,
    }

    impl MockCluster {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_pvcs(mut self, names: &[&str]) -> Self {
            self.pvcs = names.iter().map(|s| s.to_string()).collect();
            self
        }

        pub fn with_services(mut self, names: &[&str]) -> Self {
            self.services = names.iter().map(|s| s.to_string()).collect();
            self
        }

        pub fn with_stateful_sets(mut self, names: &[&str]) -> Self {
            self.stateful_sets = names.iter().map(|s| s.to_string()).collect();
            self
        }

        pub fn with_subscription(mut self, subscription: Subscription) -> Self {
            self.subscription = Some(subscription);
            self
        }

        pub fn with_legacy_resource(mut self, resource: LegacyResource) -> Self {
            self.legacy = Some(resource);
            self
        }

        /// Fail the first `count` API-group probes before succeeding
        pub fn with_probe_failures(self, count: u32) -> Self {
            self.probe_failures.store(count, Ordering::SeqCst);
            self
        }

        /// Inject a server error for the given operation key
        pub fn failing(self, operation: &str, message: &str) -> Self {
            self.fail
                .lock()
                .unwrap()
                .insert(operation.to_string(), message.to_string());
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn maybe_fail(&self, operation: &str) -> Result<()> {
            match self.fail.lock().unwrap().get(operation) {
                Some(message) => Err(Error::server(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ClusterOps for MockCluster {
        async fn list_pvc_names(&self, _namespace: &str, selector: &str) -> Result<Vec<String>> {
            self.record(Call::ListPvcs {
                selector: selector.to_string(),
            });
            self.maybe_fail("list_pvcs")?;
            Ok(self.pvcs.clone())
        }

        async fn list_service_names(
            &self,
            _namespace: &str,
            selector: &str,
        ) -> Result<Vec<String>> {
            self.record(Call::ListServices {
                selector: selector.to_string(),
            });
            self.maybe_fail("list_services")?;
            Ok(self.services.clone())
        }

        async fn list_stateful_set_names(
            &self,
            _namespace: &str,
            selector: &str,
        ) -> Result<Vec<String>> {
            self.record(Call::ListStatefulSets {
                selector: selector.to_string(),
            });
            self.maybe_fail("list_stateful_sets")?;
            Ok(self.stateful_sets.clone())
        }

        async fn get_subscription(&self, _namespace: &str, name: &str) -> Result<Subscription> {
            self.record(Call::GetSubscription {
                name: name.to_string(),
            });
            self.maybe_fail("get_subscription")?;
            self.subscription
                .clone()
                .ok_or_else(|| Error::not_found(format!("subscription {name}")))
        }

        async fn delete_subscription(&self, _namespace: &str, name: &str) -> Result<()> {
            self.record(Call::DeleteSubscription {
                name: name.to_string(),
            });
            self.maybe_fail("delete_subscription")
        }

        async fn delete_csv(&self, _namespace: &str, name: &str) -> Result<()> {
            self.record(Call::DeleteCsv {
                name: name.to_string(),
            });
            self.maybe_fail("delete_csv")
        }

        async fn create_subscription(
            &self,
            _namespace: &str,
            subscription: &Subscription,
        ) -> Result<()> {
            self.record(Call::CreateSubscription {
                name: subscription
                    .metadata
                    .name
                    .clone()
                    .unwrap_or_default(),
            });
            self.maybe_fail("create_subscription")
        }

        async fn delete_deployments(&self, _namespace: &str, selector: &str) -> Result<()> {
            self.record(Call::DeleteDeployments {
                selector: selector.to_string(),
            });
            self.maybe_fail(&format!("delete_deployments:{selector}"))?;
            self.maybe_fail("delete_deployments")
        }

        async fn scale_stateful_set(
            &self,
            _namespace: &str,
            name: &str,
            replicas: i32,
        ) -> Result<()> {
            self.record(Call::ScaleStatefulSet {
                name: name.to_string(),
                replicas,
            });
            self.maybe_fail("scale_stateful_set")
        }

        async fn patch_service(
            &self,
            _namespace: &str,
            name: &str,
            patch: serde_json::Value,
        ) -> Result<()> {
            self.record(Call::PatchService {
                name: name.to_string(),
                body: patch,
            });
            self.maybe_fail("patch_service")
        }

        async fn probe_api_group(&self, api: &ResourceApi) -> Result<()> {
            self.record(Call::ProbeApiGroup {
                group_version: api.api_version(),
            });
            let remaining = self.probe_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.probe_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(Error::server(
                    "the server could not find the requested resource",
                ));
            }
            self.maybe_fail("probe_api_group")
        }

        async fn get_legacy_resource(
            &self,
            _api: &ResourceApi,
            _namespace: &str,
            name: &str,
        ) -> Result<LegacyResource> {
            self.record(Call::GetLegacyResource {
                name: name.to_string(),
            });
            self.maybe_fail("get_legacy_resource")?;
            self.legacy
                .clone()
                .ok_or_else(|| Error::not_found(format!("pulps.pulp.pulpproject.org {name}")))
        }

        async fn create_resource(
            &self,
            _api: &ResourceApi,
            _namespace: &str,
            manifest: &serde_json::Value,
        ) -> Result<()> {
            self.record(Call::CreateResource {
                body: manifest.clone(),
            });
            self.maybe_fail("create_resource")
        }
    }
}
