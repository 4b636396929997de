//! OLM Subscription payloads
//!
//! Just enough of the operators.coreos.com/v1alpha1 surface to read the
//! legacy subscription's resolved CSV and to submit the successor
//! subscription. OLM uses camelCase tags, unlike the Pulp schemas.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::context::MigrationContext;

/// An OLM Subscription object
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    /// `apiVersion` of the subscription type
    #[serde(rename = "apiVersion", default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Object kind
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Standard object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Subscription spec
    #[serde(default)]
    pub spec: SubscriptionSpec,
    /// Status written by OLM; absent on objects this tool creates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubscriptionStatus>,
}

/// Spec of an OLM Subscription
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionSpec {
    /// Channel to track within the package
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    /// Install-plan approval mode (`Automatic` or `Manual`)
    #[serde(
        rename = "installPlanApproval",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub install_plan_approval: String,
    /// Catalog source providing the package
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Namespace of the catalog source
    #[serde(
        rename = "sourceNamespace",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub source_namespace: String,
    /// CSV the subscription starts from
    #[serde(rename = "startingCSV", default, skip_serializing_if = "String::is_empty")]
    pub starting_csv: String,
    /// Package name within the catalog
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Status of an OLM Subscription
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStatus {
    /// CSV currently resolved for the subscription
    #[serde(rename = "currentCSV", default, skip_serializing_if = "String::is_empty")]
    pub current_csv: String,
}

impl Subscription {
    /// Build the successor operator's subscription from the migration context
    pub fn for_new_operator(ctx: &MigrationContext) -> Self {
        Self {
            api_version: "operators.coreos.com/v1alpha1".to_string(),
            kind: "Subscription".to_string(),
            metadata: ObjectMeta {
                name: Some(ctx.new_subscription_name.clone()),
                namespace: Some(ctx.namespace.clone()),
                ..ObjectMeta::default()
            },
            spec: SubscriptionSpec {
                channel: ctx.new_subscription_channel.clone(),
                install_plan_approval: ctx.new_subscription_install_plan_approval.clone(),
                source: ctx.new_subscription_source.clone(),
                source_namespace: ctx.new_subscription_source_namespace.clone(),
                starting_csv: ctx.new_subscription_starting_csv.clone(),
                name: ctx.new_subscription_name.clone(),
            },
            status: None,
        }
    }
}
