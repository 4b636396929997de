//! Migration configuration
//!
//! Every input arrives as a command-line flag or environment variable, with
//! the environment names kept compatible with the original migration job
//! manifests. Only the namespace and the legacy resource name are required;
//! everything else has a working default for a stock Pulp installation.

use std::fmt;
use std::str::FromStr;

use clap::Parser;

/// An API group/version pair, e.g. `pulp.pulpproject.org/v1beta1`
///
/// Accepts the bare `<group>/<version>` form as well as the legacy
/// `/apis/<group>/<version>` path form some job manifests carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupVersion {
    /// API group, e.g. `pulp.pulpproject.org`
    pub group: String,
    /// API version within the group, e.g. `v1beta1`
    pub version: String,
}

impl GroupVersion {
    /// Render as the `apiVersion` string used in object manifests
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.version)
    }
}

impl FromStr for GroupVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start_matches('/');
        let trimmed = trimmed.strip_prefix("apis/").unwrap_or(trimmed);
        match trimmed.split_once('/') {
            Some((group, version))
                if !group.is_empty() && !version.is_empty() && !version.contains('/') =>
            {
                Ok(GroupVersion {
                    group: group.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(format!("expected <group>/<version>, got {s:?}")),
        }
    }
}

/// Configuration for one migration run
///
/// Parsed once at startup and converted into a
/// [`MigrationContext`](crate::context::MigrationContext); nothing reads the
/// process environment after that.
#[derive(Parser, Clone, Debug)]
#[command(name = "pulp-migrate", version, about, long_about = None)]
pub struct MigrationConfig {
    /// Namespace holding the legacy Pulp deployment (the new CR is created here too)
    #[arg(long, env = "PULP_NAMESPACE")]
    pub namespace: String,

    /// Name of the legacy Pulp custom resource
    #[arg(long, env = "PULP_RESOURCE_NAME")]
    pub resource_name: String,

    /// Name for the translated custom resource (defaults to the legacy name)
    #[arg(long, env = "NEW_PULP_RESOURCE_NAME")]
    pub new_resource_name: Option<String>,

    /// Name of the legacy operator subscription
    #[arg(long, env = "PULP_SUBSCRIPTION_NAME", default_value = "pulp-operator")]
    pub subscription_name: String,

    /// Name for the new operator subscription (defaults to the legacy name)
    #[arg(long, env = "NEW_PULP_SUBSCRIPTION_NAME")]
    pub new_subscription_name: Option<String>,

    /// Channel to subscribe the new operator to
    #[arg(long, env = "NEW_SUBSCRIPTION_CHANNEL", default_value = "beta")]
    pub new_subscription_channel: String,

    /// Install-plan approval mode for the new subscription
    #[arg(
        long,
        env = "NEW_SUBSCRIPTION_INSTALL_PLAN_APPROVAL",
        default_value = "Automatic"
    )]
    pub new_subscription_install_plan_approval: String,

    /// Catalog source providing the new operator package
    #[arg(long, env = "NEW_SUBSCRIPTION_SOURCE", default_value = "community-operators")]
    pub new_subscription_source: String,

    /// Namespace of the catalog source
    #[arg(
        long,
        env = "NEW_SUBSCRIPTION_SOURCE_NAMESPACE",
        default_value = "openshift-marketplace"
    )]
    pub new_subscription_source_namespace: String,

    /// CSV the new subscription starts from
    #[arg(
        long,
        env = "NEW_SUBSCRIPTION_STARTING_CSV",
        default_value = "pulp-operator.v1.0.0-alpha.4"
    )]
    pub new_subscription_starting_csv: String,

    /// API group/version of the new custom resource type
    #[arg(
        long,
        env = "NEW_PULP_API",
        default_value = "repo-manager.pulpproject.org/v1alpha1"
    )]
    pub new_api: GroupVersion,

    /// API group/version of the legacy custom resource type
    #[arg(long, env = "PULP_API", default_value = "pulp.pulpproject.org/v1beta1")]
    pub old_api: GroupVersion,

    /// Kind of the Pulp custom resource
    #[arg(long, env = "NEW_PULP_KIND", default_value = "Pulp")]
    pub new_kind: String,

    /// Resource path (plural) of the legacy custom resource
    #[arg(long, env = "PULP_RESOURCE", default_value = "pulps")]
    pub old_resource: String,

    /// Resource path (plural) of the new custom resource (defaults to the legacy one)
    #[arg(long, env = "NEW_PULP_RESOURCE")]
    pub new_resource: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_args() -> MigrationConfig {
        MigrationConfig::parse_from([
            "pulp-migrate",
            "--namespace",
            "pulp",
            "--resource-name",
            "example-pulp",
        ])
    }

    #[test]
    fn group_version_parses_bare_form() {
        let gv: GroupVersion = "pulp.pulpproject.org/v1beta1".parse().unwrap();
        assert_eq!(gv.group, "pulp.pulpproject.org");
        assert_eq!(gv.version, "v1beta1");
        assert_eq!(gv.api_version(), "pulp.pulpproject.org/v1beta1");
    }

    #[test]
    fn group_version_accepts_legacy_path_form() {
        let gv: GroupVersion = "/apis/pulp.pulpproject.org/v1beta1".parse().unwrap();
        assert_eq!(gv.group, "pulp.pulpproject.org");
        assert_eq!(gv.version, "v1beta1");
    }

    #[test]
    fn group_version_rejects_malformed_input() {
        assert!("justagroup".parse::<GroupVersion>().is_err());
        assert!("/apis/".parse::<GroupVersion>().is_err());
        assert!("a/b/c".parse::<GroupVersion>().is_err());
    }

    #[test]
    fn defaults_match_a_stock_installation() {
        let config = minimal_args();
        assert_eq!(config.subscription_name, "pulp-operator");
        assert_eq!(config.new_subscription_channel, "beta");
        assert_eq!(config.new_subscription_install_plan_approval, "Automatic");
        assert_eq!(config.new_subscription_source, "community-operators");
        assert_eq!(
            config.new_subscription_source_namespace,
            "openshift-marketplace"
        );
        assert_eq!(
            config.new_subscription_starting_csv,
            "pulp-operator.v1.0.0-alpha.4"
        );
        assert_eq!(
            config.new_api.api_version(),
            "repo-manager.pulpproject.org/v1alpha1"
        );
        assert_eq!(config.old_api.api_version(), "pulp.pulpproject.org/v1beta1");
        assert_eq!(config.new_kind, "Pulp");
        assert_eq!(config.old_resource, "pulps");
        assert!(config.new_resource_name.is_none());
        assert!(config.new_subscription_name.is_none());
        assert!(config.new_resource.is_none());
    }

    #[test]
    fn required_inputs_have_no_defaults() {
        let result = MigrationConfig::try_parse_from(["pulp-migrate"]);
        assert!(result.is_err());
    }
}
