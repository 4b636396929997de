//! Custom-resource schemas handled by the migration
//!
//! - [`legacy`] - the Ansible operator's `Pulp` schema (read-only input)
//! - [`target`] - the Go operator's `Pulp` schema (translation output)
//! - [`olm`] - OLM Subscription payloads used to swap the operators

pub mod legacy;
pub mod olm;
pub mod target;

pub use legacy::{LegacyResource, LegacySpec};
pub use olm::{Subscription, SubscriptionSpec, SubscriptionStatus};
pub use target::{NewResource, NewSpec};

/// Serde helper: suppress zero counts the way the operators' schemas expect
pub(crate) fn is_zero(value: &i32) -> bool {
    *value == 0
}
