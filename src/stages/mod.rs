//! Migration stages
//!
//! Each stage is one step of the hand-off, talking to the cluster through
//! the [`ClusterOps`](crate::cluster::ClusterOps) seam and reading/writing
//! the shared [`MigrationContext`](crate::context::MigrationContext). The
//! orchestrator sequences them; none of them recovers from its own errors.

pub mod create;
pub mod inspect;
pub mod lifecycle;
pub mod relabel;
pub mod teardown;
