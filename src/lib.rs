//! pulp-migrate - one-shot hand-off of a Pulp deployment between operators
//!
//! Migrates a running Pulp installation from the legacy Ansible-based
//! operator to the successor Go-based operator, in place: the database
//! StatefulSet, its Service, and its storage survive the hand-off while
//! everything else is torn down and recreated by the new operator from a
//! translated custom resource.
//!
//! # Modules
//!
//! - [`config`] - environment/flag configuration for one run
//! - [`context`] - shared migration state threaded through the stages
//! - [`cluster`] - the cluster-operations trait seam and its kube backend
//! - [`schema`] - the legacy and successor Pulp schemas plus OLM payloads
//! - [`stages`] - the individual migration stages
//! - [`translate`] - the pure legacy-to-new spec translation
//! - [`orchestrator`] - the fail-fast state machine sequencing the stages
//! - [`poll`] - the bounded, cancellable registration wait
//! - [`error`] - error types for the migration
//!
//! There is deliberately no rollback and no resume: a failed run stops where
//! it failed, and the operator recovers from the console trail.

#![deny(missing_docs)]

pub mod cluster;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod poll;
pub mod schema;
pub mod stages;
pub mod translate;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
