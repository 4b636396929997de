//! Migration Orchestrator
//!
//! Drives the stages through a fixed, fail-fast sequence. Every state
//! transition moves forward; the first stage error lands the machine in the
//! absorbing `Failed` state and the error propagates to the caller. There is
//! no compensation and no resume: a mid-run failure leaves the cluster in
//! whatever state the last completed stage produced, and the console trail
//! tells the operator exactly how far the run got.

use std::future::Future;

use tracing::error;

use crate::cluster::ClusterOps;
use crate::context::MigrationContext;
use crate::poll::PollConfig;
use crate::stages::{create, inspect, lifecycle, relabel, teardown};
use crate::{translate, Result};

/// States of the migration state machine
///
/// Strictly forward transitions; `Failed` is reachable from every working
/// state and absorbing, `Done` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationState {
    /// Discovering database child resources
    Inspecting,
    /// Reading the legacy subscription's resolved CSV
    ReadingVersion,
    /// Deleting the legacy subscription and CSV
    Decommissioning,
    /// Deleting the legacy component Deployments
    TearingDownWorkloads,
    /// Scaling the database StatefulSet to zero
    DownscalingDatabase,
    /// Repointing the database Service selector
    Relabeling,
    /// Installing the successor subscription
    Subscribing,
    /// Waiting for the new resource type to register
    AwaitingNewType,
    /// Fetching and translating the legacy resource
    Translating,
    /// Submitting the translated resource
    Creating,
    /// Migration completed successfully
    Done,
    /// A stage failed; the run is over
    Failed,
}

impl MigrationState {
    fn banner(self) -> &'static str {
        match self {
            Self::Inspecting => "[1/10] Inspecting database resources",
            Self::ReadingVersion => "[2/10] Reading the installed operator version",
            Self::Decommissioning => "[3/10] Removing the legacy operator",
            Self::TearingDownWorkloads => "[4/10] Deleting legacy workloads",
            Self::DownscalingDatabase => "[5/10] Downscaling the database",
            Self::Relabeling => "[6/10] Repointing the database Service",
            Self::Subscribing => "[7/10] Installing the new operator",
            Self::AwaitingNewType => "[8/10] Waiting for the new resource type",
            Self::Translating => "[9/10] Translating the Pulp resource",
            Self::Creating => "[10/10] Creating the new Pulp resource",
            Self::Done | Self::Failed => "",
        }
    }
}

/// Runs one migration from start to finish
pub struct Migrator<C> {
    cluster: C,
    ctx: MigrationContext,
    poll: PollConfig,
    state: MigrationState,
    history: Vec<MigrationState>,
}

impl<C: ClusterOps> Migrator<C> {
    /// Build a migrator with the default 10 x 5 s registration wait
    pub fn new(cluster: C, ctx: MigrationContext) -> Self {
        Self::with_poll_config(cluster, ctx, PollConfig::default())
    }

    /// Build a migrator with an explicit registration-wait policy
    pub fn with_poll_config(cluster: C, ctx: MigrationContext, poll: PollConfig) -> Self {
        Self {
            cluster,
            ctx,
            poll,
            state: MigrationState::Inspecting,
            history: Vec::new(),
        }
    }

    /// State the machine currently occupies
    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Every state entered so far, in order
    pub fn history(&self) -> &[MigrationState] {
        &self.history
    }

    fn enter(&mut self, state: MigrationState) {
        self.state = state;
        self.history.push(state);
        let banner = state.banner();
        if !banner.is_empty() {
            println!("\n{banner} ...");
        }
    }

    fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            error!(state = ?self.state, error = %e, "Migration stage failed");
            println!("❌ Migration failed during {:?}: {e}", self.state);
            self.enter(MigrationState::Failed);
            e
        })
    }

    /// Run the migration to completion
    ///
    /// The cancellation future only interrupts the registration wait; every
    /// other stage is a single blocking cluster call. On success the machine
    /// ends in `Done` and the final context (with all discovered names) is
    /// left in place for inspection.
    pub async fn run(&mut self, cancel: impl Future<Output = ()>) -> Result<()> {
        self.enter(MigrationState::Inspecting);
        let result = inspect::discover_database(&self.cluster, &mut self.ctx).await;
        self.check(result)?;

        self.enter(MigrationState::ReadingVersion);
        let result = lifecycle::read_current_version(&self.cluster, &mut self.ctx).await;
        self.check(result)?;

        self.enter(MigrationState::Decommissioning);
        let result = lifecycle::decommission(&self.cluster, &self.ctx).await;
        self.check(result)?;

        self.enter(MigrationState::TearingDownWorkloads);
        let result = teardown::delete_component_deployments(&self.cluster, &self.ctx).await;
        self.check(result)?;

        self.enter(MigrationState::DownscalingDatabase);
        let result = teardown::downscale_database(&self.cluster, &self.ctx).await;
        self.check(result)?;

        self.enter(MigrationState::Relabeling);
        let result = relabel::repoint_database_service(&self.cluster, &self.ctx).await;
        self.check(result)?;

        self.enter(MigrationState::Subscribing);
        let result = lifecycle::subscribe(&self.cluster, &self.ctx).await;
        self.check(result)?;

        self.enter(MigrationState::AwaitingNewType);
        let result =
            lifecycle::await_new_resource_type(&self.cluster, &self.ctx, &self.poll, cancel).await;
        self.check(result)?;

        self.enter(MigrationState::Translating);
        let result = create::fetch_legacy_resource(&self.cluster, &self.ctx).await;
        let legacy = self.check(result)?;
        let translated = translate::translate(&legacy, &self.ctx);

        self.enter(MigrationState::Creating);
        let result = create::submit_new_resource(&self.cluster, &self.ctx, &translated).await;
        self.check(result)?;

        self.enter(MigrationState::Done);
        println!("\n=== Migration finished ===");
        Ok(())
    }
}
