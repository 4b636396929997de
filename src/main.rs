//! pulp-migrate entry point
//!
//! Parses the configuration, builds a cluster client, and runs the
//! migration once. Ctrl-C aborts the registration wait; every other stage
//! is a single short cluster call. Exits non-zero on any failure.

use clap::Parser;
use kube::Client;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pulp_migrate::cluster::KubeCluster;
use pulp_migrate::config::MigrationConfig;
use pulp_migrate::context::MigrationContext;
use pulp_migrate::orchestrator::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install crypto provider for the rustls-backed kube client.
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        eprintln!(
            "CRITICAL: Failed to install crypto provider: {:?}. \
             The tool cannot talk to the cluster without a working TLS implementation.",
            e
        );
        std::process::exit(1);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = MigrationConfig::parse();
    let ctx = MigrationContext::from_config(config);

    println!(
        "Migrating Pulp resource {} in namespace {} to {}",
        ctx.old_resource_name,
        ctx.namespace,
        ctx.new_api.api_version()
    );

    let client = Client::try_default()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;

    let mut migrator = Migrator::new(KubeCluster::new(client), ctx);
    migrator
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
