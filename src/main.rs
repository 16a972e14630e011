// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mta::commands::{handle_command, Command};
use mta::config::Config;
use mta::kubernetes::{create_client, ObjectAccessor};
use mta::migrate::Migrator;

/// Migrate Flux resources to Argo CD
#[derive(Parser, Debug)]
#[command(name = "mta", version)]
#[command(about = "Migrate Flux Kustomizations and HelmReleases to Argo CD", long_about = None)]
struct Args {
    /// Path to the kubeconfig file (defaults to ~/.kube/config)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Namespace Argo CD is installed in
    #[arg(long, global = true)]
    argocd_namespace: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    // Logs go to stderr, stdout carries the generated YAML
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_argocd_namespace(args.argocd_namespace);
    config.validate().context("Invalid configuration")?;
    info!(
        "Configuration loaded: argocd_namespace={}, project={}",
        config.argocd_namespace, config.project
    );

    let client = create_client(args.kubeconfig.as_deref())
        .await
        .context("Failed to connect to Kubernetes")?;

    let migrator = Migrator::new(ObjectAccessor::new(client), config);
    handle_command(args.command, &migrator).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
