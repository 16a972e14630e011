// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use crate::cleanup::{uninstall_flux, CleanupOptions};
use crate::constants::flux;
use crate::migrate::Migrator;
use crate::render::render_manifests;
use crate::translate::Manifest;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the repository secret and ApplicationSet for a Flux Kustomization
    Kustomization {
        /// Name of the Kustomization
        #[arg(long)]
        name: String,
        /// Namespace of the Kustomization
        #[arg(long)]
        namespace: String,
    },
    /// Print the Application for a Flux HelmRelease
    #[command(name = "helmrelease")]
    HelmRelease {
        /// Name of the HelmRelease
        #[arg(long)]
        name: String,
        /// Namespace of the HelmRelease
        #[arg(long)]
        namespace: String,
    },
    /// Migrate every Kustomization and HelmRelease in a namespace to Argo CD
    Auto {
        /// Namespace holding the Flux resources
        #[arg(long, default_value = flux::DEFAULT_NAMESPACE)]
        namespace: String,
        /// Uninstall Flux once everything is migrated
        #[arg(long)]
        confirm_migrate: bool,
        /// Uninstall as a server-side dry run
        #[arg(long)]
        dry_run: bool,
        /// Keep the Flux namespace when uninstalling
        #[arg(long)]
        keep_namespace: bool,
    },
}

/// Run a command against the cluster, writing YAML output to stdout
pub async fn handle_command(cmd: Command, migrator: &Migrator) -> Result<()> {
    match cmd {
        Command::Kustomization { name, namespace } => {
            let kustomization = migrator
                .get_kustomization(&namespace, &name)
                .await
                .with_context(|| format!("Failed to read Kustomization {}/{}", namespace, name))?;
            let manifests = migrator
                .plan_kustomization(&kustomization)
                .await
                .with_context(|| format!("Failed to convert Kustomization {}/{}", namespace, name))?
                .into_manifests();
            print_manifests(&manifests)
        }
        Command::HelmRelease { name, namespace } => {
            let release = migrator
                .get_helm_release(&namespace, &name)
                .await
                .with_context(|| format!("Failed to read HelmRelease {}/{}", namespace, name))?;
            let application = migrator
                .plan_helm_release(&release)
                .await
                .with_context(|| format!("Failed to convert HelmRelease {}/{}", namespace, name))?;
            print_manifests(&[Manifest::Application(application)])
        }
        Command::Auto {
            namespace,
            confirm_migrate,
            dry_run,
            keep_namespace,
        } => {
            migrator
                .migrate_namespace(&namespace)
                .await
                .with_context(|| format!("Failed to migrate Flux resources in {}", namespace))?;

            if !confirm_migrate {
                info!("Flux left installed, pass --confirm-migrate to uninstall it");
                return Ok(());
            }

            let options = CleanupOptions {
                dry_run,
                keep_namespace,
            };
            uninstall_flux(migrator.accessor().client(), &namespace, &options)
                .await
                .context("Failed to uninstall Flux")
        }
    }
}

fn print_manifests(manifests: &[Manifest]) -> Result<()> {
    let yaml = render_manifests(manifests).context("Failed to render manifests")?;
    print!("{}", yaml);
    Ok(())
}
