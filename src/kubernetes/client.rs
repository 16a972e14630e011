// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation from a kubeconfig file

use crate::error::{MigrationError, Result};
use directories::BaseDirs;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// The kubeconfig location used when none is given: `~/.kube/config`
pub fn default_kubeconfig_path() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or_else(|| {
        MigrationError::KubeconfigError("Unable to determine the home directory".to_string())
    })?;
    Ok(dirs.home_dir().join(".kube").join("config"))
}

/// Create a Kubernetes client from the kubeconfig at `path`, or the default location
#[instrument]
pub async fn create_client(path: Option<&Path>) -> Result<Client> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_kubeconfig_path()?,
    };

    debug!("Reading kubeconfig from {}", path.display());
    let kubeconfig = Kubeconfig::read_from(&path).map_err(|e| {
        MigrationError::KubeconfigError(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })?;

    create_client_from_kubeconfig(kubeconfig).await
}

/// Create a Kubernetes client from a parsed kubeconfig, using its current context
async fn create_client_from_kubeconfig(kubeconfig: Kubeconfig) -> Result<Client> {
    let context = kubeconfig.current_context.clone().unwrap_or_default();

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| {
                MigrationError::KubeconfigError(format!("Failed to create config: {}", e))
            })?;

    info!(
        "Using context '{}' against {}",
        context, client_config.cluster_url
    );

    Client::try_from(client_config)
        .map_err(|e| MigrationError::KubeconfigError(format!("Failed to create client: {}", e)))
}
