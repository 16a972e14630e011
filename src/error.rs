// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid Kustomization path: {0}")]
    InvalidPath(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Credential secret conflict: {0}")]
    CredentialConflict(String),

    #[error("Failed to serialize manifest: {0}")]
    SerializationError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, MigrationError>;
