// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::argocd;
use crate::error::{MigrationError, Result};
use std::env;
use url::Url;

/// Migration settings loaded from environment variables, overridable from the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace Argo CD is installed in; generated objects land here
    pub argocd_namespace: String,
    pub project: String,
    /// Destination cluster API server for generated applications
    pub destination_server: String,
    /// Name of the generated repository credential secret
    pub secret_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            argocd_namespace: argocd::DEFAULT_NAMESPACE.to_string(),
            project: argocd::DEFAULT_PROJECT.to_string(),
            destination_server: argocd::IN_CLUSTER_SERVER.to_string(),
            secret_name: argocd::DEFAULT_SECRET_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str, default: String| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
        };

        let config = Self {
            argocd_namespace: var("MTA_ARGOCD_NAMESPACE", defaults.argocd_namespace),
            project: var("MTA_ARGOCD_PROJECT", defaults.project),
            destination_server: var("MTA_DESTINATION_SERVER", defaults.destination_server),
            secret_name: var("MTA_SECRET_NAME", defaults.secret_name),
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the Argo CD namespace, e.g. from a command line flag
    pub fn with_argocd_namespace(mut self, namespace: Option<String>) -> Self {
        if let Some(namespace) = namespace {
            self.argocd_namespace = namespace;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let server = Url::parse(&self.destination_server).map_err(|e| {
            MigrationError::ConfigError(format!(
                "destination server '{}' is not a valid URL: {}",
                self.destination_server, e
            ))
        })?;
        if !matches!(server.scheme(), "https" | "http") {
            return Err(MigrationError::ConfigError(format!(
                "destination server '{}' must be an http(s) URL",
                self.destination_server
            )));
        }
        if self.secret_name.is_empty() || self.argocd_namespace.is_empty() {
            return Err(MigrationError::ConfigError(
                "secret name and Argo CD namespace must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
