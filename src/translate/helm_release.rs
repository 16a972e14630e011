// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HelmRelease to Application translation

use crate::config::Config;
use crate::constants::flux;
use crate::error::{MigrationError, Result};
use crate::types::argocd::{
    Application, ApplicationDestination, ApplicationSource, ApplicationSourceHelm,
    ApplicationSpec, SyncPolicy,
};
use crate::types::flux::{CrossNamespaceSourceReference, HelmChartTemplateSpec, HelmRelease, HelmRepository};
use kube::ResourceExt;

fn chart_spec(release: &HelmRelease) -> Result<&HelmChartTemplateSpec> {
    release
        .spec
        .chart
        .as_ref()
        .map(|c| &c.spec)
        .ok_or_else(|| {
            MigrationError::UnsupportedSource(format!(
                "HelmRelease {}/{} has no chart template (chartRef sources cannot be migrated)",
                release.namespace().unwrap_or_default(),
                release.name_any()
            ))
        })
}

/// The HelmRepository a HelmRelease pulls its chart from
pub fn helm_repository_ref(release: &HelmRelease) -> Result<&CrossNamespaceSourceReference> {
    let source_ref = &chart_spec(release)?.source_ref;
    if source_ref.kind != flux::HELM_REPOSITORY_KIND {
        return Err(MigrationError::UnsupportedSource(format!(
            "HelmRelease {}/{} pulls its chart from a {}, only {} sources can be migrated",
            release.namespace().unwrap_or_default(),
            release.name_any(),
            source_ref.kind,
            flux::HELM_REPOSITORY_KIND
        )));
    }
    Ok(source_ref)
}

/// Serialize HelmRelease values into the YAML document Argo CD expects in `helm.values`
pub fn values_yaml(values: Option<&serde_json::Value>) -> Result<Option<String>> {
    match values {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(values) => Ok(Some(serde_yaml::to_string(values)?)),
    }
}

/// Translate a HelmRelease and its HelmRepository into an Argo CD Application
pub fn helm_release_to_application(
    release: &HelmRelease,
    repository: &HelmRepository,
    config: &Config,
) -> Result<Application> {
    helm_repository_ref(release)?;
    let chart = chart_spec(release)?;

    if repository.spec.url.is_empty() {
        return Err(MigrationError::UnsupportedSource(format!(
            "HelmRepository {}/{} has no URL",
            repository.namespace().unwrap_or_default(),
            repository.name_any()
        )));
    }

    let target_revision = chart
        .version
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| flux::ANY_CHART_VERSION.to_string());

    let sync_options = if release.creates_namespace() {
        vec!["CreateNamespace=true".to_string()]
    } else {
        Vec::new()
    };

    let helm = ApplicationSourceHelm {
        release_name: release.spec.release_name.clone(),
        values: values_yaml(release.spec.values.as_ref())?,
    };
    let helm = (helm.release_name.is_some() || helm.values.is_some()).then_some(helm);

    let mut application = Application::new(
        &release.name_any(),
        ApplicationSpec {
            project: config.project.clone(),
            source: ApplicationSource {
                repo_url: repository.spec.url.clone(),
                target_revision,
                path: None,
                chart: Some(chart.chart.clone()),
                helm,
            },
            destination: ApplicationDestination {
                server: config.destination_server.clone(),
                namespace: Some(release.destination_namespace()),
            },
            sync_policy: Some(SyncPolicy::automated(sync_options)),
        },
    );
    application.metadata.namespace = Some(config.argocd_namespace.clone());

    Ok(application)
}
