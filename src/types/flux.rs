// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The subset of the Flux CD APIs read during a migration.

use crate::constants::flux;
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "kustomize.toolkit.fluxcd.io", version = "v1", kind = "Kustomization")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct KustomizationSpec {
    /// Path to the directory containing the kustomization, relative to the source root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub source_ref: CrossNamespaceSourceReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "helm.toolkit.fluxcd.io", version = "v2", kind = "HelmRelease")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<HelmChartTemplate>,
    /// Alternative to `chart`, pointing at an OCIRepository or HelmChart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_ref: Option<CrossNamespaceSourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<HelmReleaseInstall>,
    /// Free-form chart values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct HelmChartTemplate {
    pub spec: HelmChartTemplateSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartTemplateSpec {
    pub chart: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub source_ref: CrossNamespaceSourceReference,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseInstall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_namespace: Option<bool>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "source.toolkit.fluxcd.io", version = "v1", kind = "GitRepository")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct GitRepositorySpec {
    pub url: String,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<GitRepositoryRef>,
    /// Secret holding the SSH `identity` or basic auth credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct GitRepositoryRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "source.toolkit.fluxcd.io", version = "v1", kind = "HelmRepository")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct HelmRepositorySpec {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<LocalObjectReference>,
    /// Repository type (default or oci)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub repository_type: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrossNamespaceSourceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct LocalObjectReference {
    pub name: String,
}

impl CrossNamespaceSourceReference {
    /// Namespace of the referenced source; Flux defaults it to the referrer's namespace
    pub fn namespace_or(&self, referrer_namespace: &str) -> String {
        self.namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| referrer_namespace.to_string())
    }
}

impl Kustomization {
    pub fn is_suspended(&self) -> bool {
        self.spec.suspend.unwrap_or(false)
    }

    /// Namespace of the GitRepository this Kustomization reconciles from
    pub fn source_namespace(&self) -> String {
        self.spec
            .source_ref
            .namespace_or(&self.namespace().unwrap_or_default())
    }
}

impl HelmRelease {
    pub fn is_suspended(&self) -> bool {
        self.spec.suspend.unwrap_or(false)
    }

    /// Namespace the release installs into; Flux falls back to the release's own namespace
    pub fn destination_namespace(&self) -> String {
        self.spec
            .target_namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| self.namespace().unwrap_or_default())
    }

    pub fn creates_namespace(&self) -> bool {
        self.spec
            .install
            .as_ref()
            .and_then(|i| i.create_namespace)
            .unwrap_or(false)
    }
}

impl GitRepository {
    /// The revision Argo CD should track.
    /// Follows Flux's precedence: commit, tag, semver, then branch.
    pub fn target_revision(&self) -> String {
        let Some(reference) = self.spec.reference.as_ref() else {
            return flux::DEFAULT_GIT_REVISION.to_string();
        };

        [
            &reference.commit,
            &reference.tag,
            &reference.semver,
            &reference.branch,
        ]
        .into_iter()
        .flatten()
        .find(|r| !r.is_empty())
        .cloned()
        .unwrap_or_else(|| flux::DEFAULT_GIT_REVISION.to_string())
    }

    pub fn secret_name(&self) -> Option<&str> {
        self.spec
            .secret_ref
            .as_ref()
            .map(|r| r.name.as_str())
            .filter(|name| !name.is_empty())
    }
}
