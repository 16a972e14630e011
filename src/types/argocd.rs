// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The subset of the Argo CD APIs generated during a migration.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "argoproj.io", version = "v1alpha1", kind = "Application")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    pub project: String,
    pub source: ApplicationSource,
    pub destination: ApplicationDestination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_policy: Option<SyncPolicy>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSource {
    #[serde(rename = "repoURL")]
    pub repo_url: String,
    pub target_revision: String,
    /// Directory within a Git repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Chart name within a Helm repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helm: Option<ApplicationSourceHelm>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSourceHelm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    /// Values as a YAML document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct ApplicationDestination {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automated: Option<SyncPolicyAutomated>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sync_options: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicyAutomated {
    pub prune: bool,
    pub self_heal: bool,
}

impl SyncPolicy {
    /// Fully automated sync, mirroring how Flux reconciles with pruning enabled
    pub fn automated(sync_options: Vec<String>) -> Self {
        Self {
            automated: Some(SyncPolicyAutomated {
                prune: true,
                self_heal: true,
            }),
            sync_options,
        }
    }
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "argoproj.io", version = "v1alpha1", kind = "ApplicationSet")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSetSpec {
    pub generators: Vec<ApplicationSetGenerator>,
    pub template: ApplicationSetTemplate,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct ApplicationSetGenerator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitGenerator>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct GitGenerator {
    #[serde(rename = "repoURL")]
    pub repo_url: String,
    pub revision: String,
    pub directories: Vec<GitDirectoryGeneratorItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct GitDirectoryGeneratorItem {
    pub path: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclude: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct ApplicationSetTemplate {
    pub metadata: ApplicationSetTemplateMeta,
    pub spec: ApplicationSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct ApplicationSetTemplateMeta {
    pub name: String,
}

impl ApplicationSet {
    /// Include and exclude globs of the git directory generator, if any
    pub fn directory_globs(&self) -> Vec<&GitDirectoryGeneratorItem> {
        self.spec
            .generators
            .iter()
            .filter_map(|g| g.git.as_ref())
            .flat_map(|git| git.directories.iter())
            .collect()
    }
}
