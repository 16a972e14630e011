// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kustomization to ApplicationSet translation

use crate::config::Config;
use crate::constants::{argocd, flux};
use crate::error::{MigrationError, Result};
use crate::translate::credentials::{repository_secret, ssh_identity};
use crate::translate::Manifest;
use crate::types::argocd::{
    ApplicationDestination, ApplicationSet, ApplicationSetGenerator, ApplicationSetSpec,
    ApplicationSetTemplate, ApplicationSetTemplateMeta, ApplicationSource, ApplicationSpec,
    GitDirectoryGeneratorItem, GitGenerator, SyncPolicy,
};
use crate::types::flux::{CrossNamespaceSourceReference, GitRepository, Kustomization};
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;

/// Git directory generator globs derived from a Kustomization path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGlobs {
    pub include: String,
    pub exclude: String,
}

/// The objects replacing a Kustomization
#[derive(Debug, Clone)]
pub struct KustomizationMigration {
    pub application_set: ApplicationSet,
    pub repository_secret: Secret,
}

impl KustomizationMigration {
    /// Objects in creation order: the credentials must exist before Argo CD clones the repository
    pub fn into_manifests(self) -> Vec<Manifest> {
        vec![
            Manifest::Secret(self.repository_secret),
            Manifest::ApplicationSet(self.application_set),
        ]
    }
}

/// Derive the include/exclude globs from a Kustomization path.
///
/// The path must be relative to the repository root (`./` prefix) and contain no
/// other `./` segment. An absent path is the repository root, as in Flux.
pub fn directory_globs(path: Option<&str>) -> Result<DirectoryGlobs> {
    let path = path.filter(|p| !p.is_empty()).unwrap_or("./");

    let remainder = match path.split_once("./") {
        Some(("", remainder)) if !remainder.contains("./") => remainder,
        _ => {
            return Err(MigrationError::InvalidPath(format!(
                "'{}' must start with './' and contain no other './' segment",
                path
            )))
        }
    };

    let remainder = remainder.trim_end_matches('/');
    if remainder.is_empty() {
        return Ok(DirectoryGlobs {
            include: "*".to_string(),
            exclude: flux::SYSTEM_DIR.to_string(),
        });
    }

    Ok(DirectoryGlobs {
        include: format!("{}/*", remainder),
        exclude: format!("{}/{}", remainder, flux::SYSTEM_DIR),
    })
}

/// The GitRepository a Kustomization reconciles from
pub fn git_repository_ref(kustomization: &Kustomization) -> Result<&CrossNamespaceSourceReference> {
    let source_ref = &kustomization.spec.source_ref;
    if source_ref.kind != flux::GIT_REPOSITORY_KIND {
        return Err(MigrationError::UnsupportedSource(format!(
            "Kustomization {}/{} reconciles from a {}, only {} sources can be migrated",
            kustomization.namespace().unwrap_or_default(),
            kustomization.name_any(),
            source_ref.kind,
            flux::GIT_REPOSITORY_KIND
        )));
    }
    Ok(source_ref)
}

/// Translate a Kustomization, its GitRepository and the repository's SSH secret
/// into an ApplicationSet plus Argo CD repository credentials.
pub fn kustomization_to_application_set(
    kustomization: &Kustomization,
    repository: &GitRepository,
    credentials: &Secret,
    config: &Config,
) -> Result<KustomizationMigration> {
    git_repository_ref(kustomization)?;

    let repo_url = repository.spec.url.clone();
    if repo_url.is_empty() {
        return Err(MigrationError::UnsupportedSource(format!(
            "GitRepository {}/{} has no URL",
            repository.namespace().unwrap_or_default(),
            repository.name_any()
        )));
    }

    let globs = directory_globs(kustomization.spec.path.as_deref())?;
    let ssh_private_key = ssh_identity(credentials)?;
    let revision = repository.target_revision();

    let generator = GitGenerator {
        repo_url: repo_url.clone(),
        revision: revision.clone(),
        directories: vec![
            GitDirectoryGeneratorItem {
                path: globs.include,
                exclude: false,
            },
            GitDirectoryGeneratorItem {
                path: globs.exclude,
                exclude: true,
            },
        ],
    };

    let template = ApplicationSetTemplate {
        metadata: ApplicationSetTemplateMeta {
            name: argocd::PATH_BASENAME_TOKEN.to_string(),
        },
        spec: ApplicationSpec {
            project: config.project.clone(),
            source: ApplicationSource {
                repo_url: repo_url.clone(),
                target_revision: revision,
                path: Some(argocd::PATH_TOKEN.to_string()),
                chart: None,
                helm: None,
            },
            destination: ApplicationDestination {
                server: config.destination_server.clone(),
                namespace: kustomization
                    .spec
                    .target_namespace
                    .clone()
                    .filter(|ns| !ns.is_empty()),
            },
            sync_policy: Some(SyncPolicy::automated(Vec::new())),
        },
    };

    let mut application_set = ApplicationSet::new(
        &kustomization.name_any(),
        ApplicationSetSpec {
            generators: vec![ApplicationSetGenerator {
                git: Some(generator),
            }],
            template,
        },
    );
    application_set.metadata.namespace = Some(config.argocd_namespace.clone());

    let repository_secret = repository_secret(
        &config.secret_name,
        &config.argocd_namespace,
        &repo_url,
        &ssh_private_key,
    );

    Ok(KustomizationMigration {
        application_set,
        repository_secret,
    })
}
