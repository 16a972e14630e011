// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Migration of Flux resources to Argo CD objects on a live cluster.

pub mod materialize;

pub use materialize::create_objects;

use crate::config::Config;
use crate::error::{MigrationError, Result};
use crate::kubernetes::ObjectAccessor;
use crate::translate::{
    git_repository_ref, helm_release_to_application, helm_repository_ref,
    kustomization_to_application_set, repository_url, KustomizationMigration, Manifest,
};
use crate::types::argocd::{Application, ApplicationSet};
use crate::types::flux::{GitRepository, HelmRelease, HelmRepository, Kustomization};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Debug;
use tracing::{debug, info, instrument, warn};

/// Outcome of migrating every Flux resource in a namespace
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationSummary {
    pub kustomizations: usize,
    pub helm_releases: usize,
    /// Suspended resources whose migration was completed without suspending them again
    pub resumed: usize,
    /// Suspended resources whose Argo CD replacement already exists
    pub skipped: usize,
}

/// Reads Flux resources and their sources, and replaces them with Argo CD objects
pub struct Migrator {
    accessor: ObjectAccessor,
    config: Config,
}

impl Migrator {
    pub fn new(accessor: ObjectAccessor, config: Config) -> Self {
        Self { accessor, config }
    }

    pub fn accessor(&self) -> &ObjectAccessor {
        &self.accessor
    }

    pub async fn get_kustomization(&self, namespace: &str, name: &str) -> Result<Kustomization> {
        self.accessor.get(namespace, name).await
    }

    pub async fn get_helm_release(&self, namespace: &str, name: &str) -> Result<HelmRelease> {
        self.accessor.get(namespace, name).await
    }

    /// Resolve the GitRepository and SSH secret of a Kustomization and translate it.
    /// Read-only: nothing on the cluster changes.
    #[instrument(skip(self, kustomization), fields(kustomization = %kustomization.name_any()))]
    pub async fn plan_kustomization(
        &self,
        kustomization: &Kustomization,
    ) -> Result<KustomizationMigration> {
        let source_ref = git_repository_ref(kustomization)?;
        let source_namespace = kustomization.source_namespace();

        let repository: GitRepository = self
            .accessor
            .get(&source_namespace, &source_ref.name)
            .await?;

        let secret_name = repository.secret_name().ok_or_else(|| {
            MigrationError::MissingCredentials(format!(
                "GitRepository {}/{} has no secretRef",
                source_namespace,
                repository.name_any()
            ))
        })?;
        let credentials: Secret = self.accessor.get(&source_namespace, secret_name).await?;

        let migration =
            kustomization_to_application_set(kustomization, &repository, &credentials, &self.config)?;
        for item in migration.application_set.directory_globs() {
            debug!(
                "{} {}",
                if item.exclude { "Excluding" } else { "Including" },
                item.path
            );
        }
        Ok(migration)
    }

    /// Resolve the HelmRepository of a HelmRelease and translate it. Read-only.
    #[instrument(skip(self, release), fields(helm_release = %release.name_any()))]
    pub async fn plan_helm_release(&self, release: &HelmRelease) -> Result<Application> {
        let source_ref = helm_repository_ref(release)?;
        let source_namespace = source_ref.namespace_or(&release.namespace().unwrap_or_default());

        let repository: HelmRepository = self
            .accessor
            .get(&source_namespace, &source_ref.name)
            .await?;

        helm_release_to_application(release, &repository, &self.config)
    }

    /// Replace a Kustomization with an ApplicationSet: suspend it, then create
    /// the repository credentials and the ApplicationSet.
    ///
    /// A credential secret for the same repository already on the cluster is reused.
    /// One of the same name for another repository fails before anything is suspended.
    pub async fn migrate_kustomization(&self, kustomization: &Kustomization) -> Result<Vec<Manifest>> {
        let migration = self.plan_kustomization(kustomization).await?;
        let manifests = self
            .resolve_credentials(migration, &mut HashMap::new())
            .await?;
        self.suspend_and_create(kustomization, &manifests).await?;
        Ok(manifests)
    }

    /// Replace a HelmRelease with an Application: suspend it, then create the Application.
    pub async fn migrate_helm_release(&self, release: &HelmRelease) -> Result<Vec<Manifest>> {
        let manifests = vec![Manifest::Application(self.plan_helm_release(release).await?)];
        self.suspend_and_create(release, &manifests).await?;
        Ok(manifests)
    }

    /// Suspension goes first so Flux and Argo CD never both reconcile the same manifests.
    /// If a create fails afterwards the source stays suspended.
    async fn suspend_and_create<K>(&self, source: &K, manifests: &[Manifest]) -> Result<()>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        self.accessor.suspend(source).await?;
        create_objects(&self.accessor, manifests).await
    }

    /// The manifests left to create for a Kustomization, given the credential secrets
    /// that already exist. `known` maps secret names handled earlier in the run to
    /// the repository URL they hold.
    async fn resolve_credentials(
        &self,
        migration: KustomizationMigration,
        known: &mut HashMap<String, Vec<u8>>,
    ) -> Result<Vec<Manifest>> {
        let secret = &migration.repository_secret;
        let name = secret.name_any();
        let namespace = secret.namespace().unwrap_or_default();
        let url = repository_url(secret).to_vec();

        let existing_url = match known.get(&name) {
            Some(known_url) => Some(known_url.clone()),
            None => self
                .accessor
                .get_opt::<Secret>(&namespace, &name)
                .await?
                .map(|existing| repository_url(&existing).to_vec()),
        };

        match existing_url {
            None => {
                known.insert(name, url);
                Ok(migration.into_manifests())
            }
            Some(existing) if existing == url => {
                debug!("Reusing credential secret {}/{}", namespace, name);
                known.insert(name, url);
                Ok(vec![Manifest::ApplicationSet(migration.application_set)])
            }
            Some(existing) => Err(MigrationError::CredentialConflict(format!(
                "secret {}/{} already holds credentials for {}, not {}",
                namespace,
                name,
                String::from_utf8_lossy(&existing),
                String::from_utf8_lossy(&url)
            ))),
        }
    }

    /// Whether an Argo CD object with this name exists in the Argo CD namespace
    async fn replacement_exists<K>(&self, name: &str) -> Result<bool>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        Ok(self
            .accessor
            .get_opt::<K>(&self.config.argocd_namespace, name)
            .await?
            .is_some())
    }

    /// Migrate every Kustomization and HelmRelease in a namespace.
    ///
    /// A suspended resource whose replacement already exists is skipped. One without
    /// a replacement, typically left behind by a run that failed halfway, has its
    /// objects created without being suspended again. Kustomizations on the same
    /// repository share one credential secret.
    #[instrument(skip(self))]
    pub async fn migrate_namespace(&self, namespace: &str) -> Result<MigrationSummary> {
        let mut summary = MigrationSummary::default();
        let mut known_credentials: HashMap<String, Vec<u8>> = HashMap::new();

        let kustomizations: Vec<Kustomization> = self.accessor.list_if_installed(namespace).await?;
        info!("Found {} Kustomizations", kustomizations.len());

        for kustomization in &kustomizations {
            let name = kustomization.name_any();
            let resuming = kustomization.is_suspended();
            if resuming {
                if self.replacement_exists::<ApplicationSet>(&name).await? {
                    info!("Kustomization {}/{} is already migrated, skipping", namespace, name);
                    summary.skipped += 1;
                    continue;
                }
                warn!(
                    "Kustomization {}/{} is suspended but has no ApplicationSet, completing its migration",
                    namespace, name
                );
            }

            let migration = self.plan_kustomization(kustomization).await?;
            let manifests = self
                .resolve_credentials(migration, &mut known_credentials)
                .await?;

            if resuming {
                create_objects(&self.accessor, &manifests).await?;
                summary.resumed += 1;
            } else {
                self.suspend_and_create(kustomization, &manifests).await?;
            }
            summary.kustomizations += 1;
        }

        let releases: Vec<HelmRelease> = self.accessor.list_if_installed(namespace).await?;
        info!("Found {} HelmReleases", releases.len());

        for release in &releases {
            let name = release.name_any();
            let resuming = release.is_suspended();
            if resuming {
                if self.replacement_exists::<Application>(&name).await? {
                    info!("HelmRelease {}/{} is already migrated, skipping", namespace, name);
                    summary.skipped += 1;
                    continue;
                }
                warn!(
                    "HelmRelease {}/{} is suspended but has no Application, completing its migration",
                    namespace, name
                );
            }

            let manifests = vec![Manifest::Application(self.plan_helm_release(release).await?)];
            if resuming {
                create_objects(&self.accessor, &manifests).await?;
                summary.resumed += 1;
            } else {
                self.suspend_and_create(release, &manifests).await?;
            }
            summary.helm_releases += 1;
        }

        info!(
            "Migrated {} Kustomizations and {} HelmReleases ({} resumed, {} skipped)",
            summary.kustomizations, summary.helm_releases, summary.resumed, summary.skipped
        );
        Ok(summary)
    }
}
