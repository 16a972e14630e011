// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Translation of Flux resources into Argo CD objects.
//!
//! Everything here is pure: the callers fetch the inputs and decide what to do
//! with the output (print it or create it on the cluster).

pub mod credentials;
pub mod helm_release;
pub mod kustomization;

pub use credentials::{repository_secret, repository_url, ssh_identity};
pub use helm_release::{helm_release_to_application, helm_repository_ref, values_yaml};
pub use kustomization::{
    directory_globs, git_repository_ref, kustomization_to_application_set, DirectoryGlobs,
    KustomizationMigration,
};

use crate::types::argocd::{Application, ApplicationSet};
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;

/// A generated object, ready to be rendered or created
#[derive(Debug, Clone)]
pub enum Manifest {
    Secret(Secret),
    Application(Application),
    ApplicationSet(ApplicationSet),
}

impl Manifest {
    pub fn kind(&self) -> &'static str {
        match self {
            Manifest::Secret(_) => "Secret",
            Manifest::Application(_) => "Application",
            Manifest::ApplicationSet(_) => "ApplicationSet",
        }
    }

    pub fn name(&self) -> String {
        match self {
            Manifest::Secret(o) => o.name_any(),
            Manifest::Application(o) => o.name_any(),
            Manifest::ApplicationSet(o) => o.name_any(),
        }
    }

    pub fn namespace(&self) -> Option<String> {
        match self {
            Manifest::Secret(o) => o.namespace(),
            Manifest::Application(o) => o.namespace(),
            Manifest::ApplicationSet(o) => o.namespace(),
        }
    }
}
