// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Flux uninstallation.
//!
//! Runs four phases in order: components, finalizers, CRDs, namespace.
//! A failing phase aborts the ones after it.

use crate::constants::flux;
use crate::error::Result;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Service, ServiceAccount};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{
    api::{DeleteParams, ListParams, Patch, PatchParams},
    core::{ApiResource, DynamicObject},
    Api, Client, Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt::Debug;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Send every delete and patch as a server-side dry run
    pub dry_run: bool,
    /// Leave the Flux namespace in place
    pub keep_namespace: bool,
}

impl CleanupOptions {
    fn delete_params(&self) -> DeleteParams {
        DeleteParams {
            dry_run: self.dry_run,
            ..Default::default()
        }
    }

    fn patch_params(&self) -> PatchParams {
        PatchParams {
            dry_run: self.dry_run,
            ..Default::default()
        }
    }
}

/// A Flux custom resource kind whose objects may carry finalizers
struct FluxKind {
    group: &'static str,
    version: &'static str,
    kind: &'static str,
    plural: &'static str,
}

impl FluxKind {
    fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.group.to_string(),
            version: self.version.to_string(),
            api_version: format!("{}/{}", self.group, self.version),
            kind: self.kind.to_string(),
            plural: self.plural.to_string(),
        }
    }
}

const fn kind(
    group: &'static str,
    version: &'static str,
    kind: &'static str,
    plural: &'static str,
) -> FluxKind {
    FluxKind {
        group,
        version,
        kind,
        plural,
    }
}

const FLUX_KINDS: &[FluxKind] = &[
    kind("kustomize.toolkit.fluxcd.io", "v1", "Kustomization", "kustomizations"),
    kind("helm.toolkit.fluxcd.io", "v2", "HelmRelease", "helmreleases"),
    kind("source.toolkit.fluxcd.io", "v1", "GitRepository", "gitrepositories"),
    kind("source.toolkit.fluxcd.io", "v1", "HelmRepository", "helmrepositories"),
    kind("source.toolkit.fluxcd.io", "v1", "HelmChart", "helmcharts"),
    kind("source.toolkit.fluxcd.io", "v1", "Bucket", "buckets"),
    kind("source.toolkit.fluxcd.io", "v1beta2", "OCIRepository", "ocirepositories"),
    kind("notification.toolkit.fluxcd.io", "v1beta3", "Alert", "alerts"),
    kind("notification.toolkit.fluxcd.io", "v1beta3", "Provider", "providers"),
    kind("notification.toolkit.fluxcd.io", "v1", "Receiver", "receivers"),
    kind("image.toolkit.fluxcd.io", "v1beta2", "ImageRepository", "imagerepositories"),
    kind("image.toolkit.fluxcd.io", "v1beta2", "ImagePolicy", "imagepolicies"),
    kind("image.toolkit.fluxcd.io", "v1beta2", "ImageUpdateAutomation", "imageupdateautomations"),
];

/// Remove Flux from the cluster
#[instrument(skip(client))]
pub async fn uninstall_flux(client: &Client, namespace: &str, options: &CleanupOptions) -> Result<()> {
    if options.dry_run {
        info!("Dry run: no objects will be changed");
    }

    delete_components(client, namespace, options).await?;
    remove_finalizers(client, options).await?;
    delete_crds(client, options).await?;

    if options.keep_namespace {
        info!("Keeping namespace {}", namespace);
    } else {
        delete_namespace(client, namespace, options).await?;
    }

    info!("Flux uninstalled from {}", namespace);
    Ok(())
}

/// Delete the controllers and their RBAC: objects labelled as part of Flux and
/// as belonging to this installation
async fn delete_components(client: &Client, namespace: &str, options: &CleanupOptions) -> Result<()> {
    info!("Deleting Flux components");
    let selector = format!(
        "{}={},{}",
        flux::INSTANCE_LABEL,
        namespace,
        flux::PART_OF_SELECTOR
    );
    let params = options.delete_params();

    let mut deleted = 0;
    deleted += delete_selected::<Deployment>(Api::namespaced(client.clone(), namespace), &selector, &params).await?;
    deleted += delete_selected::<Service>(Api::namespaced(client.clone(), namespace), &selector, &params).await?;
    deleted += delete_selected::<NetworkPolicy>(Api::namespaced(client.clone(), namespace), &selector, &params).await?;
    deleted += delete_selected::<ServiceAccount>(Api::namespaced(client.clone(), namespace), &selector, &params).await?;
    deleted += delete_selected::<ClusterRole>(Api::all(client.clone()), &selector, &params).await?;
    deleted += delete_selected::<ClusterRoleBinding>(Api::all(client.clone()), &selector, &params).await?;

    info!("Deleted {} Flux components", deleted);
    Ok(())
}

/// Clear finalizers on every Flux custom resource so deleting the CRDs can complete
async fn remove_finalizers(client: &Client, options: &CleanupOptions) -> Result<()> {
    info!("Removing finalizers from Flux resources");
    let patch = json!({ "metadata": { "finalizers": null } });
    let params = options.patch_params();

    for flux_kind in FLUX_KINDS {
        let ar = flux_kind.api_resource();
        let all: Api<DynamicObject> = Api::all_with(client.clone(), &ar);

        let objects = match all.list(&ListParams::default()).await {
            Ok(list) => list.items,
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("{} is not installed, skipping", flux_kind.kind);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for obj in objects.iter().filter(|o| !o.finalizers().is_empty()) {
            let ns = obj.namespace().unwrap_or_default();
            let api: Api<DynamicObject> = Api::namespaced_with(client.clone(), &ns, &ar);
            api.patch(&obj.name_any(), &params, &Patch::Merge(&patch))
                .await?;
            info!("Removed finalizers from {} {}/{}", flux_kind.kind, ns, obj.name_any());
        }
    }

    Ok(())
}

async fn delete_crds(client: &Client, options: &CleanupOptions) -> Result<()> {
    info!("Deleting Flux CRDs");
    let deleted = delete_selected::<CustomResourceDefinition>(
        Api::all(client.clone()),
        flux::PART_OF_SELECTOR,
        &options.delete_params(),
    )
    .await?;
    info!("Deleted {} Flux CRDs", deleted);
    Ok(())
}

async fn delete_namespace(client: &Client, namespace: &str, options: &CleanupOptions) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.delete(namespace, &options.delete_params()).await {
        Ok(_) => {
            info!("Deleted namespace {}", namespace);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("Namespace {} already deleted", namespace);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete every object the label selector matches, returning how many were deleted
async fn delete_selected<K>(api: Api<K>, selector: &str, params: &DeleteParams) -> Result<usize>
where
    K: Resource + Clone + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    let list = api
        .list_metadata(&ListParams::default().labels(selector))
        .await?;

    for obj in &list.items {
        api.delete(&obj.name_any(), params).await?;
        info!(
            "Deleted {} {}",
            K::kind(&Default::default()),
            obj.name_any()
        );
    }

    Ok(list.items.len())
}
