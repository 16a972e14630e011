// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed object access by namespace and name

use crate::error::{MigrationError, Result};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{ListParams, Patch, PatchParams, PostParams},
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::fmt::Debug;
use tracing::{debug, info, instrument};

/// Thin wrapper over a client for the get/list/suspend/create calls a migration makes.
/// The set of object types it can handle is whatever implements `kube::Resource`.
#[derive(Clone)]
pub struct ObjectAccessor {
    client: Client,
}

impl ObjectAccessor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn api<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::default_namespaced(self.client.clone()),
        }
    }

    /// Fetch a namespaced object
    #[instrument(skip(self), fields(kind = %K::kind(&Default::default())))]
    pub async fn get<K>(&self, namespace: &str, name: &str) -> Result<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        debug!("Getting {}/{}", namespace, name);
        Ok(self.api::<K>(Some(namespace)).get(name).await?)
    }

    /// Fetch a namespaced object, `None` when it does not exist
    pub async fn get_opt<K>(&self, namespace: &str, name: &str) -> Result<Option<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        Ok(self.api::<K>(Some(namespace)).get_opt(name).await?)
    }

    /// List all objects of a kind in a namespace
    #[instrument(skip(self), fields(kind = %K::kind(&Default::default())))]
    pub async fn list<K>(&self, namespace: &str) -> Result<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let list = self
            .api::<K>(Some(namespace))
            .list(&ListParams::default())
            .await?;
        debug!("Found {} objects in {}", list.items.len(), namespace);
        Ok(list.items)
    }

    /// List all objects of a kind in a namespace; a kind the cluster does not serve lists as empty
    pub async fn list_if_installed<K>(&self, namespace: &str) -> Result<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        match self.list(namespace).await {
            Err(MigrationError::KubeError(kube::Error::Api(err))) if err.code == 404 => {
                debug!("{} is not installed", K::kind(&Default::default()));
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Set `spec.suspend: true` on a Flux object.
    /// The patch carries the resourceVersion that was read, so a concurrent
    /// modification is rejected with a conflict instead of being overwritten.
    #[instrument(skip(self, obj), fields(object = %format!("{}/{}", obj.namespace().unwrap_or_default(), obj.name_any())))]
    pub async fn suspend<K>(&self, obj: &K) -> Result<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let name = obj.name_any();
        let mut patch = json!({ "spec": { "suspend": true } });
        if let Some(rv) = obj.resource_version() {
            patch["metadata"] = json!({ "resourceVersion": rv });
        }

        let suspended = self
            .api::<K>(obj.namespace().as_deref())
            .patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        info!(
            "Suspended {} {}/{}",
            K::kind(&Default::default()),
            obj.namespace().unwrap_or_default(),
            name
        );
        Ok(suspended)
    }

    /// Create an object in the namespace set on its metadata
    #[instrument(skip(self, obj), fields(object = %format!("{}/{}", obj.namespace().unwrap_or_default(), obj.name_any())))]
    pub async fn create<K>(&self, obj: &K) -> Result<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Serialize + Debug,
        K::DynamicType: Default,
    {
        let created = self
            .api::<K>(obj.namespace().as_deref())
            .create(&PostParams::default(), obj)
            .await?;

        info!(
            "Created {} {}/{}",
            K::kind(&Default::default()),
            created.namespace().unwrap_or_default(),
            created.name_any()
        );
        Ok(created)
    }
}
