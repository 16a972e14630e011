// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Argo CD repository credentials derived from a Flux Git secret

use crate::constants::{argocd, flux};
use crate::error::{MigrationError, Result};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::ResourceExt;
use std::collections::BTreeMap;

/// Extract the SSH private key Flux stores under the `identity` key
pub fn ssh_identity(secret: &Secret) -> Result<Vec<u8>> {
    let from_data = secret
        .data
        .as_ref()
        .and_then(|d| d.get(flux::IDENTITY_KEY))
        .map(|v| v.0.clone());
    let from_string_data = || {
        secret
            .string_data
            .as_ref()
            .and_then(|d| d.get(flux::IDENTITY_KEY))
            .map(|v| v.as_bytes().to_vec())
    };

    from_data
        .or_else(from_string_data)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            MigrationError::MissingCredentials(format!(
                "Secret {}/{} does not contain an '{}' key",
                secret.namespace().unwrap_or_default(),
                secret.name_any(),
                flux::IDENTITY_KEY
            ))
        })
}

/// Build the Argo CD repository secret for a Git repository reached over SSH
pub fn repository_secret(
    name: &str,
    namespace: &str,
    repo_url: &str,
    ssh_private_key: &[u8],
) -> Secret {
    let labels = BTreeMap::from([(
        argocd::SECRET_TYPE_LABEL.to_string(),
        argocd::SECRET_TYPE_REPOSITORY.to_string(),
    )]);

    let data = BTreeMap::from([
        (
            "sshPrivateKey".to_string(),
            ByteString(ssh_private_key.to_vec()),
        ),
        (
            "type".to_string(),
            ByteString(argocd::REPOSITORY_TYPE_GIT.as_bytes().to_vec()),
        ),
        ("url".to_string(), ByteString(repo_url.as_bytes().to_vec())),
    ]);

    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        data: Some(data),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    }
}

/// The repository URL an Argo CD repository secret grants access to, empty when unset
pub fn repository_url(secret: &Secret) -> &[u8] {
    secret
        .data
        .as_ref()
        .and_then(|d| d.get("url"))
        .map(|url| url.0.as_slice())
        .unwrap_or_default()
}
