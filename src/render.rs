// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! YAML rendering of generated manifests

use crate::error::Result;
use crate::translate::Manifest;

/// Render one manifest as a YAML document
pub fn render_manifest(manifest: &Manifest) -> Result<String> {
    let yaml = match manifest {
        Manifest::Secret(o) => serde_yaml::to_string(o)?,
        Manifest::Application(o) => serde_yaml::to_string(o)?,
        Manifest::ApplicationSet(o) => serde_yaml::to_string(o)?,
    };
    Ok(yaml)
}

/// Render manifests as a multi-document YAML stream, suitable for `kubectl apply -f -`
pub fn render_manifests(manifests: &[Manifest]) -> Result<String> {
    let mut out = String::new();
    for manifest in manifests {
        out.push_str("---\n");
        out.push_str(&render_manifest(manifest)?);
    }
    Ok(out)
}
