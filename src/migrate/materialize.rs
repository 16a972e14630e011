// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Sequential creation of generated objects

use crate::error::Result;
use crate::kubernetes::ObjectAccessor;
use crate::translate::Manifest;
use tracing::{debug, info, instrument};

/// Create the manifests in the given order, stopping at the first failure.
/// Objects created before the failure are left in place.
#[instrument(skip_all, fields(count = manifests.len()))]
pub async fn create_objects(accessor: &ObjectAccessor, manifests: &[Manifest]) -> Result<()> {
    for manifest in manifests {
        debug!(
            "Creating {} {}/{}",
            manifest.kind(),
            manifest.namespace().unwrap_or_default(),
            manifest.name()
        );
        match manifest {
            Manifest::Secret(o) => {
                accessor.create(o).await?;
            }
            Manifest::Application(o) => {
                accessor.create(o).await?;
            }
            Manifest::ApplicationSet(o) => {
                accessor.create(o).await?;
            }
        }
    }

    info!("Created {} objects", manifests.len());
    Ok(())
}
