// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation and typed object access.

pub mod client;
pub mod objects;

pub use client::{create_client, default_kubeconfig_path};
pub use objects::ObjectAccessor;
