// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types for the Flux sources and the Argo CD targets.

pub mod argocd;
pub mod flux;
