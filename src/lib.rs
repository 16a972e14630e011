// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod cleanup;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod migrate;
pub mod render;
pub mod translate;
pub mod types;

#[cfg(test)]
mod test_utils;
