// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `STACKYARD_*` environment variables (nested keys use `__`, e.g.
//! `STACKYARD_RULES__TOUCHING_EDGES_CONFLICT=false`).

use crate::validator::LayoutRules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding depot.json
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Name stamped into audit fields
    pub operator: String,
    /// Layout validation and placement rules
    pub rules: LayoutRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: directories::ProjectDirs::from("com", "hyperpolymath", "stackyard")
                .map_or_else(|| PathBuf::from(".stackyard"), |d| d.data_dir().to_path_buf()),
            log_level: "info".to_string(),
            operator: std::env::var("USER").unwrap_or_else(|_| "system".to_string()),
            rules: LayoutRules::default(),
        }
    }
}

/// Load configuration, layering an optional file and the environment over defaults
pub fn load(file: Option<&Path>) -> Result<Config> {
    let mut builder = config::Config::builder();

    if let Some(path) = file {
        builder = builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
        );
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("STACKYARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?;

    settings
        .try_deserialize::<Config>()
        .context("Invalid configuration")
}
