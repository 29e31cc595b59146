// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading and applying startup configuration files.

use std::path::PathBuf;
use thiserror::Error;

use crate::errors::AccelError;

/// Errors that can occur while loading or applying a framework config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML content did not match the config schema.
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML content did not match the config schema.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML.
    #[error("Unsupported config format for '{0}': expected .yaml, .yml or .toml")]
    UnsupportedFormat(PathBuf),

    /// The config parsed but the framework rejected one of its settings.
    #[error("Failed to apply config: {0}")]
    Apply(#[from] AccelError),
}
