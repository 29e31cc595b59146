// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::DEFAULT_PROBE_TIMEOUT_MS;
use crate::config::OptionsUpdate;
use crate::errors::ConfigError;

/// Startup configuration applied to a freshly built framework.
///
/// # Fields
/// * `driver` - Driver to select, superseding per-opcode routing (optional)
/// * `options` - Partial options update; absent fields keep their defaults
/// * `assignments` - Opcode name to module name overrides
/// * `stats` - Stats aggregator tuning
///
/// # Example
/// ```yaml
/// driver: null
/// options:
///   task_count: 4096
/// assignments:
///   crc32c: software
/// stats:
///   probe_timeout_ms: 500
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FrameworkConfig {
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub options: OptionsUpdate,
    #[serde(default)]
    pub assignments: BTreeMap<String, String>,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StatsConfig {
    /// How long a snapshot waits for each context to answer its probe.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl StatsConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}

impl FrameworkConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Loads a config file, picking the format from its extension
/// (`.yaml`/`.yml` or `.toml`).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FrameworkConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> Result<FrameworkConfig, ConfigError> = match extension.as_deref() {
        Some("yaml") | Some("yml") => FrameworkConfig::from_yaml_str,
        Some("toml") => FrameworkConfig::from_toml_str,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}
