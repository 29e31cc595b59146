// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::FrameworkConfig;
use crate::errors::{AccelResult, ConfigError};
use crate::framework::{AccelFramework, FrameworkBuilder};
use crate::registry::Opcode;

/// Builds a framework and applies a startup config to it.
///
/// # Examples
///
/// ```
/// use accel_plane::config::{FrameworkConfig, RuntimeBuilder};
/// use accel_plane::framework::FrameworkBuilder;
///
/// let config = FrameworkConfig::from_yaml_str("options:\n  task_count: 4096\n").unwrap();
/// let framework = RuntimeBuilder::from_config(FrameworkBuilder::new(), &config).unwrap();
///
/// assert_eq!(framework.options().task_count, 4096);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Builds the framework from `builder`, then applies `config` while still
    /// in STARTUP. The returned framework has not started serving.
    pub fn from_config(
        builder: FrameworkBuilder,
        config: &FrameworkConfig,
    ) -> Result<AccelFramework, ConfigError> {
        let framework = builder.probe_timeout(config.stats.probe_timeout()).build()?;
        apply_config(&framework, config)?;
        Ok(framework)
    }
}

/// Applies options, then opcode assignments in ordinal order, then the driver.
///
/// Every opcode name is parsed before anything is changed. The first
/// rejected setting stops the walk; settings already applied stay in place.
pub fn apply_config(framework: &AccelFramework, config: &FrameworkConfig) -> Result<(), ConfigError> {
    let mut assignments = config
        .assignments
        .iter()
        .map(|(opcode, module)| Ok((opcode.parse::<Opcode>()?, module.as_str())))
        .collect::<AccelResult<Vec<_>>>()?;
    assignments.sort_by_key(|(opcode, _)| *opcode);

    framework.stats().set_probe_timeout(config.stats.probe_timeout())?;

    if !config.options.is_empty() {
        framework.update_options(&config.options)?;
    }
    for (opcode, module) in assignments {
        framework.assign(opcode, module)?;
    }
    if let Some(driver) = &config.driver {
        framework.select_driver(driver)?;
    }
    Ok(())
}
