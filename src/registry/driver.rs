// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Optional monolithic driver that bypasses per-opcode module selection.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::registry::DriverSelected;
use crate::observability::messages::StructuredLog;
use crate::registry::LifecycleGate;
use crate::traits::AccelDriver;

pub struct DriverSelector {
    drivers: Vec<Arc<dyn AccelDriver>>,
    selected: RwLock<Option<Arc<dyn AccelDriver>>>,
    gate: Arc<LifecycleGate>,
}

impl DriverSelector {
    pub fn new(drivers: Vec<Arc<dyn AccelDriver>>, gate: Arc<LifecycleGate>) -> AccelResult<Self> {
        let mut names = HashSet::new();
        for driver in &drivers {
            if !names.insert(driver.name().to_string()) {
                return Err(AccelError::duplicate("driver", driver.name()));
            }
        }

        Ok(Self {
            drivers,
            selected: RwLock::new(None),
            gate,
        })
    }

    /// Installs the named driver as the sole execution path. STARTUP only.
    pub fn select_driver(&self, name: &str) -> AccelResult<()> {
        let _startup = self.gate.enter_startup("select_driver")?;

        let driver = self
            .drivers
            .iter()
            .find(|driver| driver.name() == name)
            .cloned()
            .ok_or_else(|| AccelError::not_found("driver", name))?;

        *self.selected.write().unwrap_or_else(|e| e.into_inner()) = Some(driver);
        DriverSelected { driver: name }.log();
        Ok(())
    }

    pub fn selected(&self) -> Option<Arc<dyn AccelDriver>> {
        self.selected
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn selected_name(&self) -> Option<String> {
        self.selected().map(|driver| driver.name().to_string())
    }

    pub fn driver_names(&self) -> Vec<&str> {
        self.drivers.iter().map(|driver| driver.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubDriver;

    fn selector(gate: Arc<LifecycleGate>) -> DriverSelector {
        DriverSelector::new(
            vec![Arc::new(StubDriver::new("mlx5")), Arc::new(StubDriver::new("dpdk"))],
            gate,
        )
        .unwrap()
    }

    #[test]
    fn test_no_driver_selected_by_default() {
        let selector = selector(Arc::new(LifecycleGate::new()));
        assert!(selector.selected().is_none());
        assert_eq!(selector.driver_names(), vec!["mlx5", "dpdk"]);
    }

    #[test]
    fn test_select_known_driver() {
        let selector = selector(Arc::new(LifecycleGate::new()));
        selector.select_driver("dpdk").unwrap();
        assert_eq!(selector.selected_name().as_deref(), Some("dpdk"));

        selector.select_driver("mlx5").unwrap();
        assert_eq!(selector.selected_name().as_deref(), Some("mlx5"));
    }

    #[test]
    fn test_select_unknown_driver() {
        let selector = selector(Arc::new(LifecycleGate::new()));
        assert!(matches!(
            selector.select_driver("idxd"),
            Err(AccelError::NotFound { .. })
        ));
        assert!(selector.selected().is_none());
    }

    #[test]
    fn test_select_rejected_at_runtime() {
        let gate = Arc::new(LifecycleGate::new());
        let selector = selector(gate.clone());
        gate.start_serving().unwrap();

        assert!(matches!(
            selector.select_driver("mlx5"),
            Err(AccelError::PhaseViolation { .. })
        ));
        assert!(selector.selected().is_none());
    }

    #[test]
    fn test_duplicate_driver_names_rejected() {
        let result = DriverSelector::new(
            vec![Arc::new(StubDriver::new("mlx5")), Arc::new(StubDriver::new("mlx5"))],
            Arc::new(LifecycleGate::new()),
        );
        assert!(matches!(result, Err(AccelError::DuplicateName { .. })));
    }
}
