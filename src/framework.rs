// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The owned control-plane handle.
//!
//! [`AccelFramework`] ties the opcode registry, driver selector, options,
//! crypto keys and stats aggregator to one lifecycle gate. Administrative
//! callers and the execution layer share it (typically behind an `Arc`);
//! there is no process-global instance.
//!
//! # Examples
//!
//! ```rust
//! use accel_plane::framework::{AccelFramework, ExecutionRoute};
//! use accel_plane::registry::Opcode;
//!
//! let framework = AccelFramework::builder().build()?;
//! framework.assign_by_name("crc32c", "software")?;
//! framework.start_serving()?;
//!
//! let route = framework.route(Opcode::Crc32c)?;
//! assert!(matches!(route, ExecutionRoute::Module(_)));
//! assert_eq!(route.name(), "software");
//! # Ok::<(), accel_plane::errors::AccelError>(())
//! ```

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::backends::SoftwareModule;
use crate::config::{AccelOptions, OptionsStore, OptionsUpdate};
use crate::crypto::{CryptoKeyDescriptor, CryptoKeyParams, CryptoKeyStore, KeyLease};
use crate::engine::{ExecutionContext, StatsAggregator, StatsReport};
use crate::errors::AccelResult;
use crate::registry::{
    DriverSelector, LifecycleGate, ModuleInfo, Opcode, OpcodeAssignment, OpcodeRegistry, Phase,
};
use crate::traits::{AccelDriver, AccelModule};

/// Where the execution layer should send an operation.
#[derive(Clone)]
pub enum ExecutionRoute {
    /// A selected driver handles every opcode.
    Driver(Arc<dyn AccelDriver>),
    Module(Arc<dyn AccelModule>),
}

impl ExecutionRoute {
    pub fn name(&self) -> &str {
        match self {
            ExecutionRoute::Driver(driver) => driver.name(),
            ExecutionRoute::Module(module) => module.name(),
        }
    }
}

impl std::fmt::Debug for ExecutionRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionRoute::Driver(driver) => f.debug_tuple("Driver").field(&driver.name()).finish(),
            ExecutionRoute::Module(module) => f.debug_tuple("Module").field(&module.name()).finish(),
        }
    }
}

/// Per-opcode activity joined with the module currently assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    pub opcode: Opcode,
    pub module_name: String,
    pub executed: u64,
    pub failed: u64,
    pub num_bytes: u64,
}

/// Collects modules and drivers before the framework is built.
///
/// The built-in software module is always registered first.
#[derive(Default)]
pub struct FrameworkBuilder {
    modules: Vec<Arc<dyn AccelModule>>,
    drivers: Vec<Arc<dyn AccelDriver>>,
    probe_timeout: Option<Duration>,
}

impl FrameworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, module: Arc<dyn AccelModule>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn driver(mut self, driver: Arc<dyn AccelDriver>) -> Self {
        self.drivers.push(driver);
        self
    }

    pub fn probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = Some(probe_timeout);
        self
    }

    /// Registers everything and seeds the default assignments.
    ///
    /// Fails with `DuplicateName` if two modules or two drivers share a name.
    pub fn build(self) -> AccelResult<AccelFramework> {
        let gate = Arc::new(LifecycleGate::new());

        let mut modules: Vec<Arc<dyn AccelModule>> = Vec::with_capacity(self.modules.len() + 1);
        modules.push(Arc::new(SoftwareModule::new()));
        modules.extend(self.modules);

        let stats = match self.probe_timeout {
            Some(timeout) => StatsAggregator::with_probe_timeout(timeout)?,
            None => StatsAggregator::new(),
        };

        Ok(AccelFramework {
            registry: OpcodeRegistry::new(modules, gate.clone())?,
            drivers: DriverSelector::new(self.drivers, gate.clone())?,
            options: OptionsStore::new(gate.clone()),
            keys: CryptoKeyStore::new(),
            stats,
            gate,
        })
    }
}

pub struct AccelFramework {
    gate: Arc<LifecycleGate>,
    registry: OpcodeRegistry,
    drivers: DriverSelector,
    options: OptionsStore,
    keys: CryptoKeyStore,
    stats: StatsAggregator,
}

impl AccelFramework {
    pub fn builder() -> FrameworkBuilder {
        FrameworkBuilder::new()
    }

    pub fn phase(&self) -> Phase {
        self.gate.current()
    }

    /// Moves to RUNTIME. Waits for in-progress structural mutations and
    /// rejects every later one.
    pub fn start_serving(&self) -> AccelResult<()> {
        self.gate.start_serving()
    }

    pub fn registry(&self) -> &OpcodeRegistry {
        &self.registry
    }

    pub fn assignments(&self) -> Vec<OpcodeAssignment> {
        self.registry.assignments()
    }

    pub fn enumerate_modules(&self) -> Vec<ModuleInfo> {
        self.registry.enumerate_modules()
    }

    pub fn module_for(&self, opcode: Opcode) -> AccelResult<String> {
        self.registry.module_for(opcode)
    }

    pub fn assign(&self, opcode: Opcode, module_name: &str) -> AccelResult<()> {
        self.registry.assign(opcode, module_name)
    }

    pub fn assign_by_name(&self, opcode_name: &str, module_name: &str) -> AccelResult<()> {
        self.registry.assign_by_name(opcode_name, module_name)
    }

    pub fn select_driver(&self, name: &str) -> AccelResult<()> {
        self.drivers.select_driver(name)
    }

    pub fn selected_driver(&self) -> Option<String> {
        self.drivers.selected_name()
    }

    /// The selected driver if there is one, otherwise the module assigned to
    /// `opcode`.
    pub fn route(&self, opcode: Opcode) -> AccelResult<ExecutionRoute> {
        if let Some(driver) = self.drivers.selected() {
            return Ok(ExecutionRoute::Driver(driver));
        }
        self.registry
            .assigned_module(opcode)
            .map(ExecutionRoute::Module)
    }

    pub fn create_crypto_key(&self, params: CryptoKeyParams) -> AccelResult<()> {
        self.keys.create(params, &self.registry)
    }

    pub fn crypto_key(&self, name: &str) -> AccelResult<CryptoKeyDescriptor> {
        self.keys.get(name)
    }

    pub fn crypto_keys(&self) -> Vec<CryptoKeyDescriptor> {
        self.keys.list_all()
    }

    pub fn destroy_crypto_key(&self, name: &str) -> AccelResult<()> {
        self.keys.destroy(name, &self.registry)
    }

    pub fn acquire_crypto_key(&self, name: &str) -> AccelResult<KeyLease> {
        self.keys.acquire(name)
    }

    pub fn options(&self) -> AccelOptions {
        self.options.current()
    }

    pub fn update_options(&self, update: &OptionsUpdate) -> AccelResult<AccelOptions> {
        self.options.update(update)
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn register_context(&self) -> ExecutionContext {
        self.stats.register_context()
    }

    /// Rows for every opcode with activity in `report`, in ordinal order.
    ///
    /// Opcodes without an assigned module are skipped.
    pub fn operation_summaries(&self, report: &StatsReport) -> Vec<OperationSummary> {
        Opcode::ALL
            .iter()
            .filter_map(|op| {
                let stats = report.stats.operation(*op);
                if stats.is_idle() {
                    return None;
                }
                let module_name = match self.registry.module_for(*op) {
                    Ok(name) => name,
                    Err(error) => {
                        tracing::info!(opcode = op.name(), %error, "Skipping opcode in stats summary");
                        return None;
                    }
                };
                Some(OperationSummary {
                    opcode: *op,
                    module_name,
                    executed: stats.executed,
                    failed: stats.failed,
                    num_bytes: stats.num_bytes,
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for AccelFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccelFramework")
            .field("phase", &self.phase())
            .field("registry", &self.registry)
            .field("driver", &self.selected_driver())
            .field("keys", &self.keys.len())
            .field("stats", &self.stats)
            .finish()
    }
}
