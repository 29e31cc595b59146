// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Opcode-to-module assignment table.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::registry::{ModuleRegistered, OpcodeAssigned};
use crate::observability::messages::StructuredLog;
use crate::registry::{LifecycleGate, Opcode};
use crate::traits::AccelModule;

/// A registered module and the opcodes it can execute, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    #[serde(rename = "module")]
    pub name: String,
    pub supported_ops: Vec<Opcode>,
}

/// One row of the current assignment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpcodeAssignment {
    pub opcode: Opcode,
    pub module: String,
}

type AssignmentTable = Vec<Option<Arc<dyn AccelModule>>>;

/// Maps every opcode to the module that executes it.
///
/// Modules are fixed at construction. Each opcode is seeded with the
/// highest-priority module that supports it (earlier registration wins ties)
/// and may be reassigned while the lifecycle gate is in STARTUP.
pub struct OpcodeRegistry {
    modules: Vec<Arc<dyn AccelModule>>,
    assignments: RwLock<AssignmentTable>,
    gate: Arc<LifecycleGate>,
}

impl OpcodeRegistry {
    /// Registers `modules` and seeds the default assignment for every opcode.
    pub fn new(modules: Vec<Arc<dyn AccelModule>>, gate: Arc<LifecycleGate>) -> AccelResult<Self> {
        let mut names = HashSet::new();
        for module in &modules {
            if !names.insert(module.name().to_string()) {
                return Err(AccelError::duplicate("module", module.name()));
            }
        }

        for module in &modules {
            ModuleRegistered {
                module: module.name(),
                supported_ops: Opcode::ALL
                    .iter()
                    .filter(|op| module.supports_opcode(**op))
                    .count(),
            }
            .log();
        }

        let assignments = Opcode::ALL
            .iter()
            .map(|op| default_module(&modules, *op))
            .collect();

        Ok(Self {
            modules,
            assignments: RwLock::new(assignments),
            gate,
        })
    }

    /// Display name for a raw opcode ordinal.
    pub fn name_of(ordinal: u32) -> AccelResult<&'static str> {
        Opcode::from_ordinal(ordinal).map(Opcode::name)
    }

    /// Name of the module currently assigned to `opcode`.
    pub fn module_for(&self, opcode: Opcode) -> AccelResult<String> {
        self.assigned_module(opcode)
            .map(|module| module.name().to_string())
    }

    pub(crate) fn assigned_module(&self, opcode: Opcode) -> AccelResult<Arc<dyn AccelModule>> {
        self.table()[opcode.ordinal()]
            .clone()
            .ok_or_else(|| AccelError::not_found("module for opcode", opcode.name()))
    }

    /// Looks up a registered module by name.
    pub fn module(&self, name: &str) -> AccelResult<Arc<dyn AccelModule>> {
        self.modules
            .iter()
            .find(|module| module.name() == name)
            .cloned()
            .ok_or_else(|| AccelError::not_found("module", name))
    }

    /// Reassigns `opcode` to the module registered as `module_name`.
    ///
    /// STARTUP only. An unregistered name is as incapable as a module that
    /// lacks the opcode. On any failure the previous assignment is kept.
    pub fn assign(&self, opcode: Opcode, module_name: &str) -> AccelResult<()> {
        let _startup = self.gate.enter_startup("assign_opcode")?;

        let module = self
            .module(module_name)
            .map_err(|_| AccelError::ModuleIncapable {
                module: module_name.to_string(),
                what: format!("opcode '{}' (no module registered under that name)", opcode),
            })?;
        if !module.supports_opcode(opcode) {
            return Err(AccelError::ModuleIncapable {
                module: module_name.to_string(),
                what: format!("opcode '{}'", opcode),
            });
        }

        let previous = {
            let mut table = self.assignments.write().unwrap_or_else(|e| e.into_inner());
            table[opcode.ordinal()].replace(module)
        };

        OpcodeAssigned {
            opcode: opcode.name(),
            module: module_name,
            previous: previous.as_ref().map(|m| m.name()),
        }
        .log();
        Ok(())
    }

    /// Same as [`assign`](Self::assign) with the opcode given by name.
    pub fn assign_by_name(&self, opcode_name: &str, module_name: &str) -> AccelResult<()> {
        let opcode = opcode_name.parse::<Opcode>()?;
        self.assign(opcode, module_name)
    }

    /// Every registered module with its capable opcodes, in registration order.
    pub fn enumerate_modules(&self) -> Vec<ModuleInfo> {
        self.modules
            .iter()
            .map(|module| ModuleInfo {
                name: module.name().to_string(),
                supported_ops: Opcode::ALL
                    .iter()
                    .copied()
                    .filter(|op| module.supports_opcode(*op))
                    .collect(),
            })
            .collect()
    }

    /// Current assignment for every opcode that has one, in ordinal order.
    pub fn assignments(&self) -> Vec<OpcodeAssignment> {
        let table = self.table();
        Opcode::ALL
            .iter()
            .filter_map(|op| {
                let module = table[op.ordinal()].as_ref();
                if module.is_none() {
                    tracing::info!(opcode = op.name(), "No module assigned to opcode");
                }
                module.map(|module| OpcodeAssignment {
                    opcode: *op,
                    module: module.name().to_string(),
                })
            })
            .collect()
    }

    fn table(&self) -> RwLockReadGuard<'_, AssignmentTable> {
        self.assignments.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for OpcodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpcodeRegistry")
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn default_module(modules: &[Arc<dyn AccelModule>], opcode: Opcode) -> Option<Arc<dyn AccelModule>> {
    let mut best: Option<&Arc<dyn AccelModule>> = None;
    for module in modules.iter().filter(|m| m.supports_opcode(opcode)) {
        match best {
            Some(current) if current.priority() >= module.priority() => {}
            _ => best = Some(module),
        }
    }
    best.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubModule;
    use crate::backends::SoftwareModule;
    use crate::registry::Phase;

    fn registry_with(modules: Vec<Arc<dyn AccelModule>>) -> OpcodeRegistry {
        OpcodeRegistry::new(modules, Arc::new(LifecycleGate::new())).unwrap()
    }

    #[test]
    fn test_every_opcode_assigned_after_init() {
        let registry = registry_with(vec![Arc::new(SoftwareModule::new())]);

        for op in Opcode::ALL {
            assert_eq!(registry.module_for(op).unwrap(), "software");
        }
        assert_eq!(registry.assignments().len(), Opcode::COUNT);
    }

    #[test]
    fn test_default_prefers_higher_priority() {
        let registry = registry_with(vec![
            Arc::new(SoftwareModule::new()),
            Arc::new(StubModule::new("hw0", &[Opcode::Encrypt, Opcode::Decrypt]).with_priority(10)),
        ]);

        assert_eq!(registry.module_for(Opcode::Encrypt).unwrap(), "hw0");
        assert_eq!(registry.module_for(Opcode::Decrypt).unwrap(), "hw0");
        assert_eq!(registry.module_for(Opcode::Copy).unwrap(), "software");
    }

    #[test]
    fn test_default_tie_goes_to_first_registered() {
        let registry = registry_with(vec![
            Arc::new(StubModule::new("first", &[Opcode::Fill])),
            Arc::new(StubModule::new("second", &[Opcode::Fill])),
        ]);

        assert_eq!(registry.module_for(Opcode::Fill).unwrap(), "first");
    }

    #[test]
    fn test_unsupported_opcode_not_found() {
        let registry = registry_with(vec![Arc::new(StubModule::new("hw0", &[Opcode::Copy]))]);

        assert!(matches!(
            registry.module_for(Opcode::Compress),
            Err(AccelError::NotFound { .. })
        ));
        assert_eq!(registry.assignments().len(), 1);
    }

    #[test]
    fn test_duplicate_module_names_rejected() {
        let result = OpcodeRegistry::new(
            vec![
                Arc::new(StubModule::new("hw0", &[Opcode::Copy])),
                Arc::new(StubModule::new("hw0", &[Opcode::Fill])),
            ],
            Arc::new(LifecycleGate::new()),
        );

        assert!(matches!(result, Err(AccelError::DuplicateName { .. })));
    }

    #[test]
    fn test_assign_table_driven() {
        struct TestCase {
            name: &'static str,
            opcode: &'static str,
            module: &'static str,
            expect_ok: bool,
            expected_module: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "capable module",
                opcode: "crc32c",
                module: "software",
                expect_ok: true,
                expected_module: "software",
            },
            TestCase {
                name: "incapable module",
                opcode: "crc32c",
                module: "hw0",
                expect_ok: false,
                expected_module: "software",
            },
            TestCase {
                name: "unknown module",
                opcode: "encrypt",
                module: "hw9",
                expect_ok: false,
                expected_module: "hw0",
            },
            TestCase {
                name: "unknown opcode",
                opcode: "crc64",
                module: "software",
                expect_ok: false,
                expected_module: "software",
            },
            TestCase {
                name: "move encrypt back to software",
                opcode: "encrypt",
                module: "software",
                expect_ok: true,
                expected_module: "software",
            },
        ];

        for test_case in test_cases {
            let registry = registry_with(vec![
                Arc::new(SoftwareModule::new()),
                Arc::new(
                    StubModule::new("hw0", &[Opcode::Encrypt, Opcode::Decrypt]).with_priority(10),
                ),
            ]);

            let result = registry.assign_by_name(test_case.opcode, test_case.module);
            assert_eq!(
                result.is_ok(),
                test_case.expect_ok,
                "Test case '{}': unexpected result {:?}",
                test_case.name,
                result
            );

            let opcode = test_case.opcode.parse::<Opcode>().unwrap_or(Opcode::Crc32c);
            assert_eq!(
                registry.module_for(opcode).unwrap(),
                test_case.expected_module,
                "Test case '{}'",
                test_case.name
            );
        }
    }

    #[test]
    fn test_assign_error_kinds() {
        let registry = registry_with(vec![
            Arc::new(StubModule::new("software", &[Opcode::Copy, Opcode::Crc32c])),
            Arc::new(StubModule::new("hw0", &[Opcode::Encrypt, Opcode::Decrypt])),
        ]);

        assert!(matches!(
            registry.assign(Opcode::Crc32c, "hw0"),
            Err(AccelError::ModuleIncapable { .. })
        ));
        assert_eq!(
            registry.assign(Opcode::Crc32c, "nope"),
            Err(AccelError::ModuleIncapable {
                module: "nope".to_string(),
                what: "opcode 'crc32c' (no module registered under that name)".to_string(),
            })
        );
        assert_eq!(registry.module_for(Opcode::Crc32c).unwrap(), "software");
        assert!(matches!(
            registry.assign_by_name("bogus", "software"),
            Err(AccelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_assign_rejected_at_runtime() {
        let gate = Arc::new(LifecycleGate::new());
        let registry = OpcodeRegistry::new(
            vec![
                Arc::new(SoftwareModule::new()),
                Arc::new(StubModule::new("hw0", &[Opcode::Copy])),
            ],
            gate.clone(),
        )
        .unwrap();
        assert_eq!(registry.module_for(Opcode::Copy).unwrap(), "hw0");
        gate.start_serving().unwrap();

        let err = registry.assign(Opcode::Copy, "software").unwrap_err();
        assert!(matches!(
            err,
            AccelError::PhaseViolation {
                current: Phase::Runtime,
                ..
            }
        ));
        assert_eq!(registry.module_for(Opcode::Copy).unwrap(), "hw0");
    }

    #[test]
    fn test_enumerate_modules_lists_ops_in_ordinal_order() {
        let registry = registry_with(vec![
            Arc::new(StubModule::new("software", &[Opcode::Crc32c, Opcode::Copy])),
            Arc::new(StubModule::new("hw0", &[Opcode::Decrypt, Opcode::Encrypt])),
        ]);

        let modules = registry.enumerate_modules();
        assert_eq!(
            modules,
            vec![
                ModuleInfo {
                    name: "software".to_string(),
                    supported_ops: vec![Opcode::Copy, Opcode::Crc32c],
                },
                ModuleInfo {
                    name: "hw0".to_string(),
                    supported_ops: vec![Opcode::Encrypt, Opcode::Decrypt],
                },
            ]
        );
    }

    #[test]
    fn test_name_of() {
        assert_eq!(OpcodeRegistry::name_of(4).unwrap(), "crc32c");
        assert!(matches!(
            OpcodeRegistry::name_of(Opcode::COUNT as u32),
            Err(AccelError::InvalidArgument(_))
        ));
    }
}
