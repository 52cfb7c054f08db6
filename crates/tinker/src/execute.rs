//! Single test case execution.

use crate::spec::{HardwareSpec, TestCase};
use tinker_vm::{run_case, CompiledProgram, Machine, MachineStatus, RunConfig, TestCaseResult};

/// Run `program` on one test case with the given cycle ceiling.
pub fn run(
    program: &CompiledProgram,
    hardware: &HardwareSpec,
    case: &TestCase,
    cycle_ceiling: u64,
) -> TestCaseResult {
    let config = RunConfig {
        cycle_ceiling,
        ..RunConfig::default()
    };
    run_case(program, hardware, case, &config)
}

/// Advance `machine` by one cycle and return its new status.
pub fn step<'m>(machine: &'m mut Machine<'_>) -> &'m MachineStatus {
    machine.step()
}
