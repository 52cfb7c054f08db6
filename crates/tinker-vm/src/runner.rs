//! Test case evaluation.
//!
//! Every test case gets a fresh machine over the same compiled program, so
//! cases are independent and can be evaluated in parallel. Results always
//! come back in test case order.

use crate::machine::{Fault, Machine, MachineStatus, TraceEntry};
use crate::program::CompiledProgram;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tinker_ast::{HardwareSpec, LangValue, ProgramSpec, TestCase};
use tracing::{debug, instrument};

/// Cycle ceiling used when none is configured.
pub const DEFAULT_CYCLE_CEILING: u64 = 1_000_000;

/// Evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Cycles a test case may execute before it faults with a timeout
    pub cycle_ceiling: u64,
    /// Evaluate test cases on the rayon thread pool
    pub parallel: bool,
    /// Keep the executed-cycle trace of every test case
    pub record_trace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cycle_ceiling: DEFAULT_CYCLE_CEILING,
            parallel: false,
            record_trace: false,
        }
    }
}

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// Halted with exactly the expected output
    pub passed: bool,
    pub output: Vec<LangValue>,
    pub expected_output: Vec<LangValue>,
    pub cycles: u64,
    pub instructions: u64,
    pub registers_used: usize,
    pub peak_stack_depth: usize,
    /// Terminal status (Halted or Faulted)
    pub status: MachineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TraceEntry>>,
}

impl TestCaseResult {
    /// The fault that stopped the machine, if any.
    pub fn fault(&self) -> Option<&Fault> {
        self.status.fault()
    }
}

/// Outcome of a whole program spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunVerdict {
    /// At least one test case ran and every test case passed
    pub passed: bool,
    /// Per test case results, in test case order
    pub results: Vec<TestCaseResult>,
    /// Number of instructions in the program
    pub program_size: usize,
    /// Largest cycle count of any test case
    pub max_cycles: u64,
    /// Sum of cycle counts over all test cases
    pub total_cycles: u64,
    /// Largest register count of any test case
    pub registers_used: usize,
    /// Largest stack depth of any test case
    pub peak_stack_depth: usize,
}

impl RunVerdict {
    /// Aggregate per-case results. A verdict without results never passes.
    pub fn new(results: Vec<TestCaseResult>, program_size: usize) -> Self {
        Self {
            passed: !results.is_empty() && results.iter().all(|r| r.passed),
            program_size,
            max_cycles: results.iter().map(|r| r.cycles).max().unwrap_or(0),
            total_cycles: results.iter().map(|r| r.cycles).sum(),
            registers_used: results.iter().map(|r| r.registers_used).max().unwrap_or(0),
            peak_stack_depth: results
                .iter()
                .map(|r| r.peak_stack_depth)
                .max()
                .unwrap_or(0),
            results,
        }
    }

    /// Number of passing test cases.
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }
}

/// Run one test case to completion.
pub fn run_case(
    program: &CompiledProgram,
    hardware: &HardwareSpec,
    case: &TestCase,
    config: &RunConfig,
) -> TestCaseResult {
    let mut machine = Machine::new(program, hardware, case.input.clone(), config.cycle_ceiling);
    if config.record_trace {
        machine = machine.with_trace();
    }
    machine.run();

    let (state, trace) = machine.into_parts();
    let status = state.status().clone();
    let passed =
        status == MachineStatus::Halted && state.output() == case.expected_output.as_slice();
    TestCaseResult {
        passed,
        output: state.output().to_vec(),
        expected_output: case.expected_output.clone(),
        cycles: state.cycle_count(),
        instructions: state.instruction_count(),
        registers_used: state.registers_used(),
        peak_stack_depth: state.peak_stack_depth(),
        status,
        trace,
    }
}

/// Run every test case of `spec`.
///
/// Parallel and sequential evaluation produce identical verdicts.
#[instrument(skip_all, fields(cases = spec.test_cases.len(), parallel = config.parallel))]
pub fn run_all(
    program: &CompiledProgram,
    hardware: &HardwareSpec,
    spec: &ProgramSpec,
    config: &RunConfig,
) -> RunVerdict {
    let results: Vec<TestCaseResult> = if config.parallel {
        spec.test_cases
            .par_iter()
            .map(|case| run_case(program, hardware, case, config))
            .collect()
    } else {
        spec.test_cases
            .iter()
            .map(|case| run_case(program, hardware, case, config))
            .collect()
    };

    for (index, result) in results.iter().enumerate() {
        debug!(
            case = index,
            passed = result.passed,
            cycles = result.cycles,
            status = ?result.status,
            "test case finished"
        );
    }

    RunVerdict::new(results, program.len())
}
