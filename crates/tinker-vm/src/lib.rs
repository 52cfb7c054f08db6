// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Execution for the Tinker instruction language
//!
//! - [`compiler`] lowers a validated program to flat, jump-resolved IR
//! - [`machine`] simulates the IR one cycle at a time
//! - [`runner`] drives a fresh machine per test case and collects verdicts
//! - [`score`] ranks passing verdicts

pub mod compiler;
pub mod machine;
pub mod program;
pub mod runner;
pub mod score;

pub use compiler::lower;
pub use machine::{
    ArithmeticError, Fault, FaultKind, Machine, MachineState, MachineStatus, TraceEntry,
};
pub use program::{CompiledProgram, Instruction};
pub use runner::{run_all, run_case, RunConfig, RunVerdict, TestCaseResult, DEFAULT_CYCLE_CEILING};
pub use score::{score, Score};
