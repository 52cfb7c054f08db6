// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! # Tinker
//!
//! Compiler and virtual machine for the Tinker puzzle instruction language.
//!
//! This crate is a facade that re-exports functionality from:
//! - `tinker-ast` - AST, specs, diagnostics and foundation types
//! - `tinker-lexer` - Tokenization
//! - `tinker-parser` - Parsing to AST
//! - `tinker-resolve` - Validation against a hardware spec
//! - `tinker-vm` - Lowering, execution, test running and scoring
//!
//! ## Architecture
//!
//! ```text
//! tinker-ast
//!     ↓
//! tinker-lexer
//!     ↓
//! tinker-parser
//!     ↓
//! tinker-resolve
//!     ↓
//! tinker-vm
//!     ↓
//! tinker (facade) - Re-exports + compile/run API
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tinker::{compile, run_all, score, HardwareSpec, ProgramSpec, RunConfig, TestCase};
//!
//! let hardware = HardwareSpec::new(1, &[]);
//! let program = compile("L: JEZ RLI E\nREAD RX0\nWRITE RX0\nJMP L\nE:", &hardware).unwrap();
//! let spec = ProgramSpec::new(vec![TestCase::new(vec![1, 2], vec![1, 2])]);
//!
//! let verdict = run_all(&program, &hardware, &spec, &RunConfig::default());
//! assert!(verdict.passed);
//! assert_eq!(score(&verdict).unwrap().cycles, 9);
//! ```

// Re-export AST and foundation types
pub use tinker_ast::{self as ast, *};

// Re-export lexer
pub use tinker_lexer as lexer;
pub use tinker_lexer::Token;

// Re-export parser
pub use tinker_parser as parser;
pub use tinker_parser::ParseError;

// Re-export resolve
pub use tinker_resolve as resolve;
pub use tinker_resolve::{validate, ValidatedProgram};

// Re-export VM
pub use tinker_vm as vm;
pub use tinker_vm::{
    run_all, score, ArithmeticError, CompiledProgram, Fault, FaultKind, Machine, MachineState,
    MachineStatus, RunConfig, RunVerdict, Score, TestCaseResult, TraceEntry,
    DEFAULT_CYCLE_CEILING,
};

pub mod cache;
pub mod compile;
pub mod execute;

pub use cache::CompileCache;
pub use compile::{
    compile, compile_files, compile_with_sources, format_errors, CompileResultWithSources,
    SourceUnit,
};
pub use execute::{run, step};

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
