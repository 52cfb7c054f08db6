// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for the Tinker instruction language
//!
//! This crate contains the syntax tree, hardware and puzzle specs, opcode
//! signatures and the compile diagnostic model shared by the lexer, parser,
//! validator and virtual machine.

pub mod ast;
pub mod error;
pub mod foundation;
pub mod opcode;
pub mod spec;

// Re-export commonly used types
pub use ast::{
    Instruction, OperandRef, Program, RegisterRef, Spanned, StackRef, Statement, ValueSource,
};
pub use error::{CompileError, DiagnosticFormatter, ErrorKind, Label, Stage};
pub use foundation::{LangValue, SourceFile, SourceMap, Span};
pub use opcode::{Opcode, OperandKind};
pub use spec::{HardwareSpec, ProgramSpec, SpecError, StackSpec, TestCase};
