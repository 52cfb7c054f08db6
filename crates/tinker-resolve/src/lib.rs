// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Validation for the Tinker instruction language
//!
//! This crate checks parsed programs against a hardware spec and resolves
//! label declarations, producing a [`ValidatedProgram`] that lowering can
//! trust.

pub mod resolve;

pub use resolve::*;
