//! Puzzle definitions: the hardware a program runs on and the test cases it
//! must pass.
//!
//! These are read-only inputs supplied by the caller (usually deserialized
//! from JSON). [`HardwareSpec::validate`] and [`ProgramSpec::validate`]
//! check their limits before they reach the compiler or the machine.

use crate::foundation::LangValue;
use crate::opcode::Opcode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Maximum number of user registers a hardware spec may declare.
pub const MAX_REGISTERS: usize = 16;
/// Maximum number of stacks a hardware spec may declare.
pub const MAX_STACKS: usize = 16;
/// Maximum capacity of a single stack.
pub const MAX_STACK_CAPACITY: usize = 256;

/// Shape of the virtual machine a puzzle is solved on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardwareSpec {
    /// Number of user registers (`RX0` .. `RX{n-1}`)
    pub num_registers: usize,
    /// One descriptor per stack (`S0` .. `S{n-1}`)
    #[serde(default)]
    pub stacks: Vec<StackSpec>,
    /// Opcodes programs may use on this hardware
    #[serde(default = "all_opcodes")]
    pub permitted_opcodes: BTreeSet<Opcode>,
}

/// A single stack of a [`HardwareSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackSpec {
    /// Maximum number of values the stack can hold
    pub capacity: usize,
}

/// A puzzle: the hardware it targets plus the test cases a solution must pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSpec {
    /// Identifier of the hardware spec this puzzle runs on
    #[serde(default)]
    pub hardware: String,
    /// Test cases, evaluated independently
    pub test_cases: Vec<TestCase>,
}

/// One input sequence and the output a correct program produces for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub input: Vec<LangValue>,
    #[serde(default)]
    pub expected_output: Vec<LangValue>,
}

/// A spec that violates the hardware limits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("hardware must have between 1 and {max} registers, got {found}")]
    RegisterCount { found: usize, max: usize },

    #[error("hardware may have at most {max} stacks, got {found}")]
    StackCount { found: usize, max: usize },

    #[error("stack S{stack} capacity {found} exceeds the maximum of {max}")]
    StackCapacity {
        stack: usize,
        found: usize,
        max: usize,
    },

    #[error("hardware permits no opcodes")]
    NoOpcodes,

    #[error("program spec has no test cases")]
    NoTestCases,
}

fn all_opcodes() -> BTreeSet<Opcode> {
    Opcode::ALL.into_iter().collect()
}

impl HardwareSpec {
    /// Hardware with `num_registers` registers, one stack per capacity and
    /// every opcode permitted.
    pub fn new(num_registers: usize, capacities: &[usize]) -> Self {
        Self {
            num_registers,
            stacks: capacities
                .iter()
                .map(|&capacity| StackSpec { capacity })
                .collect(),
            permitted_opcodes: all_opcodes(),
        }
    }

    /// Restrict the permitted opcode set.
    pub fn with_opcodes(mut self, opcodes: impl IntoIterator<Item = Opcode>) -> Self {
        self.permitted_opcodes = opcodes.into_iter().collect();
        self
    }

    /// Number of stacks.
    pub fn num_stacks(&self) -> usize {
        self.stacks.len()
    }

    /// Whether programs on this hardware may use `opcode`.
    pub fn permits(&self, opcode: Opcode) -> bool {
        self.permitted_opcodes.contains(&opcode)
    }

    /// Check this hardware against the machine limits.
    ///
    /// # Errors
    ///
    /// Returns the first violated limit.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.num_registers == 0 || self.num_registers > MAX_REGISTERS {
            return Err(SpecError::RegisterCount {
                found: self.num_registers,
                max: MAX_REGISTERS,
            });
        }
        if self.stacks.len() > MAX_STACKS {
            return Err(SpecError::StackCount {
                found: self.stacks.len(),
                max: MAX_STACKS,
            });
        }
        if let Some((stack, spec)) = self
            .stacks
            .iter()
            .enumerate()
            .find(|(_, spec)| spec.capacity > MAX_STACK_CAPACITY)
        {
            return Err(SpecError::StackCapacity {
                stack,
                found: spec.capacity,
                max: MAX_STACK_CAPACITY,
            });
        }
        if self.permitted_opcodes.is_empty() {
            return Err(SpecError::NoOpcodes);
        }
        Ok(())
    }
}

impl Default for HardwareSpec {
    fn default() -> Self {
        Self::new(1, &[])
    }
}

impl ProgramSpec {
    /// A puzzle with the given test cases on an unnamed hardware spec.
    pub fn new(test_cases: Vec<TestCase>) -> Self {
        Self {
            hardware: String::new(),
            test_cases,
        }
    }

    /// # Errors
    ///
    /// Returns [`SpecError::NoTestCases`] for a puzzle without test cases.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.test_cases.is_empty() {
            return Err(SpecError::NoTestCases);
        }
        Ok(())
    }
}

impl Default for ProgramSpec {
    fn default() -> Self {
        Self::new(vec![TestCase::default()])
    }
}

impl TestCase {
    pub fn new(input: Vec<LangValue>, expected_output: Vec<LangValue>) -> Self {
        Self {
            input,
            expected_output,
        }
    }
}
