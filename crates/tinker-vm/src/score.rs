//! Ranking of passing solutions.

use crate::runner::RunVerdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Performance of a passing program. Lower is better.
///
/// Field order is the comparison order: cycles first, then program size,
/// then registers, then stack depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Score {
    /// Largest cycle count over all test cases
    pub cycles: u64,
    /// Number of instructions in the program
    pub instructions: usize,
    /// Largest number of user registers any test case touched
    pub registers: usize,
    /// Largest stack depth any test case reached
    pub stack_depth: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cycles, {} instructions, {} registers, stack depth {}",
            self.cycles, self.instructions, self.registers, self.stack_depth
        )
    }
}

/// Score a verdict. Failing verdicts have no score.
pub fn score(verdict: &RunVerdict) -> Option<Score> {
    if !verdict.passed {
        return None;
    }
    Some(Score {
        cycles: verdict.max_cycles,
        instructions: verdict.program_size,
        registers: verdict.registers_used,
        stack_depth: verdict.peak_stack_depth,
    })
}
