//! Cycle-accurate simulation of a compiled program.
//!
//! # Execution Model
//!
//! The machine owns one [`MachineState`] and steps it one instruction at a
//! time. Each step either:
//! - halts, when the program counter sits on the halt index,
//! - faults with [`FaultKind::Timeout`], when the cycle ceiling is reached,
//! - or executes one instruction, consuming one cycle.
//!
//! A faulting instruction has no effect: registers, stacks, input, output
//! and counters are exactly as they were before the step.
//!
//! Running to completion is nothing more than stepping until the status is
//! terminal, so both paths share one transition function.

use crate::program::{CompiledProgram, Instruction, RegisterId, StackId, Target};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tinker_ast::{HardwareSpec, LangValue, RegisterRef, Span, ValueSource};
use tracing::trace;


/// Lifecycle of a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineStatus {
    /// Created, nothing executed yet
    Ready,
    /// At least one instruction executed, not finished
    Running,
    /// Program counter reached the halt index
    Halted,
    /// Stopped by a runtime fault
    Faulted(Fault),
}

impl MachineStatus {
    /// Halted and Faulted are terminal: stepping does nothing.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MachineStatus::Halted | MachineStatus::Faulted(_))
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            MachineStatus::Faulted(fault) => Some(fault),
            _ => None,
        }
    }
}

/// A runtime fault and the instruction that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct Fault {
    pub kind: FaultKind,
    /// Program counter of the faulting instruction
    pub pc: usize,
    /// Source span of the faulting instruction
    pub span: Span,
}

/// Cause of a runtime fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum FaultKind {
    /// Push onto a stack that is already at capacity.
    #[error("stack S{stack} overflowed its capacity of {capacity}")]
    StackOverflow { stack: StackId, capacity: usize },

    /// Pop from an empty stack.
    #[error("stack S{stack} underflowed")]
    StackUnderflow { stack: StackId },

    /// Checked arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// `READ` with no input left.
    #[error("read past the end of input")]
    InputExhausted,

    /// Jump past the halt index. Only hand-built programs can do this.
    #[error("jump target {target} is past the end of the program")]
    InvalidJump { target: Target },

    /// Register index the hardware does not have. Reached by hand-built
    /// programs, or by running a program on smaller hardware than it was
    /// compiled for.
    #[error("register RX{register} does not exist on this hardware")]
    InvalidRegister { register: RegisterId },

    /// Stack index the hardware does not have.
    #[error("stack S{stack} does not exist on this hardware")]
    InvalidStack { stack: StackId },

    /// The cycle ceiling was reached before the program halted.
    #[error("cycle ceiling of {ceiling} reached")]
    Timeout { ceiling: u64 },
}

/// Checked arithmetic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum ArithmeticError {
    #[error("overflow")]
    Overflow,
    #[error("division by zero")]
    DivideByZero,
}

/// One executed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Cycle number, starting at 1
    pub cycle: u64,
    /// Program counter of the executed instruction
    pub pc: usize,
    pub span: Span,
}

/// Complete state of one machine.
///
/// Cloning gives an independent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    registers: Vec<LangValue>,
    stacks: Vec<Vec<LangValue>>,
    capacities: Vec<usize>,
    input: Vec<LangValue>,
    input_cursor: usize,
    output: Vec<LangValue>,
    pc: usize,
    cycle_count: u64,
    instruction_count: u64,
    registers_touched: Vec<bool>,
    peak_stack_depth: usize,
    status: MachineStatus,
}

impl MachineState {
    /// Fresh state for `hardware` with the given input.
    pub fn new(hardware: &HardwareSpec, input: Vec<LangValue>) -> Self {
        Self {
            registers: vec![0; hardware.num_registers],
            stacks: hardware
                .stacks
                .iter()
                .map(|spec| Vec::with_capacity(spec.capacity))
                .collect(),
            capacities: hardware.stacks.iter().map(|spec| spec.capacity).collect(),
            input,
            input_cursor: 0,
            output: Vec::new(),
            pc: 0,
            cycle_count: 0,
            instruction_count: 0,
            registers_touched: vec![false; hardware.num_registers],
            peak_stack_depth: 0,
            status: MachineStatus::Ready,
        }
    }

    /// User register values (`RX0`..).
    pub fn registers(&self) -> &[LangValue] {
        &self.registers
    }

    /// Stack contents, bottom first.
    pub fn stacks(&self) -> &[Vec<LangValue>] {
        &self.stacks
    }

    /// Input values not yet read.
    pub fn remaining_input(&self) -> &[LangValue] {
        &self.input[self.input_cursor..]
    }

    pub fn output(&self) -> &[LangValue] {
        &self.output
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Number of distinct user registers executed instructions referenced.
    pub fn registers_used(&self) -> usize {
        self.registers_touched.iter().filter(|&&touched| touched).count()
    }

    /// Largest length any single stack reached.
    pub fn peak_stack_depth(&self) -> usize {
        self.peak_stack_depth
    }

    pub fn status(&self) -> &MachineStatus {
        &self.status
    }

    fn value(&self, source: ValueSource) -> Result<LangValue, FaultKind> {
        Ok(match source {
            ValueSource::Literal(value) => value,
            ValueSource::Register(RegisterRef::User(n)) => self.register(n)?,
            ValueSource::Register(RegisterRef::InputLength) => {
                saturating_value(self.input.len() - self.input_cursor)
            }
            ValueSource::Register(RegisterRef::StackLength(n)) => {
                let stack = self
                    .stacks
                    .get(n)
                    .ok_or(FaultKind::InvalidStack { stack: n })?;
                saturating_value(stack.len())
            }
        })
    }

    fn register(&self, n: RegisterId) -> Result<LangValue, FaultKind> {
        self.registers
            .get(n)
            .copied()
            .ok_or(FaultKind::InvalidRegister { register: n })
    }

    fn register_mut(&mut self, n: RegisterId) -> Result<&mut LangValue, FaultKind> {
        self.registers
            .get_mut(n)
            .ok_or(FaultKind::InvalidRegister { register: n })
    }

    /// Apply `instr` and return the next program counter.
    ///
    /// Every fallible check happens before the first mutation.
    fn execute(&mut self, instr: Instruction, halt_index: usize) -> Result<usize, FaultKind> {
        let next = self.pc + 1;
        let jump = |target: Target, taken: bool| -> Result<usize, FaultKind> {
            if target > halt_index {
                return Err(FaultKind::InvalidJump { target });
            }
            Ok(if taken { target } else { next })
        };

        match instr {
            Instruction::Read(r) => {
                let value = *self
                    .input
                    .get(self.input_cursor)
                    .ok_or(FaultKind::InputExhausted)?;
                *self.register_mut(r)? = value;
                self.input_cursor += 1;
            }
            Instruction::Write(v) => {
                let value = self.value(v)?;
                self.output.push(value);
            }
            Instruction::Set(r, v) => {
                let value = self.value(v)?;
                *self.register_mut(r)? = value;
            }
            Instruction::Add(r, v) => self.arithmetic(r, v, |a, b| a.checked_add(b))?,
            Instruction::Sub(r, v) => self.arithmetic(r, v, |a, b| a.checked_sub(b))?,
            Instruction::Mul(r, v) => self.arithmetic(r, v, |a, b| a.checked_mul(b))?,
            Instruction::Div(r, v) => {
                if self.value(v)? == 0 {
                    return Err(ArithmeticError::DivideByZero.into());
                }
                self.arithmetic(r, v, |a, b| a.checked_div(b))?
            }
            Instruction::Cmp(r, a, b) => {
                let result = match self.value(a)?.cmp(&self.value(b)?) {
                    Ordering::Less => -1,
                    Ordering::Equal => 0,
                    Ordering::Greater => 1,
                };
                *self.register_mut(r)? = result;
            }
            Instruction::Push(v, s) => {
                let value = self.value(v)?;
                let (Some(stack), Some(&capacity)) =
                    (self.stacks.get_mut(s), self.capacities.get(s))
                else {
                    return Err(FaultKind::InvalidStack { stack: s });
                };
                if stack.len() >= capacity {
                    return Err(FaultKind::StackOverflow { stack: s, capacity });
                }
                stack.push(value);
                self.peak_stack_depth = self.peak_stack_depth.max(stack.len());
            }
            Instruction::Pop(s, r) => {
                let slot = self
                    .registers
                    .get_mut(r)
                    .ok_or(FaultKind::InvalidRegister { register: r })?;
                let stack = self
                    .stacks
                    .get_mut(s)
                    .ok_or(FaultKind::InvalidStack { stack: s })?;
                *slot = stack.pop().ok_or(FaultKind::StackUnderflow { stack: s })?;
            }
            Instruction::Jmp(target) => return jump(target, true),
            Instruction::Jez(v, target) => return jump(target, self.value(v)? == 0),
            Instruction::Jnz(v, target) => return jump(target, self.value(v)? != 0),
            Instruction::Jlz(v, target) => return jump(target, self.value(v)? < 0),
            Instruction::Jgz(v, target) => return jump(target, self.value(v)? > 0),
        }
        Ok(next)
    }

    fn arithmetic(
        &mut self,
        r: RegisterId,
        v: ValueSource,
        op: impl Fn(LangValue, LangValue) -> Option<LangValue>,
    ) -> Result<(), FaultKind> {
        let result = op(self.register(r)?, self.value(v)?).ok_or(ArithmeticError::Overflow)?;
        *self.register_mut(r)? = result;
        Ok(())
    }
}

/// Lengths exposed through `RLI` and `RS<n>`.
fn saturating_value(len: usize) -> LangValue {
    LangValue::try_from(len).unwrap_or(LangValue::MAX)
}

/// A compiled program executing against one test case.
#[derive(Debug, Clone)]
pub struct Machine<'p> {
    program: &'p CompiledProgram,
    state: MachineState,
    cycle_ceiling: u64,
    trace: Option<Vec<TraceEntry>>,
}

impl<'p> Machine<'p> {
    /// A machine in the Ready state.
    pub fn new(
        program: &'p CompiledProgram,
        hardware: &HardwareSpec,
        input: Vec<LangValue>,
        cycle_ceiling: u64,
    ) -> Self {
        Self {
            program,
            state: MachineState::new(hardware, input),
            cycle_ceiling,
            trace: None,
        }
    }

    /// Record a [`TraceEntry`] for every executed cycle.
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    pub fn program(&self) -> &'p CompiledProgram {
        self.program
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn status(&self) -> &MachineStatus {
        &self.state.status
    }

    pub fn cycle_ceiling(&self) -> u64 {
        self.cycle_ceiling
    }

    pub fn trace(&self) -> Option<&[TraceEntry]> {
        self.trace.as_deref()
    }

    /// Give up the machine, keeping its final state and trace.
    pub fn into_parts(self) -> (MachineState, Option<Vec<TraceEntry>>) {
        (self.state, self.trace)
    }

    /// Advance by at most one cycle.
    pub fn step(&mut self) -> &MachineStatus {
        if self.state.status.is_terminal() {
            return &self.state.status;
        }

        let halt_index = self.program.halt_index();
        let pc = self.state.pc;
        if pc == halt_index {
            trace!(cycles = self.state.cycle_count, "halted");
            self.state.status = MachineStatus::Halted;
            return &self.state.status;
        }

        let span = self
            .program
            .span(pc)
            .expect("BUG: program counter past the halt index");
        if self.state.cycle_count >= self.cycle_ceiling {
            trace!(pc, ceiling = self.cycle_ceiling, "timed out");
            return self.fault(
                FaultKind::Timeout {
                    ceiling: self.cycle_ceiling,
                },
                pc,
                span,
            );
        }

        let instr = self.program.instructions()[pc];
        trace!(pc, cycle = self.state.cycle_count, opcode = %instr.opcode(), "step");
        match self.state.execute(instr, halt_index) {
            Ok(next) => {
                for r in instr.user_registers() {
                    if let Some(touched) = self.state.registers_touched.get_mut(r) {
                        *touched = true;
                    }
                }
                self.state.pc = next;
                self.state.cycle_count += 1;
                self.state.instruction_count += 1;
                if let Some(trace) = &mut self.trace {
                    trace.push(TraceEntry {
                        cycle: self.state.cycle_count,
                        pc,
                        span,
                    });
                }
                self.state.status = if next == halt_index {
                    MachineStatus::Halted
                } else {
                    MachineStatus::Running
                };
            }
            Err(kind) => {
                trace!(pc, %kind, "faulted");
                return self.fault(kind, pc, span);
            }
        }
        &self.state.status
    }

    /// Step until the machine halts or faults.
    pub fn run(&mut self) -> &MachineStatus {
        while !self.state.status.is_terminal() {
            self.step();
        }
        &self.state.status
    }

    fn fault(&mut self, kind: FaultKind, pc: usize, span: Span) -> &MachineStatus {
        self.state.status = MachineStatus::Faulted(Fault { kind, pc, span });
        &self.state.status
    }
}
