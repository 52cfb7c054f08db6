//! Executable program form.
//!
//! Lowering turns label references into absolute instruction indices and
//! destination registers into user register indices, so the machine never
//! looks anything up by name.

use serde::{Deserialize, Serialize};
use tinker_ast::{Opcode, RegisterRef, Span, ValueSource};

/// Index of a user register (`RX<n>`).
pub type RegisterId = usize;
/// Index of a stack (`S<n>`).
pub type StackId = usize;
/// Absolute instruction index a jump transfers control to.
pub type Target = usize;

/// A resolved instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    Read(RegisterId),
    Write(ValueSource),
    Set(RegisterId, ValueSource),
    Add(RegisterId, ValueSource),
    Sub(RegisterId, ValueSource),
    Mul(RegisterId, ValueSource),
    Div(RegisterId, ValueSource),
    Cmp(RegisterId, ValueSource, ValueSource),
    Push(ValueSource, StackId),
    Pop(StackId, RegisterId),
    Jmp(Target),
    Jez(ValueSource, Target),
    Jnz(ValueSource, Target),
    Jlz(ValueSource, Target),
    Jgz(ValueSource, Target),
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Read(..) => Opcode::Read,
            Instruction::Write(..) => Opcode::Write,
            Instruction::Set(..) => Opcode::Set,
            Instruction::Add(..) => Opcode::Add,
            Instruction::Sub(..) => Opcode::Sub,
            Instruction::Mul(..) => Opcode::Mul,
            Instruction::Div(..) => Opcode::Div,
            Instruction::Cmp(..) => Opcode::Cmp,
            Instruction::Push(..) => Opcode::Push,
            Instruction::Pop(..) => Opcode::Pop,
            Instruction::Jmp(..) => Opcode::Jmp,
            Instruction::Jez(..) => Opcode::Jez,
            Instruction::Jnz(..) => Opcode::Jnz,
            Instruction::Jlz(..) => Opcode::Jlz,
            Instruction::Jgz(..) => Opcode::Jgz,
        }
    }

    /// User registers this instruction reads or writes.
    pub fn user_registers(&self) -> impl Iterator<Item = RegisterId> {
        fn source(value: &ValueSource) -> Option<RegisterId> {
            match value {
                ValueSource::Register(RegisterRef::User(n)) => Some(*n),
                _ => None,
            }
        }
        let (dest, a, b) = match self {
            Instruction::Read(r) => (Some(*r), None, None),
            Instruction::Write(v)
            | Instruction::Push(v, _)
            | Instruction::Jez(v, _)
            | Instruction::Jnz(v, _)
            | Instruction::Jlz(v, _)
            | Instruction::Jgz(v, _) => (None, source(v), None),
            Instruction::Set(r, v)
            | Instruction::Add(r, v)
            | Instruction::Sub(r, v)
            | Instruction::Mul(r, v)
            | Instruction::Div(r, v) => (Some(*r), source(v), None),
            Instruction::Cmp(r, x, y) => (Some(*r), source(x), source(y)),
            Instruction::Pop(_, r) => (Some(*r), None, None),
            Instruction::Jmp(_) => (None, None, None),
        };
        dest.into_iter().chain(a).chain(b)
    }
}

/// A lowered program plus the source span of every instruction.
///
/// The halt index is `len()`: the program counter reaches it by falling off
/// the end or by jumping to a label declared after the last instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompiledProgram {
    instructions: Vec<Instruction>,
    spans: Vec<Span>,
}

impl CompiledProgram {
    /// Build a program from instructions and their spans.
    ///
    /// # Panics
    ///
    /// Panics if the two vectors differ in length.
    pub fn new(instructions: Vec<Instruction>, spans: Vec<Span>) -> Self {
        assert_eq!(
            instructions.len(),
            spans.len(),
            "every instruction needs exactly one span"
        );
        Self {
            instructions,
            spans,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    /// Source span of the instruction at `pc`.
    pub fn span(&self, pc: usize) -> Option<Span> {
        self.spans.get(pc).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Program counter value that means "halted".
    pub fn halt_index(&self) -> usize {
        self.instructions.len()
    }
}
