//! Syntax tree produced by the parser.
//!
//! A source unit is a flat list of [`Statement`]s: label declarations and
//! instruction applications. Instructions are a closed enum with one variant
//! per [`Opcode`], so operand kinds are already checked once parsing
//! succeeds; bounds and label resolution are left to validation.

use crate::foundation::{LangValue, Span};
use crate::opcode::Opcode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node paired with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A reference to one of the machine's registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterRef {
    /// `RLI`: number of input values not yet read (read-only)
    InputLength,
    /// `RS<n>`: current length of stack n (read-only)
    StackLength(usize),
    /// `RX<n>`: general purpose register
    User(usize),
}

impl RegisterRef {
    /// Only user registers can be written.
    pub fn is_writable(self) -> bool {
        matches!(self, RegisterRef::User(_))
    }
}

impl fmt::Display for RegisterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterRef::InputLength => write!(f, "RLI"),
            RegisterRef::StackLength(n) => write!(f, "RS{}", n),
            RegisterRef::User(n) => write!(f, "RX{}", n),
        }
    }
}

/// A reference to one of the machine's stacks (`S<n>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackRef(pub usize);

impl fmt::Display for StackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Operand that produces a value: a literal or the contents of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueSource {
    Literal(LangValue),
    Register(RegisterRef),
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Literal(value) => write!(f, "{}", value),
            ValueSource::Register(reg) => write!(f, "{}", reg),
        }
    }
}

/// A register operand (destination or source).
pub type Reg = Spanned<RegisterRef>;
/// A value operand.
pub type Val = Spanned<ValueSource>;
/// A stack operand.
pub type Stk = Spanned<StackRef>;
/// A label operand.
pub type LabelRef = Spanned<String>;

/// One instruction application, with operands in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Read(Reg),
    Write(Val),
    Set(Reg, Val),
    Add(Reg, Val),
    Sub(Reg, Val),
    Mul(Reg, Val),
    Div(Reg, Val),
    Cmp(Reg, Val, Val),
    Push(Val, Stk),
    Pop(Stk, Reg),
    Jmp(LabelRef),
    Jez(Val, LabelRef),
    Jnz(Val, LabelRef),
    Jlz(Val, LabelRef),
    Jgz(Val, LabelRef),
}

/// Borrowed view of one operand, tagged with how the instruction uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandRef<'a> {
    /// Register the instruction writes to
    Destination(&'a Reg),
    /// Literal or register the instruction reads
    Value(&'a Val),
    Stack(&'a Stk),
    Label(&'a LabelRef),
}

impl Instruction {
    /// The opcode this instruction applies.
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

    /// Operands in source order.
    pub fn operands(&self) -> Vec<OperandRef<'_>> {
        use OperandRef::*;
        match self {
            Instruction::Read(r) => vec![Destination(r)],
            Instruction::Write(v) => vec![Value(v)],
            Instruction::Set(r, v)
            | Instruction::Add(r, v)
            | Instruction::Sub(r, v)
            | Instruction::Mul(r, v)
            | Instruction::Div(r, v) => vec![Destination(r), Value(v)],
            Instruction::Cmp(r, a, b) => vec![Destination(r), Value(a), Value(b)],
            Instruction::Push(v, s) => vec![Value(v), Stack(s)],
            Instruction::Pop(s, r) => vec![Stack(s), Destination(r)],
            Instruction::Jmp(l) => vec![Label(l)],
            Instruction::Jez(v, l)
            | Instruction::Jnz(v, l)
            | Instruction::Jlz(v, l)
            | Instruction::Jgz(v, l) => vec![Value(v), Label(l)],
        }
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// `NAME:`: marks the position of the next instruction
    Label(Spanned<String>),
    Instruction(Spanned<Instruction>),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Label(label) => label.span,
            Statement::Instruction(instr) => instr.span,
        }
    }
}

/// The parsed statements of one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Source map id of the unit these statements came from
    pub file_id: u16,
    pub statements: Vec<Statement>,
}

impl Program {
    /// Iterate over instructions, skipping label declarations.
    pub fn instructions(&self) -> impl Iterator<Item = &Spanned<Instruction>> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Instruction(instr) => Some(instr),
            Statement::Label(_) => None,
        })
    }
}
