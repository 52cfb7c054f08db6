//! Opcode names and operand signatures.
//!
//! The operand signature of every opcode lives in [`Opcode::signature`]; the
//! parser checks statements against it exactly once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named operation in the instruction language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opcode {
    /// `READ r`: move the next input value into a register
    Read,
    /// `WRITE v`: append a value to the output
    Write,
    /// `SET r v`
    Set,
    /// `ADD r v`
    Add,
    /// `SUB r v`
    Sub,
    /// `MUL r v`
    Mul,
    /// `DIV r v`: truncating division
    Div,
    /// `CMP r a b`: three-way comparison of `a` and `b` into `r`
    Cmp,
    /// `PUSH v s`
    Push,
    /// `POP s r`
    Pop,
    /// `JMP L`
    Jmp,
    /// `JEZ v L`: jump if zero
    Jez,
    /// `JNZ v L`: jump if not zero
    Jnz,
    /// `JLZ v L`: jump if less than zero
    Jlz,
    /// `JGZ v L`: jump if greater than zero
    Jgz,
}

/// The kind of operand an opcode expects in a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// A register reference (`RX0`, `RLI`, `RS0`)
    Register,
    /// A register reference or an integer literal
    Value,
    /// A stack reference (`S0`)
    Stack,
    /// A label name
    Label,
}

impl Opcode {
    /// Every opcode, in declaration order.
    pub const ALL: [Opcode; 15] = [
        Opcode::Read,
        Opcode::Write,
        Opcode::Set,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Cmp,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Jmp,
        Opcode::Jez,
        Opcode::Jnz,
        Opcode::Jlz,
        Opcode::Jgz,
    ];

    /// Source keyword for this opcode.
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Set => "SET",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Cmp => "CMP",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Jmp => "JMP",
            Opcode::Jez => "JEZ",
            Opcode::Jnz => "JNZ",
            Opcode::Jlz => "JLZ",
            Opcode::Jgz => "JGZ",
        }
    }

    /// Operand kinds this opcode takes, in source order.
    pub const fn signature(self) -> &'static [OperandKind] {
        use OperandKind::*;
        match self {
            Opcode::Read => &[Register],
            Opcode::Write => &[Value],
            Opcode::Set | Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                &[Register, Value]
            }
            Opcode::Cmp => &[Register, Value, Value],
            Opcode::Push => &[Value, Stack],
            Opcode::Pop => &[Stack, Register],
            Opcode::Jmp => &[Label],
            Opcode::Jez | Opcode::Jnz | Opcode::Jlz | Opcode::Jgz => &[Value, Label],
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperandKind::Register => "register",
            OperandKind::Value => "register or integer",
            OperandKind::Stack => "stack",
            OperandKind::Label => "label",
        })
    }
}
