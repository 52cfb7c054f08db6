//! Lowering from validated syntax to executable IR.
//!
//! Lowering is total: validation already guaranteed that every label exists
//! and every destination is a user register, so a violation here is a bug.

use crate::program::{CompiledProgram, Instruction, RegisterId, Target};
use tinker_ast::ast::{LabelRef, Reg};
use tinker_ast::{Instruction as Syntax, RegisterRef};
use tinker_resolve::{LabelTable, ValidatedProgram};

/// Lower a validated program.
///
/// Labels disappear: each jump carries the index of the instruction that
/// followed its label, or the halt index for a trailing label.
pub fn lower(program: &ValidatedProgram) -> CompiledProgram {
    let labels = program.labels();
    let mut instructions = Vec::with_capacity(program.len());
    let mut spans = Vec::with_capacity(program.len());

    for instr in program.instructions() {
        instructions.push(lower_instruction(&instr.node, labels));
        spans.push(instr.span);
    }

    CompiledProgram::new(instructions, spans)
}

fn lower_instruction(instr: &Syntax, labels: &LabelTable) -> Instruction {
    let target = |label: &LabelRef| -> Target {
        labels
            .target(&label.node)
            .unwrap_or_else(|| panic!("BUG: label `{}` missing after validation", label.node))
    };

    match instr {
        Syntax::Read(r) => Instruction::Read(destination(r)),
        Syntax::Write(v) => Instruction::Write(v.node),
        Syntax::Set(r, v) => Instruction::Set(destination(r), v.node),
        Syntax::Add(r, v) => Instruction::Add(destination(r), v.node),
        Syntax::Sub(r, v) => Instruction::Sub(destination(r), v.node),
        Syntax::Mul(r, v) => Instruction::Mul(destination(r), v.node),
        Syntax::Div(r, v) => Instruction::Div(destination(r), v.node),
        Syntax::Cmp(r, a, b) => Instruction::Cmp(destination(r), a.node, b.node),
        Syntax::Push(v, s) => Instruction::Push(v.node, s.node.0),
        Syntax::Pop(s, r) => Instruction::Pop(s.node.0, destination(r)),
        Syntax::Jmp(l) => Instruction::Jmp(target(l)),
        Syntax::Jez(v, l) => Instruction::Jez(v.node, target(l)),
        Syntax::Jnz(v, l) => Instruction::Jnz(v.node, target(l)),
        Syntax::Jlz(v, l) => Instruction::Jlz(v.node, target(l)),
        Syntax::Jgz(v, l) => Instruction::Jgz(v.node, target(l)),
    }
}

fn destination(reg: &Reg) -> RegisterId {
    match reg.node {
        RegisterRef::User(n) => n,
        other => panic!("BUG: read-only register {} used as destination after validation", other),
    }
}
