//! Per-statement semantic checks.
//!
//! Every check appends to an error list instead of returning early, so one
//! pass reports every violation in operand order.

use super::labels::LabelTable;
use tinker_ast::ast::{Reg, Stk};
use tinker_ast::{
    CompileError, ErrorKind, HardwareSpec, Instruction, OperandRef, RegisterRef, Span, Spanned,
    ValueSource,
};

/// Read-only inputs shared by every statement check.
pub struct ValidationContext<'a> {
    /// Hardware the program must fit
    pub hardware: &'a HardwareSpec,

    /// Labels declared anywhere in the program
    pub labels: &'a LabelTable,
}

impl<'a> ValidationContext<'a> {
    pub fn new(hardware: &'a HardwareSpec, labels: &'a LabelTable) -> Self {
        Self { hardware, labels }
    }
}

/// Check a label declaration against the first declaration of its name.
pub fn validate_label(
    label: &Spanned<String>,
    ctx: &ValidationContext,
    errors: &mut Vec<CompileError>,
) {
    if let Some(first) = ctx.labels.get(&label.node) {
        if first.span != label.span {
            errors.push(
                CompileError::new(
                    ErrorKind::DuplicateLabel,
                    label.span,
                    format!("duplicate label {}", label.node),
                )
                .with_label(first.span, "first declared here".to_string()),
            );
        }
    }
}

/// Check one instruction: its opcode, then each operand in source order.
pub fn validate_instruction(
    instr: &Spanned<Instruction>,
    ctx: &ValidationContext,
    errors: &mut Vec<CompileError>,
) {
    let opcode = instr.node.opcode();
    if !ctx.hardware.permits(opcode) {
        let span = Span {
            end: instr.span.start + opcode.name().len() as u32,
            ..instr.span
        };
        errors.push(CompileError::new(
            ErrorKind::OpcodeNotPermitted,
            span,
            format!("opcode {} is not permitted on this hardware", opcode),
        ));
    }

    for operand in instr.node.operands() {
        match operand {
            OperandRef::Destination(reg) => validate_destination(reg, ctx, errors),
            OperandRef::Value(val) => {
                if let ValueSource::Register(reg) = val.node {
                    validate_register(&Spanned::new(reg, val.span), ctx, errors);
                }
            }
            OperandRef::Stack(stack) => validate_stack(stack, ctx, errors),
            OperandRef::Label(label) => {
                if !ctx.labels.contains(&label.node) {
                    errors.push(CompileError::new(
                        ErrorKind::UndefinedLabel,
                        label.span,
                        format!("undefined label {}", label.node),
                    ));
                }
            }
        }
    }
}

/// A written register must exist and be writable.
fn validate_destination(reg: &Reg, ctx: &ValidationContext, errors: &mut Vec<CompileError>) {
    if !validate_register(reg, ctx, errors) {
        return;
    }
    if !reg.node.is_writable() {
        errors.push(CompileError::new(
            ErrorKind::ReadOnlyRegister,
            reg.span,
            format!("cannot write to read-only register {}", reg.node),
        ));
    }
}

/// Bounds check for a register reference. Returns whether it is in bounds.
fn validate_register(reg: &Reg, ctx: &ValidationContext, errors: &mut Vec<CompileError>) -> bool {
    let (index, count, what) = match reg.node {
        RegisterRef::InputLength => return true,
        RegisterRef::StackLength(n) => (n, ctx.hardware.num_stacks(), "stack"),
        RegisterRef::User(n) => (n, ctx.hardware.num_registers, "register"),
    };
    if index < count {
        return true;
    }
    errors.push(
        CompileError::new(
            ErrorKind::InvalidRegister,
            reg.span,
            format!("invalid reference to register {}", reg.node),
        )
        .with_note(format!("this hardware has {}", plural(count, what))),
    );
    false
}

fn validate_stack(stack: &Stk, ctx: &ValidationContext, errors: &mut Vec<CompileError>) {
    let count = ctx.hardware.num_stacks();
    if stack.node.0 < count {
        return;
    }
    errors.push(
        CompileError::new(
            ErrorKind::InvalidStack,
            stack.span,
            format!("invalid reference to stack {}", stack.node),
        )
        .with_note(format!("this hardware has {}", plural(count, "stack"))),
    );
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
