//! Validation entry point.

use super::labels::LabelTable;
use super::validation::{validate_instruction, validate_label, ValidationContext};
use tinker_ast::{
    CompileError, ErrorKind, HardwareSpec, Instruction, Program, Span, Spanned, SpecError,
    Statement,
};

/// A program that passed validation.
///
/// Only [`validate`] constructs one, so holding a `ValidatedProgram` means
/// every register, stack and label reference is in bounds and every opcode
/// is permitted on the hardware it was validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProgram {
    instructions: Vec<Spanned<Instruction>>,
    labels: LabelTable,
}

impl ValidatedProgram {
    /// Instructions of every unit, concatenated in unit order.
    pub fn instructions(&self) -> &[Spanned<Instruction>] {
        &self.instructions
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Number of instructions, which is also the halt index.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Validate parsed source units against `hardware`.
///
/// Units share one label namespace and are numbered in the order given.
///
/// # Errors
///
/// Returns every violation found, ordered by unit, then statement, then
/// operand.
pub fn validate(
    programs: &[Program],
    hardware: &HardwareSpec,
) -> Result<ValidatedProgram, Vec<CompileError>> {
    let labels = LabelTable::collect(programs);
    let ctx = ValidationContext::new(hardware, &labels);
    let mut errors = Vec::new();
    let mut instructions = Vec::new();

    for program in programs {
        for stmt in &program.statements {
            match stmt {
                Statement::Label(label) => validate_label(label, &ctx, &mut errors),
                Statement::Instruction(instr) => {
                    validate_instruction(instr, &ctx, &mut errors);
                    instructions.push(instr.clone());
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(ValidatedProgram {
            instructions,
            labels,
        })
    } else {
        Err(errors)
    }
}

/// Diagnostic for a hardware spec that violates the machine limits.
///
/// Hardware specs have no source location, so the span is empty.
pub fn hardware_error(error: SpecError) -> CompileError {
    CompileError::new(ErrorKind::InvalidHardware, Span::zero(0), error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinker_ast::{Opcode, SourceMap};

    fn parse_units(units: &[&str]) -> Vec<Program> {
        let mut sources = SourceMap::new();
        units
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let file_id = sources.add_file(format!("unit{}.tnk", i), source.to_string());
                tinker_parser::parse_source(&sources, file_id).unwrap()
            })
            .collect()
    }

    fn validate_str(
        source: &str,
        hardware: &HardwareSpec,
    ) -> Result<ValidatedProgram, Vec<CompileError>> {
        validate(&parse_units(&[source]), hardware)
    }

    fn messages(errors: &[CompileError]) -> Vec<&str> {
        errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_valid_program() {
        let hw = HardwareSpec::new(2, &[4]);
        let program = validate_str(
            "LOOP: JEZ RLI END\nREAD RX0\nPUSH RX0 S0\nPOP S0 RX1\nWRITE RS0\nJMP LOOP\nEND:",
            &hw,
        )
        .unwrap();
        assert_eq!(program.len(), 6);
        assert_eq!(program.labels().target("END"), Some(6));
    }

    #[test]
    fn test_empty_program_is_valid() {
        let program = validate_str("", &HardwareSpec::default()).unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn test_register_out_of_range() {
        let errors = validate_str("SET RX5 1", &HardwareSpec::new(2, &[])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::InvalidRegister);
        assert_eq!(errors[0].message, "invalid reference to register RX5");
        assert_eq!(errors[0].notes, vec!["this hardware has 2 registers"]);
        assert_eq!((errors[0].span.line, errors[0].span.column), (1, 5));
    }

    #[test]
    fn test_stack_references() {
        let errors = validate_str("PUSH 1 S1\nWRITE RS1", &HardwareSpec::new(1, &[4])).unwrap_err();
        assert_eq!(
            messages(&errors),
            vec![
                "invalid reference to stack S1",
                "invalid reference to register RS1"
            ]
        );
        assert_eq!(errors[0].kind, ErrorKind::InvalidStack);
        assert_eq!(errors[1].kind, ErrorKind::InvalidRegister);
    }

    #[test]
    fn test_read_only_destinations() {
        let errors = validate_str("READ RLI\nPOP S0 RS0", &HardwareSpec::new(1, &[4])).unwrap_err();
        assert_eq!(
            messages(&errors),
            vec![
                "cannot write to read-only register RLI",
                "cannot write to read-only register RS0"
            ]
        );
        assert!(errors.iter().all(|e| e.kind == ErrorKind::ReadOnlyRegister));
    }

    #[test]
    fn test_opcode_not_permitted() {
        let hw = HardwareSpec::new(1, &[]).with_opcodes([Opcode::Read, Opcode::Write]);
        let errors = validate_str("READ RX0\n  MUL RX0 2\nWRITE RX0", &hw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::OpcodeNotPermitted);
        assert_eq!(errors[0].message, "opcode MUL is not permitted on this hardware");
        assert_eq!((errors[0].span.column, errors[0].span.len()), (3, 3));
    }

    #[test]
    fn test_duplicate_label_points_at_first() {
        let errors = validate_str("LOOP:\nREAD RX0\nLOOP:\nJMP LOOP", &HardwareSpec::default())
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::DuplicateLabel);
        assert_eq!(errors[0].message, "duplicate label LOOP");
        assert_eq!(errors[0].span.line, 3);
        assert_eq!(errors[0].labels[0].span.line, 1);
    }

    #[test]
    fn test_undefined_label() {
        let errors = validate_str("JEZ RX0 END", &HardwareSpec::default()).unwrap_err();
        assert_eq!(errors[0].kind, ErrorKind::UndefinedLabel);
        assert_eq!(errors[0].message, "undefined label END");
        assert_eq!(errors[0].span.column, 9);
    }

    #[test]
    fn test_every_error_reported_in_order() {
        let hw = HardwareSpec::new(2, &[]);
        let source = "SET RX2 RX3\nADD RX4 1\nWRITE RX9\nJMP NOWHERE\nCMP RX0 RX7 RX8";
        let errors = validate_str(source, &hw).unwrap_err();
        assert_eq!(
            messages(&errors),
            vec![
                "invalid reference to register RX2",
                "invalid reference to register RX3",
                "invalid reference to register RX4",
                "invalid reference to register RX9",
                "undefined label NOWHERE",
                "invalid reference to register RX7",
                "invalid reference to register RX8",
            ]
        );
    }

    #[test]
    fn test_labels_shared_across_units() {
        let programs = parse_units(&["JMP DONE", "WRITE 1\nDONE:"]);
        let program = validate(&programs, &HardwareSpec::default()).unwrap();
        assert_eq!(program.labels().target("DONE"), Some(2));

        let programs = parse_units(&["L: WRITE 1", "L: WRITE 2"]);
        let errors = validate(&programs, &HardwareSpec::default()).unwrap_err();
        assert_eq!(errors[0].span.file_id, 1);
        assert_eq!(errors[0].labels[0].span.file_id, 0);
    }

    #[test]
    fn test_hardware_error() {
        let error = hardware_error(HardwareSpec::new(0, &[]).validate().unwrap_err());
        assert_eq!(error.kind, ErrorKind::InvalidHardware);
        assert_eq!(
            error.message,
            "hardware must have between 1 and 16 registers, got 0"
        );
    }
}
