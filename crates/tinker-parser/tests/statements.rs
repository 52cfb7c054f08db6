//! Statement parsing tests.
//!
//! Covers label declarations, every operand kind, comments and blank lines,
//! and the spans attached to parsed nodes.

use tinker_ast::{Instruction, Program, RegisterRef, SourceMap, StackRef, Statement, ValueSource};
use tinker_parser::parse_source;

fn parse_ok(source: &str) -> Program {
    let mut sources = SourceMap::new();
    let file_id = sources.add_file("test.tnk", source.to_string());
    parse_source(&sources, file_id).expect("Parse should succeed")
}

fn only_instruction(source: &str) -> Instruction {
    let program = parse_ok(source);
    let mut instructions = program.instructions();
    let instr = instructions.next().expect("one instruction").node.clone();
    assert!(instructions.next().is_none());
    instr
}

#[test]
fn test_empty_program() {
    assert!(parse_ok("").statements.is_empty());
    assert!(parse_ok("\n\n  ; only a comment\n").statements.is_empty());
}

#[test]
fn test_read_write_loop() {
    let program = parse_ok(
        "LOOP:\n\
         JEZ RLI END\n\
         READ RX0\n\
         ADD RX0 RX0 ; double it\n\
         WRITE RX0\n\
         JMP LOOP\n\
         END:\n",
    );
    assert_eq!(program.statements.len(), 7);
    assert!(matches!(&program.statements[0], Statement::Label(l) if l.node == "LOOP"));
    assert!(matches!(&program.statements[6], Statement::Label(l) if l.node == "END"));
    assert_eq!(program.instructions().count(), 5);
}

#[test]
fn test_label_and_instruction_on_one_line() {
    let program = parse_ok("START: WRITE 1");
    assert_eq!(program.statements.len(), 2);
    assert!(matches!(&program.statements[0], Statement::Label(l) if l.node == "START"));
    assert!(matches!(
        &program.statements[1],
        Statement::Instruction(i) if matches!(i.node, Instruction::Write(_))
    ));
}

#[test]
fn test_value_operands() {
    match only_instruction("CMP RX1 -5 RS0") {
        Instruction::Cmp(r, a, b) => {
            assert_eq!(r.node, RegisterRef::User(1));
            assert_eq!(a.node, ValueSource::Literal(-5));
            assert_eq!(b.node, ValueSource::Register(RegisterRef::StackLength(0)));
        }
        other => panic!("Expected CMP, got {:?}", other),
    }
}

#[test]
fn test_stack_operands() {
    match only_instruction("PUSH RLI S2") {
        Instruction::Push(v, s) => {
            assert_eq!(v.node, ValueSource::Register(RegisterRef::InputLength));
            assert_eq!(s.node, StackRef(2));
        }
        other => panic!("Expected PUSH, got {:?}", other),
    }
    match only_instruction("POP S0 RX3") {
        Instruction::Pop(s, r) => {
            assert_eq!(s.node, StackRef(0));
            assert_eq!(r.node, RegisterRef::User(3));
        }
        other => panic!("Expected POP, got {:?}", other),
    }
}

#[test]
fn test_read_only_destination_parses() {
    // Writability is checked by validation, not by the parser.
    match only_instruction("SET RLI 3") {
        Instruction::Set(r, _) => assert_eq!(r.node, RegisterRef::InputLength),
        other => panic!("Expected SET, got {:?}", other),
    }
}

#[test]
fn test_every_opcode_parses() {
    let source = "READ RX0\nWRITE 1\nSET RX0 1\nADD RX0 1\nSUB RX0 1\nMUL RX0 1\nDIV RX0 1\n\
                  CMP RX0 1 2\nPUSH 1 S0\nPOP S0 RX0\nJMP L\nJEZ 0 L\nJNZ 0 L\nJLZ 0 L\nJGZ 0 L\nL:";
    let program = parse_ok(source);
    let opcodes: Vec<_> = program.instructions().map(|i| i.node.opcode()).collect();
    assert_eq!(opcodes, tinker_ast::Opcode::ALL.to_vec());
}

#[test]
fn test_instruction_span_covers_operands() {
    let program = parse_ok("\n  PUSH 12 S0 ; comment\n");
    let instr = program.instructions().next().unwrap();
    assert_eq!((instr.span.line, instr.span.column), (2, 3));
    assert_eq!((instr.span.start, instr.span.end), (3, 13));

    match &instr.node {
        Instruction::Push(v, s) => {
            assert_eq!(v.span.column, 8);
            assert_eq!(s.span.column, 11);
        }
        other => panic!("Expected PUSH, got {:?}", other),
    }
}

#[test]
fn test_file_id_is_recorded() {
    let mut sources = SourceMap::new();
    sources.add_file("a.tnk", "READ RX0".to_string());
    let second = sources.add_file("b.tnk", "WRITE RX0".to_string());
    let program = parse_source(&sources, second).unwrap();
    assert_eq!(program.file_id, second);
    assert_eq!(program.instructions().next().unwrap().span.file_id, second);
}
