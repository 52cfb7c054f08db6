//! Error handling tests for the Tinker parser.
//!
//! This test suite verifies that the parser reports:
//! - Unknown opcodes with their position
//! - Missing and extra operands
//! - Operands of the wrong kind
//! - One error per malformed line, continuing after each

use logos::Logos;
use tinker_ast::{ErrorKind, SourceMap, Span};
use tinker_parser::{parse, parse_source, ParseError, ParseErrorKind, SpannedToken, Token};

/// Helper to verify that parsing fails with at least one error.
fn expect_error(source: &str) -> Vec<ParseError> {
    let mut sources = SourceMap::new();
    let file_id = sources.add_file("test.tnk", source.to_string());
    let tokens = tinker_lexer::tokenize(&sources, file_id).expect("Lexing should succeed");
    match parse(&tokens, file_id) {
        Ok(_) => panic!("Expected parse error, but parsing succeeded"),
        Err(errors) => {
            assert!(!errors.is_empty(), "Expected at least one error");
            errors
        }
    }
}

// =============================================================================
// Unknown Opcodes
// =============================================================================

#[test]
fn test_unknown_opcode() {
    let errors = expect_error("READ RX0\n  FOO RX0 1\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::UnknownOpcode);
    assert_eq!(errors[0].message, "unknown opcode `FOO`");
    assert_eq!((errors[0].span.line, errors[0].span.column), (2, 3));
}

#[test]
fn test_lowercase_opcode_is_unknown() {
    let errors = expect_error("read RX0");
    assert_eq!(errors[0].message, "unknown opcode `read`");
}

// =============================================================================
// Operand Counts
// =============================================================================

#[test]
fn test_missing_operand() {
    let errors = expect_error("ADD RX0\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::OperandCount);
    assert_eq!(errors[0].message, "ADD expects 2 operands, found 1");
    assert_eq!(errors[0].span.column, 8);
}

#[test]
fn test_missing_operand_at_end_of_input() {
    let errors = expect_error("READ");
    assert_eq!(errors[0].message, "READ expects 1 operand, found 0");
}

#[test]
fn test_extra_operands() {
    let errors = expect_error("WRITE RX0 RX1 2");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::OperandCount);
    assert_eq!(errors[0].message, "WRITE expects 1 operand, found 3");
    assert_eq!(errors[0].span.column, 11);
}

// =============================================================================
// Operand Kinds
// =============================================================================

#[test]
fn test_literal_as_destination() {
    let errors = expect_error("SET 4 RX0");
    assert_eq!(
        errors[0].message,
        "expected register for operand 1 of SET, found `4`"
    );
}

#[test]
fn test_register_as_stack() {
    let errors = expect_error("PUSH 1 RX0");
    assert_eq!(
        errors[0].message,
        "expected stack for operand 2 of PUSH, found `RX0`"
    );
}

#[test]
fn test_literal_as_label() {
    let errors = expect_error("JMP 3");
    assert_eq!(errors[0].message, "expected label for operand 1 of JMP, found `3`");
}

#[test]
fn test_label_as_value() {
    let errors = expect_error("WRITE LOOP");
    assert_eq!(
        errors[0].message,
        "expected register or integer for operand 1 of WRITE, found `LOOP`"
    );
}

// =============================================================================
// Statement Starts
// =============================================================================

#[test]
fn test_line_starting_with_literal() {
    let errors = expect_error("42");
    assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(errors[0].message, "unexpected `42` at start of statement");
}

#[test]
fn test_stray_colon() {
    let errors = expect_error(": READ RX0");
    assert_eq!(errors[0].message, "unexpected `:` at start of statement");
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn test_every_bad_line_is_reported() {
    let errors = expect_error("FOO\nREAD RX0\nADD RX0\nWRITE\nBAR 1 2\n");
    assert_eq!(errors.len(), 4);
    let lines: Vec<u32> = errors.iter().map(|e| e.span.line).collect();
    assert_eq!(lines, vec![1, 3, 4, 5]);
}

#[test]
fn test_missing_operand_does_not_swallow_next_line() {
    let errors = expect_error("READ\nFOO");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[1].message, "unknown opcode `FOO`");
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn test_parse_source_reports_lex_errors_only() {
    let mut sources = SourceMap::new();
    let file_id = sources.add_file("test.tnk", "READ RX0 @\nFOO".to_string());
    let errors = parse_source(&sources, file_id).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Syntax);
}

#[test]
fn test_parse_source_converts_parse_errors() {
    let mut sources = SourceMap::new();
    let file_id = sources.add_file("test.tnk", "FOO".to_string());
    let errors = parse_source(&sources, file_id).unwrap_err();
    assert_eq!(errors[0].kind, ErrorKind::Parse);
    assert_eq!(errors[0].message, "unknown opcode `FOO`");
}

#[test]
fn test_tokens_without_source_map() {
    // Hand-built token streams parse as long as each token carries a span.
    let tokens: Vec<SpannedToken> = Token::lexer("WRITE 7")
        .spanned()
        .map(|(token, range)| SpannedToken {
            token: token.unwrap(),
            span: Span::new(0, range.start as u32, range.end as u32, 1, range.start as u32 + 1),
        })
        .collect();
    let program = parse(&tokens, 0).unwrap();
    assert_eq!(program.instructions().count(), 1);
}
