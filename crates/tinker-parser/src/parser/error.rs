//! Parse error types.

use std::fmt;
use tinker_ast::{CompileError, ErrorKind, Opcode, OperandKind, Span};
use tinker_lexer::Token;

/// Parse error with source location and context.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Source location where error occurred
    pub span: Span,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that cannot start or continue the current statement.
    ///
    /// Example: an integer at the start of a line, or a stack where a
    /// register operand belongs.
    UnexpectedToken,

    /// Input ended inside a construct that needs more tokens.
    UnexpectedEof,

    /// An identifier in opcode position that names no opcode.
    UnknownOpcode,

    /// An instruction with fewer or more operands than its opcode takes.
    OperandCount,
}

impl ParseError {
    /// Create an "unexpected token" error.
    pub fn unexpected_token(found: Option<&Token>, context: &str, span: Span) -> Self {
        let (kind, message) = match found {
            Some(token) => (
                ParseErrorKind::UnexpectedToken,
                format!("unexpected `{}` {}", token, context),
            ),
            None => (
                ParseErrorKind::UnexpectedEof,
                format!("unexpected end of input {}", context),
            ),
        };
        Self {
            kind,
            span,
            message,
        }
    }

    /// Create an "unknown opcode" error.
    pub fn unknown_opcode(name: &str, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::UnknownOpcode,
            span,
            message: format!("unknown opcode `{}`", name),
        }
    }

    /// An operand of the wrong kind at position `index` (zero based).
    pub fn wrong_operand(
        opcode: Opcode,
        index: usize,
        expected: OperandKind,
        found: &Token,
        span: Span,
    ) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken,
            span,
            message: format!(
                "expected {} for operand {} of {}, found `{}`",
                expected,
                index + 1,
                opcode,
                found
            ),
        }
    }

    /// An instruction with `found` operands where its opcode takes a different number.
    pub fn operand_count(opcode: Opcode, found: usize, span: Span) -> Self {
        let expected = opcode.signature().len();
        Self {
            kind: ParseErrorKind::OperandCount,
            span,
            message: format!(
                "{} expects {} operand{}, found {}",
                opcode,
                expected,
                if expected == 1 { "" } else { "s" },
                found
            ),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for CompileError {
    fn from(error: ParseError) -> Self {
        CompileError::new(ErrorKind::Parse, error.span, error.message)
    }
}
