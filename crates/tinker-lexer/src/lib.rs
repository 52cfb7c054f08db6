// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for the Tinker instruction language.
//!
//! Tokenization is done with logos. Whitespace and `;` comments are skipped;
//! newlines are tokens because they terminate statements.
//!
//! # Examples
//!
//! ```
//! # use tinker_lexer::*;
//! # use logos::Logos;
//! let tokens: Vec<Result<Token, ()>> = Token::lexer("ADD RX0 -3").collect();
//! assert_eq!(tokens.len(), 3);
//! ```

use logos::Logos;
use std::fmt;
use tinker_ast::{CompileError, ErrorKind, LangValue, Opcode, SourceMap, Span};

/// Tinker token.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace
#[logos(skip r";[^\n]*")] // Skip ; comments
pub enum Token {
    /// Opcode keyword (`READ`, `PUSH`, `JGZ`, ...)
    #[token("READ", |_| Opcode::Read)]
    #[token("WRITE", |_| Opcode::Write)]
    #[token("SET", |_| Opcode::Set)]
    #[token("ADD", |_| Opcode::Add)]
    #[token("SUB", |_| Opcode::Sub)]
    #[token("MUL", |_| Opcode::Mul)]
    #[token("DIV", |_| Opcode::Div)]
    #[token("CMP", |_| Opcode::Cmp)]
    #[token("PUSH", |_| Opcode::Push)]
    #[token("POP", |_| Opcode::Pop)]
    #[token("JMP", |_| Opcode::Jmp)]
    #[token("JEZ", |_| Opcode::Jez)]
    #[token("JNZ", |_| Opcode::Jnz)]
    #[token("JLZ", |_| Opcode::Jlz)]
    #[token("JGZ", |_| Opcode::Jgz)]
    Opcode(Opcode),

    /// Register `RLI`
    #[token("RLI")]
    InputLength,

    /// Register `RS<n>`
    #[regex(r"RS[0-9]+", |lex| lex.slice()[2..].parse::<usize>().ok())]
    StackLength(usize),

    /// Register `RX<n>`
    #[regex(r"RX[0-9]+", |lex| lex.slice()[2..].parse::<usize>().ok())]
    UserRegister(usize),

    /// Stack `S<n>`
    #[regex(r"S[0-9]+", |lex| lex.slice()[1..].parse::<usize>().ok())]
    Stack(usize),

    /// Integer literal (e.g., 42, -7)
    ///
    /// Literals that do not fit `LangValue` fail the callback and surface
    /// as lexing errors.
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<LangValue>().ok())]
    Integer(LangValue),

    /// Identifier: a label name, or an unknown word in opcode position
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// `:` after a label declaration
    #[token(":")]
    Colon,

    /// End of a line
    #[token("\n")]
    Newline,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Opcode(op) => write!(f, "{}", op),
            Token::InputLength => write!(f, "RLI"),
            Token::StackLength(n) => write!(f, "RS{}", n),
            Token::UserRegister(n) => write!(f, "RX{}", n),
            Token::Stack(n) => write!(f, "S{}", n),
            Token::Integer(v) => write!(f, "{}", v),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Colon => write!(f, ":"),
            Token::Newline => write!(f, "end of line"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenize one source unit of `sources`.
///
/// Lexing never stops at the first bad character: every invalid token in the
/// unit is reported.
///
/// # Errors
///
/// Returns one [`ErrorKind::Syntax`] error per invalid token.
pub fn tokenize(sources: &SourceMap, file_id: u16) -> Result<Vec<SpannedToken>, Vec<CompileError>> {
    let Some(file) = sources.get(file_id) else {
        return Err(vec![CompileError::new(
            ErrorKind::Internal,
            Span::zero(file_id),
            format!("unknown source file id {}", file_id),
        )]);
    };

    let mut lexer = Token::lexer(&file.source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = sources.span(file_id, range.start as u32, range.end as u32);
        match result {
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => errors.push(CompileError::new(
                ErrorKind::Syntax,
                span,
                describe_invalid(lexer.slice()),
            )),
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Message for a slice logos could not turn into a token.
fn describe_invalid(slice: &str) -> String {
    let digits = slice.strip_prefix('-').unwrap_or(slice);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        format!("integer literal `{}` is out of range", slice)
    } else if slice.chars().count() == 1 {
        format!("unexpected character `{}`", slice.escape_debug())
    } else {
        format!("invalid token `{}`", slice)
    }
}
