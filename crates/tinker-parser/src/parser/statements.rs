//! Statement parsers.
//!
//! One line holds at most one label declaration followed by at most one
//! instruction. Instructions are dispatched on their opcode and their
//! operands are checked against [`Opcode::signature`] as they are read.

use super::{ParseError, TokenStream};
use tinker_ast::ast::{LabelRef, Reg, Stk, Val};
use tinker_ast::{
    Instruction, Opcode, OperandKind, RegisterRef, Spanned, StackRef, Statement, ValueSource,
};
use tinker_lexer::{SpannedToken, Token};

/// Parse every line of a token stream.
///
/// A malformed line is reported and skipped; parsing continues with the
/// next line.
pub fn parse_statements(stream: &mut TokenStream) -> Result<Vec<Statement>, Vec<ParseError>> {
    let mut statements = Vec::new();
    let mut errors = Vec::new();

    while !stream.at_end() {
        if let Err(e) = parse_line(stream, &mut statements) {
            errors.push(e);
            stream.synchronize(); // Skip to next line
        }
    }

    if errors.is_empty() {
        Ok(statements)
    } else {
        Err(errors)
    }
}

/// Parse one line, pushing its label and instruction onto `statements`.
fn parse_line(stream: &mut TokenStream, statements: &mut Vec<Statement>) -> Result<(), ParseError> {
    if let (Some(Token::Ident(name)), Some(Token::Colon)) = (stream.peek(), stream.peek_nth(1)) {
        let span = stream.current_span();
        stream.advance();
        stream.advance();
        statements.push(Statement::Label(Spanned::new(name.clone(), span)));
    }

    match stream.peek() {
        None => Ok(()),
        Some(Token::Newline) => {
            stream.advance();
            Ok(())
        }
        Some(Token::Opcode(_)) => {
            let instruction = parse_instruction(stream)?;
            statements.push(Statement::Instruction(instruction));
            if stream.peek() == Some(&Token::Newline) {
                stream.advance();
            }
            Ok(())
        }
        Some(Token::Ident(name)) => Err(ParseError::unknown_opcode(name, stream.current_span())),
        other => Err(ParseError::unexpected_token(
            other,
            "at start of statement",
            stream.current_span(),
        )),
    }
}

/// Parse an opcode and exactly the operands its signature lists.
fn parse_instruction(stream: &mut TokenStream) -> Result<Spanned<Instruction>, ParseError> {
    let start = stream.current_pos();
    let opcode = match stream.advance() {
        Some(SpannedToken {
            token: Token::Opcode(op),
            ..
        }) => *op,
        _ => {
            return Err(ParseError::unexpected_token(
                stream.peek(),
                "where an opcode was expected",
                stream.current_span(),
            ))
        }
    };

    let mut ops = Operands {
        stream: &mut *stream,
        opcode,
        parsed: 0,
    };
    let instruction = match opcode {
        Opcode::Read => Instruction::Read(ops.register()?),
        Opcode::Write => Instruction::Write(ops.value()?),
        Opcode::Set => Instruction::Set(ops.register()?, ops.value()?),
        Opcode::Add => Instruction::Add(ops.register()?, ops.value()?),
        Opcode::Sub => Instruction::Sub(ops.register()?, ops.value()?),
        Opcode::Mul => Instruction::Mul(ops.register()?, ops.value()?),
        Opcode::Div => Instruction::Div(ops.register()?, ops.value()?),
        Opcode::Cmp => Instruction::Cmp(ops.register()?, ops.value()?, ops.value()?),
        Opcode::Push => Instruction::Push(ops.value()?, ops.stack()?),
        Opcode::Pop => Instruction::Pop(ops.stack()?, ops.register()?),
        Opcode::Jmp => Instruction::Jmp(ops.label()?),
        Opcode::Jez => Instruction::Jez(ops.value()?, ops.label()?),
        Opcode::Jnz => Instruction::Jnz(ops.value()?, ops.label()?),
        Opcode::Jlz => Instruction::Jlz(ops.value()?, ops.label()?),
        Opcode::Jgz => Instruction::Jgz(ops.value()?, ops.label()?),
    };

    if !stream.at_line_end() {
        let extra = (0..)
            .take_while(|&n| !matches!(stream.peek_nth(n), None | Some(Token::Newline)))
            .count();
        return Err(ParseError::operand_count(
            opcode,
            opcode.signature().len() + extra,
            stream.current_span(),
        ));
    }

    Ok(Spanned::new(instruction, stream.span_from(start)))
}

/// Reads the operands of one instruction, tracking how many were consumed.
struct Operands<'a, 'src> {
    stream: &'a mut TokenStream<'src>,
    opcode: Opcode,
    parsed: usize,
}

impl<'src> Operands<'_, 'src> {
    /// Consume the next operand token, or report a missing operand.
    fn next(&mut self) -> Result<(usize, &'src SpannedToken), ParseError> {
        if self.stream.at_line_end() {
            return Err(self.missing());
        }
        let Some(token) = self.stream.advance() else {
            return Err(self.missing());
        };
        let index = self.parsed;
        self.parsed += 1;
        Ok((index, token))
    }

    fn missing(&self) -> ParseError {
        ParseError::operand_count(self.opcode, self.parsed, self.stream.current_span())
    }

    fn mismatch(&self, index: usize, expected: OperandKind, token: &SpannedToken) -> ParseError {
        ParseError::wrong_operand(self.opcode, index, expected, &token.token, token.span)
    }

    fn register(&mut self) -> Result<Reg, ParseError> {
        let (index, token) = self.next()?;
        register_ref(&token.token)
            .map(|reg| Spanned::new(reg, token.span))
            .ok_or_else(|| self.mismatch(index, OperandKind::Register, token))
    }

    fn value(&mut self) -> Result<Val, ParseError> {
        let (index, token) = self.next()?;
        let source = match &token.token {
            Token::Integer(value) => Some(ValueSource::Literal(*value)),
            other => register_ref(other).map(ValueSource::Register),
        };
        source
            .map(|source| Spanned::new(source, token.span))
            .ok_or_else(|| self.mismatch(index, OperandKind::Value, token))
    }

    fn stack(&mut self) -> Result<Stk, ParseError> {
        let (index, token) = self.next()?;
        match token.token {
            Token::Stack(n) => Ok(Spanned::new(StackRef(n), token.span)),
            _ => Err(self.mismatch(index, OperandKind::Stack, token)),
        }
    }

    fn label(&mut self) -> Result<LabelRef, ParseError> {
        let (index, token) = self.next()?;
        match &token.token {
            Token::Ident(name) => Ok(Spanned::new(name.clone(), token.span)),
            _ => Err(self.mismatch(index, OperandKind::Label, token)),
        }
    }
}

fn register_ref(token: &Token) -> Option<RegisterRef> {
    match token {
        Token::InputLength => Some(RegisterRef::InputLength),
        Token::StackLength(n) => Some(RegisterRef::StackLength(*n)),
        Token::UserRegister(n) => Some(RegisterRef::User(*n)),
        _ => None,
    }
}
