//! Token stream wrapper for hand-written parser.

use tinker_ast::Span;
use tinker_lexer::{SpannedToken, Token};

/// Token stream with lookahead and position tracking.
///
/// Each token carries its resolved source span, so errors can point at the
/// exact line and column without going back to the source map.
pub struct TokenStream<'src> {
    tokens: &'src [SpannedToken],
    pos: usize,
    file_id: u16,
}

impl<'src> TokenStream<'src> {
    pub fn new(tokens: &'src [SpannedToken], file_id: u16) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&'src Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek at the nth token ahead without consuming.
    pub fn peek_nth(&self, n: usize) -> Option<&'src Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&'src SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Whether the current token ends a statement (newline or end of input).
    pub fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Newline))
    }

    /// Get the current position in the token stream.
    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Span from the token at `start` through the last consumed token.
    ///
    /// # Panics
    ///
    /// Panics if `start` is out of bounds or nothing has been consumed since.
    pub fn span_from(&self, start: usize) -> Span {
        assert!(
            start < self.pos && self.pos <= self.tokens.len(),
            "span_from: start position {} not before current position {}",
            start,
            self.pos
        );
        let first = &self.tokens[start].span;
        let last = &self.tokens[self.pos - 1].span;
        first.merge(last)
    }

    /// Span of the current token.
    ///
    /// At end of input this is an empty span just past the last token.
    pub fn current_span(&self) -> Span {
        if let Some(token) = self.tokens.get(self.pos) {
            return token.span;
        }
        match self.tokens.last() {
            Some(last) => Span::new(
                self.file_id,
                last.span.end,
                last.span.end,
                last.span.line,
                last.span.column + last.span.len(),
            ),
            None => Span::zero(self.file_id),
        }
    }

    /// Skip past the next newline for error recovery.
    pub fn synchronize(&mut self) {
        while let Some(token) = self.advance() {
            if token.token == Token::Newline {
                break;
            }
        }
    }

    pub fn file_id(&self) -> u16 {
        self.file_id
    }
}
