//! Hand-written recursive descent parser for Tinker source units.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead
//! - `error`: ParseError and its conversion into compile diagnostics
//! - `statements`: line, label and instruction parsers
//!
//! ## Public API
//!
//! ```rust,ignore
//! pub fn parse(tokens: &[SpannedToken], file_id: u16) -> Result<Program, Vec<ParseError>>
//! pub fn parse_source(sources: &SourceMap, file_id: u16) -> Result<Program, Vec<CompileError>>
//! ```

mod error;
mod statements;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

use tinker_ast::{CompileError, Program, SourceMap};
use tinker_lexer::SpannedToken;

/// Parse the tokens of one source unit.
///
/// # Errors
///
/// Returns one error per malformed line, in line order.
pub fn parse(tokens: &[SpannedToken], file_id: u16) -> Result<Program, Vec<ParseError>> {
    let mut stream = TokenStream::new(tokens, file_id);
    let statements = statements::parse_statements(&mut stream)?;
    Ok(Program {
        file_id: stream.file_id(),
        statements,
    })
}

/// Lex and parse one source unit of `sources`.
///
/// Parsing is skipped when lexing fails, so a bad character does not also
/// show up as a cascade of parse errors.
///
/// # Errors
///
/// Returns every lexing error, or else every parse error, as diagnostics.
pub fn parse_source(sources: &SourceMap, file_id: u16) -> Result<Program, Vec<CompileError>> {
    let tokens = tinker_lexer::tokenize(sources, file_id)?;
    parse(&tokens, file_id).map_err(|errors| errors.into_iter().map(CompileError::from).collect())
}
