//! Hand-written recursive descent parser for the Tinker instruction language
//!
//! Programs are line oriented, so the parser recovers from a bad statement by
//! skipping to the next newline and reports every malformed line at once.

pub mod parser;

pub use parser::{parse, parse_source, ParseError, ParseErrorKind};

// Re-export lexer
pub use tinker_lexer::{SpannedToken, Token};
