//! Foundation types shared by every compiler stage.

pub mod span;

pub use span::{SourceFile, SourceMap, Span, MAX_SOURCE_FILES};

/// The value type of the machine: registers, stack slots, input and output
/// all hold `LangValue`s.
pub type LangValue = i32;
