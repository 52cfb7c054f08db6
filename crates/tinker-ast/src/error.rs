//! Compile-time error reporting and diagnostics.
//!
//! Every compiler stage reports problems as [`CompileError`] values; nothing
//! is thrown. Errors carry the stage that found them (through their
//! [`ErrorKind`]), a primary span and optional secondary labels and notes.
//!
//! # Examples
//!
//! ```
//! # use tinker_ast::error::*;
//! # use tinker_ast::foundation::Span;
//! let error = CompileError::new(
//!     ErrorKind::InvalidRegister,
//!     Span::new(0, 5, 8, 1, 6),
//!     "invalid reference to register RX5".to_string(),
//! );
//! assert_eq!(error.kind.stage(), Stage::Validation);
//! ```

use crate::foundation::{SourceMap, Span};
use std::fmt;

/// Compilation diagnostic with source location and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// Category of this error
    pub kind: ErrorKind,
    /// Primary source location
    pub span: Span,
    /// Primary error message
    pub message: String,
    /// Additional labeled spans
    pub labels: Vec<Label>,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

/// Category of compilation error.
///
/// # Invariant
///
/// The discriminant values must match the ERROR_KIND_NAMES array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    // Lexing
    /// Character or literal that is not part of any token
    Syntax = 0,

    // Parsing
    /// Statement does not match the grammar or an opcode's operand signature
    Parse = 1,

    // Validation
    /// Register index outside the hardware's bounds
    InvalidRegister = 2,
    /// Stack index outside the hardware's bounds
    InvalidStack = 3,
    /// Write to `RLI` or `RS<n>`
    ReadOnlyRegister = 4,
    /// Opcode not in the hardware's permitted set
    OpcodeNotPermitted = 5,
    /// Label declared more than once
    DuplicateLabel = 6,
    /// Jump to a label that is never declared
    UndefinedLabel = 7,
    /// Hardware spec violates the machine limits
    InvalidHardware = 8,

    /// Internal compiler error (bug in compiler)
    Internal = 9,
}

/// Human-readable names for error kinds.
///
/// Index matches ErrorKind discriminant.
const ERROR_KIND_NAMES: &[&str] = &[
    "syntax error",            // 0: Syntax
    "parse error",             // 1: Parse
    "invalid register",        // 2: InvalidRegister
    "invalid stack",           // 3: InvalidStack
    "read-only register",      // 4: ReadOnlyRegister
    "opcode not permitted",    // 5: OpcodeNotPermitted
    "duplicate label",         // 6: DuplicateLabel
    "undefined label",         // 7: UndefinedLabel
    "invalid hardware",        // 8: InvalidHardware
    "internal compiler error", // 9: Internal
];

/// Compiler stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Syntax,
    Parse,
    Validation,
}

/// Secondary labeled span in a diagnostic.
///
/// Used to point to related code locations (e.g., "first declared here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl CompileError {
    /// Creates a new error diagnostic without labels or notes.
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Adds a secondary labeled span.
    pub fn with_label(mut self, span: Span, message: String) -> Self {
        self.labels.push(Label { span, message });
        self
    }

    /// Adds a note or hint.
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl ErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn name(self) -> &'static str {
        ERROR_KIND_NAMES[self as usize]
    }

    /// The stage that reports this kind of error.
    pub fn stage(self) -> Stage {
        match self {
            ErrorKind::Syntax => Stage::Syntax,
            ErrorKind::Parse => Stage::Parse,
            ErrorKind::InvalidRegister
            | ErrorKind::InvalidStack
            | ErrorKind::ReadOnlyRegister
            | ErrorKind::OpcodeNotPermitted
            | ErrorKind::DuplicateLabel
            | ErrorKind::UndefinedLabel
            | ErrorKind::InvalidHardware
            | ErrorKind::Internal => Stage::Validation,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error: {}: {} at {}",
            self.kind.name(),
            self.message,
            self.span
        )
    }
}

impl std::error::Error for CompileError {}

/// Formats diagnostics with source code context.
///
/// Produces messages with:
/// - Unit name and line/column location
/// - Source code snippet
/// - Visual indicators (^^^) under error spans
/// - Secondary labels
/// - Notes and hints
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    /// Formats a diagnostic as a string with source context.
    pub fn format(&self, error: &CompileError) -> String {
        let mut output = format!("error: {}: {}\n", error.kind.name(), error.message);

        let Some(file) = self.sources.get(error.span.file_id) else {
            return output;
        };
        let (line, col) = (error.span.line, error.span.column);
        output.push_str(&format!("  --> {}:{}:{}\n", file.name, line, col));

        if let Some(source_line) = file.line_text(line) {
            output.push_str("   |\n");
            output.push_str(&format!("{:3} | {}\n", line, source_line));

            let start_col = col as usize;
            let span_len = error.span.end.saturating_sub(error.span.start) as usize;
            let end_col = (start_col + span_len).min(source_line.len() + 1);
            let underline = " ".repeat(start_col.saturating_sub(1))
                + &"^".repeat(end_col.saturating_sub(start_col).max(1));
            output.push_str(&format!("   | {}\n", underline));
        }

        for label in &error.labels {
            output.push_str(&format!("   = note: {}\n", label.message));
            if let Some(label_file) = self.sources.get(label.span.file_id) {
                output.push_str(&format!(
                    "     at {}:{}:{}\n",
                    label_file.name, label.span.line, label.span.column
                ));
            }
        }

        for note in &error.notes {
            output.push_str(&format!("   = help: {}\n", note));
        }

        output
    }

    /// Formats multiple diagnostics, separated by blank lines.
    pub fn format_all(&self, errors: &[CompileError]) -> String {
        errors
            .iter()
            .map(|e| self.format(e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
