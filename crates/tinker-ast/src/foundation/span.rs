//! Source location tracking for error reporting and fault positions.
//!
//! # Design
//!
//! - `Span`: source location with byte range and cached line/column
//! - `SourceMap`: all source units of one compilation, indexed by file id
//! - `SourceFile`: single source unit with line indexing
//!
//! # Examples
//!
//! ```
//! # use tinker_ast::foundation::span::*;
//! let mut map = SourceMap::new();
//! let file_id = map.add_file("main.tnk", "READ RX0\nWRITE RX0".to_string());
//! let span = map.span(file_id, 9, 14);
//!
//! assert_eq!(map.file_name(&span), "main.tnk");
//! assert_eq!(map.snippet(&span), "WRITE");
//! assert_eq!((span.line, span.column), (2, 1));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location reference.
///
/// Points to a byte range in a source unit. Line and column of the start
/// position are cached so diagnostics and faults can be reported without
/// the source map at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Index into `SourceMap.files`
    pub file_id: u16,
    /// Byte offset of start position
    pub start: u32,
    /// Byte offset of end position (exclusive)
    pub end: u32,
    /// Line of the start position (1-based)
    pub line: u32,
    /// Column of the start position (1-based, in bytes)
    pub column: u32,
}

/// Collection of all source units in a compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

/// A single source unit with line indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Name of this unit within its program (usually a file name)
    pub name: String,
    /// Original source text
    pub source: String,
    /// Byte offsets of each line start
    ///
    /// line_starts[0] is always 0 (start of file).
    /// line_starts.len() == number of lines + 1 (includes EOF sentinel).
    pub line_starts: Vec<u32>,
}

impl Span {
    /// Create a new span.
    pub fn new(file_id: u16, start: u32, end: u32, line: u32, column: u32) -> Self {
        Self {
            file_id,
            start,
            end,
            line,
            column,
        }
    }

    /// Create a zero-length span at the start of a file.
    pub fn zero(file_id: u16) -> Self {
        Self::new(file_id, 0, 0, 1, 1)
    }

    /// Check if this span is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get the length of this span in bytes.
    ///
    /// # Panics
    /// Panics if end < start (malformed span).
    pub fn len(&self) -> u32 {
        assert!(
            self.end >= self.start,
            "malformed span: end ({}) < start ({})",
            self.end,
            self.start
        );
        self.end - self.start
    }

    /// Merge two spans (returns span covering both).
    ///
    /// Panics if spans are from different files.
    pub fn merge(&self, other: &Span) -> Span {
        assert_eq!(
            self.file_id, other.file_id,
            "cannot merge spans from different files"
        );
        let first = if self.start <= other.start { self } else { other };
        Span {
            file_id: self.file_id,
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Number of source units one [`SourceMap`] can hold.
pub const MAX_SOURCE_FILES: usize = u16::MAX as usize;

impl SourceMap {
    /// Create an empty source map.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a source unit and return its ID.
    ///
    /// The line_starts index is computed automatically.
    pub fn add_file(&mut self, name: impl Into<String>, source: String) -> u16 {
        let file_id = self.files.len();
        assert!(file_id < MAX_SOURCE_FILES, "too many source files");

        self.files.push(SourceFile::new(name.into(), source));
        file_id as u16
    }

    /// Get a source unit by id.
    pub fn get(&self, file_id: u16) -> Option<&SourceFile> {
        self.files.get(file_id as usize)
    }

    /// Build a span for a byte range of a unit, filling in line and column.
    pub fn span(&self, file_id: u16, start: u32, end: u32) -> Span {
        let file = &self.files[file_id as usize];
        let (line, column) = file.line_col(start);
        Span::new(file_id, start, end, line, column)
    }

    /// Get the source unit for a span.
    pub fn file(&self, span: &Span) -> &SourceFile {
        &self.files[span.file_id as usize]
    }

    /// Get the unit name for a span.
    pub fn file_name(&self, span: &Span) -> &str {
        &self.files[span.file_id as usize].name
    }

    /// Get the source snippet for a span.
    pub fn snippet(&self, span: &Span) -> &str {
        let file = &self.files[span.file_id as usize];
        &file.source[span.start as usize..span.end as usize]
    }

    /// Get the number of files in this map.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Iterate over `(file_id, file)` pairs in insertion order.
    pub fn files(&self) -> impl Iterator<Item = (u16, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(id, file)| (id as u16, file))
    }
}

impl SourceFile {
    /// Create a new source unit with precomputed line starts.
    pub fn new(name: String, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            name,
            source,
            line_starts,
        }
    }

    /// Get (line, column) for a byte offset.
    ///
    /// Both line and column are 1-based.
    ///
    /// # Panics
    /// Panics if offset is beyond EOF.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        assert!(
            offset <= self.source.len() as u32,
            "offset {} is beyond EOF (len = {})",
            offset,
            self.source.len()
        );

        // The EOF sentinel is not searched, so an offset at EOF stays on the last line
        let searchable = &self.line_starts[..self.line_count().max(1)];
        let line_idx = match searchable.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.max(1) - 1,
        };

        let line = (line_idx + 1) as u32;
        let col = (offset - self.line_starts[line_idx]) + 1;

        (line, col)
    }

    /// Get the byte range for a given line number (1-based).
    ///
    /// Returns None if the line number is out of bounds.
    pub fn line_range(&self, line: u32) -> Option<(u32, u32)> {
        if line == 0 || line as usize >= self.line_starts.len() {
            return None;
        }

        let line_idx = (line - 1) as usize;
        let start = self.line_starts[line_idx];
        let end = self.line_starts[line_idx + 1];

        Some((start, end))
    }

    /// Get the text of a specific line (1-based), without its line terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let (start, end) = self.line_range(line)?;
        Some(self.source[start as usize..end as usize].trim_end_matches(['\n', '\r']))
    }

    /// Get the number of lines in this file.
    pub fn line_count(&self) -> usize {
        assert!(
            !self.line_starts.is_empty(),
            "line_starts invariant violated: empty array"
        );
        self.line_starts.len() - 1
    }
}

/// Compute byte offsets of line starts in source text.
///
/// Returns a Vec where:
/// - line_starts[0] is byte 0 (start of line 1)
/// - line_starts[i] is the start of line i+1
/// - the last element is EOF (sentinel for last line's end)
fn compute_line_starts(source: &str) -> Vec<u32> {
    let mut line_starts = vec![0];

    for (idx, ch) in source.char_indices() {
        if ch == '\n' {
            line_starts.push((idx + 1) as u32);
        }
    }

    if line_starts.last() != Some(&(source.len() as u32)) {
        line_starts.push(source.len() as u32);
    }

    line_starts
}
