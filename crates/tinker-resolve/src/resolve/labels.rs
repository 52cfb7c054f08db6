//! Label table
//!
//! Maps every declared label to the index of the instruction it marks. All
//! source units share one namespace and one instruction numbering, so a label
//! declared at the end of the last unit marks the halt index.

use indexmap::IndexMap;
use tinker_ast::{Program, Span, Statement};

/// A declared label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEntry {
    /// Index of the first instruction after the declaration
    pub target: usize,
    /// Where the label was (first) declared
    pub span: Span,
}

/// Declared labels in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: IndexMap<String, LabelEntry>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the first declaration of every label across `programs`.
    ///
    /// Later declarations of the same name are ignored here; validation
    /// reports them as duplicates.
    pub fn collect(programs: &[Program]) -> Self {
        let mut table = Self::new();
        let mut index = 0;
        for program in programs {
            for stmt in &program.statements {
                match stmt {
                    Statement::Label(label) => {
                        table.declare(&label.node, index, label.span);
                    }
                    Statement::Instruction(_) => index += 1,
                }
            }
        }
        table
    }

    /// Record a label unless it is already declared.
    ///
    /// Returns the existing entry when `name` was declared before.
    pub fn declare(&mut self, name: &str, target: usize, span: Span) -> Option<LabelEntry> {
        if let Some(existing) = self.entries.get(name) {
            return Some(*existing);
        }
        self.entries
            .insert(name.to_string(), LabelEntry { target, span });
        None
    }

    pub fn get(&self, name: &str) -> Option<&LabelEntry> {
        self.entries.get(name)
    }

    /// Instruction index `name` resolves to.
    pub fn target(&self, name: &str) -> Option<usize> {
        self.entries.get(name).map(|entry| entry.target)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinker_ast::SourceMap;

    fn parse_units(units: &[&str]) -> Vec<Program> {
        let mut sources = SourceMap::new();
        units
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let file_id = sources.add_file(format!("unit{}.tnk", i), source.to_string());
                tinker_parser::parse_source(&sources, file_id).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_targets_count_instructions_only() {
        let programs = parse_units(&["START:\nREAD RX0\nMID:\nWRITE RX0\nEND:"]);
        let labels = LabelTable::collect(&programs);
        assert_eq!(labels.target("START"), Some(0));
        assert_eq!(labels.target("MID"), Some(1));
        assert_eq!(labels.target("END"), Some(2));
        assert_eq!(labels.target("NOPE"), None);
    }

    #[test]
    fn test_numbering_spans_units() {
        let programs = parse_units(&["READ RX0\nWRITE RX0", "SECOND: JMP SECOND"]);
        let labels = LabelTable::collect(&programs);
        assert_eq!(labels.target("SECOND"), Some(2));
        assert_eq!(labels.get("SECOND").unwrap().span.file_id, 1);
    }

    #[test]
    fn test_first_declaration_wins() {
        let programs = parse_units(&["L:\nREAD RX0\nL:\nWRITE RX0"]);
        let labels = LabelTable::collect(&programs);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.target("L"), Some(0));
    }

    #[test]
    fn test_iteration_keeps_declaration_order() {
        let programs = parse_units(&["Z:\nA:\nM:"]);
        let labels = LabelTable::collect(&programs);
        let names: Vec<&str> = labels.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }
}
