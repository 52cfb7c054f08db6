use crate::error::{CompileError, DiagnosticFormatter, ErrorKind};
use crate::foundation::{SourceMap, Span, MAX_SOURCE_FILES};
use crate::spec::HardwareSpec;
use serde::{Deserialize, Serialize};
use tinker_parser::parse;
use tinker_resolve::{hardware_error, validate};
use tinker_vm::{lower, CompiledProgram};
use tracing::debug;

/// One named source file of a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceUnit {
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Compilation result together with the source map its spans refer to.
#[derive(Debug)]
pub struct CompileResultWithSources {
    pub result: Result<CompiledProgram, Vec<CompileError>>,
    pub sources: SourceMap,
}

/// Compiles a single-file program for `hardware`.
///
/// # Errors
/// Returns a list of [`CompileError`] if any stage of the pipeline fails.
pub fn compile(
    source: &str,
    hardware: &HardwareSpec,
) -> Result<CompiledProgram, Vec<CompileError>> {
    compile_files(&[SourceUnit::new("main", source)], hardware)
}

/// Compiles a program made of several source units.
///
/// # Errors
/// Returns a list of [`CompileError`] if any stage of the pipeline fails.
pub fn compile_files(
    units: &[SourceUnit],
    hardware: &HardwareSpec,
) -> Result<CompiledProgram, Vec<CompileError>> {
    compile_with_sources(units, hardware).result
}

/// Compiles a multi-file program and keeps the [`SourceMap`] for rendering
/// diagnostics.
///
/// It performs the following steps:
/// 1. Checks the hardware spec against the machine limits.
/// 2. Registers every unit in a [`SourceMap`], in the order given. More
///    units than a source map holds is an internal error.
/// 3. Lexes and parses each unit, collecting the errors of every unit.
/// 4. Validates all units together (one label namespace).
/// 5. Lowers the validated program.
pub fn compile_with_sources(
    units: &[SourceUnit],
    hardware: &HardwareSpec,
) -> CompileResultWithSources {
    let mut sources = SourceMap::new();
    if units.len() > MAX_SOURCE_FILES {
        let error = CompileError::new(
            ErrorKind::Internal,
            Span::zero(0),
            format!(
                "too many source units: {} (at most {})",
                units.len(),
                MAX_SOURCE_FILES
            ),
        );
        return CompileResultWithSources {
            result: Err(vec![error]),
            sources,
        };
    }
    for unit in units {
        sources.add_file(unit.name.clone(), unit.source.clone());
    }
    let result = compile_source_map(&sources, hardware);
    CompileResultWithSources { result, sources }
}

fn compile_source_map(
    sources: &SourceMap,
    hardware: &HardwareSpec,
) -> Result<CompiledProgram, Vec<CompileError>> {
    // 1. Hardware limits
    hardware.validate().map_err(|e| vec![hardware_error(e)])?;

    // 2. Lex & parse each unit
    let mut programs = Vec::new();
    let mut all_errors = Vec::new();
    for (file_id, file) in sources.files() {
        let tokens = match tinker_lexer::tokenize(sources, file_id) {
            Ok(tokens) => tokens,
            Err(errors) => {
                all_errors.extend(errors);
                continue;
            }
        };
        debug!(unit = %file.name, tokens = tokens.len(), "lexed");

        match parse(&tokens, file_id) {
            Ok(program) => {
                debug!(unit = %file.name, statements = program.statements.len(), "parsed");
                programs.push(program);
            }
            Err(errors) => all_errors.extend(errors.into_iter().map(CompileError::from)),
        }
    }

    if !all_errors.is_empty() {
        return Err(all_errors);
    }

    // 3. Validation
    let validated = validate(&programs, hardware)?;

    // 4. Lowering
    let program = lower(&validated);
    debug!(instructions = program.len(), labels = validated.labels().len(), "lowered");
    Ok(program)
}

/// Formats compilation errors with source context.
pub fn format_errors(errors: &[CompileError], source_map: &SourceMap) -> String {
    let formatter = DiagnosticFormatter::new(source_map);
    formatter.format_all(errors)
}
