// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Shared plumbing for the `tinker` binary: logging setup, spec and source
//! loading, and plain-text reports.

use serde::de::DeserializeOwned;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tinker::{
    compile_with_sources, format_errors, CompiledProgram, HardwareSpec, ProgramSpec, RunVerdict,
    SourceUnit, SpecError, TestCaseResult,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a sensible default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tinker=info,tinker_vm=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Everything that can stop a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid spec {name}: {source}")]
    Spec { name: String, source: SpecError },

    /// Rendered compile diagnostics
    #[error("{0}")]
    Compile(String),

    #[error("{failed} of {total} test cases failed")]
    Failed { failed: usize, total: usize },

    #[error("failed to encode verdict: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read a JSON file, or use the default value when no path is given.
pub fn load_json<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, CliError> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and check a hardware spec.
pub fn load_hardware(path: Option<&Path>) -> Result<HardwareSpec, CliError> {
    let hardware: HardwareSpec = load_json(path)?;
    hardware.validate().map_err(|source| CliError::Spec {
        name: display_name(path),
        source,
    })?;
    Ok(hardware)
}

/// Load and check a program spec.
pub fn load_program_spec(path: Option<&Path>) -> Result<ProgramSpec, CliError> {
    let spec: ProgramSpec = load_json(path)?;
    spec.validate().map_err(|source| CliError::Spec {
        name: display_name(path),
        source,
    })?;
    Ok(spec)
}

fn display_name(path: Option<&Path>) -> String {
    path.map_or_else(|| "<default>".to_string(), |p| p.display().to_string())
}

/// Read source files into units named after their paths, in argument order.
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceUnit>, CliError> {
    paths
        .iter()
        .map(|path| {
            let source = fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(SourceUnit::new(path.display().to_string(), source))
        })
        .collect()
}

/// Compile units, rendering any diagnostics into the error.
pub fn compile_units(
    units: &[SourceUnit],
    hardware: &HardwareSpec,
) -> Result<CompiledProgram, CliError> {
    let output = compile_with_sources(units, hardware);
    output
        .result
        .map_err(|errors| CliError::Compile(format_errors(&errors, &output.sources)))
}

/// One line per test case, then the score or the failure count.
pub fn format_verdict(verdict: &RunVerdict, with_trace: bool) -> String {
    let mut out = String::new();
    for (index, result) in verdict.results.iter().enumerate() {
        let _ = writeln!(out, "case {}: {}", index, describe(result));
        if with_trace {
            for entry in result.trace.iter().flatten() {
                let _ = writeln!(out, "    [{:>6}] pc {:<4} {}", entry.cycle, entry.pc, entry.span);
            }
        }
    }
    match tinker::score(verdict) {
        Some(score) => {
            let _ = writeln!(out, "passed: {}", score);
        }
        None => {
            let _ = writeln!(
                out,
                "failed: {} of {} test cases passed",
                verdict.passed_count(),
                verdict.results.len()
            );
        }
    }
    out
}

fn describe(result: &TestCaseResult) -> String {
    if result.passed {
        return format!("pass in {} cycles", result.cycles);
    }
    match result.fault() {
        Some(fault) => format!("fault after {} cycles: {}", result.cycles, fault),
        None => format!(
            "wrong output {:?}, expected {:?}",
            result.output, result.expected_output
        ),
    }
}
