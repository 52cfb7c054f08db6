//! Tinker command-line tool
//!
//! Compile programs, run them against puzzle specs, and check spec files.
//!
//! Usage:
//!   tinker compile --source prog.tnk [--hardware hw.json]
//!   tinker run --source prog.tnk [--hardware hw.json] [--program puzzle.json] [--json]
//!   tinker check-spec [--hardware hw.json] [--program puzzle.json]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use tinker::{run_all, RunConfig, DEFAULT_CYCLE_CEILING};
use tinker_cli::{
    compile_units, format_verdict, load_hardware, load_program_spec, read_sources, CliError,
};

#[derive(Parser, Debug)]
#[command(name = "tinker", version)]
#[command(about = "Compile and run Tinker puzzle programs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile source files and report diagnostics
    Compile {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Compile source files and run every test case of a program spec
    Run {
        #[command(flatten)]
        sources: SourceArgs,

        /// Program spec (JSON); one empty test case when omitted
        #[arg(long)]
        program: Option<PathBuf>,

        /// Cycle ceiling per test case
        #[arg(long, default_value_t = DEFAULT_CYCLE_CEILING)]
        max_cycles: u64,

        /// Evaluate test cases in parallel
        #[arg(long)]
        parallel: bool,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,

        /// Record and print the executed instructions of each test case
        #[arg(long)]
        trace: bool,
    },

    /// Validate hardware and program spec files
    CheckSpec {
        /// Hardware spec (JSON)
        #[arg(long)]
        hardware: Option<PathBuf>,

        /// Program spec (JSON)
        #[arg(long)]
        program: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Source files, concatenated in the order given
    #[arg(long = "source", required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Hardware spec (JSON); one register and no stacks when omitted
    #[arg(long)]
    hardware: Option<PathBuf>,
}

fn main() {
    tinker_cli::init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile { sources } => compile(&sources),
        Commands::Run {
            sources,
            program,
            max_cycles,
            parallel,
            json,
            trace,
        } => {
            let config = RunConfig {
                cycle_ceiling: max_cycles,
                parallel,
                record_trace: trace,
            };
            run(&sources, program, &config, json)
        }
        Commands::CheckSpec { hardware, program } => check_spec(hardware, program),
    };

    if let Err(e) = result {
        error!("{}", e.to_string().trim_end());
        process::exit(1);
    }
}

fn compile(args: &SourceArgs) -> Result<(), CliError> {
    let hardware = load_hardware(args.hardware.as_deref())?;
    let units = read_sources(&args.files)?;
    let program = compile_units(&units, &hardware)?;
    info!(
        "Compiled {} file(s) to {} instructions",
        units.len(),
        program.len()
    );
    Ok(())
}

fn run(
    args: &SourceArgs,
    program_spec: Option<PathBuf>,
    config: &RunConfig,
    json: bool,
) -> Result<(), CliError> {
    let hardware = load_hardware(args.hardware.as_deref())?;
    let spec = load_program_spec(program_spec.as_deref())?;
    let units = read_sources(&args.files)?;
    let program = compile_units(&units, &hardware)?;

    let verdict = run_all(&program, &hardware, &spec, config);
    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print!("{}", format_verdict(&verdict, config.record_trace));
    }

    if verdict.passed {
        Ok(())
    } else {
        Err(CliError::Failed {
            failed: verdict.results.len() - verdict.passed_count(),
            total: verdict.results.len(),
        })
    }
}

fn check_spec(hardware: Option<PathBuf>, program: Option<PathBuf>) -> Result<(), CliError> {
    let hardware = load_hardware(hardware.as_deref())?;
    let spec = load_program_spec(program.as_deref())?;
    info!(
        "Specs OK: {} registers, {} stacks, {} opcodes, {} test cases",
        hardware.num_registers,
        hardware.num_stacks(),
        hardware.permitted_opcodes.len(),
        spec.test_cases.len()
    );
    Ok(())
}
