//! End-to-end compile and run scenarios.

use tinker::{
    compile, compile_files, run, run_all, score, step, CompileCache, FaultKind, HardwareSpec,
    Machine, MachineStatus, ProgramSpec, RunConfig, RunVerdict, Score, SourceUnit, TestCase,
};

const DOUBLER: &str = "
; Write every input value doubled
LOOP:
    JEZ RLI END
    READ RX0
    ADD RX0 RX0
    WRITE RX0
    JMP LOOP
END:
";

fn doubler_hardware() -> HardwareSpec {
    HardwareSpec::new(2, &[4])
}

#[test]
fn test_doubler_passes() {
    let hardware = doubler_hardware();
    let program = compile(DOUBLER, &hardware).unwrap();
    let spec = ProgramSpec::new(vec![
        TestCase::new(vec![1, 2, 3], vec![2, 4, 6]),
        TestCase::new(vec![], vec![]),
        TestCase::new(vec![-7], vec![-14]),
    ]);

    let verdict = run_all(&program, &hardware, &spec, &RunConfig::default());
    assert!(verdict.passed);
    assert_eq!(verdict.results[0].output, vec![2, 4, 6]);
    assert_eq!(
        score(&verdict),
        Some(Score {
            cycles: 16,
            instructions: 5,
            registers: 1,
            stack_depth: 0,
        })
    );
}

#[test]
fn test_runs_are_deterministic() {
    let hardware = doubler_hardware();
    let program = compile(DOUBLER, &hardware).unwrap();
    let case = TestCase::new(vec![5, 0, -3, 12], vec![10, 0, -6, 24]);
    let first = run(&program, &hardware, &case, 1000);
    let second = run(&program, &hardware, &case, 1000);
    assert_eq!(first, second);
    assert!(first.passed);
}

#[test]
fn test_compile_is_idempotent() {
    let hardware = doubler_hardware();
    assert_eq!(
        compile(DOUBLER, &hardware).unwrap(),
        compile(DOUBLER, &hardware).unwrap()
    );
}

#[test]
fn test_infinite_loop_times_out_at_ceiling() {
    let hardware = HardwareSpec::default();
    let program = compile("LOOP: JMP LOOP", &hardware).unwrap();
    let result = run(&program, &hardware, &TestCase::default(), 1000);
    assert!(!result.passed);
    assert_eq!(result.cycles, 1000);
    assert_eq!(
        result.fault().unwrap().kind,
        FaultKind::Timeout { ceiling: 1000 }
    );
}

#[test]
fn test_stack_overflow_and_underflow() {
    let hardware = HardwareSpec::new(1, &[2]);
    let program = compile("PUSH 1 S0\nPUSH 2 S0\nPUSH 3 S0", &hardware).unwrap();
    let result = run(&program, &hardware, &TestCase::default(), 100);
    let fault = result.fault().unwrap();
    assert_eq!(
        fault.kind,
        FaultKind::StackOverflow {
            stack: 0,
            capacity: 2
        }
    );
    assert_eq!(fault.span.line, 3);
    assert_eq!(result.peak_stack_depth, 2);

    let program = compile("POP S0 RX0", &hardware).unwrap();
    let result = run(&program, &hardware, &TestCase::default(), 100);
    assert_eq!(
        result.fault().unwrap().kind,
        FaultKind::StackUnderflow { stack: 0 }
    );
}

#[test]
fn test_wrong_output_fails_without_score() {
    let hardware = doubler_hardware();
    let program = compile(DOUBLER, &hardware).unwrap();
    let spec = ProgramSpec::new(vec![
        TestCase::new(vec![1], vec![2]),
        TestCase::new(vec![1], vec![3]),
    ]);
    let verdict = run_all(&program, &hardware, &spec, &RunConfig::default());
    assert!(!verdict.passed);
    assert_eq!(verdict.passed_count(), 1);
    assert_eq!(verdict.results[1].status, MachineStatus::Halted);
    assert_eq!(score(&verdict), None);
}

#[test]
fn test_parallel_equals_sequential() {
    let hardware = doubler_hardware();
    let program = compile(DOUBLER, &hardware).unwrap();
    let spec = ProgramSpec::new(
        (0..64)
            .map(|n| TestCase::new(vec![n; n as usize % 7], vec![2 * n; n as usize % 7]))
            .collect(),
    );
    let sequential = run_all(&program, &hardware, &spec, &RunConfig::default());
    let parallel = run_all(
        &program,
        &hardware,
        &spec,
        &RunConfig {
            parallel: true,
            ..RunConfig::default()
        },
    );
    assert_eq!(sequential, parallel);
    assert!(parallel.passed);
}

#[test]
fn test_multi_file_program() {
    let hardware = HardwareSpec::new(2, &[8]);
    let units = [
        SourceUnit::new("main.tnk", "LOOP: JEZ RLI REVERSE\nREAD RX0\nPUSH RX0 S0\nJMP LOOP"),
        SourceUnit::new(
            "reverse.tnk",
            "REVERSE: JEZ RS0 DONE\nPOP S0 RX1\nWRITE RX1\nJMP REVERSE\nDONE:",
        ),
    ];
    let program = compile_files(&units, &hardware).unwrap();
    assert_eq!(program.len(), 8);

    let result = run(
        &program,
        &hardware,
        &TestCase::new(vec![1, 2, 3], vec![3, 2, 1]),
        1000,
    );
    assert!(result.passed);
    assert_eq!(result.registers_used, 2);
    assert_eq!(result.peak_stack_depth, 3);
}

#[test]
fn test_stepping_matches_run() {
    let hardware = doubler_hardware();
    let program = compile(DOUBLER, &hardware).unwrap();
    let mut machine = Machine::new(&program, &hardware, vec![4, 5], 1000);
    let mut steps = 0;
    while !step(&mut machine).is_terminal() {
        steps += 1;
    }
    assert_eq!(machine.status(), &MachineStatus::Halted);
    assert_eq!(machine.state().output(), &[8, 10]);
    assert_eq!(machine.state().cycle_count(), steps + 1);

    let result = run(&program, &hardware, &TestCase::new(vec![4, 5], vec![8, 10]), 1000);
    assert_eq!(result.cycles, machine.state().cycle_count());
}

#[test]
fn test_cache_reuses_programs() {
    let cache = CompileCache::new();
    let hardware = doubler_hardware();
    let units = [SourceUnit::new("doubler.tnk", DOUBLER)];
    let cached = cache.get_or_compile(&units, &hardware).unwrap();
    let again = cache.get_or_compile(&units, &hardware).unwrap();
    assert_eq!(*cached, compile(DOUBLER, &hardware).unwrap());
    assert_eq!(cached, again);
    assert_eq!(cache.hits(), 1);
}

#[test]
fn test_run_on_smaller_hardware_is_a_fault() {
    let program = compile("SET RX3 1\nWRITE RX3", &HardwareSpec::new(4, &[])).unwrap();
    let result = run(&program, &HardwareSpec::new(1, &[]), &TestCase::default(), 100);
    assert!(!result.passed);
    assert_eq!(
        result.fault().unwrap().kind,
        FaultKind::InvalidRegister { register: 3 }
    );
}

#[test]
fn test_empty_spec_never_passes() {
    let hardware = HardwareSpec::default();
    let program = compile("", &hardware).unwrap();
    let verdict = run_all(
        &program,
        &hardware,
        &ProgramSpec::new(vec![]),
        &RunConfig::default(),
    );
    assert!(!verdict.passed);
    assert_eq!(score(&verdict), None);
}

#[test]
fn test_verdict_json_round_trip() {
    let hardware = HardwareSpec::new(1, &[1]);
    let program = compile("READ RX0\nPUSH RX0 S0\nPUSH RX0 S0", &hardware).unwrap();
    let spec = ProgramSpec::new(vec![
        TestCase::new(vec![], vec![]),
        TestCase::new(vec![3], vec![]),
    ]);
    let config = RunConfig {
        record_trace: true,
        ..RunConfig::default()
    };
    let verdict = run_all(&program, &hardware, &spec, &config);

    let json = serde_json::to_string(&verdict).unwrap();
    let back: RunVerdict = serde_json::from_str(&json).unwrap();
    assert_eq!(back, verdict);
    assert_eq!(
        back.results[1].fault().unwrap().kind,
        FaultKind::StackOverflow {
            stack: 0,
            capacity: 1
        }
    );
    assert_eq!(back.results[1].trace.as_ref().unwrap().len(), 2);
}
