// tests/plan_run.rs
#![cfg(unix)]

use std::error::Error;
use std::fs;

use tempfile::TempDir;
use wrapbar::errors::WrapbarError;
use wrapbar::{ExecutionOutcome, LogOptions, LogSink, Value, Wrapper};
use wrapbar_test_utils::builders::{PlanFileBuilder, fast_config};
use wrapbar_test_utils::recording_bar::RecordingBars;
use wrapbar_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn mixed_plan_runs_in_order_and_logs_to_file() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let log_path = dir.path().join("run.log");
    let script = dir.path().join("hello.sh");
    fs::write(&script, "echo from-script\n")?;

    let plan = PlanFileBuilder::new()
        .label("mixed")
        .interpreter("sh")
        .dependency("base = 40")
        .shell("echo from-shell")
        .script(&script)
        .inline("answer = base + 2")
        .log_to(&log_path, true)
        .build();

    let bars = RecordingBars::new();
    let mut wrapper = Wrapper::new().with_bars(bars.clone());
    let report = with_timeout(wrapper.run_plan(&plan)).await?;

    assert!(report.is_finished());
    assert_eq!(report.fire_ticks(), vec![25, 50, 75]);
    assert!(
        report
            .fired
            .iter()
            .all(|f| f.outcome == ExecutionOutcome::Succeeded)
    );
    assert_eq!(wrapper.results()["answer"], Value::Int(42));
    assert_eq!(bars.log().labels, vec!["mixed".to_string()]);

    let log = fs::read_to_string(&log_path)?;
    let shell = log.find("Command Executed: 'echo from-shell'").expect("shell block");
    let file = log.find("File Executed:").expect("script block");
    assert!(shell < file);
    assert!(log.contains("from-script"));
    // Inline fragments are not logged.
    assert!(!log.contains("Code Executed"));
    assert_eq!(log.matches("\nEND\n").count(), 2);
    Ok(())
}

#[tokio::test]
async fn script_wrapper_uses_the_configured_interpreter() -> TestResult {
    let dir = TempDir::new()?;
    let script = dir.path().join("greet.sh");
    fs::write(&script, "echo greetings\nexit 3\n")?;
    let log_path = dir.path().join("script.log");

    let wrapper = Wrapper::new()
        .with_bars(RecordingBars::new())
        .with_interpreter("sh");
    let sink = LogSink::create(&log_path)?;

    let report = with_timeout(wrapper.script_wrapper(
        &[&script],
        &fast_config(),
        &LogOptions::to_sink(sink, true),
    ))
    .await?;

    assert_eq!(report.fired.len(), 1);
    assert_eq!(report.fired[0].outcome, ExecutionOutcome::Failed(3));

    let log = fs::read_to_string(&log_path)?;
    assert!(log.contains("File Executed: '"));
    assert!(log.contains("greet.sh'"));
    assert!(log.contains("greetings"));
    Ok(())
}

#[tokio::test]
async fn log_file_is_truncated_per_run() -> TestResult {
    let dir = TempDir::new()?;
    let log_path = dir.path().join("again.log");
    fs::write(&log_path, "stale contents from an earlier run\n")?;

    let plan = PlanFileBuilder::new()
        .shell("echo fresh")
        .log_to(&log_path, true)
        .build();

    let mut wrapper = Wrapper::new().with_bars(RecordingBars::new());
    with_timeout(wrapper.run_plan(&plan)).await?;

    let log = fs::read_to_string(&log_path)?;
    assert!(!log.contains("stale"));
    assert!(log.contains("fresh"));
    Ok(())
}

#[tokio::test]
async fn stdout_and_stderr_keep_their_interleaving() -> TestResult {
    let dir = TempDir::new()?;
    let script = dir.path().join("mixed.sh");
    fs::write(&script, "echo out1\necho err1 >&2\necho out2\necho err2 >&2\n")?;
    let log_path = dir.path().join("mixed.log");

    let wrapper = Wrapper::new()
        .with_bars(RecordingBars::new())
        .with_interpreter("sh");

    with_timeout(wrapper.script_wrapper(
        &[&script],
        &fast_config(),
        &LogOptions::to_file(&log_path, true),
    ))
    .await?;

    let log = fs::read_to_string(&log_path)?;
    assert!(
        log.contains("out1\nerr1\nout2\nerr2\n\nEND\n"),
        "output out of order:\n{log}"
    );
    Ok(())
}

#[tokio::test]
async fn compile_error_leaves_an_existing_log_untouched() -> TestResult {
    let dir = TempDir::new()?;
    let log_path = dir.path().join("kept.log");
    fs::write(&log_path, "previous run\n")?;

    let plan = PlanFileBuilder::new()
        .shell("echo never")
        .inline("x = (")
        .log_to(&log_path, true)
        .build();

    let mut wrapper = Wrapper::new().with_bars(RecordingBars::new());
    let result = with_timeout(wrapper.run_plan(&plan)).await;

    assert!(matches!(result, Err(WrapbarError::Compile { index: 2, .. })));
    assert_eq!(fs::read_to_string(&log_path)?, "previous run\n");
    Ok(())
}
