// tests/plan_errors.rs

use std::io::Write;

use tempfile::NamedTempFile;
use wrapbar::config::load_and_validate;
use wrapbar::errors::WrapbarError;

fn plan_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn item_without_a_kind_returns_config_error() {
    let file = plan_file(
        r#"
[[item]]
shell = "echo ok"

[[item]]
"#,
    );

    match load_and_validate(file.path()) {
        Err(WrapbarError::ConfigError(msg)) => {
            assert!(msg.contains("item #2"));
            assert!(msg.contains("must set one of"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_width_bar_returns_config_error() {
    let file = plan_file(
        r#"
[bar]
width = 0
"#,
    );

    match load_and_validate(file.path()) {
        Err(WrapbarError::ConfigError(msg)) => assert!(msg.contains("width")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_returns_toml_error() {
    let file = plan_file("[[item]\nshell = ");

    let result = load_and_validate(file.path());
    assert!(matches!(result, Err(WrapbarError::TomlError(_))));
}

#[test]
fn missing_plan_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("Wrapbar.toml"));
    assert!(matches!(result, Err(WrapbarError::IoError(_))));
}

#[test]
fn unknown_timer_falls_back_to_eta() {
    let file = plan_file(
        r#"
[bar]
timer = "Stopwatch"
"#,
    );

    let plan = load_and_validate(file.path()).unwrap();
    assert_eq!(plan.run.timer, wrapbar::TimerMode::RemainingTimeEstimate);
}
