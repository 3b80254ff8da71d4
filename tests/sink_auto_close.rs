// tests/sink_auto_close.rs

use std::error::Error;

use wrapbar::{LogOptions, LogSink, Wrapper};
use wrapbar_test_utils::builders::fast_config;
use wrapbar_test_utils::recording_bar::RecordingBars;
use wrapbar_test_utils::{SharedBuffer, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn auto_close_closes_every_handle() -> TestResult {
    let sink = LogSink::from_writer(SharedBuffer::new());
    let wrapper = Wrapper::new().with_bars(RecordingBars::new());
    let no_commands: [&str; 0] = [];

    with_timeout(wrapper.shell_wrapper(
        &no_commands,
        &fast_config(),
        &LogOptions::to_sink(sink.clone(), true),
    ))
    .await?;

    assert!(sink.is_closed());
    assert!(sink.write_bytes(b"late").is_err());
    Ok(())
}

#[tokio::test]
async fn without_auto_close_the_caller_keeps_an_open_sink() -> TestResult {
    let buffer = SharedBuffer::new();
    let sink = LogSink::from_writer(buffer.clone());
    let wrapper = Wrapper::new().with_bars(RecordingBars::new());
    let no_commands: [&str; 0] = [];

    with_timeout(wrapper.shell_wrapper(
        &no_commands,
        &fast_config(),
        &LogOptions::to_sink(sink.clone(), false),
    ))
    .await?;

    assert!(!sink.is_closed());
    sink.write_bytes(b"caller note\n")?;
    sink.close()?;
    assert_eq!(buffer.contents(), "caller note\n");
    Ok(())
}

#[tokio::test]
async fn auto_close_also_runs_when_the_run_fails() -> TestResult {
    let sink = LogSink::from_writer(SharedBuffer::new());
    let wrapper = Wrapper::new().with_bars(RecordingBars::new());

    let result = with_timeout(wrapper.shell_wrapper(
        &["wrapbar-definitely-not-installed"],
        &fast_config(),
        &LogOptions::to_sink(sink.clone(), true),
    ))
    .await;

    assert!(result.is_err());
    assert!(sink.is_closed());
    Ok(())
}
