// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_MARKER, RunConfig, default_plan_path, delay_from_secs};
use crate::errors::{Result, WrapbarError};
use crate::exec::DEFAULT_INTERPRETER;
use crate::sink::LogOptions;
use crate::types::TimerMode;

/// Command-line arguments for `wrapbar`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wrapbar",
    version,
    about = "Run commands, scripts or inline code behind a single progress bar.",
    long_about = None
)]
pub struct CliArgs {
    #[command(flatten)]
    pub bar: BarArgs,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WRAPBAR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Bar appearance. Ignored by `run`, which reads `[bar]` from the plan.
#[derive(Debug, Clone, Args)]
pub struct BarArgs {
    /// Text shown before the bar.
    #[arg(long, default_value = "", global = true)]
    pub label: String,

    /// Fill glyph for the bar.
    #[arg(long, default_value = DEFAULT_MARKER, global = true)]
    pub marker: String,

    /// Seconds to sleep on each tick with no item due.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1, global = true)]
    pub delay: f64,

    /// Total render width in columns.
    #[arg(long, default_value_t = 50, global = true)]
    pub width: u16,

    /// Timer shown after the bar.
    #[arg(long, value_enum, default_value_t = TimerArg::Eta, global = true)]
    pub timer: TimerArg,
}

impl BarArgs {
    pub fn to_run_config(&self) -> Result<RunConfig> {
        if self.marker.is_empty() {
            return Err(WrapbarError::ConfigError("--marker must not be empty".into()));
        }
        Ok(RunConfig {
            label: self.label.clone(),
            marker: self.marker.clone(),
            delay: delay_from_secs(self.delay)?,
            width: self.width.max(1),
            timer: self.timer.into(),
        })
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show a bar that runs nothing.
    Decoy,

    /// Run shell commands (split on whitespace, no shell involved).
    Shell {
        #[arg(required = true, value_name = "COMMAND")]
        commands: Vec<String>,

        #[command(flatten)]
        log: LogArgs,
    },

    /// Run script files with an interpreter.
    Script {
        #[arg(required = true, value_name = "PATH")]
        scripts: Vec<PathBuf>,

        #[arg(long, default_value = DEFAULT_INTERPRETER)]
        interpreter: String,

        #[command(flatten)]
        log: LogArgs,
    },

    /// Run inline fragments and print the resulting bindings.
    Inline {
        #[arg(required = true, value_name = "FRAGMENT")]
        fragments: Vec<String>,

        /// Assignment prepended to every fragment, e.g. `-d b=10`.
        #[arg(long = "dep", short = 'd', value_name = "NAME=VALUE")]
        dependencies: Vec<String>,
    },

    /// Run the items of a TOML plan file.
    Run {
        #[arg(long, value_name = "PATH", default_value_os_t = default_plan_path())]
        plan: PathBuf,

        /// Validate the plan and print when each item would fire.
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Write a run log (to `.log` unless `--log-file` is given).
    #[arg(long)]
    pub log: bool,

    /// Run log destination; implies `--log`.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Close the run log when the run ends.
    #[arg(long)]
    pub auto_close: bool,
}

impl LogArgs {
    pub fn to_options(&self) -> LogOptions {
        LogOptions {
            enabled: self.log || self.log_file.is_some(),
            sink: None,
            path: self.log_file.clone(),
            auto_close: self.auto_close,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TimerArg {
    /// Estimated time remaining.
    Eta,
    /// Time since the bar started.
    Elapsed,
}

impl From<TimerArg> for TimerMode {
    fn from(arg: TimerArg) -> Self {
        match arg {
            TimerArg::Eta => TimerMode::RemainingTimeEstimate,
            TimerArg::Elapsed => TimerMode::ElapsedTime,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_collects_dependencies() {
        let args = CliArgs::try_parse_from([
            "wrapbar", "--delay", "0", "inline", "a = b + c", "-d", "b=10", "-d", "c=115",
        ])
        .unwrap();
        match args.command {
            Command::Inline {
                fragments,
                dependencies,
            } => {
                assert_eq!(fragments, vec!["a = b + c"]);
                assert_eq!(dependencies, vec!["b=10", "c=115"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.bar.to_run_config().unwrap().delay, std::time::Duration::ZERO);
    }

    #[test]
    fn bar_flags_are_global() {
        let args = CliArgs::try_parse_from([
            "wrapbar", "shell", "echo hi", "--timer", "elapsed", "--label", "Job",
        ])
        .unwrap();
        let config = args.bar.to_run_config().unwrap();
        assert_eq!(config.timer, TimerMode::ElapsedTime);
        assert_eq!(config.label, "Job");
    }

    #[test]
    fn run_defaults_to_plan_in_cwd() {
        let args = CliArgs::try_parse_from(["wrapbar", "run", "--dry-run"]).unwrap();
        match args.command {
            Command::Run { plan, dry_run } => {
                assert_eq!(plan, PathBuf::from("Wrapbar.toml"));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_file_implies_logging_without_opening_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli.log");
        let path_arg = path.to_str().unwrap();
        let args =
            CliArgs::try_parse_from(["wrapbar", "shell", "echo hi", "--log-file", path_arg])
                .unwrap();
        match args.command {
            Command::Shell { log, .. } => {
                let options = log.to_options();
                assert!(options.enabled);
                assert_eq!(options.path.as_deref(), Some(path.as_path()));
                assert!(!path.exists());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_requires_a_command() {
        assert!(CliArgs::try_parse_from(["wrapbar", "shell"]).is_err());
    }
}
