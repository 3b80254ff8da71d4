// src/exec/mod.rs

//! Work items and their execution.
//!
//! - [`WorkItem`] is what callers hand in: a shell command, a script file, or
//!   an inline fragment.
//! - [`prepare_all`] turns them into [`PreparedItem`]s before the bar starts:
//!   script paths are made absolute and every inline fragment is compiled,
//!   so a broken fragment aborts the run before any tick.
//! - [`PreparedItem::execute`] runs one item at its due tick.
//! - [`process`] spawns child processes for shell and script items.

pub mod process;

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::bindings::Bindings;
use crate::errors::{Result, WrapbarError};
use crate::script::Program;
use crate::sink::LogSink;
use crate::types::ItemKind;

/// Interpreter used for script items unless configured otherwise.
pub const DEFAULT_INTERPRETER: &str = "python";

/// One unit of work, in caller terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    /// Split on whitespace and spawned directly (no shell).
    ShellCommand(String),
    /// Run with the configured interpreter.
    ScriptFile(PathBuf),
    /// Compiled with `dependencies` (assignment statements) prepended.
    InlineCode {
        source: String,
        dependencies: Vec<String>,
    },
}

impl WorkItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            WorkItem::ShellCommand(_) => ItemKind::ShellCommand,
            WorkItem::ScriptFile(_) => ItemKind::ScriptFile,
            WorkItem::InlineCode { .. } => ItemKind::InlineCode,
        }
    }

    /// Resolve this item for execution. `position` is 1-based and only used
    /// in error messages.
    pub fn prepare(&self, position: usize, interpreter: &str) -> Result<PreparedItem> {
        match self {
            WorkItem::ShellCommand(text) => Ok(PreparedItem::Process {
                kind: ItemKind::ShellCommand,
                display: text.clone(),
                argv: text.split_whitespace().map(str::to_string).collect(),
            }),
            WorkItem::ScriptFile(path) => {
                let absolute = std::path::absolute(path)?;
                let display = absolute.display().to_string();
                // Known limitation: a path containing spaces is split into
                // several arguments.
                let argv = std::iter::once(interpreter.to_string())
                    .chain(display.split(' ').map(str::to_string))
                    .collect();
                Ok(PreparedItem::Process {
                    kind: ItemKind::ScriptFile,
                    display,
                    argv,
                })
            }
            WorkItem::InlineCode {
                source,
                dependencies,
            } => {
                let rendered = render_fragment(source, dependencies);
                let program =
                    Program::compile(&rendered).map_err(|err| WrapbarError::Compile {
                        index: position,
                        fragment: source.clone(),
                        source: err,
                    })?;
                Ok(PreparedItem::Inline { program })
            }
        }
    }
}

/// Prefix a fragment with its dependency assignments, one per line.
pub fn render_fragment(source: &str, dependencies: &[String]) -> String {
    let mut rendered = String::new();
    for dep in dependencies {
        rendered.push_str(dep);
        rendered.push('\n');
    }
    rendered.push_str(source);
    rendered.push('\n');
    rendered
}

/// Prepare every item, failing on the first one that cannot be prepared.
pub fn prepare_all(items: &[WorkItem], interpreter: &str) -> Result<Vec<PreparedItem>> {
    let prepared = items
        .iter()
        .enumerate()
        .map(|(i, item)| item.prepare(i + 1, interpreter))
        .collect::<Result<Vec<_>>>()?;
    debug!(items = prepared.len(), "prepared work items");
    Ok(prepared)
}

/// A work item ready to run.
#[derive(Debug, Clone)]
pub enum PreparedItem {
    Process {
        kind: ItemKind,
        display: String,
        argv: Vec<String>,
    },
    Inline {
        program: Program,
    },
}

/// How a single item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Succeeded,
    /// Non-zero exit; `-1` when the process was killed by a signal.
    Failed(i32),
    /// Cancellation arrived while the item was running.
    Cancelled,
}

impl PreparedItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            PreparedItem::Process { kind, .. } => *kind,
            PreparedItem::Inline { .. } => ItemKind::InlineCode,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            PreparedItem::Process { display, .. } => display,
            PreparedItem::Inline { program } => program.source(),
        }
    }

    /// Run the item. `index` is 0-based.
    ///
    /// Process items write their block to `sink` when one is given; inline
    /// items write only to `bindings`. A runtime fault in an inline item is
    /// returned as an error, while a failing process is just an outcome.
    pub async fn execute(
        &self,
        index: usize,
        sink: Option<&LogSink>,
        bindings: &mut Bindings,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome> {
        match self {
            PreparedItem::Process {
                kind,
                display,
                argv,
            } => process::run_process(*kind, display, argv, sink, cancel).await,
            PreparedItem::Inline { program } => {
                program
                    .run(bindings)
                    .map_err(|source| WrapbarError::Execution {
                        index: index + 1,
                        source,
                    })?;
                Ok(ExecutionOutcome::Succeeded)
            }
        }
    }
}
