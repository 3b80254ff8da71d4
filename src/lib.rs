// src/lib.rs

pub mod bar;
pub mod bindings;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod schedule;
pub mod script;
pub mod sink;
pub mod types;
pub mod wrapper;

use std::path::Path;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use crate::bindings::Bindings;
pub use crate::config::{PlanFile, RunConfig};
pub use crate::engine::{RunReport, RunState};
pub use crate::exec::{ExecutionOutcome, WorkItem};
pub use crate::script::Value;
pub use crate::sink::{LogOptions, LogSink};
pub use crate::types::TimerMode;
pub use crate::wrapper::Wrapper;

use crate::cli::{CliArgs, Command};
use crate::config::load_and_validate;
use crate::schedule::Schedule;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - bar settings from the CLI (or the plan file for `run`)
/// - the wrapper and its cancellation token
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cancel = CancellationToken::new();

    // Ctrl-C → cancel the current run.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    let mut wrapper = Wrapper::new().with_cancellation(cancel);

    let report = match &args.command {
        Command::Decoy => wrapper.decoy(&args.bar.to_run_config()?).await?,
        Command::Shell { commands, log } => {
            let config = args.bar.to_run_config()?;
            wrapper
                .shell_wrapper(commands, &config, &log.to_options())
                .await?
        }
        Command::Script {
            scripts,
            interpreter,
            log,
        } => {
            let config = args.bar.to_run_config()?;
            wrapper = wrapper.with_interpreter(interpreter.clone());
            wrapper
                .script_wrapper(scripts, &config, &log.to_options())
                .await?
        }
        Command::Inline {
            fragments,
            dependencies,
        } => {
            let config = args.bar.to_run_config()?;
            let report = wrapper
                .inline_wrapper(fragments, dependencies, &config)
                .await?;
            print_bindings(wrapper.results());
            report
        }
        Command::Run { plan, dry_run } => {
            let plan_file = load_and_validate(plan)?;
            if *dry_run {
                print_dry_run(plan, &plan_file);
                return Ok(());
            }
            let report = wrapper.run_plan(&plan_file).await?;
            if plan_file.has_inline_items() {
                print_bindings(wrapper.results());
            }
            report
        }
    };

    let failed = report.failures().count();
    info!(
        state = ?report.state,
        fired = report.fired.len(),
        failed,
        "wrapbar done"
    );
    Ok(())
}

fn print_bindings(bindings: &Bindings) {
    for (name, value) in bindings.iter() {
        println!("{name} = {value}");
    }
}

/// Simple dry-run output: print settings, items and their fire ticks.
fn print_dry_run(path: &Path, plan: &PlanFile) {
    let schedule = Schedule::plan(plan.items.len());

    println!("wrapbar dry-run ({})", path.display());
    println!("  bar.label = {:?}", plan.run.label);
    println!("  bar.delay = {:?}", plan.run.delay);
    println!("  bar.timer = {:?}", plan.run.timer);
    println!("  log.enabled = {}", plan.log.enabled);
    println!("  interval = {}", schedule.interval());
    println!();

    println!("items ({}):", plan.items.len());
    for slot in schedule.slots() {
        let item = &plan.items[slot.index];
        let text = match item {
            WorkItem::ShellCommand(cmd) => cmd.clone(),
            WorkItem::ScriptFile(path) => path.display().to_string(),
            WorkItem::InlineCode { source, .. } => source.clone(),
        };
        println!("  - tick {:>2}: [{}] {}", slot.tick, item.kind(), text);
    }
    if schedule.unfired() > 0 {
        println!("  ({} trailing items will not run)", schedule.unfired());
    }

    debug!("dry-run complete (no execution)");
}
