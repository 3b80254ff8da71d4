// src/engine/mod.rs

//! Tick-driven run engine.
//!
//! The pure firing rule lives in [`schedule`](crate::schedule); this module
//! owns the loop that applies it: one pass over the tick scale, running each
//! item on its due tick and idling otherwise.

pub mod driver;

pub use driver::ProgressDriver;

use crate::exec::ExecutionOutcome;

/// Lifecycle of a single run.
///
/// `Idle -> Running -> Finished | Interrupted`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    /// All ticks completed and the bar was finalised.
    Finished,
    /// Cancelled mid-run; the bar was left as it was.
    Interrupted,
}

/// An item that ran, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredItem {
    pub tick: u64,
    pub index: usize,
    pub outcome: ExecutionOutcome,
}

/// Summary returned by every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: RunState,
    /// Items in the order they ran.
    pub fired: Vec<FiredItem>,
    /// Items that never got a tick.
    pub unfired: usize,
    /// Number of bar updates issued.
    pub bar_updates: u64,
}

impl RunReport {
    pub fn is_finished(&self) -> bool {
        self.state == RunState::Finished
    }

    pub fn is_interrupted(&self) -> bool {
        self.state == RunState::Interrupted
    }

    pub fn fire_ticks(&self) -> Vec<u64> {
        self.fired.iter().map(|f| f.tick).collect()
    }

    /// Items whose process exited unsuccessfully.
    pub fn failures(&self) -> impl Iterator<Item = &FiredItem> {
        self.fired
            .iter()
            .filter(|f| matches!(f.outcome, ExecutionOutcome::Failed(_)))
    }
}
