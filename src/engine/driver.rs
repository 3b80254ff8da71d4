// src/engine/driver.rs

use std::fmt;
use std::time::Duration;

use anyhow::anyhow;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bar::TickBar;
use crate::bindings::Bindings;
use crate::errors::Result;
use crate::exec::{ExecutionOutcome, PreparedItem};
use crate::schedule::{TICKS, compute_interval, is_due};
use crate::sink::LogSink;

use super::{FiredItem, RunReport, RunState};

/// Walks the tick scale once, running items on their due ticks.
///
/// Items run strictly one after another on the calling task. The only
/// suspension points are the idle sleep and the wait on a running item;
/// both observe the cancellation token.
pub struct ProgressDriver {
    bar: Box<dyn TickBar>,
    delay: Duration,
    cancel: CancellationToken,
    state: RunState,
}

impl fmt::Debug for ProgressDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressDriver")
            .field("delay", &self.delay)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ProgressDriver {
    pub fn new(bar: Box<dyn TickBar>, delay: Duration, cancel: CancellationToken) -> Self {
        Self {
            bar,
            delay,
            cancel,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run `items` over the full tick scale.
    ///
    /// Cancellation is not an error: the report comes back with
    /// [`RunState::Interrupted`]. Errors are spawn failures, inline runtime
    /// faults, and sink write failures.
    pub async fn run(
        &mut self,
        items: &[PreparedItem],
        sink: Option<&LogSink>,
        bindings: &mut Bindings,
    ) -> Result<RunReport> {
        if self.state != RunState::Idle {
            return Err(anyhow!("progress driver has already run (state {:?})", self.state).into());
        }

        let cancel = self.cancel.clone();
        let n = items.len();
        let interval = compute_interval(n);
        let mut fired: Vec<FiredItem> = Vec::with_capacity(n);
        let mut bar_updates = 0u64;

        self.bar.start();
        self.state = RunState::Running;
        info!(items = n, interval, "run started");

        for tick in 0..TICKS {
            if cancel.is_cancelled() {
                return Ok(self.interrupt(tick, fired, n, bar_updates));
            }

            if is_due(tick, interval, fired.len(), n) {
                let index = fired.len();
                let item = &items[index];
                debug!(tick, index, kind = %item.kind(), item = %item.display(), "item due");

                // On error the driver stays `Running`; it cannot be reused.
                let outcome = item.execute(index, sink, bindings, &cancel).await?;
                if outcome == ExecutionOutcome::Cancelled {
                    return Ok(self.interrupt(tick, fired, n, bar_updates));
                }
                fired.push(FiredItem {
                    tick,
                    index,
                    outcome,
                });
            } else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        return Ok(self.interrupt(tick, fired, n, bar_updates));
                    }
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }

            self.bar.update(tick);
            bar_updates += 1;
        }

        self.bar.finish();
        self.state = RunState::Finished;

        let unfired = n - fired.len();
        if unfired > 0 {
            warn!(unfired, "more items than ticks; trailing items never ran");
        }
        info!(fired = fired.len(), "run finished");

        Ok(RunReport {
            state: self.state,
            fired,
            unfired,
            bar_updates,
        })
    }

    fn interrupt(
        &mut self,
        tick: u64,
        fired: Vec<FiredItem>,
        n: usize,
        bar_updates: u64,
    ) -> RunReport {
        info!(tick, "run interrupted");
        self.state = RunState::Interrupted;
        RunReport {
            state: self.state,
            unfired: n - fired.len(),
            fired,
            bar_updates,
        }
    }
}
