use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use wrapbar::RunConfig;
use wrapbar::bar::{BarFactory, TickBar};

/// Everything a [`RecordingBar`] saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarLog {
    pub started: bool,
    pub updates: Vec<u64>,
    pub finished: bool,
    pub labels: Vec<String>,
}

/// A bar that records calls instead of drawing.
///
/// Optionally cancels a token right after a given tick has been rendered,
/// which lets tests inject an interrupt at a precise point of the run.
pub struct RecordingBar {
    log: Arc<Mutex<BarLog>>,
    cancel_after: Option<(u64, CancellationToken)>,
}

impl TickBar for RecordingBar {
    fn start(&mut self) {
        self.log.lock().unwrap().started = true;
    }

    fn update(&mut self, tick: u64) {
        self.log.lock().unwrap().updates.push(tick);
        if let Some((at, token)) = &self.cancel_after {
            if *at == tick {
                token.cancel();
            }
        }
    }

    fn finish(&mut self) {
        self.log.lock().unwrap().finished = true;
    }
}

/// Factory handing out [`RecordingBar`]s that share one [`BarLog`].
#[derive(Clone, Default)]
pub struct RecordingBars {
    log: Arc<Mutex<BarLog>>,
    cancel_after: Option<(u64, CancellationToken)>,
}

impl RecordingBars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` once tick `tick` has been rendered.
    pub fn cancel_after(mut self, tick: u64, token: CancellationToken) -> Self {
        self.cancel_after = Some((tick, token));
        self
    }

    pub fn log(&self) -> BarLog {
        self.log.lock().unwrap().clone()
    }

    /// A single bar sharing this factory's log, for driving
    /// `ProgressDriver` directly.
    pub fn bar(&self) -> Box<dyn TickBar> {
        Box::new(RecordingBar {
            log: Arc::clone(&self.log),
            cancel_after: self.cancel_after.clone(),
        })
    }
}

impl BarFactory for RecordingBars {
    fn build(&self, config: &RunConfig) -> Box<dyn TickBar> {
        self.log.lock().unwrap().labels.push(config.label.clone());
        self.bar()
    }
}
