// src/wrapper.rs

//! Caller-facing entry points.
//!
//! ```no_run
//! # async fn demo() -> wrapbar::errors::Result<()> {
//! use wrapbar::{RunConfig, Wrapper};
//!
//! let mut wrapper = Wrapper::new();
//! wrapper
//!     .inline_wrapper(&["a = b + c"], &["b = 10", "c = 115"], &RunConfig::default())
//!     .await?;
//! assert_eq!(wrapper.results()["a"], wrapbar::Value::Int(125));
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::bar::{BarFactory, IndicatifBars};
use crate::bindings::Bindings;
use crate::config::{PlanFile, RunConfig};
use crate::engine::{ProgressDriver, RunReport};
use crate::errors::Result;
use crate::exec::{DEFAULT_INTERPRETER, WorkItem, prepare_all};
use crate::sink::LogOptions;

/// Runs sequences of work items behind one progress bar.
///
/// Every run builds a fresh bar through the configured [`BarFactory`] and
/// observes the wrapper's cancellation token. Cancelling the token ends the
/// current run early with an interrupted [`RunReport`]; the token is not
/// reset, so later runs on the same wrapper return immediately.
pub struct Wrapper {
    bars: Arc<dyn BarFactory>,
    cancel: CancellationToken,
    interpreter: String,
    results: Bindings,
}

impl Default for Wrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Wrapper {
    pub fn new() -> Self {
        Self {
            bars: Arc::new(IndicatifBars),
            cancel: CancellationToken::new(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            results: Bindings::default(),
        }
    }

    pub fn with_bars(mut self, bars: impl BarFactory + 'static) -> Self {
        self.bars = Arc::new(bars);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Interpreter for [`script_wrapper`](Self::script_wrapper).
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Bindings from the most recent inline run.
    pub fn results(&self) -> &Bindings {
        &self.results
    }

    /// A bar with nothing behind it.
    pub async fn decoy(&self, config: &RunConfig) -> Result<RunReport> {
        let mut scratch = Bindings::default();
        self.drive(&[], config, &LogOptions::disabled(), &self.interpreter, &mut scratch)
            .await
    }

    /// Run shell commands, one per scheduled tick.
    pub async fn shell_wrapper<S: AsRef<str>>(
        &self,
        commands: &[S],
        config: &RunConfig,
        logging: &LogOptions,
    ) -> Result<RunReport> {
        let items: Vec<WorkItem> = commands
            .iter()
            .map(|c| WorkItem::ShellCommand(c.as_ref().to_string()))
            .collect();
        let mut scratch = Bindings::default();
        self.drive(&items, config, logging, &self.interpreter, &mut scratch)
            .await
    }

    /// Run script files with the configured interpreter.
    pub async fn script_wrapper<P: AsRef<Path>>(
        &self,
        scripts: &[P],
        config: &RunConfig,
        logging: &LogOptions,
    ) -> Result<RunReport> {
        let items: Vec<WorkItem> = scripts
            .iter()
            .map(|p| WorkItem::ScriptFile(p.as_ref().to_path_buf()))
            .collect();
        let mut scratch = Bindings::default();
        self.drive(&items, config, logging, &self.interpreter, &mut scratch)
            .await
    }

    /// Run inline fragments against one shared namespace.
    ///
    /// `dependencies` are assignment statements prepended to every fragment.
    /// All fragments are compiled before the bar starts. Afterwards the final
    /// namespace, dependency names included, is available from
    /// [`results`](Self::results), replacing that of any earlier run.
    pub async fn inline_wrapper<S: AsRef<str>, D: AsRef<str>>(
        &mut self,
        fragments: &[S],
        dependencies: &[D],
        config: &RunConfig,
    ) -> Result<RunReport> {
        let dependencies: Vec<String> = dependencies
            .iter()
            .map(|d| d.as_ref().to_string())
            .collect();
        let items: Vec<WorkItem> = fragments
            .iter()
            .map(|f| WorkItem::InlineCode {
                source: f.as_ref().to_string(),
                dependencies: dependencies.clone(),
            })
            .collect();

        self.results = Bindings::default();
        let mut bindings = Bindings::default();
        let outcome = self
            .drive(&items, config, &LogOptions::disabled(), &self.interpreter, &mut bindings)
            .await;
        self.results = bindings;
        outcome
    }

    /// Run a validated plan file, which may mix item kinds.
    pub async fn run_plan(&mut self, plan: &PlanFile) -> Result<RunReport> {
        let logging = plan.log.to_options();
        let mut bindings = Bindings::default();
        let outcome = self
            .drive(&plan.items, &plan.run, &logging, &plan.interpreter, &mut bindings)
            .await;
        if plan.has_inline_items() {
            self.results = bindings;
        }
        outcome
    }

    async fn drive(
        &self,
        items: &[WorkItem],
        config: &RunConfig,
        logging: &LogOptions,
        interpreter: &str,
        bindings: &mut Bindings,
    ) -> Result<RunReport> {
        // Everything that can fail up front does so before the bar exists.
        let prepared = prepare_all(items, interpreter)?;
        let sink = logging.acquire()?;

        let mut driver =
            ProgressDriver::new(self.bars.build(config), config.delay, self.cancel.clone());
        let outcome = driver.run(&prepared, sink.as_ref(), bindings).await;

        let closed = match (&sink, logging.auto_close) {
            (Some(sink), true) => {
                debug!(sink = sink.description(), "auto-closing log sink");
                sink.close()
            }
            _ => Ok(()),
        };

        let report = outcome?;
        closed?;
        Ok(report)
    }
}
