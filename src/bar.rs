// src/bar.rs

//! Progress bar boundary.
//!
//! The driver only ever talks to a [`TickBar`]: start it, feed it tick
//! positions, and finish it. Production bars are drawn by `indicatif`; tests
//! substitute a recording double through [`BarFactory`].

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::config::RunConfig;
use crate::schedule::TICKS;
use crate::types::TimerMode;

/// A bar that consumes integer tick positions.
pub trait TickBar: Send {
    /// Called once when the run moves from idle to running.
    fn start(&mut self);
    /// Move the bar to `tick` (`0..TICKS`).
    fn update(&mut self, tick: u64);
    /// Final render after the last tick. Not called for interrupted runs.
    fn finish(&mut self);
}

/// Builds one bar per run from the run's configuration.
pub trait BarFactory: Send + Sync {
    fn build(&self, config: &RunConfig) -> Box<dyn TickBar>;
}

/// Terminal bar drawn on stderr.
pub struct IndicatifBar {
    bar: ProgressBar,
}

impl IndicatifBar {
    pub fn new(config: &RunConfig) -> Self {
        let bar = ProgressBar::with_draw_target(Some(TICKS), ProgressDrawTarget::stderr());
        bar.set_style(style_for(config));
        bar.set_prefix(config.label.clone());
        Self { bar }
    }
}

impl TickBar for IndicatifBar {
    fn start(&mut self) {
        self.bar.reset();
        self.bar.tick();
    }

    fn update(&mut self, tick: u64) {
        self.bar.set_position(tick);
    }

    fn finish(&mut self) {
        self.bar.set_position(TICKS);
        self.bar.finish();
    }
}

/// Factory for [`IndicatifBar`]s; the default for [`Wrapper`](crate::wrapper::Wrapper).
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatifBars;

impl BarFactory for IndicatifBars {
    fn build(&self, config: &RunConfig) -> Box<dyn TickBar> {
        Box::new(IndicatifBar::new(config))
    }
}

const TIMER_COLUMNS: usize = 24;
const MIN_BAR_COLUMNS: usize = 10;

fn style_for(config: &RunConfig) -> ProgressStyle {
    let timer = match config.timer {
        TimerMode::RemainingTimeEstimate => "ETA: {eta_precise}",
        TimerMode::ElapsedTime => "Elapsed Time: {elapsed_precise}",
    };
    let template = format!(
        "{{prefix}} |{{bar:{}}}| {timer}",
        bar_columns(config)
    );

    let marker = config.marker.chars().next().unwrap_or('#');
    ProgressStyle::with_template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(&format!("{marker}{marker} "))
}

/// Columns left for the bar itself once the label and timer are drawn.
fn bar_columns(config: &RunConfig) -> usize {
    let label = config.label.chars().count();
    usize::from(config.width)
        .saturating_sub(label + TIMER_COLUMNS + 3)
        .max(MIN_BAR_COLUMNS)
}
