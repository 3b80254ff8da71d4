// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::{DEFAULT_INTERPRETER, WorkItem};
use crate::sink::LogOptions;
use crate::types::TimerMode;

/// Glyph used for the filled part of the bar unless configured otherwise.
pub const DEFAULT_MARKER: &str = "▓";

/// How one run's bar looks and how fast idle ticks pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Text drawn before the bar.
    pub label: String,
    /// Fill glyph; only the first character is used.
    pub marker: String,
    /// Sleep on every tick that has no item due.
    pub delay: Duration,
    /// Total render width in columns.
    pub width: u16,
    pub timer: TimerMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            marker: DEFAULT_MARKER.to_string(),
            delay: Duration::from_millis(100),
            width: 50,
            timer: TimerMode::default(),
        }
    }
}

/// A plan file as read from TOML, before validation.
///
/// ```toml
/// [bar]
/// label = "Build"
/// delay = 0.05
/// timer = "elapsed"
///
/// [log]
/// enabled = true
/// path = "build.log"
///
/// [inline]
/// dependencies = ["b = 10", "c = 115"]
///
/// [[item]]
/// shell = "cargo build"
///
/// [[item]]
/// inline = "a = b + c"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPlanFile {
    #[serde(default)]
    pub bar: BarSection,

    #[serde(default)]
    pub log: LogSection,

    #[serde(default)]
    pub inline: InlineSection,

    #[serde(default)]
    pub script: ScriptSection,

    /// `[[item]]` entries in execution order.
    #[serde(default)]
    pub item: Vec<ItemSection>,
}

/// `[bar]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BarSection {
    #[serde(default)]
    pub label: String,

    #[serde(default = "default_marker")]
    pub marker: String,

    /// Idle-tick delay in seconds.
    #[serde(default = "default_delay")]
    pub delay: f64,

    #[serde(default = "default_width")]
    pub width: u16,

    #[serde(default)]
    pub timer: TimerMode,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_delay() -> f64 {
    0.1
}

fn default_width() -> u16 {
    50
}

impl Default for BarSection {
    fn default() -> Self {
        Self {
            label: String::new(),
            marker: default_marker(),
            delay: default_delay(),
            width: default_width(),
            timer: TimerMode::default(),
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogSection {
    #[serde(default)]
    pub enabled: bool,

    /// Log file; defaults to `.log` in the current directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub auto_close: bool,
}

impl LogSection {
    /// Run options for this section. The file is opened when the run starts.
    pub fn to_options(&self) -> LogOptions {
        LogOptions {
            enabled: self.enabled,
            sink: None,
            path: self.path.clone(),
            auto_close: self.auto_close,
        }
    }
}

/// `[inline]` section: assignments prepended to every inline item.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InlineSection {
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// `[script]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptSection {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
}

fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}

impl Default for ScriptSection {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
        }
    }
}

/// One `[[item]]`; exactly one field must be set.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ItemSection {
    #[serde(default)]
    pub shell: Option<String>,

    #[serde(default)]
    pub script: Option<PathBuf>,

    #[serde(default)]
    pub inline: Option<String>,
}

/// A validated plan, ready to hand to [`Wrapper::run_plan`].
///
/// [`Wrapper::run_plan`]: crate::wrapper::Wrapper::run_plan
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub run: RunConfig,
    pub log: LogSection,
    pub interpreter: String,
    pub items: Vec<WorkItem>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(
        run: RunConfig,
        log: LogSection,
        interpreter: String,
        items: Vec<WorkItem>,
    ) -> Self {
        Self {
            run,
            log,
            interpreter,
            items,
        }
    }

    pub fn has_inline_items(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, WorkItem::InlineCode { .. }))
    }
}
