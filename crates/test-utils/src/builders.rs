#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use wrapbar::config::{ItemSection, PlanFile, RawPlanFile};
use wrapbar::RunConfig;

/// A `RunConfig` that never sleeps, for fast tests.
pub fn fast_config() -> RunConfig {
    RunConfig {
        delay: Duration::ZERO,
        ..RunConfig::default()
    }
}

/// Builder for `PlanFile` to simplify test setup.
pub struct PlanFileBuilder {
    plan: RawPlanFile,
}

impl PlanFileBuilder {
    pub fn new() -> Self {
        let mut plan = RawPlanFile::default();
        plan.bar.delay = 0.0;
        Self { plan }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.plan.bar.label = label.to_string();
        self
    }

    pub fn shell(mut self, cmd: &str) -> Self {
        self.plan.item.push(ItemSection {
            shell: Some(cmd.to_string()),
            ..ItemSection::default()
        });
        self
    }

    pub fn script(mut self, path: impl AsRef<Path>) -> Self {
        self.plan.item.push(ItemSection {
            script: Some(path.as_ref().to_path_buf()),
            ..ItemSection::default()
        });
        self
    }

    pub fn inline(mut self, source: &str) -> Self {
        self.plan.item.push(ItemSection {
            inline: Some(source.to_string()),
            ..ItemSection::default()
        });
        self
    }

    pub fn dependency(mut self, assignment: &str) -> Self {
        self.plan.inline.dependencies.push(assignment.to_string());
        self
    }

    pub fn interpreter(mut self, interpreter: &str) -> Self {
        self.plan.script.interpreter = interpreter.to_string();
        self
    }

    pub fn log_to(mut self, path: impl Into<PathBuf>, auto_close: bool) -> Self {
        self.plan.log.enabled = true;
        self.plan.log.path = Some(path.into());
        self.plan.log.auto_close = auto_close;
        self
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
