// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::Result;

/// Load a plan file from a given path and return the raw `RawPlanFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// a runnable [`PlanFile`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPlanFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Parse plan TOML that is already in memory.
pub fn parse_str(contents: &str) -> Result<RawPlanFile> {
    let plan: RawPlanFile = toml::from_str(contents)?;
    Ok(plan)
}

/// Load a plan file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks bar settings and that every `[[item]]` names exactly one kind.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PlanFile> {
    let raw = load_from_path(&path)?;
    PlanFile::try_from(raw)
}

/// `Wrapbar.toml` in the current working directory.
pub fn default_plan_path() -> PathBuf {
    PathBuf::from("Wrapbar.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::WorkItem;
    use crate::types::TimerMode;

    #[test]
    fn empty_plan_uses_defaults() {
        let plan = PlanFile::try_from(parse_str("").unwrap()).unwrap();
        assert!(plan.items.is_empty());
        assert_eq!(plan.run.marker, "▓");
        assert_eq!(plan.run.width, 50);
        assert_eq!(plan.interpreter, "python");
        assert!(!plan.log.enabled);
    }

    #[test]
    fn parses_mixed_items_in_order() {
        let raw = parse_str(
            r#"
[bar]
label = "Deploy"
timer = "ElapsedTime"
delay = 0

[inline]
dependencies = ["n = 2"]

[[item]]
shell = "echo one"

[[item]]
inline = "m = n * 2"

[[item]]
script = "tools/x.py"
"#,
        )
        .unwrap();
        let plan = PlanFile::try_from(raw).unwrap();

        assert_eq!(plan.run.label, "Deploy");
        assert_eq!(plan.run.timer, TimerMode::ElapsedTime);
        assert_eq!(plan.run.delay, std::time::Duration::ZERO);
        assert_eq!(plan.items.len(), 3);
        assert_eq!(plan.items[0], WorkItem::ShellCommand("echo one".into()));
        assert!(plan.has_inline_items());
    }

    #[test]
    fn unknown_timer_falls_back() {
        let raw = parse_str("[bar]\ntimer = \"hourglass\"\n").unwrap();
        assert_eq!(raw.bar.timer, TimerMode::RemainingTimeEstimate);
    }
}
