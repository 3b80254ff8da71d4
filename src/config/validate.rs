// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{BarSection, ItemSection, PlanFile, RawPlanFile, RunConfig};
use crate::errors::{Result, WrapbarError};
use crate::exec::WorkItem;

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = WrapbarError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        let run = validate_bar(&raw.bar)?;
        validate_interpreter(&raw.script.interpreter)?;
        let items = raw
            .item
            .iter()
            .enumerate()
            .map(|(i, item)| validate_item(i + 1, item, &raw.inline.dependencies))
            .collect::<Result<Vec<_>>>()?;

        Ok(PlanFile::new_unchecked(
            run,
            raw.log,
            raw.script.interpreter,
            items,
        ))
    }
}

/// Turn a `[bar]` section into a [`RunConfig`].
pub fn validate_bar(bar: &BarSection) -> Result<RunConfig> {
    let delay = delay_from_secs(bar.delay)?;

    if bar.width == 0 {
        return Err(WrapbarError::ConfigError(
            "[bar].width must be >= 1 (got 0)".to_string(),
        ));
    }
    if bar.marker.is_empty() {
        return Err(WrapbarError::ConfigError(
            "[bar].marker must not be empty".to_string(),
        ));
    }

    Ok(RunConfig {
        label: bar.label.clone(),
        marker: bar.marker.clone(),
        delay,
        width: bar.width,
        timer: bar.timer,
    })
}

/// Convert a delay in seconds, rejecting negative or non-finite values.
pub fn delay_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        WrapbarError::ConfigError(format!(
            "delay must be a finite, non-negative number of seconds (got {secs})"
        ))
    })
}

fn validate_interpreter(interpreter: &str) -> Result<()> {
    if interpreter.trim().is_empty() {
        return Err(WrapbarError::ConfigError(
            "[script].interpreter must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_item(position: usize, item: &ItemSection, dependencies: &[String]) -> Result<WorkItem> {
    match (&item.shell, &item.script, &item.inline) {
        (Some(cmd), None, None) => {
            if cmd.trim().is_empty() {
                return Err(WrapbarError::ConfigError(format!(
                    "item #{position}: shell command is empty"
                )));
            }
            Ok(WorkItem::ShellCommand(cmd.clone()))
        }
        (None, Some(path), None) => Ok(WorkItem::ScriptFile(path.clone())),
        (None, None, Some(source)) => Ok(WorkItem::InlineCode {
            source: source.clone(),
            dependencies: dependencies.to_vec(),
        }),
        (None, None, None) => Err(WrapbarError::ConfigError(format!(
            "item #{position} must set one of `shell`, `script` or `inline`"
        ))),
        _ => Err(WrapbarError::ConfigError(format!(
            "item #{position} sets more than one of `shell`, `script` and `inline`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn negative_delay_is_rejected() {
        let bar = BarSection {
            delay: -0.5,
            ..BarSection::default()
        };
        let err = validate_bar(&bar).unwrap_err();
        assert!(matches!(err, WrapbarError::ConfigError(msg) if msg.contains("delay")));
    }

    #[test]
    fn nan_delay_is_rejected() {
        assert!(delay_from_secs(f64::NAN).is_err());
        assert_eq!(delay_from_secs(0.25).unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn item_with_two_kinds_is_rejected() {
        let item = ItemSection {
            shell: Some("echo hi".into()),
            script: Some(PathBuf::from("x.py")),
            inline: None,
        };
        let err = validate_item(3, &item, &[]).unwrap_err();
        assert!(matches!(err, WrapbarError::ConfigError(msg) if msg.contains("item #3")));
    }

    #[test]
    fn inline_items_share_dependencies() {
        let item = ItemSection {
            inline: Some("a = b".into()),
            ..ItemSection::default()
        };
        let deps = vec!["b = 1".to_string()];
        assert_eq!(
            validate_item(1, &item, &deps).unwrap(),
            WorkItem::InlineCode {
                source: "a = b".into(),
                dependencies: deps.clone(),
            }
        );
    }
}
