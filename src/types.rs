use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which timer widget is rendered to the right of the bar.
///
/// - `RemainingTimeEstimate`: an adaptive ETA (default).
/// - `ElapsedTime`: wall-clock time since the bar started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum TimerMode {
    #[default]
    RemainingTimeEstimate,
    ElapsedTime,
}

impl TimerMode {
    /// Parse a timer name, falling back to the ETA timer for anything
    /// unrecognised.
    pub fn parse_lenient(s: &str) -> Self {
        match s.parse() {
            Ok(mode) => mode,
            Err(err) => {
                tracing::warn!(%err, "falling back to ETA timer");
                TimerMode::RemainingTimeEstimate
            }
        }
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eta" | "remaining" | "remainingtimeestimate" => Ok(TimerMode::RemainingTimeEstimate),
            "elapsed" | "elapsedtime" => Ok(TimerMode::ElapsedTime),
            other => Err(format!(
                "invalid timer: {other} (expected \"eta\" or \"elapsed\")"
            )),
        }
    }
}

impl TryFrom<String> for TimerMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(TimerMode::parse_lenient(&value))
    }
}

/// Kind of a work item, used in run logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    ShellCommand,
    ScriptFile,
    InlineCode,
}

impl ItemKind {
    /// Header used for the "executed" line of the run log.
    pub fn log_header(self) -> &'static str {
        match self {
            ItemKind::ShellCommand => "Command Executed",
            ItemKind::ScriptFile => "File Executed",
            ItemKind::InlineCode => "Code Executed",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemKind::ShellCommand => "shell",
            ItemKind::ScriptFile => "script",
            ItemKind::InlineCode => "inline",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_accepts_source_spellings() {
        assert_eq!("ETA".parse::<TimerMode>(), Ok(TimerMode::RemainingTimeEstimate));
        assert_eq!("ElapsedTime".parse::<TimerMode>(), Ok(TimerMode::ElapsedTime));
        assert_eq!("elapsed".parse::<TimerMode>(), Ok(TimerMode::ElapsedTime));
    }

    #[test]
    fn unknown_timer_falls_back_to_eta() {
        assert!("stopwatch".parse::<TimerMode>().is_err());
        assert_eq!(TimerMode::parse_lenient("stopwatch"), TimerMode::RemainingTimeEstimate);
    }
}
