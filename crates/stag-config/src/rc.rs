//! Lenient parser for the line-oriented `stagrc` format.
//!
//! Each line holds a `key value` pair split on the first space. Comment lines
//! (leading `#`) and lines without a space are skipped silently. Unknown keys
//! and values that do not parse are skipped too, but each one is recorded as a
//! [`ConfigDiagnostic`] so the server can log it once telemetry is running.

use std::fmt;
use std::time::Duration;

use crate::Config;
use crate::logging::LogFormat;

/// A line of the rc file that was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    /// One-based line number within the rc file, or zero for file-level issues.
    pub line: usize,
    /// Human-readable reason the line was ignored.
    pub reason: String,
}

impl ConfigDiagnostic {
    pub(crate) fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            formatter.write_str(&self.reason)
        } else {
            write!(formatter, "line {}: {}", self.line, self.reason)
        }
    }
}

/// Applies every recognised setting in `contents` to `config`.
pub(crate) fn apply_rc(contents: &str, config: &mut Config) -> Vec<ConfigDiagnostic> {
    let mut diagnostics = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim_start();
        if line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(' ') else {
            continue;
        };
        if let Err(reason) = apply_setting(config, key, value.trim()) {
            diagnostics.push(ConfigDiagnostic::new(index + 1, reason));
        }
    }
    diagnostics
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("setting '{key}' has no value"));
    }
    match key {
        "host" => config.host = value.to_owned(),
        "port" => config.port = parse_number(key, value)?,
        "spawn" => config.spawn.push(value.to_owned()),
        "log_filter" => config.log_filter = value.to_owned(),
        "log_format" => {
            config.log_format = value
                .parse::<LogFormat>()
                .map_err(|_| format!("unknown log format '{value}'"))?;
        }
        "debug" => config.debug_requests = parse_flag(key, value)?,
        "read_timeout_ms" => {
            config.read_timeout = Duration::from_millis(parse_number(key, value)?);
        }
        "spawn_delay_ms" => {
            config.spawn_delay = Duration::from_millis(parse_number(key, value)?);
        }
        other => return Err(format!("unknown setting '{other}'")),
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("setting '{key}' expects a number, got '{value}'"))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("setting '{key}' expects true or false, got '{value}'")),
    }
}
