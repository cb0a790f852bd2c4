//! Agent configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use infracheck_core::policy::{DEFAULT_PROBE_TIMEOUT, DEFAULT_QUERY_TOOL};
use infracheck_core::RunOptions;

/// Catalog location used when `INFRACHECK_CATALOG` is unset.
pub const DEFAULT_CATALOG_PATH: &str = "config/check_items.yaml";

/// Invalid environment value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a boolean (true/false, 1/0, yes/no, on/off), got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("INFRACHECK_OUTPUT must be one of text, json, quiet, got '{value}'")]
    InvalidOutput { value: String },
}

/// How the run outcome is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable summary, per-item details and issue digest.
    #[default]
    Text,
    /// One JSON document with summary and results.
    Json,
    /// Nothing; only the exit code and logs.
    Quiet,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "quiet" => Ok(Self::Quiet),
            _ => Err(ConfigError::InvalidOutput {
                value: s.to_string(),
            }),
        }
    }
}

/// Agent settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub catalog_path: PathBuf,
    pub demo_mode: bool,
    /// Items evaluated at once (at least 1).
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub query_tool: String,
    pub output: OutputMode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            demo_mode: false,
            concurrency: 1,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            query_tool: DEFAULT_QUERY_TOOL.to_string(),
            output: OutputMode::Text,
        }
    }
}

impl AgentConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                          | Default                   |
    /// |----------------------------------|---------------------------|
    /// | `INFRACHECK_CATALOG`             | `config/check_items.yaml` |
    /// | `INFRACHECK_DEMO`                | `false`                   |
    /// | `INFRACHECK_CONCURRENCY`         | `1`                       |
    /// | `INFRACHECK_PROBE_TIMEOUT_SECS`  | `30`                      |
    /// | `INFRACHECK_QUERY_TOOL`          | `kubectl`                 |
    /// | `INFRACHECK_OUTPUT`              | `text`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let catalog_path = get("INFRACHECK_CATALOG")
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);

        let demo_mode = match get("INFRACHECK_DEMO") {
            Some(value) => parse_bool("INFRACHECK_DEMO", &value)?,
            None => defaults.demo_mode,
        };

        let concurrency = match get("INFRACHECK_CONCURRENCY") {
            Some(value) => parse_positive("INFRACHECK_CONCURRENCY", &value)? as usize,
            None => defaults.concurrency,
        };

        let probe_timeout = match get("INFRACHECK_PROBE_TIMEOUT_SECS") {
            Some(value) => {
                Duration::from_secs(parse_positive("INFRACHECK_PROBE_TIMEOUT_SECS", &value)?)
            }
            None => defaults.probe_timeout,
        };

        let query_tool = get("INFRACHECK_QUERY_TOOL")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.query_tool);

        let output = match get("INFRACHECK_OUTPUT") {
            Some(value) => value.parse()?,
            None => defaults.output,
        };

        Ok(Self {
            catalog_path,
            demo_mode,
            concurrency,
            probe_timeout,
            query_tool,
            output,
        })
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            demo_mode: self.demo_mode,
            probe_timeout: self.probe_timeout,
            concurrency: self.concurrency,
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_spellings() {
        for value in ["1", "true", "TRUE", "yes", "On"] {
            assert_eq!(parse_bool("X", value), Ok(true), "{value}");
        }
        for value in ["0", "false", "No", "off"] {
            assert_eq!(parse_bool("X", value), Ok(false), "{value}");
        }
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn positive_numbers_only() {
        assert_eq!(parse_positive("X", " 4 "), Ok(4));
        assert!(parse_positive("X", "0").is_err());
        assert!(parse_positive("X", "-2").is_err());
        assert!(parse_positive("X", "two").is_err());
    }

    #[test]
    fn output_mode_parsing() {
        assert_eq!("json".parse::<OutputMode>(), Ok(OutputMode::Json));
        assert_eq!(" Quiet ".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert!("xml".parse::<OutputMode>().is_err());
    }
}
