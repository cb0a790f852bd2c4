//! Integration tests for environment-driven agent configuration.
//!
//! Uses [`AgentConfig::from_lookup`] with synthetic environments so tests
//! never touch the process environment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use assert_matches::assert_matches;
use infracheck_agent::config::{AgentConfig, ConfigError, OutputMode, DEFAULT_CATALOG_PATH};

fn load(vars: &[(&str, &str)]) -> Result<AgentConfig, ConfigError> {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AgentConfig::from_lookup(|var| env.get(var).cloned())
}

// ---------------------------------------------------------------------------
// Test: defaults
// ---------------------------------------------------------------------------

/// An empty environment yields the documented defaults.
#[test]
fn empty_environment_uses_defaults() {
    let config = load(&[]).expect("defaults load");
    assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
    assert!(!config.demo_mode);
    assert_eq!(config.concurrency, 1);
    assert_eq!(config.probe_timeout, Duration::from_secs(30));
    assert_eq!(config.query_tool, "kubectl");
    assert_eq!(config.output, OutputMode::Text);
}

/// Blank values behave exactly like missing variables.
#[test]
fn blank_values_count_as_unset() {
    let config = load(&[("INFRACHECK_CONCURRENCY", "  "), ("INFRACHECK_DEMO", "")])
        .expect("blank values load");
    assert_eq!(config, AgentConfig::default());
}

// ---------------------------------------------------------------------------
// Test: overrides
// ---------------------------------------------------------------------------

/// Every variable overrides its default.
#[test]
fn overrides_are_applied() {
    let config = load(&[
        ("INFRACHECK_CATALOG", "/etc/infracheck/items.yaml"),
        ("INFRACHECK_DEMO", "yes"),
        ("INFRACHECK_CONCURRENCY", "8"),
        ("INFRACHECK_PROBE_TIMEOUT_SECS", "5"),
        ("INFRACHECK_QUERY_TOOL", "oc"),
        ("INFRACHECK_OUTPUT", "json"),
    ])
    .expect("overrides load");

    assert_eq!(config.catalog_path, PathBuf::from("/etc/infracheck/items.yaml"));
    assert!(config.demo_mode);
    assert_eq!(config.concurrency, 8);
    assert_eq!(config.probe_timeout, Duration::from_secs(5));
    assert_eq!(config.query_tool, "oc");
    assert_eq!(config.output, OutputMode::Json);
}

/// `run_options` carries demo mode, concurrency and timeout through.
#[test]
fn run_options_mirror_config() {
    let config = load(&[("INFRACHECK_DEMO", "1"), ("INFRACHECK_CONCURRENCY", "3")])
        .expect("config loads");
    let options = config.run_options();
    assert!(options.demo_mode);
    assert_eq!(options.concurrency, 3);
    assert_eq!(options.probe_timeout, Duration::from_secs(30));
}

// ---------------------------------------------------------------------------
// Test: invalid values
// ---------------------------------------------------------------------------

/// An unrecognised boolean spelling is a configuration error.
#[test]
fn invalid_boolean_is_rejected() {
    let err = load(&[("INFRACHECK_DEMO", "sometimes")]).expect_err("invalid bool");
    assert_matches!(err, ConfigError::InvalidBool { var: "INFRACHECK_DEMO", .. });
}

/// Concurrency must be at least 1.
#[test]
fn zero_concurrency_is_rejected() {
    let err = load(&[("INFRACHECK_CONCURRENCY", "0")]).expect_err("zero concurrency");
    assert_matches!(err, ConfigError::InvalidNumber { var: "INFRACHECK_CONCURRENCY", .. });
}

/// A timeout with a unit suffix is rejected and echoed back.
#[test]
fn non_numeric_timeout_is_rejected() {
    let err = load(&[("INFRACHECK_PROBE_TIMEOUT_SECS", "30s")]).expect_err("bad timeout");
    assert_matches!(
        err,
        ConfigError::InvalidNumber { var: "INFRACHECK_PROBE_TIMEOUT_SECS", ref value }
            if value == "30s"
    );
}

/// The output mode error names the accepted values.
#[test]
fn unknown_output_mode_is_rejected() {
    let err = load(&[("INFRACHECK_OUTPUT", "yaml")]).expect_err("bad output");
    assert_eq!(
        err.to_string(),
        "INFRACHECK_OUTPUT must be one of text, json, quiet, got 'yaml'"
    );
}
