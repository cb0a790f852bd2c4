//! Classification policy constants and per-identifier policy tables.
//!
//! Every numeric cutoff used by the evaluators lives here so the mapping from
//! raw value to status can be audited in one place.

use std::time::Duration;

use crate::evaluate::usage::UsageMetric;

// ---------------------------------------------------------------------------
// Threshold evaluation
// ---------------------------------------------------------------------------

/// Fraction of the threshold below which a utilization reading is `OK`.
pub const THRESHOLD_WARNING_RATIO: f64 = 0.8;

/// Highest non-zero count still classified `WARNING` for zero-is-ok checks.
pub const ZERO_IS_OK_WARNING_MAX: f64 = 3.0;

/// Checks whose healthy value is exactly zero occurrences.
///
/// | Id        | Counts                          |
/// |-----------|---------------------------------|
/// | `OS-005`  | zombie processes                |
/// | `K8S-008` | not-ready nodes                 |
/// | `SVC-004` | services without endpoints      |
/// | `SVC-006` | pods with excessive restarts    |
/// | `SVC-007` | pending pods                    |
/// | `SVC-008` | failed pods                     |
/// | `SVC-010` | failed jobs                     |
pub const ZERO_IS_OK_IDS: &[&str] = &[
    "OS-005", "K8S-008", "SVC-004", "SVC-006", "SVC-007", "SVC-008", "SVC-010",
];

pub fn is_zero_ok(check_id: &str) -> bool {
    ZERO_IS_OK_IDS.contains(&check_id)
}

// ---------------------------------------------------------------------------
// Ratio / replica match
// ---------------------------------------------------------------------------

/// A listing with more than this fraction of matching lines is `WARNING`
/// rather than `CRITICAL`.
pub const RATIO_WARNING_FRACTION: f64 = 0.7;

/// Highest number of mismatched resources still classified `WARNING`.
pub const REPLICA_WARNING_MAX_ISSUES: usize = 2;

/// How many mismatched resource names a `WARNING` message lists.
pub const REPLICA_MAX_NAMED_ISSUES: usize = 3;

/// Literal placeholder some probes print instead of data.
pub const NOT_APPLICABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Utilization reports
// ---------------------------------------------------------------------------

/// Identifiers whose output is a per-node utilization table.
pub const USAGE_PROBES: &[(&str, UsageMetric)] = &[
    ("K8S-002", UsageMetric::Cpu),
    ("K8S-003", UsageMetric::Memory),
];

pub fn usage_metric_for(check_id: &str) -> Option<UsageMetric> {
    USAGE_PROBES
        .iter()
        .find(|(id, _)| *id == check_id)
        .map(|(_, metric)| *metric)
}

// ---------------------------------------------------------------------------
// Probe execution
// ---------------------------------------------------------------------------

/// Checks whose query exits non-zero when nothing matched, which for them is
/// the healthy "zero" reading rather than a failure.
pub const NO_MATCH_IS_ZERO_IDS: &[&str] = &["K8S-008"];

pub fn no_match_is_zero(check_id: &str) -> bool {
    NO_MATCH_IS_ZERO_IDS.contains(&check_id)
}

/// Per-command timeout used when the caller does not override it.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Cluster query tool gated by the availability probe.
pub const DEFAULT_QUERY_TOOL: &str = "kubectl";

/// Marker in stderr meaning the metrics subsystem is not installed.
pub const METRICS_API_UNAVAILABLE_MARKER: &str = "metrics api not available";

// ---------------------------------------------------------------------------
// Result truncation
// ---------------------------------------------------------------------------

/// Maximum characters kept in [`crate::result::CheckResult::value`].
pub const MAX_VALUE_CHARS: usize = 300;

/// Maximum characters kept in [`crate::result::CheckResult::raw_output`].
pub const MAX_RAW_OUTPUT_CHARS: usize = 500;

/// Maximum characters of stderr quoted in a failure message.
pub const MAX_ERROR_CHARS: usize = 100;

/// Truncate `text` to at most `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
