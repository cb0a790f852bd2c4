//! Consumer-facing views of a finished run.
//!
//! Report rendering and notification delivery live outside this crate; these
//! helpers give them the issue list and a serializable snapshot.

use chrono::Utc;
use serde::Serialize;

use crate::orchestrator::CheckRun;
use crate::result::CheckResult;
use crate::summary::Summary;
use crate::types::Timestamp;

/// Results needing attention (`WARNING` or `CRITICAL`), in run order.
pub fn issues(results: &[CheckResult]) -> Vec<&CheckResult> {
    results.iter().filter(|r| r.status.is_issue()).collect()
}

/// Plain-text issue digest suitable for chat or email bodies.
pub fn format_issue_message(results: &[CheckResult]) -> String {
    let issues = issues(results);
    if issues.is_empty() {
        return "All checks passed.".to_string();
    }

    let mut lines = vec!["Items requiring action:".to_string()];
    for issue in issues {
        lines.push(format!("[{}] {} {}", issue.status, issue.check_id, issue.name));
        lines.push(format!("    {}", issue.message));
    }
    lines.join("\n")
}

/// Serializable snapshot of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub summary: &'a Summary,
    pub results: &'a [CheckResult],
    pub timestamp: Timestamp,
    pub demo_mode: bool,
    pub complete: bool,
}

impl<'a> RunReport<'a> {
    pub fn new(run: &'a CheckRun, demo_mode: bool) -> Self {
        Self {
            summary: &run.summary,
            results: &run.results,
            timestamp: Utc::now(),
            demo_mode,
            complete: run.is_complete(),
        }
    }
}
