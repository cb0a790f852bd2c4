//! Replica match for `name:available/desired` listings.
//!
//! Deployments, StatefulSets and DaemonSets are reported one per line. A
//! resource whose available count differs from its desired count is an
//! issue. Counts are compared as strings because probes may print
//! placeholders such as `<none>`.

use crate::error::CheckError;
use crate::policy::{REPLICA_MAX_NAMED_ISSUES, REPLICA_WARNING_MAX_ISSUES};
use crate::status::Status;

use super::{listing_lines, Evaluation};

/// One parsed listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaLine<'a> {
    pub name: &'a str,
    pub available: &'a str,
    pub desired: &'a str,
}

impl ReplicaLine<'_> {
    pub fn is_mismatched(&self) -> bool {
        self.available != self.desired
    }
}

/// Parse `name:available/desired`. The pair is taken from the last
/// colon-separated field so names may not contain colons but the line may
/// carry extra fields in between.
pub fn parse_line(line: &str) -> Result<ReplicaLine<'_>, CheckError> {
    let malformed = || CheckError::MalformedLine {
        line: line.to_string(),
    };

    let mut fields = line.split(':');
    let name = fields.next().ok_or_else(malformed)?;
    let pair = fields.last().ok_or_else(malformed)?;

    let mut counts = pair.split('/');
    match (counts.next(), counts.next(), counts.next()) {
        (Some(available), Some(desired), None) => Ok(ReplicaLine {
            name,
            available: available.trim(),
            desired: desired.trim(),
        }),
        _ => Err(malformed()),
    }
}

/// Resources counted and the names of those with mismatched replicas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicaReport {
    pub resources: usize,
    pub issues: Vec<String>,
}

/// Scan a listing. Lines without a colon are not resources; lines with a
/// colon but no valid pair count as resources but are skipped for
/// comparison.
pub fn scan(text: &str) -> ReplicaReport {
    let mut report = ReplicaReport::default();

    for line in listing_lines(text).filter(|line| line.contains(':')) {
        report.resources += 1;
        if !line.contains('/') {
            continue;
        }
        match parse_line(line) {
            Ok(parsed) if parsed.is_mismatched() => report.issues.push(parsed.name.to_string()),
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Skipping replica line"),
        }
    }

    report
}

pub fn classify(report: &ReplicaReport) -> Status {
    if report.resources == 0 {
        Status::Unknown
    } else if report.issues.is_empty() {
        Status::Ok
    } else if report.issues.len() <= REPLICA_WARNING_MAX_ISSUES {
        Status::Warning
    } else {
        Status::Critical
    }
}

pub fn evaluate(text: &str) -> Evaluation {
    let report = scan(text);
    let status = classify(&report);
    let message = match status {
        Status::Ok => format!("all resources healthy ({})", report.resources),
        Status::Warning => {
            let named: Vec<&str> = report
                .issues
                .iter()
                .take(REPLICA_MAX_NAMED_ISSUES)
                .map(String::as_str)
                .collect();
            format!("some resources unhealthy: {}", named.join(", "))
        }
        Status::Critical => format!("many resources unhealthy ({})", report.issues.len()),
        Status::Unknown => CheckError::NoTargets.to_string(),
    };
    Evaluation::new(status, message)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
