//! Ratio match: what fraction of a listing carries the expected marker.
//!
//! Used for per-resource listings such as `node:Ready` or `pod:Running`.
//! A listing where more than 70% of lines match is degraded (`WARNING`),
//! anything less is `CRITICAL`.

use crate::error::CheckError;
use crate::policy::RATIO_WARNING_FRACTION;
use crate::status::Status;

use super::{listing_lines, Evaluation};

/// Line counts behind a ratio classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioCounts {
    pub matching: usize,
    pub total: usize,
}

/// Count lines of `text` and how many contain `expected`.
pub fn count(text: &str, expected: &str) -> RatioCounts {
    let mut counts = RatioCounts {
        matching: 0,
        total: 0,
    };
    for line in listing_lines(text) {
        counts.total += 1;
        if line.contains(expected) {
            counts.matching += 1;
        }
    }
    counts
}

pub fn classify(counts: RatioCounts) -> Status {
    let RatioCounts { matching, total } = counts;
    if total == 0 {
        Status::Unknown
    } else if matching == total {
        Status::Ok
    } else if matching as f64 > total as f64 * RATIO_WARNING_FRACTION {
        Status::Warning
    } else {
        Status::Critical
    }
}

pub fn evaluate(text: &str, expected: &str) -> Evaluation {
    let counts = count(text, expected);
    let status = classify(counts);
    let RatioCounts { matching, total } = counts;
    let message = match status {
        Status::Ok => format!("all items healthy ({matching}/{total})"),
        Status::Warning => format!("some items unhealthy ({matching}/{total})"),
        Status::Critical => format!("most items unhealthy ({matching}/{total})"),
        Status::Unknown => CheckError::NoTargets.to_string(),
    };
    Evaluation::new(status, message)
}
