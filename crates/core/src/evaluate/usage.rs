//! Worst-node extraction from per-node utilization reports.
//!
//! Parses `kubectl top nodes` style tables:
//!
//! ```text
//! NAME    CPU(cores)   CPU%   MEMORY(bytes)   MEMORY%
//! node1   10m          32%    500Mi           58%
//! ```
//!
//! The header row is optional. The highest percentage across all rows is
//! returned, since one overloaded node is what needs attention.

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Which percentage column to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageMetric {
    Cpu,
    Memory,
}

impl UsageMetric {
    fn column(self) -> usize {
        match self {
            Self::Cpu => 2,
            Self::Memory => 4,
        }
    }
}

/// Minimum columns in a data row.
const MIN_COLUMNS: usize = 5;

/// Markers identifying a header row.
const HEADER_MARKERS: &[&str] = &["NAME", "CPU"];

/// Maximum percentage of `metric` across all parseable rows.
///
/// Returns [`CheckError::MetricsDataUnavailable`] when no row yields a
/// number, which usually means the metrics subsystem is absent.
pub fn max_usage(text: &str, metric: UsageMetric) -> Result<f64, CheckError> {
    let mut lines = text.trim().lines().peekable();
    if lines
        .peek()
        .is_some_and(|first| HEADER_MARKERS.iter().any(|marker| first.contains(marker)))
    {
        lines.next();
    }

    lines
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < MIN_COLUMNS {
                return None;
            }
            columns[metric.column()]
                .trim_end_matches('%')
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
        })
        .reduce(f64::max)
        .ok_or(CheckError::MetricsDataUnavailable)
}
