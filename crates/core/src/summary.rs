//! Roll-up of check results into overall and per-category counts.
//!
//! A [`Summary`] is a pure projection of a result sequence: it has no state
//! of its own and [`aggregate`] can be re-run at any time.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Category;
use crate::result::CheckResult;
use crate::status::Status;

/// Counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub warning: usize,
    pub critical: usize,
    pub unknown: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Ok => self.ok += 1,
            Status::Warning => self.warning += 1,
            Status::Critical => self.critical += 1,
            Status::Unknown => self.unknown += 1,
        }
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Ok => self.ok,
            Status::Warning => self.warning,
            Status::Critical => self.critical,
            Status::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.warning + self.critical + self.unknown
    }
}

/// Overall and per-category counts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
    /// Always holds every [`Category`], even those with no results.
    pub by_category: BTreeMap<Category, StatusCounts>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            total: 0,
            counts: StatusCounts::default(),
            by_category: Category::ALL
                .into_iter()
                .map(|category| (category, StatusCounts::default()))
                .collect(),
        }
    }
}

impl Summary {
    /// Counts for one category.
    pub fn category(&self, category: Category) -> StatusCounts {
        self.by_category
            .get(&category)
            .copied()
            .unwrap_or_default()
    }

    /// Process exit code: 2 with any critical, 1 with any warning, else 0.
    pub fn exit_code(&self) -> i32 {
        if self.counts.critical > 0 {
            2
        } else if self.counts.warning > 0 {
            1
        } else {
            0
        }
    }
}

/// Fold `results` into a [`Summary`].
pub fn aggregate(results: &[CheckResult]) -> Summary {
    results.iter().fold(Summary::default(), |mut summary, result| {
        summary.total += 1;
        summary.counts.record(result.status);
        summary
            .by_category
            .entry(result.category)
            .or_default()
            .record(result.status);
        summary
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
