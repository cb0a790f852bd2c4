//! Drives one pass over the check catalog.
//!
//! For every item: fetch output (demo data or a probe), route it to exactly
//! one evaluator, and emit a [`CheckResult`]. Per-category differences are
//! captured by [`CategoryHooks`] instead of separate code paths. Item-level
//! failures become `UNKNOWN` results; nothing here aborts a run.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::catalog::{Category, CheckCatalog, CheckItem, CheckType};
use crate::demo;
use crate::error::CheckError;
use crate::evaluate::usage::{self, UsageMetric};
use crate::evaluate::{numeric, ratio, replica, threshold, Evaluation};
use crate::policy::{
    self, truncate_chars, DEFAULT_PROBE_TIMEOUT, MAX_ERROR_CHARS, METRICS_API_UNAVAILABLE_MARKER,
    NOT_APPLICABLE,
};
use crate::probe::{ProbeOutput, ProbeRunner};
use crate::result::CheckResult;
use crate::status::Status;
use crate::summary::{aggregate, Summary};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Use canned data instead of running probes.
    pub demo_mode: bool,
    /// Per-command timeout handed to the probe runner.
    pub probe_timeout: Duration,
    /// Items evaluated concurrently. Results keep declaration order.
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            demo_mode: false,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            concurrency: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Category hooks
// ---------------------------------------------------------------------------

/// How a category decides that a probe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any non-zero exit or empty stdout.
    ExitOrEmpty,
    /// stderr mentioning "error", or a non-zero exit with empty stdout.
    ClusterQuery,
}

/// Per-category behaviour plugged into the shared pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryHooks {
    /// Skip execution when the cluster query tool is missing.
    pub requires_query_tool: bool,
    pub failure_policy: FailurePolicy,
    /// Displayed when a successful probe printed nothing useful.
    pub empty_value: &'static str,
    /// Apply the no-match-is-zero normalization to eligible identifiers.
    pub normalize_no_match: bool,
}

impl CategoryHooks {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Os => Self {
                requires_query_tool: false,
                failure_policy: FailurePolicy::ExitOrEmpty,
                empty_value: NOT_APPLICABLE,
                normalize_no_match: false,
            },
            Category::Kubernetes => Self {
                requires_query_tool: true,
                failure_policy: FailurePolicy::ClusterQuery,
                empty_value: "no data",
                normalize_no_match: true,
            },
            Category::Services => Self {
                requires_query_tool: true,
                failure_policy: FailurePolicy::ClusterQuery,
                empty_value: "0",
                normalize_no_match: false,
            },
        }
    }

    /// A query that exits non-zero with no output becomes a successful `"0"`.
    /// stderr is kept so [`Self::detect_failure`] still rejects real errors.
    /// Faults (timeouts, spawn errors) are left alone.
    pub fn normalize(&self, item: &CheckItem, output: ProbeOutput) -> ProbeOutput {
        let nothing_matched =
            output.exit_code != 0 && !output.is_fault() && output.stdout.trim().is_empty();

        if self.normalize_no_match && policy::no_match_is_zero(&item.id) && nothing_matched {
            tracing::debug!(check_id = %item.id, "Treating empty match as zero");
            ProbeOutput::new("0", output.stderr, 0)
        } else {
            output
        }
    }

    /// The failure to report for `output`, if it counts as failed.
    pub fn detect_failure(&self, output: &ProbeOutput) -> Option<CheckError> {
        let stdout_empty = output.stdout.trim().is_empty();
        let stderr_lower = output.stderr.to_lowercase();

        let failed = match self.failure_policy {
            FailurePolicy::ExitOrEmpty => output.exit_code != 0 || stdout_empty,
            FailurePolicy::ClusterQuery => {
                stderr_lower.contains("error") || (output.exit_code != 0 && stdout_empty)
            }
        };
        if !failed {
            return None;
        }

        if stderr_lower.contains(METRICS_API_UNAVAILABLE_MARKER) {
            Some(CheckError::MetricsApiUnavailable)
        } else {
            Some(CheckError::ProbeExecutionFailed {
                stderr: truncate_chars(output.stderr.trim(), MAX_ERROR_CHARS),
            })
        }
    }

    fn display_value<'a>(&self, stdout: &'a str) -> &'a str {
        if stdout.is_empty() || stdout == NOT_APPLICABLE {
            self.empty_value
        } else {
            stdout
        }
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Which evaluator an item is routed to. First match wins, in this order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComparisonMode<'a> {
    ReplicaMatch,
    Ratio { expected: &'a str },
    Threshold {
        threshold: f64,
        usage: Option<UsageMetric>,
    },
    /// No comparison configured; output existing is enough.
    Presence,
}

impl<'a> ComparisonMode<'a> {
    pub fn for_item(item: &'a CheckItem) -> Self {
        match item.check_type {
            Some(CheckType::ReplicaMatch) => return Self::ReplicaMatch,
            Some(CheckType::Unrecognized) => {
                tracing::warn!(check_id = %item.id, "Unrecognized check_type, ignoring");
            }
            None => {}
        }

        if let Some(expected) = item.expected.as_deref().filter(|e| !e.is_empty()) {
            return Self::Ratio { expected };
        }

        match item.threshold {
            Some(threshold) => Self::Threshold {
                threshold,
                usage: item
                    .usage_metric
                    .or_else(|| policy::usage_metric_for(&item.id)),
            },
            None => Self::Presence,
        }
    }
}

/// Classify probe output for `item` into a result.
///
/// `output` is expected to have gone through [`CategoryHooks::normalize`].
pub fn classify_output(item: &CheckItem, output: &ProbeOutput) -> CheckResult {
    let hooks = CategoryHooks::for_category(item.category);

    if let Some(err) = hooks.detect_failure(output) {
        tracing::warn!(
            check_id = %item.id,
            exit_code = output.exit_code,
            error = %err,
            "Probe failed",
        );
        return CheckResult::new(
            item,
            Status::Unknown,
            NOT_APPLICABLE,
            err.to_string(),
            &output.stdout,
        );
    }

    let stdout = output.stdout.trim();
    let mut value = hooks.display_value(stdout).to_string();

    let evaluation = match ComparisonMode::for_item(item) {
        ComparisonMode::ReplicaMatch => replica::evaluate(stdout),
        ComparisonMode::Ratio { expected } => ratio::evaluate(stdout, expected),
        ComparisonMode::Threshold {
            threshold,
            usage: Some(metric),
        } => match usage::max_usage(stdout, metric) {
            Ok(max) => {
                value = format!("{max:.1}");
                threshold::evaluate(Ok(max), threshold, &item.unit, &item.id)
            }
            Err(e) => Evaluation::unknown(&e),
        },
        ComparisonMode::Threshold {
            threshold,
            usage: None,
        } => threshold::evaluate(numeric::extract(stdout), threshold, &item.unit, &item.id),
        ComparisonMode::Presence => Evaluation::new(Status::Ok, "confirmed present"),
    };

    CheckResult::new(item, evaluation.status, &value, evaluation.message, stdout)
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRun {
    /// One result per evaluated item, in catalog order.
    pub results: Vec<CheckResult>,
    /// Derived from `results` only; never padded for missing items.
    pub summary: Summary,
    /// Number of items in the catalog.
    pub expected: usize,
    /// The run was cancelled before every item produced a result.
    pub cancelled: bool,
}

impl CheckRun {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.results.len() == self.expected
    }
}

/// Runs every catalog item through probe, routing and classification.
pub struct CheckOrchestrator<R> {
    catalog: CheckCatalog,
    runner: R,
    options: RunOptions,
}

impl<R: ProbeRunner> CheckOrchestrator<R> {
    pub fn new(catalog: CheckCatalog, runner: R, options: RunOptions) -> Self {
        Self {
            catalog,
            runner,
            options,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Evaluate the whole catalog.
    ///
    /// Stops between items once `cancel` fires; the returned run then holds
    /// only the results produced so far and is flagged as cancelled.
    pub async fn run(&self, cancel: &CancellationToken) -> CheckRun {
        let expected = self.catalog.len();
        tracing::info!(
            items = expected,
            demo_mode = self.options.demo_mode,
            concurrency = self.options.concurrency,
            "Starting check run",
        );

        let tool_available = self.query_tool_gate().await;

        let results: Vec<CheckResult> = stream::iter(self.catalog.entries())
            .map(|item| self.check_item(item, tool_available))
            .buffered(self.options.concurrency.max(1))
            .take_until(cancel.cancelled())
            .collect()
            .await;

        let cancelled = results.len() < expected;
        if cancelled {
            tracing::warn!(
                completed = results.len(),
                expected,
                "Check run cancelled before completion",
            );
        }

        let summary = aggregate(&results);
        tracing::info!(
            total = summary.total,
            ok = summary.counts.ok,
            warning = summary.counts.warning,
            critical = summary.counts.critical,
            unknown = summary.counts.unknown,
            "Check run finished",
        );

        CheckRun {
            results,
            summary,
            expected,
            cancelled,
        }
    }

    /// Probe the query tool once, only if some item needs it.
    async fn query_tool_gate(&self) -> bool {
        if self.options.demo_mode {
            return true;
        }
        let needed = self
            .catalog
            .entries()
            .any(|item| CategoryHooks::for_category(item.category).requires_query_tool);
        if !needed {
            return true;
        }
        self.runner.is_query_tool_available().await
    }

    async fn check_item(&self, item: &CheckItem, tool_available: bool) -> CheckResult {
        if self.options.demo_mode {
            let entry = demo::lookup(&item.id);
            return CheckResult::new(item, entry.status, entry.value, entry.message, entry.value);
        }

        let hooks = CategoryHooks::for_category(item.category);
        if hooks.requires_query_tool && !tool_available {
            let err = CheckError::ToolUnavailable {
                tool: self.runner.query_tool().to_string(),
            };
            return CheckResult::new(item, Status::Unknown, NOT_APPLICABLE, err.to_string(), "");
        }

        let output = self
            .runner
            .execute(&item.command, self.options.probe_timeout)
            .await;
        let output = hooks.normalize(item, output);
        let result = classify_output(item, &output);

        tracing::debug!(
            check_id = %item.id,
            status = %result.status,
            message = %result.message,
            "Check classified",
        );
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
