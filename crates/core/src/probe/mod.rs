//! Probe-execution boundary.
//!
//! Defines [`ProbeRunner`], the trait the orchestrator uses to run a check's
//! command, along with [`ProbeOutput`]. [`shell::ShellProbeRunner`] is the
//! production implementation; tests supply their own.

pub mod shell;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

/// Exit code reported when the command could not run or timed out.
pub const SENTINEL_EXIT_CODE: i32 = -1;

/// Captured result of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutput {
    /// Trimmed stdout.
    pub stdout: String,
    /// Trimmed stderr.
    pub stderr: String,
    /// Process exit code, or [`SENTINEL_EXIT_CODE`] for system-level faults.
    pub exit_code: i32,
}

impl ProbeOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Successful run with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(stdout, "", 0)
    }

    /// System-level fault (spawn failure, timeout) described by `reason`.
    pub fn fault(reason: impl Into<String>) -> Self {
        Self::new("", reason, SENTINEL_EXIT_CODE)
    }

    /// True for outputs built by [`ProbeOutput::fault`] or killed by a signal.
    pub fn is_fault(&self) -> bool {
        self.exit_code <= SENTINEL_EXIT_CODE
    }
}

/// Runs probe commands on behalf of the orchestrator.
///
/// `execute` never fails for "the command ran and failed": that is reported
/// through a non-zero exit code. Only system-level faults use the sentinel
/// from [`ProbeOutput::fault`].
pub trait ProbeRunner: Send + Sync {
    /// Run `command`, giving up after `timeout`.
    fn execute(
        &self,
        command: &str,
        timeout: Duration,
    ) -> impl Future<Output = ProbeOutput> + Send;

    /// Whether the cluster query tool can be used. Called once per run.
    fn is_query_tool_available(&self) -> impl Future<Output = bool> + Send;

    /// Name of the cluster query tool, for messages.
    fn query_tool(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_uses_sentinel() {
        let output = ProbeOutput::fault("Command timed out");
        assert!(output.is_fault());
        assert_eq!(output.stdout, "");
        assert_eq!(output.exit_code, SENTINEL_EXIT_CODE);
    }

    #[test]
    fn nonzero_exit_is_not_fault() {
        assert!(!ProbeOutput::new("", "", 1).is_fault());
        assert!(!ProbeOutput::success("ok").is_fault());
    }
}
