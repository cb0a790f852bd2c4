//! Shell-backed probe runner.
//!
//! Runs each check command through `sh -c` in a fresh process group,
//! captures stdout/stderr and enforces the per-command timeout. Spawn errors
//! and timeouts come back as [`ProbeOutput::fault`] so the caller classifies
//! them like any other failed probe.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::Instant;

use super::{ProbeOutput, ProbeRunner};
use crate::policy::DEFAULT_QUERY_TOOL;

/// Maximum stdout or stderr size captured per stream (1 MiB).
const MAX_OUTPUT_BYTES: u64 = 1024 * 1024;

/// Runs probe commands with the system shell.
#[derive(Debug, Clone)]
pub struct ShellProbeRunner {
    shell: String,
    query_tool: String,
}

impl Default for ShellProbeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellProbeRunner {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
            query_tool: DEFAULT_QUERY_TOOL.to_string(),
        }
    }

    /// Gate cluster checks on a different query tool.
    pub fn with_query_tool(mut self, tool: impl Into<String>) -> Self {
        self.query_tool = tool.into();
        self
    }
}

impl ProbeRunner for ShellProbeRunner {
    async fn execute(&self, command: &str, timeout: Duration) -> ProbeOutput {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);
        run_command(&mut cmd, timeout).await
    }

    async fn is_query_tool_available(&self) -> bool {
        // The tool name is passed as a positional parameter, never spliced
        // into the script text.
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(r#"command -v "$1""#)
            .arg(&self.shell)
            .arg(&self.query_tool);
        let output = run_command(&mut cmd, Duration::from_secs(5)).await;
        let available = output.exit_code == 0;
        if !available {
            tracing::warn!(tool = %self.query_tool, "Query tool not found on PATH");
        }
        available
    }

    fn query_tool(&self) -> &str {
        &self.query_tool
    }
}

/// Spawn `cmd` in its own process group and collect both streams.
///
/// A single deadline covers the exit and both stream reads, so descendants
/// that keep a pipe open cannot stretch the call past `timeout`. On expiry
/// the whole group is killed.
async fn run_command(cmd: &mut Command, timeout: Duration) -> ProbeOutput {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let start = Instant::now();
    let deadline = start + timeout;

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to spawn probe command");
            return ProbeOutput::fault(e.to_string());
        }
    };
    // Captured now: `id()` returns `None` once the shell has been reaped.
    let pgid = child.id();

    let mut stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let mut stderr_task = tokio::spawn(read_stream(child.stderr.take()));

    let collected = tokio::time::timeout_at(deadline, async {
        let status = child.wait().await?;
        let stdout = (&mut stdout_task).await.unwrap_or_default();
        let stderr = (&mut stderr_task).await.unwrap_or_default();
        Ok::<_, std::io::Error>((status, stdout, stderr))
    })
    .await;

    match collected {
        Ok(Ok((status, stdout, stderr))) => {
            let exit_code = status.code().unwrap_or(super::SENTINEL_EXIT_CODE);
            tracing::debug!(
                exit_code,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Probe command finished",
            );
            ProbeOutput::new(decode(&stdout), decode(&stderr), exit_code)
        }
        Ok(Err(e)) => {
            kill_process_group(pgid);
            stdout_task.abort();
            stderr_task.abort();
            ProbeOutput::fault(e.to_string())
        }
        Err(_elapsed) => {
            tracing::warn!(timeout_secs = timeout.as_secs(), "Probe command timed out");
            kill_process_group(pgid);
            let _ = child.start_kill();
            stdout_task.abort();
            stderr_task.abort();
            ProbeOutput::fault(format!("Command timed out after {}s", timeout.as_secs()))
        }
    }
}

/// SIGKILL every process in the group led by `pgid`.
fn kill_process_group(pgid: Option<u32>) {
    let Some(pgid) = pgid.and_then(|id| libc::pid_t::try_from(id).ok()) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group was created for this probe.
    let ret = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if ret != 0 {
        tracing::debug!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "Process group already gone",
        );
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// Read an entire output stream, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.take(MAX_OUTPUT_BYTES).read_to_end(&mut buf).await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn captures_trimmed_stdout() {
        let output = ShellProbeRunner::new().execute("echo '  45  '", TIMEOUT).await;
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "45");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn captures_stderr_and_exit_code() {
        let output = ShellProbeRunner::new()
            .execute("echo boom >&2; exit 3", TIMEOUT)
            .await;
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, "boom");
        assert!(!output.is_fault());
    }

    #[tokio::test]
    async fn pipelines_run_through_shell() {
        let output = ShellProbeRunner::new()
            .execute("printf 'a\\nb\\nc\\n' | wc -l", TIMEOUT)
            .await;
        assert_eq!(output.stdout.trim(), "3");
    }

    #[tokio::test]
    async fn timeout_is_fault() {
        let output = ShellProbeRunner::new()
            .execute("sleep 60", Duration::from_millis(200))
            .await;
        assert!(output.is_fault());
        assert_eq!(output.stdout, "");
        assert!(output.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn background_descendant_cannot_outlive_timeout() {
        // The shell exits at once but `sleep` keeps stdout open.
        let start = std::time::Instant::now();
        let output = ShellProbeRunner::new()
            .execute("sleep 5 & echo 1", Duration::from_millis(500))
            .await;
        assert!(start.elapsed() < Duration::from_millis(1500), "{:?}", start.elapsed());
        assert!(output.is_fault());
        assert!(output.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn timeout_kills_every_pipeline_member() {
        let output = ShellProbeRunner::new()
            .execute("sleep 7.3141 | sleep 7.3141", Duration::from_millis(300))
            .await;
        assert!(output.is_fault());

        tokio::time::sleep(Duration::from_millis(300)).await;
        let ps = std::process::Command::new("ps")
            .args(["-eo", "args"])
            .output()
            .expect("run ps");
        let survivors = String::from_utf8_lossy(&ps.stdout)
            .lines()
            .filter(|line| line.trim() == "sleep 7.3141")
            .count();
        assert_eq!(survivors, 0);
    }

    #[tokio::test]
    async fn missing_shell_is_fault() {
        let runner = ShellProbeRunner {
            shell: "/nonexistent/shell".to_string(),
            query_tool: DEFAULT_QUERY_TOOL.to_string(),
        };
        let output = runner.execute("true", TIMEOUT).await;
        assert!(output.is_fault());
        assert!(!output.stderr.is_empty());
    }

    #[tokio::test]
    async fn query_tool_availability() {
        let present = ShellProbeRunner::new().with_query_tool("sh");
        assert!(present.is_query_tool_available().await);

        let absent = ShellProbeRunner::new().with_query_tool("definitely-not-a-real-tool-xyz");
        assert!(!absent.is_query_tool_available().await);
    }
}
