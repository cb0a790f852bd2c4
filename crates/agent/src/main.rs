//! `infracheck-agent` -- one-shot infrastructure check runner.
//!
//! Loads the check catalog, runs every item against the local host and the
//! cluster, prints the outcome and exits with a status reflecting the worst
//! result.
//!
//! # Environment variables
//!
//! | Variable                        | Default                   | Description              |
//! |---------------------------------|---------------------------|--------------------------|
//! | `INFRACHECK_CATALOG`            | `config/check_items.yaml` | Check catalog file       |
//! | `INFRACHECK_DEMO`               | `false`                   | Canned data, no probes   |
//! | `INFRACHECK_CONCURRENCY`        | `1`                       | Items evaluated at once  |
//! | `INFRACHECK_PROBE_TIMEOUT_SECS` | `30`                      | Per-command timeout      |
//! | `INFRACHECK_QUERY_TOOL`         | `kubectl`                 | Cluster query tool       |
//! | `INFRACHECK_OUTPUT`             | `text`                    | `text`, `json`, `quiet`  |
//!
//! # Exit codes
//!
//! `0` all OK, `1` warnings (or invalid configuration), `2` critical
//! findings, `3` interrupted before every check finished.

use anyhow::Context;
use infracheck_core::probe::shell::ShellProbeRunner;
use infracheck_core::{CheckCatalog, CheckOrchestrator};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use infracheck_agent::config::AgentConfig;
use infracheck_agent::console;

/// Exit code for a run interrupted by a signal.
const EXIT_CANCELLED: i32 = 3;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "infracheck_agent=info,infracheck_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AgentConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    match run(config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let chain = format!("{e:#}");
            tracing::error!(error = %chain, "Check run failed");
            std::process::exit(1);
        }
    }
}

async fn run(config: AgentConfig) -> anyhow::Result<i32> {
    tracing::info!(
        catalog = %config.catalog_path.display(),
        demo_mode = config.demo_mode,
        concurrency = config.concurrency,
        probe_timeout_secs = config.probe_timeout.as_secs(),
        query_tool = %config.query_tool,
        "Starting infracheck-agent",
    );

    let catalog = CheckCatalog::from_path(&config.catalog_path).with_context(|| {
        format!(
            "failed to load check catalog from {}",
            config.catalog_path.display()
        )
    })?;

    let runner = ShellProbeRunner::new().with_query_tool(config.query_tool.clone());
    let orchestrator = CheckOrchestrator::new(catalog, runner, config.run_options());

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping check run");
            signal_token.cancel();
        }
    });

    let run = orchestrator.run(&cancel).await;

    console::print(&run, config.output, config.demo_mode).context("failed to render report")?;

    if run.is_complete() {
        Ok(run.summary.exit_code())
    } else {
        Ok(EXIT_CANCELLED)
    }
}
