//! Stdout rendering of a finished run.

use infracheck_core::report::{format_issue_message, RunReport};
use infracheck_core::{Category, CheckRun, Status};

use crate::config::OutputMode;

/// Detail-line values longer than this are shortened.
pub const MAX_DISPLAY_VALUE_CHARS: usize = 50;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Print `run` in the requested mode.
pub fn print(run: &CheckRun, mode: OutputMode, demo_mode: bool) -> serde_json::Result<()> {
    match mode {
        OutputMode::Text => println!("{}", render_text(run, demo_mode)),
        OutputMode::Json => println!("{}", render_json(run, demo_mode)?),
        OutputMode::Quiet => {}
    }
    Ok(())
}

pub fn render_json(run: &CheckRun, demo_mode: bool) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RunReport::new(run, demo_mode))
}

/// Summary block, per-category counts, per-item details and issue digest.
pub fn render_text(run: &CheckRun, demo_mode: bool) -> String {
    let summary = &run.summary;
    let mut lines = vec![RULE.to_string(), "Infrastructure check summary".to_string()];
    if demo_mode {
        lines.push("(demo mode)".to_string());
    }
    lines.push(RULE.to_string());
    lines.push(format!("Total checks: {}", summary.total));
    for status in Status::ALL {
        lines.push(format!(
            "  - {:<9} {}",
            format!("{}:", status_label(status)),
            summary.counts.get(status)
        ));
    }

    lines.push(THIN_RULE.to_string());
    for category in Category::ALL {
        let counts = summary.category(category);
        lines.push(format!(
            "{:<11} ok {}  warning {}  critical {}  unknown {}",
            category.label(),
            counts.ok,
            counts.warning,
            counts.critical,
            counts.unknown
        ));
    }

    for category in Category::ALL {
        let mut items = run.results.iter().filter(|r| r.category == category).peekable();
        if items.peek().is_none() {
            continue;
        }
        lines.push(RULE.to_string());
        lines.push(format!("[{category}]"));
        for result in items {
            lines.push(format!(
                "  [{}] {} {}: {} (threshold {}) {}",
                result.status,
                result.check_id,
                result.name,
                shorten(&result.value, MAX_DISPLAY_VALUE_CHARS),
                result.threshold_display(),
                result.message
            ));
        }
    }

    lines.push(RULE.to_string());
    lines.push(format_issue_message(&run.results));
    if !run.is_complete() {
        lines.push(format!(
            "Run cancelled: {}/{} checks completed.",
            run.results.len(),
            run.expected
        ));
    }
    lines.join("\n")
}

/// Single-line form of `value`, cut to `max` characters plus `...`.
pub fn shorten(value: &str, max: usize) -> String {
    let flat = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Ok => "OK",
        Status::Warning => "Warning",
        Status::Critical => "Critical",
        Status::Unknown => "Unknown",
    }
}
