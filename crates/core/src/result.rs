//! Normalized outcome of one check item.

use chrono::Utc;
use serde::Serialize;

use crate::catalog::{Category, CheckItem};
use crate::policy::{truncate_chars, MAX_RAW_OUTPUT_CHARS, MAX_VALUE_CHARS};
use crate::status::Status;
use crate::types::Timestamp;

/// One classified check, ready for report rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check_id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub status: Status,
    /// Observed or derived value, at most 300 characters.
    pub value: String,
    pub threshold: Option<f64>,
    pub unit: String,
    pub message: String,
    pub timestamp: Timestamp,
    /// Probe stdout kept for debugging, at most 500 characters.
    pub raw_output: String,
}

impl CheckResult {
    /// Build a result for `item`. `value` and `raw_output` are truncated here,
    /// after any numeric extraction has already run on the full text.
    pub fn new(
        item: &CheckItem,
        status: Status,
        value: &str,
        message: impl Into<String>,
        raw_output: &str,
    ) -> Self {
        Self {
            check_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category,
            description: item.description.clone(),
            status,
            value: truncate_chars(value, MAX_VALUE_CHARS),
            threshold: item.threshold,
            unit: item.unit.clone(),
            message: message.into(),
            timestamp: Utc::now(),
            raw_output: truncate_chars(raw_output, MAX_RAW_OUTPUT_CHARS),
        }
    }

    /// `"<threshold><unit>"`, or `"-"` when the item has no threshold.
    pub fn threshold_display(&self) -> String {
        match self.threshold {
            Some(threshold) => format!("{threshold}{}", self.unit),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CheckItem {
        CheckItem {
            threshold: Some(80.0),
            unit: "%".to_string(),
            description: "Root filesystem usage".to_string(),
            ..CheckItem::new(Category::Os, "OS-001", "Disk usage", "df")
        }
    }

    #[test]
    fn copies_item_metadata() {
        let result = CheckResult::new(&item(), Status::Ok, "45", "fine", "45");
        assert_eq!(result.check_id, "OS-001");
        assert_eq!(result.name, "Disk usage");
        assert_eq!(result.category, Category::Os);
        assert_eq!(result.description, "Root filesystem usage");
        assert_eq!(result.threshold, Some(80.0));
        assert_eq!(result.unit, "%");
    }

    #[test]
    fn truncates_value_and_raw_output() {
        let long = "x".repeat(1000);
        let result = CheckResult::new(&item(), Status::Ok, &long, "fine", &long);
        assert_eq!(result.value.chars().count(), MAX_VALUE_CHARS);
        assert_eq!(result.raw_output.chars().count(), MAX_RAW_OUTPUT_CHARS);
    }

    #[test]
    fn threshold_display() {
        let result = CheckResult::new(&item(), Status::Ok, "45", "fine", "");
        assert_eq!(result.threshold_display(), "80%");

        let bare = CheckItem::new(Category::Os, "OS-010", "Kernel", "uname -r");
        let result = CheckResult::new(&bare, Status::Ok, "6.1", "fine", "");
        assert_eq!(result.threshold_display(), "-");
    }

    #[test]
    fn serializes_category_and_status_labels() {
        let result = CheckResult::new(&item(), Status::Critical, "95", "bad", "95");
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["category"], "OS");
        assert_eq!(json["status"], "CRITICAL");
        assert_eq!(json["check_id"], "OS-001");
    }
}
