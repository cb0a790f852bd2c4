//! Threshold classification for single numeric readings.
//!
//! Two policies apply:
//!
//! - **Zero is healthy** (identifiers in [`policy::ZERO_IS_OK_IDS`]): the value
//!   counts bad things, so `0` is `OK`, up to three is `WARNING` and anything
//!   more is `CRITICAL`.
//! - **Ceiling**: everything else. Below 80% of the threshold is `OK`, from
//!   80% up to the threshold is `WARNING`, at or above it is `CRITICAL`.

use crate::error::CheckError;
use crate::policy::{self, THRESHOLD_WARNING_RATIO, ZERO_IS_OK_WARNING_MAX};
use crate::status::Status;

use super::Evaluation;

/// Classify an extracted value against `threshold`.
pub fn classify(value: Result<f64, CheckError>, threshold: f64, check_id: &str) -> Status {
    let Ok(value) = value else {
        return Status::Unknown;
    };

    if policy::is_zero_ok(check_id) {
        if value == 0.0 {
            Status::Ok
        } else if value <= ZERO_IS_OK_WARNING_MAX {
            Status::Warning
        } else {
            Status::Critical
        }
    } else if value < threshold * THRESHOLD_WARNING_RATIO {
        Status::Ok
    } else if value < threshold {
        Status::Warning
    } else {
        Status::Critical
    }
}

/// Classify and explain. `unit` is appended to the threshold in messages.
pub fn evaluate(
    value: Result<f64, CheckError>,
    threshold: f64,
    unit: &str,
    check_id: &str,
) -> Evaluation {
    if let Err(err) = &value {
        return Evaluation::unknown(err);
    }

    let status = classify(value, threshold, check_id);
    let message = match status {
        Status::Ok => "within normal range".to_string(),
        Status::Warning => format!("approaching threshold ({threshold}{unit})"),
        Status::Critical => format!("threshold exceeded ({threshold}{unit})"),
        Status::Unknown => CheckError::NoNumericValue.to_string(),
    };
    Evaluation::new(status, message)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
