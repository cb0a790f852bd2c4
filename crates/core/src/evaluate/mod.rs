//! Evaluators that turn raw probe text into a [`Status`] plus message.
//!
//! Each evaluator is a pure function of its input text and the item's
//! configuration. The orchestrator routes every item through exactly one.

pub mod numeric;
pub mod ratio;
pub mod replica;
pub mod threshold;
pub mod usage;

use crate::error::CheckError;
use crate::status::Status;

/// Status and human-readable explanation produced by an evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: Status,
    pub message: String,
}

impl Evaluation {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// `UNKNOWN` carrying the error's message.
    pub fn unknown(err: &CheckError) -> Self {
        Self::new(Status::Unknown, err.to_string())
    }
}

/// Non-empty, trimmed lines that are not the `N/A` placeholder.
pub(crate) fn listing_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != crate::policy::NOT_APPLICABLE)
}
