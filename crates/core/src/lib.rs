//! `infracheck-core` -- the check evaluation engine.
//!
//! Takes the free-form text a probe produced together with a declarative
//! [`catalog::CheckItem`] and classifies it into one of four
//! [`status::Status`] values with a human-readable message. The
//! [`orchestrator::CheckOrchestrator`] drives one pass over a catalog and the
//! [`summary`] module folds the results into counts.
//!
//! Everything except [`probe::shell`] is pure and tested in isolation.

pub mod catalog;
pub mod demo;
pub mod error;
pub mod evaluate;
pub mod orchestrator;
pub mod policy;
pub mod probe;
pub mod report;
pub mod result;
pub mod status;
pub mod summary;
pub mod types;

pub use catalog::{Category, CheckCatalog, CheckItem, CheckType};
pub use error::{CatalogError, CheckError};
pub use orchestrator::{CheckOrchestrator, CheckRun, RunOptions};
pub use result::CheckResult;
pub use status::Status;
pub use summary::{aggregate, StatusCounts, Summary};
