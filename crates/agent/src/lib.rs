//! Library half of `infracheck-agent`: environment configuration and
//! console rendering, split out so both can be tested without a process.

pub mod config;
pub mod console;
