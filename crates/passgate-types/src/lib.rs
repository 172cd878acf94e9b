//! Stable DTOs and IDs used across the passgate workspace.
//!
//! This crate is intentionally boring:
//! - the pipeline stage a gate runs for
//! - per-check results and the aggregate verdict
//! - stable check names, versions and detail strings

#![forbid(unsafe_code)]

pub mod ids;
pub mod result;

pub use result::{CheckResult, Stage, Verdict};
