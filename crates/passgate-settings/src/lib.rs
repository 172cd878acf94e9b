//! Policy parsing and check resolution.
//!
//! This crate is IO-free: policies are handed in as bytes by whichever store holds them.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

use anyhow::Context;

pub use model::{CheckConfig, DEFAULT_JOB, JobConfig, LoggerConfig, NamespaceConfig, ProjectConfig};
pub use presets::{default_checks, default_project};
pub use resolve::{CheckContext, PolicyError, resolve_checks};

/// Parse a project policy. Empty input yields the built-in default policy.
pub fn parse_project_config(input: &[u8]) -> anyhow::Result<ProjectConfig> {
    if is_blank(input) {
        return Ok(presets::default_project());
    }
    serde_json::from_slice(input).context("parse project config")
}

/// Parse namespace settings. Empty input yields the defaults (console logger).
pub fn parse_namespace_config(input: &[u8]) -> anyhow::Result<NamespaceConfig> {
    if is_blank(input) {
        return Ok(presets::default_namespace());
    }
    serde_json::from_slice(input).context("parse namespace config")
}

/// JSON Schema for the project policy document.
pub fn project_config_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(ProjectConfig)).unwrap_or_default()
}

fn is_blank(input: &[u8]) -> bool {
    input.iter().all(u8::is_ascii_whitespace)
}
