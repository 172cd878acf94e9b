use crate::model::{CheckConfig, DEFAULT_JOB, JobConfig, NamespaceConfig, ProjectConfig};
use serde_json::{Map, Value};

/// Built-in policy used when a project has none.
///
/// Unknown images abort; unknown scripts require confirmation.
pub fn default_project() -> ProjectConfig {
    ProjectConfig {
        jobs: vec![JobConfig {
            job_name: DEFAULT_JOB.to_string(),
            checks: default_checks(),
        }],
    }
}

pub fn default_checks() -> Vec<CheckConfig> {
    vec![
        CheckConfig::new("imageHash", flag("abortOnFail")),
        CheckConfig::new("scriptHash", flag("mfaOnFail")),
    ]
}

pub fn default_namespace() -> NamespaceConfig {
    NamespaceConfig::default()
}

fn flag(key: &str) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert(key.to_string(), Value::Bool(true));
    m
}
