use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the job whose checks apply when the requested job has no entry.
pub const DEFAULT_JOB: &str = "default";

/// Per-project policy document.
///
/// This is a *user-facing* model: unknown keys are ignored so older binaries keep
/// reading newer policies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectConfig {
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobConfig {
    #[serde(rename = "jobName", default)]
    pub job_name: String,

    /// Checks to run for this job, in order.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Check name: `imageHash`, `scriptHash`, `mfaRequired` or `dateTimeCheck`
    /// (case-insensitive).
    pub name: String,

    /// Check-specific options. Unknown or mistyped values fall back to defaults.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl CheckConfig {
    pub fn new(name: &str, options: Map<String, Value>) -> Self {
        Self {
            name: name.to_string(),
            options,
        }
    }
}

/// Per-namespace settings shared by every project under it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NamespaceConfig {
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Where user-facing messages go: `console` (default) or `mattermost`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoggerConfig {
    #[serde(default = "default_logger_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: default_logger_name(),
            options: Map::new(),
        }
    }
}

fn default_logger_name() -> String {
    "console".to_string()
}

impl ProjectConfig {
    /// Checks configured for `job`.
    ///
    /// Falls back to the `default` job, then to the built-in policy. An empty job
    /// name is looked up as `default`.
    pub fn job_checks(&self, job: &str) -> Vec<CheckConfig> {
        let job = if job.is_empty() { DEFAULT_JOB } else { job };

        self.find_job(job)
            .or_else(|| self.find_job(DEFAULT_JOB))
            .map(|j| j.checks.clone())
            .unwrap_or_else(crate::presets::default_checks)
    }

    fn find_job(&self, job: &str) -> Option<&JobConfig> {
        self.jobs.iter().find(|j| j.job_name == job)
    }
}
