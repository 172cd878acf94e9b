//! Recover the commands a job runs from what the CI platform hands the executor.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const GITLAB_START: &str = "x1b[32;1m";
const GITLAB_END: &str = "x1b[0;m";

/// GitLab echoes each command highlighted in green before running it.
static GITLAB_COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"x1b.32;1m.+?x1b.0;m").expect("valid regex"));

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown CI/CD platform '{0}'")]
pub struct UnknownPlatform(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptCleaner {
    GitLab,
    GitHub,
}

impl ScriptCleaner {
    pub fn clean(&self, script: &str) -> Vec<String> {
        match self {
            ScriptCleaner::GitLab => clean_gitlab(script),
            ScriptCleaner::GitHub => clean_github(script),
        }
    }
}

/// Pick the cleaner for a platform name (case-insensitive).
pub fn cleaner_for(platform: &str) -> Result<ScriptCleaner, UnknownPlatform> {
    match platform.to_ascii_lowercase().as_str() {
        "gitlab" => Ok(ScriptCleaner::GitLab),
        "github" => Ok(ScriptCleaner::GitHub),
        _ => Err(UnknownPlatform(platform.to_string())),
    }
}

fn clean_gitlab(script: &str) -> Vec<String> {
    GITLAB_COMMAND_RE
        .find_iter(script)
        .map(|m| {
            let line = m.as_str();
            let line = line.strip_prefix(GITLAB_START).unwrap_or(line);
            let line = line.strip_suffix(GITLAB_END).unwrap_or(line);
            line.to_string()
        })
        .collect()
}

/// Steps arrive as a YAML-like list; each `- ` starts a step.
fn clean_github(script: &str) -> Vec<String> {
    script
        .split("- ")
        .skip(1)
        .map(|step| step.trim().replace('\t', "    "))
        .collect()
}
