use passgate_types::{CheckResult, Stage, Verdict};
use serde::{Deserialize, Serialize};

/// Everything a renderer needs about one gate run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderableReport {
    pub job: String,
    pub stage: Stage,
    pub verdict: Verdict,
    pub results: Vec<CheckResult>,

    /// Where the whitelist for this project can be edited, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist_url: Option<String>,
}
