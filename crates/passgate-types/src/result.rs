use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline phase a gate is being evaluated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Image,
    Script,
    All,
}

impl Stage {
    /// Parse a check-type string. Anything other than `image` or `script` means all stages.
    pub fn parse(check_type: &str) -> Self {
        match check_type.trim().to_ascii_lowercase().as_str() {
            "image" => Stage::Image,
            "script" => Stage::Script,
            _ => Stage::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Image => "image",
            Stage::Script => "script",
            Stage::All => "all",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single check. Produced exactly once per check instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub abort: bool,
    pub mfa_required: bool,
    pub details: String,
}

impl CheckResult {
    /// A passing result with no details yet.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            error: None,
            abort: false,
            mfa_required: false,
            details: String::new(),
        }
    }

    /// The strictest verdict this single result implies.
    pub fn verdict(&self) -> Verdict {
        if self.abort {
            Verdict::Deny
        } else if self.mfa_required {
            Verdict::RequireConfirmation
        } else {
            Verdict::Allow
        }
    }
}

/// Aggregate decision over all active checks, ordered from least to most strict.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    RequireConfirmation,
    Deny,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::RequireConfirmation => "require_confirmation",
            Verdict::Deny => "deny",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
