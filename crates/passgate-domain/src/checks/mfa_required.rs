use crate::checks::options::{Options, str_option};
use crate::whitelist::Whitelist;
use passgate_types::{CheckResult, Stage, ids};

pub const CHECK_TYPE: &str = "checkType";

/// Forces a confirmation for the configured stage regardless of whitelist state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MfaRequiredCheck {
    pub(crate) job_name: String,
    pub(crate) valid_stage: Stage,
}

impl MfaRequiredCheck {
    pub fn new(options: &Options, job_name: &str) -> Self {
        Self {
            job_name: job_name.to_string(),
            valid_stage: str_option(options, CHECK_TYPE)
                .map(Stage::parse)
                .unwrap_or(Stage::All),
        }
    }

    pub fn evaluate(&self, _whitelist: &Whitelist) -> CheckResult {
        let mut result = CheckResult::new(ids::NAME_MFA_REQUIRED, ids::CHECK_VERSION);
        result.mfa_required = true;
        result.details = ids::DETAILS_MFA_REQUIRED.to_string();
        result
    }

    /// Valid everywhere when configured for all stages; otherwise for its own stage,
    /// or when the engine evaluates all stages at once.
    pub fn applies_to_stage(&self, stage: Stage) -> bool {
        self.valid_stage == Stage::All || stage == Stage::All || self.valid_stage == stage
    }
}
