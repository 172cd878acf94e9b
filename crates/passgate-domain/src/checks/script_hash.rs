use crate::checks::options::{ABORT_ON_FAIL, MFA_ON_FAIL, Options, bool_option};
use crate::whitelist::{Whitelist, script_fingerprint};
use passgate_types::{CheckResult, Stage, ids};

/// Requires the job's script content to be whitelisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptHashCheck {
    pub(crate) job_name: String,
    pub(crate) abort_on_fail: bool,
    pub(crate) mfa_on_fail: bool,
    pub(crate) script_lines: Vec<String>,
}

impl ScriptHashCheck {
    pub fn new(options: &Options, job_name: &str, script_lines: &[String]) -> Self {
        Self {
            job_name: job_name.to_string(),
            abort_on_fail: bool_option(options, ABORT_ON_FAIL, false),
            mfa_on_fail: bool_option(options, MFA_ON_FAIL, false),
            script_lines: script_lines.to_vec(),
        }
    }

    pub fn evaluate(&self, whitelist: &Whitelist) -> CheckResult {
        let mut result = CheckResult::new(ids::NAME_SCRIPT_HASH, ids::CHECK_VERSION);

        let Some(fingerprint) = script_fingerprint(&self.script_lines) else {
            result.details = ids::DETAILS_NO_SCRIPT.to_string();
            return result;
        };

        if whitelist.contains_script(&fingerprint) {
            result.details = ids::DETAILS_SUCCESS.to_string();
            return result;
        }

        result.details = if self.abort_on_fail {
            result.abort = true;
            ids::script_abort_details(&self.job_name, &fingerprint)
        } else if self.mfa_on_fail {
            result.mfa_required = true;
            ids::script_mfa_details(&self.job_name, &fingerprint)
        } else {
            ids::script_unknown_details(&self.job_name, &fingerprint)
        };

        if whitelist.contains_job(&self.job_name).is_some() {
            result
                .details
                .push_str(&ids::script_updated_suffix(&self.job_name));
        }

        result
    }

    pub fn applies_to_stage(&self, stage: Stage) -> bool {
        matches!(stage, Stage::Script | Stage::All)
    }
}
