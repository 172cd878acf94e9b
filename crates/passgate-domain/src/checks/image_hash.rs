use crate::checks::options::{ABORT_ON_FAIL, MFA_ON_FAIL, Options, bool_option};
use crate::whitelist::Whitelist;
use passgate_types::{CheckResult, Stage, ids};

/// Requires the job image's content digest to be whitelisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageHashCheck {
    pub(crate) job_name: String,
    pub(crate) abort_on_fail: bool,
    pub(crate) mfa_on_fail: bool,
    pub(crate) image: String,
}

impl ImageHashCheck {
    pub fn new(options: &Options, job_name: &str, image: &str) -> Self {
        Self {
            job_name: job_name.to_string(),
            abort_on_fail: bool_option(options, ABORT_ON_FAIL, false),
            mfa_on_fail: bool_option(options, MFA_ON_FAIL, false),
            image: image.to_string(),
        }
    }

    pub fn evaluate(&self, whitelist: &Whitelist) -> CheckResult {
        let mut result = CheckResult::new(ids::NAME_IMAGE_HASH, ids::CHECK_VERSION);

        // A malformed candidate is treated as not found, with the error attached.
        let found = match whitelist.contains_image(&self.image) {
            Ok(found) => found,
            Err(err) => {
                result.error = Some(err.to_string());
                false
            }
        };

        if found {
            result.details = ids::DETAILS_SUCCESS.to_string();
            return result;
        }

        let details = if self.abort_on_fail {
            result.abort = true;
            ids::DETAILS_IMAGE_ABORT
        } else if self.mfa_on_fail {
            result.mfa_required = true;
            ids::DETAILS_IMAGE_MFA
        } else {
            ids::DETAILS_IMAGE_UNKNOWN
        };

        result.details = if result.error.is_some() {
            ids::DETAILS_IMAGE_ERROR.to_string()
        } else {
            details.to_string()
        };

        result
    }

    pub fn applies_to_stage(&self, stage: Stage) -> bool {
        matches!(stage, Stage::Image | Stage::All)
    }
}
