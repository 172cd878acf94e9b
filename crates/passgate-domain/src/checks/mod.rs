//! The closed catalog of checks a policy can enable.

use crate::whitelist::Whitelist;
use passgate_types::{CheckResult, Stage, ids};

mod date_time;
mod image_hash;
mod mfa_required;
pub mod options;
mod script_hash;


pub use date_time::{DateTimeCheck, Scale};
pub use image_hash::ImageHashCheck;
pub use mfa_required::MfaRequiredCheck;
pub use options::Options;
pub use script_hash::ScriptHashCheck;

/// A constructed check, ready to evaluate against a whitelist.
#[derive(Clone, Debug)]
pub enum Check {
    ScriptHash(ScriptHashCheck),
    ImageHash(ImageHashCheck),
    MfaRequired(MfaRequiredCheck),
    DateTime(DateTimeCheck),
}

impl Check {
    /// Display name used in result tables.
    pub fn name(&self) -> &'static str {
        match self {
            Check::ScriptHash(_) => ids::NAME_SCRIPT_HASH,
            Check::ImageHash(_) => ids::NAME_IMAGE_HASH,
            Check::MfaRequired(_) => ids::NAME_MFA_REQUIRED,
            Check::DateTime(_) => ids::NAME_DATE_TIME,
        }
    }

    pub fn job_name(&self) -> &str {
        match self {
            Check::ScriptHash(c) => &c.job_name,
            Check::ImageHash(c) => &c.job_name,
            Check::MfaRequired(c) => &c.job_name,
            Check::DateTime(c) => &c.job_name,
        }
    }

    pub fn evaluate(&self, whitelist: &Whitelist) -> CheckResult {
        match self {
            Check::ScriptHash(c) => c.evaluate(whitelist),
            Check::ImageHash(c) => c.evaluate(whitelist),
            Check::MfaRequired(c) => c.evaluate(whitelist),
            Check::DateTime(c) => c.evaluate(whitelist),
        }
    }

    pub fn applies_to_stage(&self, stage: Stage) -> bool {
        match self {
            Check::ScriptHash(c) => c.applies_to_stage(stage),
            Check::ImageHash(c) => c.applies_to_stage(stage),
            Check::MfaRequired(c) => c.applies_to_stage(stage),
            Check::DateTime(c) => c.applies_to_stage(stage),
        }
    }

    /// Every check in the catalog runs on every CI platform.
    pub fn applies_to_platform(&self, _platform: &str) -> bool {
        true
    }
}

impl From<ScriptHashCheck> for Check {
    fn from(c: ScriptHashCheck) -> Self {
        Check::ScriptHash(c)
    }
}

impl From<ImageHashCheck> for Check {
    fn from(c: ImageHashCheck) -> Self {
        Check::ImageHash(c)
    }
}

impl From<MfaRequiredCheck> for Check {
    fn from(c: MfaRequiredCheck) -> Self {
        Check::MfaRequired(c)
    }
}

impl From<DateTimeCheck> for Check {
    fn from(c: DateTimeCheck) -> Self {
        Check::DateTime(c)
    }
}
