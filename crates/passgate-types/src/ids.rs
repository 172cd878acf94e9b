//! Stable identifiers for checks and their result details.
//!
//! `CONFIG_*` is the case-insensitive name used in policy JSON. `NAME_*` is the
//! human-readable name that appears in result tables.

pub const CHECK_VERSION: &str = "1.0.0";

// Policy names (matched case-insensitively)
pub const CONFIG_SCRIPT_HASH: &str = "scripthash";
pub const CONFIG_IMAGE_HASH: &str = "imagehash";
pub const CONFIG_MFA_REQUIRED: &str = "mfarequired";
pub const CONFIG_DATE_TIME: &str = "datetimecheck";

// Display names
pub const NAME_SCRIPT_HASH: &str = "Script Hash Check";
pub const NAME_IMAGE_HASH: &str = "Image Hash Check";
pub const NAME_MFA_REQUIRED: &str = "Mfa Required Check";
pub const NAME_DATE_TIME: &str = "Date Time Check";

// Shared
pub const DETAILS_SUCCESS: &str = "success";

// Details: script hash
pub const DETAILS_NO_SCRIPT: &str = "no script";

// Details: image hash
pub const DETAILS_IMAGE_ABORT: &str = "image aborting";
pub const DETAILS_IMAGE_MFA: &str = "image mfa required";
pub const DETAILS_IMAGE_ERROR: &str = "image fingerprint error";
pub const DETAILS_IMAGE_UNKNOWN: &str = "unknown image";

// Details: mfa required
pub const DETAILS_MFA_REQUIRED: &str = "mfa required";

// Details: date time
pub const DETAILS_TIME_NOT_ALLOWED: &str = "current time not within allowed time";
pub const DETAILS_DATE_NOT_ALLOWED: &str = "current date not within allowed date";

/// Details for a script fingerprint that is not whitelisted and aborts the run.
pub fn script_abort_details(job: &str, fingerprint: &str) -> String {
    format!("unknown script {job}@{fingerprint} aborting")
}

/// Details for a script fingerprint that is not whitelisted and needs confirmation.
pub fn script_mfa_details(job: &str, fingerprint: &str) -> String {
    format!("unknown script {job}@{fingerprint} mfa required")
}

/// Details for a script fingerprint that is not whitelisted when no failure policy is set.
pub fn script_unknown_details(job: &str, fingerprint: &str) -> String {
    format!("unknown script {job}@{fingerprint}")
}

/// Suffix appended when the whitelist knows the job but not its current content.
pub fn script_updated_suffix(job: &str) -> String {
    format!(" - CI job {job} has been updated")
}
