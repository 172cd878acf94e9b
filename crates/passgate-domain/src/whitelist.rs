use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const SHA256_PREFIX: &str = "sha256:";
const SHA256_BYTES: usize = 32;

/// A reference whose content digest could not be extracted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FingerprintError {
    #[error("@sha256 not provided in reference '{0}'")]
    MissingDigest(String),

    #[error("'{0}' does not carry a valid sha256 digest")]
    InvalidDigest(String),

    #[error("invalid whitelist script entry '{0}', expected <jobName>@sha256:<base64>")]
    InvalidScriptEntry(String),
}

/// Approved image and script fingerprints for a namespace or project.
///
/// Images are stored as `name:tag@sha256:<hex>`, scripts as `<jobName>@sha256:<base64url>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Whitelist {
    pub allowed_images: Vec<String>,
    pub allowed_scripts: Vec<String>,
}

impl Whitelist {
    /// Append another whitelist's entries after this one's.
    pub fn merge(&mut self, other: Whitelist) {
        self.allowed_images.extend(other.allowed_images);
        self.allowed_scripts.extend(other.allowed_scripts);
    }

    /// True if some well-formed entry carries the same digest as `image`.
    ///
    /// Malformed entries never match. A malformed candidate is an error.
    pub fn contains_image(&self, image: &str) -> Result<bool, FingerprintError> {
        let wanted = image_digest(image)?;
        Ok(self
            .allowed_images
            .iter()
            .filter_map(|entry| image_digest(entry).ok())
            .any(|digest| digest == wanted))
    }

    /// True if some well-formed script entry carries exactly `fingerprint`.
    pub fn contains_script(&self, fingerprint: &str) -> bool {
        self.allowed_scripts
            .iter()
            .filter_map(|entry| script_entry(entry).ok())
            .any(|(_, digest)| digest == fingerprint)
    }

    /// Fingerprint of the first well-formed script entry recorded for `job`.
    pub fn contains_job(&self, job: &str) -> Option<&str> {
        self.allowed_scripts
            .iter()
            .filter_map(|entry| script_entry(entry).ok())
            .find(|(name, _)| *name == job)
            .map(|(_, digest)| digest)
    }
}

/// Extract the `sha256:<hex>` digest after the last `@` of an image reference.
pub fn image_digest(reference: &str) -> Result<&str, FingerprintError> {
    let Some((_, digest)) = reference.rsplit_once('@') else {
        return Err(FingerprintError::MissingDigest(reference.to_string()));
    };

    let valid = digest
        .strip_prefix(SHA256_PREFIX)
        .filter(|hex_part| hex_part.len() == SHA256_BYTES * 2)
        .and_then(|hex_part| hex::decode(hex_part).ok())
        .is_some();
    if !valid {
        return Err(FingerprintError::InvalidDigest(reference.to_string()));
    }

    Ok(digest)
}

/// Split a `<jobName>@sha256:<base64url>` entry into job name and fingerprint.
///
/// The payload must decode to exactly one SHA-256 digest.
pub fn script_entry(entry: &str) -> Result<(&str, &str), FingerprintError> {
    let Some((job, digest)) = entry.split_once('@') else {
        return Err(FingerprintError::MissingDigest(entry.to_string()));
    };
    if job.is_empty() {
        return Err(FingerprintError::InvalidScriptEntry(entry.to_string()));
    }

    let valid = digest
        .strip_prefix(SHA256_PREFIX)
        .and_then(|payload| URL_SAFE.decode(payload).ok())
        .is_some_and(|bytes| bytes.len() == SHA256_BYTES);
    if !valid {
        return Err(FingerprintError::InvalidDigest(entry.to_string()));
    }

    Ok((job, digest))
}

/// Compute the content fingerprint of a script: `sha256:` + base64url(SHA-256(lines joined)).
///
/// Returns `None` when the concatenated script is empty.
pub fn script_fingerprint<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let script: String = lines.iter().map(AsRef::as_ref).collect();
    if script.is_empty() {
        return None;
    }

    let digest = Sha256::digest(script.as_bytes());
    Some(format!("{SHA256_PREFIX}{}", URL_SAFE.encode(digest)))
}
