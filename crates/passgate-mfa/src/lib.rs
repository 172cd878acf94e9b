//! Out-of-band confirmation.
//!
//! A scratch secret is written to the secret store and the user is asked to delete it.
//! Deletion within the timeout confirms the run.

#![forbid(unsafe_code)]

mod marker;
mod ports;
mod protocol;

pub use marker::{MarkerError, create_marker, marker_exists};
pub use ports::{Notifier, SecretStore};
pub use protocol::{
    DEFAULT_INTERVAL, MfaError, MfaOutcome, MfaReport, MfaSession, MfaSettings, PIPELINE_ID_KEY,
    authorize, instruct, instructions, issue, poll, resolve, scratch_token,
};
