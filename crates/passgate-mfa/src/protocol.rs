use crate::marker::create_marker;
use crate::ports::{Notifier, SecretStore};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use passgate_types::Stage;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Time between two existence checks of the scratch secret.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Key under which the pipeline id is stored in the scratch secret.
pub const PIPELINE_ID_KEY: &str = "CI/CD pipeline id";

const TOKEN_BYTES: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MfaSettings {
    /// Store path under which per-user scratch secrets are created.
    pub scratch_mount: String,

    /// Browsable location of `scratch_mount`, shown to the user.
    pub ui_base: Option<String>,

    pub interval: Duration,
    pub timeout: Duration,

    /// Validation marker written after a confirmation outside the image stage.
    pub marker: Option<PathBuf>,
}

impl MfaSettings {
    pub fn new(scratch_mount: impl Into<String>, timeout: Duration) -> Self {
        Self {
            scratch_mount: scratch_mount.into(),
            ui_base: None,
            interval: DEFAULT_INTERVAL,
            timeout,
            marker: None,
        }
    }

    /// Number of existence checks a challenge gets: `floor(timeout / interval)`.
    pub fn poll_budget(&self) -> u32 {
        let budget = self
            .timeout
            .as_millis()
            .checked_div(self.interval.as_millis())
            .unwrap_or(0);
        u32::try_from(budget).unwrap_or(u32::MAX)
    }
}

/// An issued challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MfaSession {
    pub secret_path: String,
    pub pipeline_id: String,
    pub user_email: String,
    pub timeout: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MfaOutcome {
    /// The user deleted the scratch secret in time.
    Confirmed,
    /// The poll budget ran out with the secret still present.
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MfaReport {
    pub outcome: MfaOutcome,
    pub secret_path: String,
    pub polls: u32,

    /// Non-fatal problems met while resolving the challenge.
    pub warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MfaError {
    #[error("unable to write scratch secret {path}: {message}")]
    Issue { path: String, message: String },

    #[error("CI/CD run not authorized, scratch secret {0} not retrievable")]
    NotRetrievable(String),
}

/// Random URL-safe token naming a scratch secret.
pub fn scratch_token() -> String {
    URL_SAFE_NO_PAD.encode(rand::random::<[u8; TOKEN_BYTES]>())
}

/// Write a fresh scratch secret for `user_email` and confirm it can be read back.
pub async fn issue(
    store: &dyn SecretStore,
    settings: &MfaSettings,
    user_email: &str,
    pipeline_id: &str,
) -> Result<MfaSession, MfaError> {
    let secret_path = format!(
        "{}/{}/{}",
        settings.scratch_mount.trim_end_matches('/'),
        user_email,
        scratch_token()
    );

    let mut data = BTreeMap::new();
    data.insert(PIPELINE_ID_KEY.to_string(), pipeline_id.to_string());

    store
        .write(&secret_path, &data)
        .await
        .map_err(|e| MfaError::Issue {
            path: secret_path.clone(),
            message: format!("{e:#}"),
        })?;

    match store.read(&secret_path).await {
        Ok(true) => {}
        Ok(false) => return Err(MfaError::NotRetrievable(secret_path)),
        Err(e) => {
            warn!(path = %secret_path, error = %format!("{e:#}"), "scratch secret read-back failed");
            return Err(MfaError::NotRetrievable(secret_path));
        }
    }

    info!(path = %secret_path, pipeline_id, "scratch secret issued");
    Ok(MfaSession {
        secret_path,
        pipeline_id: pipeline_id.to_string(),
        user_email: user_email.to_string(),
        timeout: settings.timeout,
    })
}

/// Message telling the user how to confirm the run.
pub fn instructions(settings: &MfaSettings, session: &MfaSession) -> String {
    let mut message = format!(
        "Please delete the scratch secret {} within {}s to authorize pipeline {}",
        session.secret_path,
        session.timeout.as_secs(),
        session.pipeline_id
    );
    if let Some(ui) = &settings.ui_base {
        message.push_str(&format!(
            " -> {}/{}",
            ui.trim_end_matches('/'),
            session.user_email
        ));
    }
    message
}

/// Send the instructions. A notifier failure is logged and otherwise ignored.
pub async fn instruct(notifier: &dyn Notifier, settings: &MfaSettings, session: &MfaSession) {
    let message = instructions(settings, session);
    if let Err(e) = notifier.send_message(&message).await {
        warn!(error = %format!("{e:#}"), "unable to send confirmation instructions");
    }
}

/// Check for the scratch secret until it is gone or the budget is spent.
///
/// Returns the outcome and the number of reads performed. Read errors count as
/// "still present".
pub async fn poll(
    store: &dyn SecretStore,
    settings: &MfaSettings,
    session: &MfaSession,
) -> (MfaOutcome, u32) {
    let budget = settings.poll_budget();

    for attempt in 1..=budget {
        match store.read(&session.secret_path).await {
            Ok(false) => {
                info!(attempt, "scratch secret deleted, run confirmed");
                return (MfaOutcome::Confirmed, attempt);
            }
            Ok(true) => debug!(attempt, budget, "scratch secret still present"),
            Err(e) => warn!(attempt, error = %format!("{e:#}"), "scratch secret check failed"),
        }

        if attempt < budget {
            tokio::time::sleep(settings.interval).await;
        }
    }

    info!(polls = budget, "confirmation window expired");
    (MfaOutcome::Expired, budget)
}

/// Record a confirmation or clean up an expired challenge.
///
/// Failures here do not change the outcome; they are returned as warnings.
pub async fn resolve(
    store: &dyn SecretStore,
    settings: &MfaSettings,
    session: &MfaSession,
    outcome: MfaOutcome,
    stage: Stage,
) -> Vec<String> {
    let mut warnings = Vec::new();

    match outcome {
        MfaOutcome::Confirmed => {
            if stage != Stage::Image
                && let Some(marker) = &settings.marker
                && let Err(e) = create_marker(marker)
            {
                warn!(error = %e, "validation marker not written");
                warnings.push(e.to_string());
            }
        }
        MfaOutcome::Expired => {
            if let Err(e) = store.delete(&session.secret_path).await {
                let message = format!(
                    "unable to delete scratch secret {}: {e:#}",
                    session.secret_path
                );
                warn!("{message}");
                warnings.push(message);
            }
        }
    }

    warnings
}

/// Run a full challenge: issue, instruct, poll, resolve.
pub async fn authorize(
    store: &dyn SecretStore,
    notifier: &dyn Notifier,
    settings: &MfaSettings,
    user_email: &str,
    pipeline_id: &str,
    stage: Stage,
) -> Result<MfaReport, MfaError> {
    let session = issue(store, settings, user_email, pipeline_id).await?;
    instruct(notifier, settings, &session).await;

    let (outcome, polls) = poll(store, settings, &session).await;
    let warnings = resolve(store, settings, &session, outcome, stage).await;

    Ok(MfaReport {
        outcome,
        secret_path: session.secret_path,
        polls,
        warnings,
    })
}
