//! The `gate` use case: resolve the job's checks, evaluate them, act on the verdict.

use crate::clean::cleaner_for;
use anyhow::Context;
use passgate_domain::clock::Clock;
use passgate_domain::{Whitelist, evaluate};
use passgate_mfa::{MfaOutcome, MfaSettings, Notifier, SecretStore, authorize, marker_exists};
use passgate_render::{
    RenderableReport, failure_message, prevalidated_message, render_table, success_message,
};
use passgate_settings::{CheckContext, ProjectConfig, resolve_checks};
use passgate_types::{CheckResult, Stage, Verdict};
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the gate use case.
#[derive(Clone, Debug)]
pub struct GateInput {
    pub job_name: String,
    /// Stage name as given by the executor (`image`, `script`, anything else means all).
    pub stage: String,
    /// CI platform the job runs on (`gitlab`, `github`).
    pub platform: String,
    /// Image reference, `name:tag@sha256:<hex>`.
    pub image: String,
    /// Script as handed over by the platform, before cleaning.
    pub raw_script: String,
    pub pipeline_id: String,
    pub user_email: String,
    pub config: ProjectConfig,
    pub whitelist: Whitelist,
    pub mfa: MfaSettings,
    /// Where the whitelist can be edited, shown next to the result table.
    pub whitelist_url: Option<String>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(String),
}

/// Output from the gate use case.
#[derive(Clone, Debug)]
pub struct GateOutcome {
    pub stage: Stage,
    pub verdict: Verdict,
    pub results: Vec<CheckResult>,
    pub decision: Decision,
    /// Non-fatal problems (marker or cleanup failures).
    pub warnings: Vec<String>,
}

/// Run the gate for one job stage.
///
/// Configuration problems (unknown platform or check name) are errors. Everything that
/// happens after the checks ran ends in a [`Decision`].
pub async fn run_gate(
    input: GateInput,
    store: &dyn SecretStore,
    notifier: &dyn Notifier,
) -> anyhow::Result<GateOutcome> {
    let stage = Stage::parse(&input.stage);
    let cleaner = cleaner_for(&input.platform).context("select script cleaner")?;

    let ctx = CheckContext {
        job_name: input.job_name.clone(),
        image: input.image.clone(),
        script_lines: cleaner.clean(&input.raw_script),
        clock: Arc::clone(&input.clock),
    };
    let configs = input.config.job_checks(&input.job_name);
    let checks = resolve_checks(&configs, &ctx, stage, &input.platform)
        .with_context(|| format!("resolve checks for job '{}'", input.job_name))?;

    // The checks fan out on rayon; keep that off the runtime's worker threads.
    let whitelist = input.whitelist.clone();
    let evaluation = tokio::task::spawn_blocking(move || evaluate(&checks, &whitelist))
        .await
        .context("evaluate checks")?;
    let job = input.job_name.as_str();

    let report = RenderableReport {
        job: job.to_string(),
        stage,
        verdict: evaluation.verdict,
        results: evaluation.results.clone(),
        whitelist_url: input.whitelist_url.clone(),
    };
    send(notifier, &render_table(&report)).await;

    let mut warnings = Vec::new();
    let decision = match evaluation.verdict {
        Verdict::Deny => Decision::Denied("a check aborted the run".to_string()),
        Verdict::Allow => Decision::Allowed,
        Verdict::RequireConfirmation => {
            let prevalidated = stage != Stage::Image
                && input.mfa.marker.as_deref().is_some_and(marker_exists);
            if prevalidated {
                info!(job, "run already confirmed by an earlier stage");
                send(notifier, &prevalidated_message(job)).await;
                return Ok(GateOutcome {
                    stage,
                    verdict: evaluation.verdict,
                    results: evaluation.results,
                    decision: Decision::Allowed,
                    warnings,
                });
            }

            match authorize(
                store,
                notifier,
                &input.mfa,
                &input.user_email,
                &input.pipeline_id,
                stage,
            )
            .await
            {
                Ok(report) => {
                    warnings.extend(report.warnings);
                    match report.outcome {
                        MfaOutcome::Confirmed => Decision::Allowed,
                        MfaOutcome::Expired => {
                            Decision::Denied("confirmation window expired".to_string())
                        }
                    }
                }
                Err(e) => {
                    warn!(job, error = %e, "confirmation could not be requested");
                    Decision::Denied(e.to_string())
                }
            }
        }
    };

    match &decision {
        Decision::Allowed => send(notifier, &success_message(job)).await,
        Decision::Denied(reason) => send(notifier, &failure_message(job, reason)).await,
    }
    info!(job, %stage, verdict = %evaluation.verdict, ?decision, "gate finished");

    Ok(GateOutcome {
        stage,
        verdict: evaluation.verdict,
        results: evaluation.results,
        decision,
        warnings,
    })
}

/// Map a decision to an exit code: 0 = allowed, 2 = denied.
pub fn decision_exit_code(decision: &Decision) -> i32 {
    match decision {
        Decision::Allowed => 0,
        Decision::Denied(_) => 2,
    }
}

async fn send(notifier: &dyn Notifier, message: &str) {
    if let Err(e) = notifier.send_message(message).await {
        warn!(error = %format!("{e:#}"), "notification not delivered");
    }
}
