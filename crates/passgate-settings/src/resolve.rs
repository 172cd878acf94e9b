use crate::model::CheckConfig;
use passgate_domain::checks::{
    Check, DateTimeCheck, ImageHashCheck, MfaRequiredCheck, ScriptHashCheck,
};
use passgate_domain::clock::Clock;
use passgate_types::{Stage, ids};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("unknown check name '{0}'")]
    UnknownCheck(String),
}

/// Job facts the checks are constructed from.
#[derive(Clone, Debug)]
pub struct CheckContext {
    pub job_name: String,
    pub image: String,
    pub script_lines: Vec<String>,
    pub clock: Arc<dyn Clock>,
}

/// Build the checks that apply to `stage` on `platform`, in configuration order.
///
/// Any unknown check name fails the whole resolution; no partial list is returned.
pub fn resolve_checks(
    configs: &[CheckConfig],
    ctx: &CheckContext,
    stage: Stage,
    platform: &str,
) -> Result<Vec<Check>, PolicyError> {
    let mut out = Vec::with_capacity(configs.len());

    for cfg in configs {
        let check = build_check(cfg, ctx)?;
        if check.applies_to_stage(stage) && check.applies_to_platform(platform) {
            out.push(check);
        } else {
            debug!(check = check.name(), %stage, platform, "check skipped for stage");
        }
    }

    Ok(out)
}

fn build_check(cfg: &CheckConfig, ctx: &CheckContext) -> Result<Check, PolicyError> {
    let options = &cfg.options;
    let job = ctx.job_name.as_str();

    let check = match cfg.name.to_ascii_lowercase().as_str() {
        ids::CONFIG_SCRIPT_HASH => ScriptHashCheck::new(options, job, &ctx.script_lines).into(),
        ids::CONFIG_IMAGE_HASH => ImageHashCheck::new(options, job, &ctx.image).into(),
        ids::CONFIG_MFA_REQUIRED => MfaRequiredCheck::new(options, job).into(),
        ids::CONFIG_DATE_TIME => DateTimeCheck::new(options, job, Arc::clone(&ctx.clock)).into(),
        _ => return Err(PolicyError::UnknownCheck(cfg.name.clone())),
    };
    Ok(check)
}
