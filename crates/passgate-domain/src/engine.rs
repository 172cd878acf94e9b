use crate::checks::Check;
use crate::whitelist::Whitelist;
use passgate_types::{CheckResult, Verdict};
use std::sync::mpsc;
use tracing::{debug, info};

/// Every result produced for a run, plus the verdict they fold into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub results: Vec<CheckResult>,
}

/// Run every check concurrently and wait for all of them.
///
/// Nothing is cancelled or skipped once a result implies a denial: the full result set is
/// always returned so it can be audited.
pub fn evaluate(checks: &[Check], whitelist: &Whitelist) -> Evaluation {
    let (tx, rx) = mpsc::channel();

    rayon::scope(|scope| {
        for check in checks {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = check.evaluate(whitelist);
                debug!(
                    check = check.name(),
                    job = check.job_name(),
                    abort = result.abort,
                    mfa = result.mfa_required,
                    details = %result.details,
                    "check finished"
                );
                // The receiver is alive until after the scope joins.
                let _ = tx.send(result);
            });
        }
    });
    drop(tx);

    let mut results: Vec<CheckResult> = rx.into_iter().collect();
    debug_assert_eq!(results.len(), checks.len());

    // Deterministic ordering for stable output.
    results.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.details.cmp(&b.details)));

    let verdict = compute_verdict(&results);
    info!(checks = results.len(), %verdict, "evaluation complete");

    Evaluation { verdict, results }
}

/// Deny beats confirmation beats allow.
pub fn compute_verdict(results: &[CheckResult]) -> Verdict {
    results
        .iter()
        .map(CheckResult::verdict)
        .max()
        .unwrap_or(Verdict::Allow)
}
