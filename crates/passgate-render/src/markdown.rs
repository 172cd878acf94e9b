use crate::RenderableReport;
use passgate_types::Verdict;

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Passgate report: `{}`\n\n", report.job));
    let verdict = match report.verdict {
        Verdict::Allow => "ALLOW",
        Verdict::RequireConfirmation => "CONFIRMATION REQUIRED",
        Verdict::Deny => "DENY",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Stage: {}\n- Checks: {}\n\n",
        verdict,
        report.stage,
        report.results.len()
    ));

    if let Some(url) = &report.whitelist_url {
        out.push_str(&format!("> Whitelist: {url}\n\n"));
    }

    if report.results.is_empty() {
        out.push_str("No checks ran.\n");
        return out;
    }

    out.push_str("| Check | Version | Abort | MFA | Details |\n");
    out.push_str("|---|---|---|---|---|\n");
    for r in &report.results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            r.name,
            r.version,
            yes_no(r.abort),
            yes_no(r.mfa_required),
            escape_cell(&r.details)
        ));
        if let Some(err) = &r.error {
            out.push_str(&format!("|  |  |  |  | error: {} |\n", escape_cell(err)));
        }
    }

    out
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use passgate_types::{CheckResult, Stage, ids};

    fn report(results: Vec<CheckResult>, verdict: Verdict) -> RenderableReport {
        RenderableReport {
            job: "deploy".to_string(),
            stage: Stage::Script,
            verdict,
            results,
            whitelist_url: None,
        }
    }

    #[test]
    fn renders_empty_report() {
        let md = render_markdown(&report(Vec::new(), Verdict::Allow));
        assert!(md.contains("**ALLOW**"));
        assert!(md.contains("No checks ran"));
    }

    #[test]
    fn renders_rows_and_errors() {
        let mut r = CheckResult::new(ids::NAME_IMAGE_HASH, ids::CHECK_VERSION);
        r.abort = true;
        r.error = Some("bad | digest".to_string());
        r.details = ids::DETAILS_IMAGE_ERROR.to_string();

        let md = render_markdown(&report(vec![r], Verdict::Deny));
        assert!(md.contains("**DENY**"));
        assert!(md.contains("- Stage: script"));
        assert!(md.contains("| Image Hash Check | 1.0.0 | yes | no | image fingerprint error |"));
        assert!(md.contains("error: bad \\| digest"));
    }
}
