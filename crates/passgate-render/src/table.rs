use crate::RenderableReport;

const RULE: &str = "---------------------------------------------------------------------";
const HEADER: &str = "   Name   |   Version   |   Error   |   Abort   |   Mfa   |   Details";

/// Plain-text result table sent to the notifier.
pub fn render_table(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    match &report.whitelist_url {
        Some(url) => out.push_str(&format!("{url} - {}\n", report.job)),
        None => out.push_str(&format!("{}\n", report.job)),
    }
    out.push_str(RULE);
    out.push('\n');
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    for r in &report.results {
        out.push_str(&format!(
            "{} | {} | {} | {} | {} | {}\n",
            r.name,
            r.version,
            r.error.as_deref().unwrap_or(""),
            r.abort,
            r.mfa_required,
            r.details
        ));
        out.push_str(RULE);
        out.push('\n');
    }

    out
}
