use passgate_types::CheckResult;

/// Render results as GitHub Actions workflow command annotations.
///
/// Aborting results become errors, confirmation requests warnings; passing results
/// are not annotated.
pub fn render_github_annotations(results: &[CheckResult]) -> Vec<String> {
    let mut out = Vec::new();

    for r in results {
        let level = if r.abort {
            "error"
        } else if r.mfa_required {
            "warning"
        } else {
            continue;
        };

        let mut message = format!("[{}] {}", r.name, r.details);
        if let Some(err) = &r.error {
            message.push_str(&format!(" ({err})"));
        }
        let message = message
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");

        out.push(format!("::{level} title=passgate::{message}"));
    }

    out
}
