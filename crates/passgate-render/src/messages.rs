//! One-line outcome messages.

pub fn success_message(job: &str) -> String {
    format!("✅ Successful passgate check for job: {job}")
}

pub fn failure_message(job: &str, reason: &str) -> String {
    format!("❌ Unsuccessful passgate check for job: {job} ({reason})")
}

pub fn prevalidated_message(job: &str) -> String {
    format!("✅ CI/CD for {job} has been prevalidated")
}
