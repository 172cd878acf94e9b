use passgate_app::{Decision, GateInput, decision_exit_code, run_gate};
use passgate_domain::Whitelist;
use passgate_domain::whitelist::script_fingerprint;
use passgate_mfa::{MfaSettings, create_marker};
use passgate_settings::parse_project_config;
use passgate_test_util::{MemorySecretStore, RecordingNotifier, fixed_clock, utc};
use passgate_types::{Stage, Verdict};
use serde_json::json;
use std::time::Duration;

const DIGEST: &str = "sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const GITHUB_SCRIPT: &str = "- run: make test\n- run: make deploy\n";

fn policy(checks: serde_json::Value) -> passgate_settings::ProjectConfig {
    let doc = json!({"jobs": [{"jobName": "deploy", "checks": checks}]});
    parse_project_config(doc.to_string().as_bytes()).expect("policy")
}

fn input(stage: &str, checks: serde_json::Value, whitelist: Whitelist) -> GateInput {
    GateInput {
        job_name: "deploy".to_string(),
        stage: stage.to_string(),
        platform: "github".to_string(),
        image: format!("registry.example.com/app:1@{DIGEST}"),
        raw_script: GITHUB_SCRIPT.to_string(),
        pipeline_id: "4711".to_string(),
        user_email: "dev@example.com".to_string(),
        config: policy(checks),
        whitelist,
        mfa: MfaSettings::new("cicd/group/app/scratch", Duration::from_secs(10)),
        whitelist_url: None,
        clock: fixed_clock(utc(2026, 10, 19, 10, 0, 0)),
    }
}

fn image_whitelist() -> Whitelist {
    Whitelist {
        allowed_images: vec![format!("app:0@{DIGEST}")],
        allowed_scripts: Vec::new(),
    }
}

#[tokio::test]
async fn unlisted_image_is_denied_without_confirmation() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let checks = json!([{"name": "imageHash", "options": {"abortOnFail": true}}]);

    let outcome = run_gate(input("image", checks, Whitelist::default()), &store, &notifier)
        .await
        .expect("gate");

    assert_eq!(outcome.stage, Stage::Image);
    assert_eq!(outcome.verdict, Verdict::Deny);
    assert_eq!(outcome.results.len(), 1);
    assert!(outcome.results[0].abort);
    assert!(!outcome.results[0].mfa_required);
    assert_eq!(outcome.results[0].details, "image aborting");
    assert!(matches!(outcome.decision, Decision::Denied(_)));
    assert_eq!(decision_exit_code(&outcome.decision), 2);

    // No challenge was issued.
    assert_eq!(store.reads(), 0);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("image aborting"));
    assert!(messages[1].contains("Unsuccessful passgate check for job: deploy"));
}

#[tokio::test]
async fn whitelisted_image_is_allowed() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let checks = json!([{"name": "imageHash", "options": {"abortOnFail": true}}]);

    let outcome = run_gate(input("image", checks, image_whitelist()), &store, &notifier)
        .await
        .expect("gate");

    assert_eq!(outcome.verdict, Verdict::Allow);
    assert_eq!(outcome.results[0].details, "success");
    assert_eq!(outcome.decision, Decision::Allowed);
    assert_eq!(decision_exit_code(&outcome.decision), 0);
    assert!(
        notifier
            .messages()
            .last()
            .is_some_and(|m| m.ends_with("job: deploy"))
    );
}

#[tokio::test]
async fn whitelisted_script_is_allowed_after_cleaning() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let fp = script_fingerprint(&["run: make test", "run: make deploy"]).expect("fingerprint");
    let whitelist = Whitelist {
        allowed_images: Vec::new(),
        allowed_scripts: vec![format!("deploy@{fp}")],
    };
    let checks = json!([{"name": "scriptHash", "options": {"mfaOnFail": true}}]);

    let outcome = run_gate(input("script", checks, whitelist), &store, &notifier)
        .await
        .expect("gate");

    assert_eq!(outcome.verdict, Verdict::Allow);
    assert_eq!(outcome.decision, Decision::Allowed);
}

#[tokio::test(start_paused = true)]
async fn confirmation_in_time_allows_and_marks_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("validated");

    let store = MemorySecretStore::new().confirm_after(1);
    let notifier = RecordingNotifier::new();
    let mut gate = input("script", json!([{"name": "mfaRequired"}]), Whitelist::default());
    gate.mfa.marker = Some(marker.clone());

    let outcome = run_gate(gate, &store, &notifier).await.expect("gate");

    assert_eq!(outcome.verdict, Verdict::RequireConfirmation);
    assert_eq!(outcome.decision, Decision::Allowed);
    assert!(marker.exists());
    assert!(outcome.warnings.is_empty());

    let messages = notifier.messages();
    assert!(messages.iter().any(|m| m.contains("Please delete the scratch secret")));
    assert!(messages.iter().any(|m| m.contains("pipeline 4711")));
}

#[tokio::test(start_paused = true)]
async fn expired_confirmation_denies() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let gate = input("script", json!([{"name": "mfaRequired"}]), Whitelist::default());

    let outcome = run_gate(gate, &store, &notifier).await.expect("gate");

    assert_eq!(
        outcome.decision,
        Decision::Denied("confirmation window expired".to_string())
    );
    // Issue read-back plus two polls.
    assert_eq!(store.reads(), 3);
    assert_eq!(store.deleted().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unwritable_scratch_secret_denies() {
    let store = MemorySecretStore::new().failing_writes();
    let notifier = RecordingNotifier::new();
    let gate = input("script", json!([{"name": "mfaRequired"}]), Whitelist::default());

    let outcome = run_gate(gate, &store, &notifier).await.expect("gate");

    let Decision::Denied(reason) = &outcome.decision else {
        panic!("expected a denial, got {:?}", outcome.decision);
    };
    assert!(reason.contains("unable to write scratch secret"));
    assert_eq!(store.reads(), 0);
}

#[tokio::test]
async fn existing_marker_skips_the_challenge() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("validated");
    create_marker(&marker).expect("marker");

    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let mut gate = input("script", json!([{"name": "mfaRequired"}]), Whitelist::default());
    gate.mfa.marker = Some(marker);

    let outcome = run_gate(gate, &store, &notifier).await.expect("gate");

    assert_eq!(outcome.decision, Decision::Allowed);
    assert_eq!(store.reads(), 0);
    assert!(
        notifier
            .messages()
            .iter()
            .any(|m| m.contains("has been prevalidated"))
    );
}

#[tokio::test(start_paused = true)]
async fn marker_is_ignored_for_the_image_stage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("validated");
    create_marker(&marker).expect("marker");

    let store = MemorySecretStore::new().confirm_after(1);
    let notifier = RecordingNotifier::new();
    let mut gate = input("image", json!([{"name": "mfaRequired"}]), Whitelist::default());
    gate.mfa.marker = Some(marker);

    let outcome = run_gate(gate, &store, &notifier).await.expect("gate");

    assert_eq!(outcome.decision, Decision::Allowed);
    // The challenge ran: read-back plus one poll.
    assert_eq!(store.reads(), 2);
}

#[tokio::test]
async fn unknown_check_is_a_configuration_error() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let gate = input("image", json!([{"name": "frobnicate"}]), image_whitelist());

    let err = run_gate(gate, &store, &notifier).await.unwrap_err();

    assert!(format!("{err:#}").contains("unknown check name 'frobnicate'"));
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn unknown_platform_is_a_configuration_error() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let mut gate = input("image", json!([]), image_whitelist());
    gate.platform = "jenkins".to_string();

    let err = run_gate(gate, &store, &notifier).await.unwrap_err();

    assert!(format!("{err:#}").contains("unknown CI/CD platform 'jenkins'"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn date_window_policy_is_evaluated_on_a_shared_runtime() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::new();
    let checks = json!([
        {"name": "imageHash", "options": {"abortOnFail": true}},
        {"name": "dateTimeCheck", "options": {"time": "09:00:00", "tolerance": 1_000_000_000_000_i64}}
    ]);

    let outcome = run_gate(input("image", checks, image_whitelist()), &store, &notifier)
        .await
        .expect("gate");

    assert_eq!(outcome.results.len(), 2);
    assert!(
        outcome
            .results
            .iter()
            .any(|r| r.details == "current time not within allowed time")
    );
    assert_eq!(outcome.verdict, Verdict::Deny);
    assert_eq!(decision_exit_code(&outcome.decision), 2);
}

#[tokio::test]
async fn notifier_outage_does_not_change_the_decision() {
    let store = MemorySecretStore::new();
    let notifier = RecordingNotifier::failing();
    let checks = json!([{"name": "imageHash", "options": {"abortOnFail": true}}]);

    let outcome = run_gate(input("image", checks, image_whitelist()), &store, &notifier)
        .await
        .expect("gate");

    assert_eq!(outcome.decision, Decision::Allowed);
}
