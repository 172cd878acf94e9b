use assert_cmd::Command;
use predicates::prelude::*;

const CI_VARS: &[&str] = &[
    "VAULT_ADDR",
    "VAULT_TOKEN",
    "CI_JOB_JWT",
    "CI_PROJECT_PATH",
    "CI_PLATFORM",
    "CI_JOB_NAME",
    "CHECK_TYPE",
    "GITHUB_STEP_SUMMARY",
];

/// The passgate binary with CI variables of the host cleared.
#[allow(deprecated)]
fn passgate_cmd() -> Command {
    let mut cmd = Command::cargo_bin("passgate").unwrap();
    for var in CI_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_works() {
    passgate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("fingerprint"));
}

#[test]
fn check_help_lists_ci_variables() {
    passgate_cmd()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CI_JOB_NAME"))
        .stdout(predicate::str::contains("--pre-validation-token"));
}

#[test]
fn version_prints_package_version() {
    passgate_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("passgate "));
}

#[test]
fn schema_describes_jobs() {
    passgate_cmd()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("jobName"))
        .stdout(predicate::str::contains("checks"));
}

#[test]
fn fingerprint_prints_a_whitelist_entry() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("steps.yml");
    std::fs::write(&script, "- run: make test\n- run: make deploy\n").unwrap();

    passgate_cmd()
        .args(["fingerprint", "--platform", "github", "--job-name", "deploy"])
        .arg("--script-file")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("deploy@sha256:"));
}

#[test]
fn fingerprint_of_empty_script_fails() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("empty.log");
    std::fs::write(&script, "").unwrap();

    passgate_cmd()
        .args(["fingerprint", "--job-name", "deploy"])
        .arg("--script-file")
        .arg(&script)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no commands found"));
}

#[test]
fn fingerprint_reads_stdin() {
    passgate_cmd()
        .args([
            "fingerprint",
            "--platform",
            "github",
            "--job-name",
            "build",
            "--script-file",
            "-",
        ])
        .write_stdin("- run: cargo build\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("build@sha256:"));
}

#[test]
fn check_without_vault_is_a_runtime_error() {
    passgate_cmd()
        .args(["check", "--stage", "image", "--job-name", "deploy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("passgate error"))
        .stderr(predicate::str::contains("VAULT_ADDR"));
}

#[test]
fn check_without_credentials_is_a_runtime_error() {
    passgate_cmd()
        .args([
            "--vault-addr",
            "http://127.0.0.1:1",
            "--ci-project-path",
            "group/app",
            "check",
            "--job-name",
            "deploy",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("either a Vault token or a JWT is required"));
}
