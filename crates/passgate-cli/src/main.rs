//! CLI entry point for passgate.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! Gate logic lives in the `passgate-app` crate; Vault and notifier adapters are wired here.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use passgate_app::{GateInput, cleaner_for, decision_exit_code, run_gate};
use passgate_domain::clock::{Clock, SystemClock};
use passgate_domain::whitelist::script_fingerprint;
use passgate_mfa::MfaSettings;
use passgate_notify::notifier_from_config;
use passgate_render::{RenderableReport, render_github_annotations, render_markdown};
use passgate_vault::{VaultAuth, VaultClient, VaultPaths, default_role};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "passgate",
    version,
    about = "Pipeline authorization gate for CI/CD jobs"
)]
struct Cli {
    #[command(flatten)]
    vault: VaultArgs,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct VaultArgs {
    /// Vault address used by the gate.
    #[arg(long, env = "VAULT_ADDR", global = true)]
    vault_addr: Option<String>,

    /// Vault address users can reach from a browser (defaults to --vault-addr).
    #[arg(long, env = "VAULT_EXTERNAL_ADDR", global = true)]
    vault_external_addr: Option<String>,

    /// Static Vault token.
    #[arg(long, env = "VAULT_TOKEN", global = true, hide_env_values = true)]
    vault_token: Option<String>,

    /// CI-issued JWT, exchanged for a Vault token (preferred over --vault-token).
    #[arg(long, env = "CI_JOB_JWT", global = true, hide_env_values = true)]
    jwt_token: Option<String>,

    /// Login role (defaults to the project path with '/' replaced by '-').
    #[arg(long, env = "VAULT_ROLE", global = true)]
    vault_role: Option<String>,

    #[arg(long, env = "VAULT_LOGIN_PATH", global = true, default_value = "auth/jwt/login")]
    vault_login_path: String,

    /// Mount under which policies, whitelists and scratch secrets live.
    #[arg(long, env = "VAULT_ROOT", global = true, default_value = "cicd")]
    vault_root: String,

    /// Project path, e.g. group/sub/app.
    #[arg(long, env = "CI_PROJECT_PATH", global = true)]
    ci_project_path: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Gate one stage of a job.
    Check(CheckArgs),

    /// Print the whitelist entry for a job script.
    Fingerprint {
        #[arg(long, env = "CI_PLATFORM", default_value = "gitlab")]
        platform: String,

        #[arg(long, env = "CI_JOB_NAME")]
        job_name: String,

        /// Script to fingerprint ('-' reads stdin).
        #[arg(long)]
        script_file: Utf8PathBuf,
    },

    /// Print the JSON Schema of the project policy.
    Schema,

    /// Print the version.
    Version,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Stage to gate: image, script or all.
    #[arg(long, env = "CHECK_TYPE", default_value = "all")]
    stage: String,

    #[arg(long, env = "CI_PLATFORM", default_value = "gitlab")]
    platform: String,

    #[arg(long, env = "CI_JOB_NAME")]
    job_name: String,

    #[arg(long, env = "CI_JOB_IMAGE", default_value = "")]
    job_image: String,

    #[arg(long, env = "CI_PIPELINE_ID", default_value = "")]
    pipeline_id: String,

    #[arg(long, env = "CI_USER_EMAIL", default_value = "")]
    user_email: String,

    /// Job script as handed over by the platform ('-' reads stdin).
    #[arg(long)]
    script_file: Option<Utf8PathBuf>,

    /// Seconds the user has to confirm a run.
    #[arg(long, env = "MFA_TIMEOUT", default_value = "300")]
    timeout: u64,

    /// Marker file recording a confirmation for the rest of the job.
    #[arg(long, env = "PRE_VALIDATION_TOKEN")]
    pre_validation_token: Option<Utf8PathBuf>,

    /// Also append a Markdown summary of the results to this file.
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    summary_out: Option<Utf8PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.cmd {
        Commands::Check(args) => cmd_check(&cli.vault, args),
        Commands::Fingerprint {
            platform,
            job_name,
            script_file,
        } => cmd_fingerprint(&platform, &job_name, &script_file),
        Commands::Schema => {
            let schema = passgate_settings::project_config_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Version => {
            println!("passgate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

fn cmd_check(vault: &VaultArgs, args: CheckArgs) -> anyhow::Result<()> {
    // The local offset must be read before the runtime starts its worker threads.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::detect());

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")
        .and_then(|runtime| runtime.block_on(gate(vault, args, clock)));

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("passgate error: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn gate(vault: &VaultArgs, args: CheckArgs, clock: Arc<dyn Clock>) -> anyhow::Result<i32> {
    let addr = vault
        .vault_addr
        .as_deref()
        .context("a Vault address is required (--vault-addr or VAULT_ADDR)")?;
    let project_path = vault
        .ci_project_path
        .as_deref()
        .context("a project path is required (--ci-project-path or CI_PROJECT_PATH)")?;

    let paths = VaultPaths::new(&vault.vault_root, project_path);
    let role = vault
        .vault_role
        .clone()
        .unwrap_or_else(|| default_role(project_path));
    let auth = VaultAuth::from_parts(
        vault.vault_token.clone(),
        vault.jwt_token.clone(),
        &vault.vault_login_path,
        &role,
    )?;
    let client = VaultClient::connect(addr, &auth).await?;

    let namespace = client
        .read_namespace_config(&paths.namespace_config())
        .await?;
    let config = client.read_project_config(&paths.project_config()).await?;
    let whitelist = client
        .read_whitelists(&paths.namespace_whitelist(), &paths.project_whitelist())
        .await?;
    let notifier = notifier_from_config(&namespace.logger, &args.job_name).await?;

    let external = vault.vault_external_addr.as_deref().unwrap_or(addr);
    let mut mfa = MfaSettings::new(paths.scratch_mount(), Duration::from_secs(args.timeout));
    mfa.ui_base = Some(paths.scratch_ui(external));
    mfa.marker = args.pre_validation_token.map(Utf8PathBuf::into_std_path_buf);

    let raw_script = match &args.script_file {
        Some(path) => read_script(path)?,
        None => String::new(),
    };

    let input = GateInput {
        job_name: args.job_name.clone(),
        stage: args.stage,
        platform: args.platform.clone(),
        image: args.job_image,
        raw_script,
        pipeline_id: args.pipeline_id,
        user_email: args.user_email,
        config,
        whitelist,
        mfa,
        whitelist_url: Some(paths.whitelist_ui(external)),
        clock,
    };

    let outcome = run_gate(input, &client, notifier.as_ref()).await?;
    for warning in &outcome.warnings {
        warn!("{warning}");
    }

    if args.platform.eq_ignore_ascii_case("github") {
        for annotation in render_github_annotations(&outcome.results) {
            println!("{annotation}");
        }
    }

    if let Some(path) = &args.summary_out {
        let report = RenderableReport {
            job: args.job_name.clone(),
            stage: outcome.stage,
            verdict: outcome.verdict,
            results: outcome.results.clone(),
            whitelist_url: Some(paths.whitelist_ui(external)),
        };
        append_text_file(path, &render_markdown(&report)).context("write summary")?;
    }

    info!(job = %args.job_name, decision = ?outcome.decision, "done");
    Ok(decision_exit_code(&outcome.decision))
}

fn cmd_fingerprint(platform: &str, job_name: &str, script_file: &Utf8Path) -> anyhow::Result<()> {
    let cleaner = cleaner_for(platform)?;
    let lines = cleaner.clean(&read_script(script_file)?);

    let Some(fingerprint) = script_fingerprint(&lines) else {
        eprintln!("passgate: no commands found in {script_file}");
        std::process::exit(1);
    };
    println!("{job_name}@{fingerprint}");
    Ok(())
}

fn read_script(path: &Utf8Path) -> anyhow::Result<String> {
    if path.as_str() == "-" {
        let mut script = String::new();
        std::io::stdin()
            .read_to_string(&mut script)
            .context("read script from stdin")?;
        return Ok(script);
    }
    std::fs::read_to_string(path).with_context(|| format!("read script: {path}"))
}

fn append_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {path}"))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("write text: {path}"))?;
    Ok(())
}
