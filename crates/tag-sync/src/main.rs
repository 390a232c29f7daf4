use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::{SyncOptions, TagPipeline, log_rate_limit};
use domain::{PipelineError, TagTemplate, Tagger};
use infrastructure::eups::eups_tag_name;
use infrastructure::{EupsTagSource, GithubClient, SyncConfig, VersionDbSource, credentials};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tag git repos in a GitHub org from EUPS/versiondb version records", long_about = None)]
struct Args {
    /// Git tag name to apply (e.g. `w.2018.18` or `15.0.rc2`)
    tag: String,

    /// Build manifest id in the version database (e.g. `b3595`)
    manifest: String,

    /// GitHub organization that owns the repos
    #[arg(long)]
    org: String,

    /// Team whose repos may be tagged (repeatable)
    #[arg(long = "allow-team", required = true)]
    allow_team: Vec<String>,

    /// Team whose repos may not be tagged (repeatable)
    #[arg(long = "deny-team")]
    deny_team: Vec<String>,

    /// Team whose repos use external-style tag names (repeatable)
    #[arg(long = "external-team")]
    external_team: Vec<String>,

    /// EUPS tag-candidate to cross-reference (defaults to the tag name)
    #[arg(long)]
    candidate: Option<String>,

    /// Plan everything but do not create or move any tag
    #[arg(long)]
    dry_run: bool,

    /// Move an existing tag that does not match the target
    #[arg(long)]
    force_tag: bool,

    /// Accept version mismatches between the candidate and the manifest
    #[arg(long)]
    ignore_version: bool,

    /// Tag at most N products
    #[arg(long)]
    limit: Option<usize>,

    /// Stop applying tags at the first failure
    #[arg(long, overrides_with = "no_fail_fast")]
    fail_fast: bool,

    /// Keep applying tags after failures (default)
    #[arg(long, overrides_with = "fail_fast")]
    no_fail_fast: bool,

    /// Name to record as the git tagger (falls back to $GIT_AUTHOR_NAME)
    #[arg(long)]
    user: Option<String>,

    /// Email to record as the git tagger (falls back to $GIT_AUTHOR_EMAIL)
    #[arg(long)]
    email: Option<String>,

    /// GitHub access token (overrides the token file)
    #[arg(long)]
    token: Option<String>,

    /// Path to a file holding the GitHub access token
    #[arg(long)]
    token_path: Option<String>,

    /// Override GitHub API base url
    #[arg(long)]
    github_api_url: Option<String>,

    /// Override EUPS tag list base url
    #[arg(long)]
    eupstag_base_url: Option<String>,

    /// Override version database base url
    #[arg(long)]
    versiondb_base_url: Option<String>,
}

fn tagger_field(cli: Option<String>, env_var: &str, flag: &str) -> anyhow::Result<String> {
    cli.or_else(|| std::env::var(env_var).ok())
        .with_context(|| format!("--{flag} not given and ${env_var} is unset"))
}

async fn execute(args: Args) -> anyhow::Result<ExitCode> {
    // 1. Load configuration, then apply CLI overrides
    let mut config = SyncConfig::load()?;
    if let Some(url) = args.github_api_url {
        config.github_api_url = url;
    }
    if let Some(url) = args.eupstag_base_url {
        config.eupstag_base_url = url;
    }
    if let Some(url) = args.versiondb_base_url {
        config.versiondb_base_url = url;
    }
    if let Some(path) = args.token_path {
        config.token_path = path;
    }

    let token = credentials::load_token(args.token.as_deref(), &config.token_path)?;

    let user = tagger_field(args.user, "GIT_AUTHOR_NAME", "user")?;
    let email = tagger_field(args.email, "GIT_AUTHOR_EMAIL", "email")?;

    // 2. Wire up the remote services
    let client = Arc::new(GithubClient::new(&config.github_api_url, &token)?);
    let candidates = Arc::new(EupsTagSource::new(&config.eupstag_base_url));
    let manifest = Arc::new(VersionDbSource::new(&config.versiondb_base_url));

    // 3. Describe the run
    let candidate = eups_tag_name(args.candidate.as_deref().unwrap_or(&args.tag));
    let template = TagTemplate {
        name: args.tag.clone(),
        message: format!(
            "Version {} release from {candidate}/{}",
            args.tag, args.manifest
        ),
        tagger: Tagger::new(&user, &email, Utc::now()),
    };

    let opts = SyncOptions {
        org: args.org,
        candidate,
        manifest: args.manifest,
        allow_teams: args.allow_team,
        deny_teams: args.deny_team,
        external_teams: args.external_team,
        ignore_version: args.ignore_version,
        force_tag: args.force_tag,
        dry_run: args.dry_run,
        limit: args.limit,
        fail_fast: args.fail_fast,
    };

    if opts.dry_run {
        info!("🔎 Dry run: no tags will be created or moved");
    }

    // 4. Run, then report remaining API quota win or lose
    let pipeline = TagPipeline::new(client.clone(), candidates, manifest, opts);
    let outcome = pipeline.run(&template).await;
    log_rate_limit(client.as_ref()).await;

    match outcome {
        Ok(count) => {
            info!("✅ {count} product(s) processed");
            Ok(ExitCode::SUCCESS)
        }
        Err(PipelineError::Aggregated(agg)) => {
            error!("{} product(s) failed", agg.count());
            Ok(ExitCode::from(agg.exit_code()))
        }
        Err(PipelineError::Fatal(e)) => {
            error!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,application=debug,infrastructure=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match execute(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(run()),
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            ExitCode::FAILURE
        }
    }
}
