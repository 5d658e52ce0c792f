//! helm-outdated - find and update outdated Helm chart dependencies
//!
//! Commands:
//! - list: report dependencies with a newer release in their repository
//! - update: rewrite requirements.yaml to the latest releases, optionally
//!   bumping the chart version and releasing the change through git

use anyhow::Context;
use clap::Parser;
use helm_outdated::cli::{CliArgs, Command, CommonArgs, ListArgs, UpdateArgs};
use helm_outdated::domain::OutdatedReport;
use helm_outdated::orchestrator::{needs_review, Orchestrator, ReleaseOptions, UpdateOptions};
use helm_outdated::output::{Heading, TextFormatter};
use helm_outdated::registry::IndexCache;
use helm_outdated::release::GitCli;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.debug);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG overrides the --debug default
fn init_tracing(debug: bool) {
    let default = if debug { "info,helm_outdated=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let debug = args.debug;
    match args.command {
        Command::List(list) => run_list(list, debug).await,
        Command::Update(update) => run_update(update, debug).await,
    }
}

async fn run_list(args: ListArgs, debug: bool) -> anyhow::Result<ExitCode> {
    let chart_path = args
        .common
        .absolute_chart_path()
        .context("failed to resolve chart path")?;
    let orchestrator = orchestrator(&args.common, debug)?;

    let report = orchestrator
        .outdated(&chart_path, &args.common.filter())
        .await?;
    print_report(&report, Heading::Outdated, args.common.max_column_width, debug)?;

    if args.fail_on_outdated_dependencies && report.has_outdated() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_update(args: UpdateArgs, debug: bool) -> anyhow::Result<ExitCode> {
    let chart_path = args
        .common
        .absolute_chart_path()
        .context("failed to resolve chart path")?;

    // Preflight git before anything is written.
    let git = if args.auto_update {
        Some(connect_git(&chart_path, &args)?)
    } else {
        None
    };

    let orchestrator = orchestrator(&args.common, debug)?;
    let report = orchestrator
        .outdated(&chart_path, &args.common.filter())
        .await?;
    print_report(&report, Heading::Updating, args.common.max_column_width, debug)?;

    if let Some(git) = &git {
        if report.has_outdated() && needs_review(&report, args.only_pull_requests) {
            git.require_review_tool()?;
        }
    }

    let options = UpdateOptions {
        indent: args.indent,
        increment: args.chart_version_increment(),
        sync_lock: args.sync_lock,
    };
    let release = git.as_ref().map(|git| ReleaseOptions {
        vcs: git,
        only_pull_requests: args.only_pull_requests,
        base_branch: args.base_branch.clone(),
    });

    let outcome = orchestrator.apply(report, &options, release.as_ref())?;

    if let Some(version) = &outcome.chart_version {
        eprintln!("Chart version incremented to {}", version);
    }
    if let Some(write) = &outcome.write {
        for name in &write.unmatched {
            eprintln!("Warning: {} not found in {}", name, write.path.display());
        }
    }
    if let Some(release) = &outcome.release {
        match &release.review {
            Some(review) => eprintln!("Opened review request {}", review),
            None => eprintln!("Pushed updates to {}", release.branch),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn orchestrator(common: &CommonArgs, debug: bool) -> anyhow::Result<Orchestrator> {
    let cache = match &common.repository_cache {
        Some(dir) => IndexCache::new(dir),
        None => IndexCache::from_env(),
    };
    let show_progress = !debug && io::stderr().is_terminal();
    Ok(Orchestrator::new(cache)?.with_progress(show_progress))
}

fn connect_git(chart_path: &Path, args: &UpdateArgs) -> anyhow::Result<GitCli> {
    let git = GitCli::connect(
        chart_path,
        args.author_name.as_deref(),
        args.author_email.as_deref(),
        GitCli::token_from_env(),
    )
    .context("--auto-update preflight failed")?;
    tracing::debug!(
        name = %git.identity().name,
        email = %git.identity().email,
        "git identity resolved"
    );
    Ok(git)
}

fn print_report(
    report: &OutdatedReport,
    heading: Heading,
    max_column_width: usize,
    debug: bool,
) -> anyhow::Result<()> {
    let formatter = TextFormatter::with_color(max_column_width, io::stdout().is_terminal());
    let mut stdout = io::stdout().lock();
    formatter.format_outdated(&report.outdated, heading, &mut stdout)?;
    if debug {
        formatter.format_skipped(&report.skipped, &mut stdout)?;
    }
    stdout.flush()?;
    Ok(())
}
