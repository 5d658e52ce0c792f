//! CLI argument parsing module for helm-outdated

use crate::domain::Severity;
use crate::manifest::DEFAULT_INDENT;
use crate::output::DEFAULT_MAX_COLUMN_WIDTH;
use crate::registry::CACHE_DIR_ENV;
use crate::release::DEFAULT_BASE_BRANCH;
use crate::update::DependencyFilter;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Find and update outdated dependencies of a Helm chart
#[derive(Parser, Debug, Clone)]
#[command(
    name = "helm-outdated",
    version,
    about = "Find and update outdated dependencies of a Helm chart"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(long, global = true, env = "DEBUG")]
    pub debug: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List outdated dependencies of a chart
    List(ListArgs),
    /// Update outdated dependencies of a chart to their latest version
    Update(UpdateArgs),
}

/// Flags shared by all subcommands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Chart directory (default: current directory)
    #[arg(default_value = ".")]
    pub chart_path: PathBuf,

    /// Maximum column width of the report table
    #[arg(short = 'w', long, default_value_t = DEFAULT_MAX_COLUMN_WIDTH)]
    pub max_column_width: usize,

    /// Only check dependencies whose repository contains one of these terms (comma separated)
    #[arg(short = 'r', long, value_delimiter = ',')]
    pub repositories: Vec<String>,

    /// Only check dependencies whose name contains one of these terms (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub dependencies: Vec<String>,

    /// Repository index cache directory
    #[arg(long, env = CACHE_DIR_ENV, hide_env_values = true)]
    pub repository_cache: Option<PathBuf>,
}

impl CommonArgs {
    /// Dependency filter from --repositories and --dependencies
    pub fn filter(&self) -> DependencyFilter {
        DependencyFilter::new()
            .with_repositories(self.repositories.clone())
            .with_dependency_names(self.dependencies.clone())
    }

    /// Chart path made absolute against the current directory
    pub fn absolute_chart_path(&self) -> std::io::Result<PathBuf> {
        absolute(&self.chart_path)
    }
}

/// `list` flags
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Exit with code 1 if any dependency is outdated
    #[arg(long)]
    pub fail_on_outdated_dependencies: bool,
}

/// `update` flags
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Increment the chart version if dependencies are updated (patch, minor or major)
    #[arg(
        long,
        value_name = "SEVERITY",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "patch"
    )]
    pub increment_chart_version: Option<Severity>,

    /// Indent to use when writing requirements.yaml
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    pub indent: usize,

    /// **Experimental** Update, increment the chart version, commit and push using git
    #[arg(long)]
    pub auto_update: bool,

    /// Author and committer name used with --auto-update
    #[arg(long)]
    pub author_name: Option<String>,

    /// Author and committer email used with --auto-update
    #[arg(long)]
    pub author_email: Option<String>,

    /// Always open a pull request instead of pushing patch updates directly
    #[arg(long)]
    pub only_pull_requests: bool,

    /// Branch updates are pushed or proposed to
    #[arg(long, default_value = DEFAULT_BASE_BRANCH)]
    pub base_branch: String,

    /// Run `helm dependency update` after writing so requirements.lock follows
    #[arg(long)]
    pub sync_lock: bool,
}

impl UpdateArgs {
    /// Severity to bump the chart version by, if any.
    ///
    /// --auto-update implies a patch bump unless a larger one is requested.
    pub fn chart_version_increment(&self) -> Option<Severity> {
        match (self.increment_chart_version, self.auto_update) {
            (Some(severity), _) => Some(severity),
            (None, true) => Some(Severity::Patch),
            (None, false) => None,
        }
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
