//! git and gh backed VersionControl

use super::VersionControl;
use crate::error::ToolError;
use crate::process::Tool;
use std::path::Path;
use url::Url;

/// Environment variable holding the push credential
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Remote used for pushes
const REMOTE: &str = "origin";

/// Author and committer identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

/// VersionControl over the `git` and `gh` command line tools
#[derive(Debug)]
pub struct GitCli {
    git: Tool,
    gh: Tool,
    identity: GitIdentity,
    push_url: String,
}

impl GitCli {
    /// Prepare git operations inside `repo_dir`.
    ///
    /// Resolves the remote, the author identity (explicit values first, then
    /// the global git config) and the push token before anything is changed.
    pub fn connect(
        repo_dir: &Path,
        author_name: Option<&str>,
        author_email: Option<&str>,
        token: Option<String>,
    ) -> Result<Self, ToolError> {
        let git = Tool::new("git").with_working_dir(repo_dir);
        git.ensure_installed(&["--version"])?;

        let remote = git
            .run(&["remote", "get-url", REMOTE])
            .ok()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ToolError::NoRemote {
                remote: REMOTE.to_string(),
            })?;

        let identity = GitIdentity {
            name: resolve_identity(&git, author_name, "user.name", "name")?,
            email: resolve_identity(&git, author_email, "user.email", "email")?,
        };

        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ToolError::CredentialMissing {
                variable: TOKEN_ENV,
            })?;

        let push_url = push_url(&remote, &identity.name, &token)?;
        Ok(Self {
            git: git.with_secret(token.clone()),
            gh: Tool::new("gh").with_working_dir(repo_dir).with_secret(token),
            identity,
            push_url,
        })
    }

    /// Push token from the environment
    pub fn token_from_env() -> Option<String> {
        std::env::var(TOKEN_ENV).ok()
    }

    /// Fail early if the review-request tool is unavailable
    pub fn require_review_tool(&self) -> Result<(), ToolError> {
        self.gh.ensure_installed(&["--version"])
    }

    /// Resolved identity
    pub fn identity(&self) -> &GitIdentity {
        &self.identity
    }
}

fn resolve_identity(
    git: &Tool,
    explicit: Option<&str>,
    key: &str,
    field: &'static str,
) -> Result<String, ToolError> {
    if let Some(value) = explicit.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }
    git.run(&["config", "--global", key])
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ToolError::IdentityMissing { field })
}

impl VersionControl for GitCli {
    fn diff(&self) -> Result<String, ToolError> {
        self.git.run(&["diff"])
    }

    fn commit(&self, message: &str) -> Result<String, ToolError> {
        let name = format!("user.name={}", self.identity.name);
        let email = format!("user.email={}", self.identity.email);
        let author = format!("{} <{}>", self.identity.name, self.identity.email);
        self.git.run(&[
            "-c", &name, "-c", &email, "commit", "--all", "--author", &author, "--message", message,
        ])
    }

    fn pull_rebase(&self) -> Result<String, ToolError> {
        self.git.run(&["pull", "--rebase"])
    }

    fn push(&self, branch: &str) -> Result<String, ToolError> {
        self.git.run(&["push", &self.push_url, branch])
    }

    fn create_branch(&self, branch: &str) -> Result<String, ToolError> {
        self.git.run(&["checkout", "-b", branch])
    }

    fn checkout_branch(&self, branch: &str) -> Result<String, ToolError> {
        self.git.run(&["checkout", branch])
    }

    fn open_review_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<String, ToolError> {
        self.require_review_tool()?;
        self.gh.run(&[
            "pr", "create", "--base", base, "--head", head, "--title", title, "--body", body,
        ])
    }
}

/// Authenticated HTTPS push URL for a remote.
///
/// `https://` remotes keep their host, port and path. `ssh://` and scp-style
/// (`git@host:org/repo.git`) remotes are pushed to the same host and path over
/// HTTPS on the default port. The user and token are escaped by `url`.
pub fn push_url(remote: &str, user: &str, token: &str) -> Result<String, ToolError> {
    let remote = remote.trim();
    let invalid = |message: &str| ToolError::InvalidRemote {
        remote: remote.to_string(),
        message: message.to_string(),
    };

    let parsed = if remote.contains("://") {
        Url::parse(remote)
    } else {
        let (host, path) = remote
            .split_once(':')
            .ok_or_else(|| invalid("expected a URL or host:path"))?;
        Url::parse(&format!("ssh://{}/{}", host, path.trim_start_matches('/')))
    }
    .map_err(|e| invalid(&e.to_string()))?;

    let mut url = match parsed.scheme() {
        "https" | "http" => parsed,
        _ => {
            let host = parsed.host_str().ok_or_else(|| invalid("missing host"))?;
            Url::parse(&format!("https://{}{}", host, parsed.path())).map_err(|e| invalid(&e.to_string()))?
        }
    };
    url.set_username(user)
        .and_then(|_| url.set_password(Some(token)))
        .map_err(|_| invalid("remote cannot carry credentials"))?;
    Ok(url.to_string())
}
