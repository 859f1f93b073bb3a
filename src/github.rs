use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::models::Repository;
use octocrab::Octocrab;
use std::env;
use std::process::Command;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::host::{HostError, QuotaProbe, RateLimitSnapshot, RepoFacts, RepoHost, RepoRef};

/// GitHub client wrapper with authentication management
pub struct GitHubClient {
    client: Octocrab,
    username: String,
}

/// GitHub authentication strategies
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Use GitHub CLI authentication
    GitHubCLI,
    /// Use environment variable token
    EnvironmentToken,
}

impl GitHubClient {
    /// Create a new GitHub client with automatic authentication
    ///
    /// A missing credential is a startup error; nothing is retried here.
    pub async fn new(config: &Config) -> Result<Self> {
        let (auth_strategy, token) = Self::detect_authentication(config)?;

        info!("Using authentication strategy: {:?}", auth_strategy);

        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .context("Failed to create GitHub client")?;

        // Get authenticated user information
        let user = client
            .current()
            .user()
            .await
            .context("Failed to get current user information. Check your authentication.")?;

        let username = config
            .github
            .username
            .clone()
            .unwrap_or_else(|| user.login.clone());

        info!("Authenticated as GitHub user: {}", username);

        Ok(Self { client, username })
    }

    /// Detect and obtain GitHub authentication
    fn detect_authentication(config: &Config) -> Result<(AuthStrategy, String)> {
        match config.github.auth_method.as_str() {
            "auto" => {
                // Try GitHub CLI first, then environment token
                if let Ok(token) = Self::try_github_cli() {
                    Ok((AuthStrategy::GitHubCLI, token))
                } else if let Ok(token) = Self::try_environment_token() {
                    Ok((AuthStrategy::EnvironmentToken, token))
                } else {
                    Err(anyhow!(
                        "No GitHub authentication found. Please either:\n\
                         1. Install and authenticate GitHub CLI: gh auth login\n\
                         2. Set GITHUB_TOKEN environment variable"
                    ))
                }
            }
            "gh_cli" => {
                let token = Self::try_github_cli()
                    .context("GitHub CLI authentication failed. Run: gh auth login")?;
                Ok((AuthStrategy::GitHubCLI, token))
            }
            "token" => {
                let token = Self::try_environment_token()
                    .context("GITHUB_TOKEN environment variable not found or invalid")?;
                Ok((AuthStrategy::EnvironmentToken, token))
            }
            other => Err(anyhow!("Unknown auth method: {}", other)),
        }
    }

    /// Try to get token from GitHub CLI
    fn try_github_cli() -> Result<String> {
        debug!("Attempting GitHub CLI authentication");

        if !Self::is_command_available("gh") {
            return Err(anyhow!("GitHub CLI (gh) is not installed"));
        }

        let auth_status = Command::new("gh")
            .args(["auth", "status"])
            .output()
            .context("Failed to check GitHub CLI auth status")?;

        if !auth_status.status.success() {
            return Err(anyhow!(
                "GitHub CLI is not authenticated. Run: gh auth login"
            ));
        }

        let token_output = Command::new("gh")
            .args(["auth", "token"])
            .output()
            .context("Failed to get GitHub CLI token")?;

        if !token_output.status.success() {
            return Err(anyhow!(
                "Failed to retrieve token from GitHub CLI: {}",
                String::from_utf8_lossy(&token_output.stderr)
            ));
        }

        let token = String::from_utf8(token_output.stdout)
            .context("GitHub CLI token is not valid UTF-8")?
            .trim()
            .to_string();

        if token.is_empty() {
            return Err(anyhow!("GitHub CLI returned empty token"));
        }

        debug!("Successfully obtained token from GitHub CLI");
        Ok(token)
    }

    /// Try to get token from environment variable
    fn try_environment_token() -> Result<String> {
        debug!("Attempting environment variable authentication");

        let token =
            env::var("GITHUB_TOKEN").context("GITHUB_TOKEN environment variable not set")?;

        if token.is_empty() {
            return Err(anyhow!("GITHUB_TOKEN is empty"));
        }

        if !token.starts_with("ghp_") && !token.starts_with("gho_") && !token.starts_with("ghs_") {
            warn!("GITHUB_TOKEN doesn't look like a valid GitHub token (should start with ghp_, gho_, or ghs_)");
        }

        Ok(token)
    }

    /// Check if a command is available in PATH
    fn is_command_available(command: &str) -> bool {
        Command::new("which")
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Get the authenticated username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Convert an octocrab Repository to the host-agnostic facts
    fn repo_to_facts(repo: &Repository) -> RepoFacts {
        let owner = repo
            .owner
            .as_ref()
            .map(|o| o.login.clone())
            .unwrap_or_else(|| "unknown".to_string());

        RepoFacts {
            repo: RepoRef::new(owner, repo.name.clone()),
            is_fork: repo.fork.unwrap_or(false),
            is_private: repo.private.unwrap_or(false),
            size_kb: repo.size.map_or(0, |s| u64::try_from(s).unwrap_or(0)),
            default_branch: repo.default_branch.clone(),
        }
    }
}

/// Classify a GitHub API error response into the host taxonomy
///
/// Rate-limit responses (429, or 403 carrying a rate-limit message) become
/// `RateLimited`. This client does not expose the Retry-After header, so the
/// hints stay empty and the wrapper falls back to its own schedule. 5xx is
/// transient; every other status is fatal.
fn classify_api_error(status: u16, message: &str) -> HostError {
    if status == 429 || (status == 403 && message.to_lowercase().contains("rate limit")) {
        HostError::RateLimited {
            retry_after: None,
            reset_at: None,
        }
    } else if status >= 500 {
        HostError::Transient(format!("{status}: {message}"))
    } else {
        HostError::Fatal(format!("{status}: {message}"))
    }
}

/// Map an octocrab error into the host taxonomy
///
/// API responses are classified by status. Transport failures are worth
/// another attempt; everything else the client can produce (decode errors,
/// malformed routes) is deterministic and surfaces as fatal.
fn map_host_error(err: octocrab::Error) -> HostError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            classify_api_error(source.status_code.as_u16(), &source.message)
        }
        err @ (octocrab::Error::Service { .. } | octocrab::Error::Hyper { .. }) => {
            HostError::Transient(err.to_string())
        }
        other => HostError::Fatal(other.to_string()),
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

#[async_trait]
impl QuotaProbe for GitHubClient {
    async fn current_limit(&self) -> Result<RateLimitSnapshot, HostError> {
        let limit = self
            .client
            .ratelimit()
            .get()
            .await
            .map_err(|e| HostError::Unavailable(e.to_string()))?;

        let reset_at =
            DateTime::<Utc>::from_timestamp(limit.rate.reset as i64, 0).unwrap_or_else(Utc::now);

        Ok(RateLimitSnapshot {
            remaining: limit.rate.remaining as u64,
            reset_at,
            retry_after_secs: None,
        })
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepoFacts>, HostError> {
        debug!("Looking up repository {}/{}", owner, name);

        match self.client.repos(owner, name).get().await {
            Ok(repo) => Ok(Some(Self::repo_to_facts(&repo))),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(map_host_error(err)),
        }
    }

    async fn create_fork(
        &self,
        source: &RepoRef,
        organization: Option<&str>,
    ) -> Result<RepoRef, HostError> {
        info!(
            "Forking {} into {}",
            source,
            organization.unwrap_or(&self.username)
        );

        let route = format!("/repos/{}/{}/forks", source.owner, source.name);
        let body = organization.map(|org| serde_json::json!({ "organization": org }));

        let fork: Repository = self
            .client
            .post(route, body.as_ref())
            .await
            .map_err(map_host_error)?;

        Ok(Self::repo_to_facts(&fork).repo)
    }

    async fn merge_upstream(&self, repo: &RepoRef, branch: &str) -> Result<(), HostError> {
        info!("Syncing {} from upstream (branch: {})", repo, branch);

        let route = format!("/repos/{}/{}/merge-upstream", repo.owner, repo.name);
        let body = serde_json::json!({ "branch": branch });

        let _response: serde_json::Value = self
            .client
            .post(route, Some(&body))
            .await
            .map_err(map_host_error)?;

        Ok(())
    }

    async fn list_repositories(
        &self,
        account: &str,
    ) -> Result<Option<Vec<RepoFacts>>, HostError> {
        debug!("Fetching repositories for account: {}", account);

        let mut repositories = Vec::new();
        let mut page = 1u32;

        loop {
            let route = format!("/users/{}/repos?per_page=100&page={}", account, page);
            let batch: Vec<Repository> = match self.client.get(route, None::<&()>).await {
                Ok(batch) => batch,
                Err(err) if is_not_found(&err) => return Ok(None),
                Err(err) => return Err(map_host_error(err)),
            };

            if batch.is_empty() {
                break;
            }

            repositories.extend(batch.iter().map(Self::repo_to_facts));

            // GitHub API pagination limit
            if page >= 255 {
                warn!(
                    "Reached maximum pagination limit (255 pages) for account: {}",
                    account
                );
                break;
            }
            page += 1;
        }

        info!(
            "Found {} repositories for account: {}",
            repositories.len(),
            account
        );
        Ok(Some(repositories))
    }

    fn authenticated_login(&self) -> &str {
        &self.username
    }

    async fn organization_exists(&self, org: &str) -> Result<bool, HostError> {
        let route = format!("/orgs/{}", org);
        match self.client.get::<serde_json::Value, _, ()>(route, None).await {
            Ok(_) => Ok(true),
            Err(err) if is_not_found(&err) => Ok(false),
            Err(err) => Err(map_host_error(err)),
        }
    }
}
