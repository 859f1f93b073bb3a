//! Provider-agnostic repository host abstraction
//!
//! This module defines the seam between the fork/sync orchestration logic and
//! the concrete GitHub client, so the core can be exercised against test
//! doubles without network access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Opaque repository identifier (`owner/name`)
///
/// Equality and hashing treat the owner as case-insensitive, matching how
/// GitHub resolves account names.
#[derive(Debug, Clone)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` identifier
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Display name in `owner/name` format
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl PartialEq for RepoRef {
    fn eq(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name == other.name
    }
}

impl Eq for RepoRef {}

impl std::hash::Hash for RepoRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.owner.to_ascii_lowercase().hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository metadata needed for filtering and sync decisions
#[derive(Debug, Clone)]
pub struct RepoFacts {
    pub repo: RepoRef,
    /// Whether the repository is itself a fork
    pub is_fork: bool,
    /// Whether the repository is private
    pub is_private: bool,
    /// Size reported by the host, in kilobytes; zero means empty
    pub size_kb: u64,
    /// Default branch name, when the host reports one
    pub default_branch: Option<String>,
}

/// Point-in-time view of the remote service's quota state
///
/// Fetched fresh before each decision and never cached across calls.
#[derive(Debug, Clone)]
pub struct RateLimitSnapshot {
    /// Remaining calls in the current window
    pub remaining: u64,
    /// When the quota replenishes
    pub reset_at: DateTime<Utc>,
    /// Explicit retry-after hint, when the service sent one
    pub retry_after_secs: Option<u64>,
}

/// Errors surfaced by a repository host
///
/// The resilient call wrapper retries `RateLimited` and `Transient`; anything
/// else is surfaced immediately.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("rate limited by remote service")]
    RateLimited {
        /// Retry-After header value, in seconds
        retry_after: Option<u64>,
        /// X-RateLimit-Reset header value
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("transient remote error: {0}")]
    Transient(String),

    /// The quota endpoint itself could not be queried
    #[error("rate limit status unavailable: {0}")]
    Unavailable(String),

    #[error("remote call failed: {0}")]
    Fatal(String),
}

impl HostError {
    /// Whether the wrapper may retry this error
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transient(_))
    }
}

/// Query for the remote service's current quota state
#[async_trait]
pub trait QuotaProbe: Send + Sync {
    /// Fetch a fresh snapshot of the current rate limit
    ///
    /// No side effects beyond the network read. Fails with
    /// [`HostError::Unavailable`] if the query itself cannot be completed;
    /// the probe never retries internally.
    async fn current_limit(&self) -> Result<RateLimitSnapshot, HostError>;
}

/// Remote repository service operations used by the orchestrator
#[async_trait]
pub trait RepoHost: QuotaProbe {
    /// Look up a repository; `None` when it does not exist
    async fn get_repository(&self, owner: &str, name: &str)
        -> Result<Option<RepoFacts>, HostError>;

    /// Create a server-side fork of `source`, under the authenticated user
    /// or under `organization` when given. Returns the new repository.
    async fn create_fork(
        &self,
        source: &RepoRef,
        organization: Option<&str>,
    ) -> Result<RepoRef, HostError>;

    /// Fast-forward `branch` of a fork from its upstream (merge-upstream)
    async fn merge_upstream(&self, repo: &RepoRef, branch: &str) -> Result<(), HostError>;

    /// List all repositories of an account; `None` when the account does
    /// not exist
    async fn list_repositories(&self, account: &str)
        -> Result<Option<Vec<RepoFacts>>, HostError>;

    /// Login of the authenticated actor
    fn authenticated_login(&self) -> &str;

    /// Whether `org` resolves to an organization the actor can see
    async fn organization_exists(&self, org: &str) -> Result<bool, HostError>;
}
