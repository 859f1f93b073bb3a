//! superfork - Bulk fork/sync of GitHub repositories between accounts
//!
//! superfork copies whole accounts (or individual repositories) to another
//! user or organization by server-side forking, syncing forks that already
//! exist, while staying inside the GitHub API rate limit.
//!
//! ## Core Features
//!
//! - **Resilient remote calls**: bounded retries with rate-limit-aware
//!   backoff and pacing after mutating calls
//! - **Fork or sync**: existing destinations are fast-forwarded from
//!   upstream instead of duplicated
//! - **Filtering**: forks, empty, private, and `.github` metadata
//!   repositories are excluded with a reported reason
//! - **Dry runs**: report intended actions without mutating anything
//! - **Authentication**: GitHub CLI and token-based authentication support
//!
//! ## Modules
//!
//! - [`config`]: Configuration management and parsing
//! - [`host`]: Provider-agnostic repository host traits and types
//! - [`backoff`]: Wait scheduling between attempts
//! - [`retry`]: Resilient call wrapper
//! - [`fork`]: Fork/sync orchestration and filtering
//! - [`github`]: GitHub API integration and authentication

pub mod backoff;
pub mod config;
pub mod fork;
pub mod github;
pub mod host;
pub mod notice;
pub mod retry;

pub use config::Config;
pub use fork::{ForkDecision, ForkOutcome, MirrorSummary, RunOptions, Superfork};
pub use github::GitHubClient;
pub use host::{RateLimitSnapshot, RepoFacts, RepoHost, RepoRef};
pub use notice::{ConsoleNotice, Notice};
pub use retry::{CallError, CallRunner};
