//! Fork/sync orchestration
//!
//! Decides, per repository, whether to fork, sync, skip, or report a dry-run
//! outcome, and drives the resilient call wrapper for every remote call.
//! State is never tracked internally: each transition queries the remote
//! service, so two runs against the same pair converge on the same decision.

use rand::seq::SliceRandom;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::host::{RepoFacts, RepoHost, RepoRef};
use crate::notice::Notice;
use crate::retry::{CallError, CallRunner};

/// Explicit run configuration, one field per behavior toggle
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Sync (merge-upstream) when the destination already exists
    pub syncing: bool,
    /// Report intended actions without performing mutating calls
    pub dry_run: bool,
    /// Skip the post-success pacing pause
    pub unpaced: bool,
    /// Branch to fast-forward; destination's default branch when unset
    pub branch: Option<String>,
    /// Keep private repositories when mirroring an account
    pub include_private: bool,
    /// Keep repositories that are themselves forks
    pub include_forks: bool,
    /// Keep the account-metadata repository (`.github`)
    pub include_dot_github: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            syncing: true,
            dry_run: false,
            unpaced: false,
            branch: None,
            include_private: false,
            include_forks: false,
            include_dot_github: false,
        }
    }
}

/// Terminal decision for one (source, destination) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForkDecision {
    /// Dry run: the destination does not exist and would be forked
    WouldFork,
    /// Dry run: the destination exists and would be synced
    ///
    /// Listed for completeness; the transitions report an existing
    /// destination under dry-run as [`AlreadyExists`](Self::AlreadyExists),
    /// so nothing constructs this variant.
    WouldSync,
    /// A fork was created at the destination
    Forked(RepoRef),
    /// The existing destination was fast-forwarded from upstream
    Synced(RepoRef),
    /// The destination exists and syncing was not requested
    Exists(RepoRef),
    /// Dry run: the destination already exists
    AlreadyExists(RepoRef),
}

impl std::fmt::Display for ForkDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::WouldFork => "would be forked (dry-run)",
            Self::WouldSync => "would be synced (dry-run)",
            Self::Forked(_) => "forked",
            Self::Synced(_) => "synced",
            Self::Exists(_) => "exists",
            Self::AlreadyExists(_) => "already exists (dry-run)",
        };
        f.write_str(label)
    }
}

/// Result of processing one repository
#[derive(Debug, Clone)]
pub struct ForkOutcome {
    pub decision: ForkDecision,
    pub source: RepoRef,
    pub destination: Option<RepoRef>,
}

/// Per-item failures; none of these abort a batch
#[derive(Debug, Error)]
pub enum ForkError {
    #[error("repository '{0}' not found")]
    RepositoryNotFound(String),

    #[error("user or organization '{0}' not found")]
    AccountNotFound(String),

    #[error("'{0}' is neither the authenticated user nor a visible organization")]
    AmbiguousActor(String),

    #[error("invalid repository specifier '{0}', expected owner/name")]
    InvalidRepoSpec(String),

    #[error(transparent)]
    Call(#[from] CallError),
}

/// Why a repository was excluded from a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    Keep,
    ForkedSource,
    Empty,
    Private,
    MetadataRepo,
}

impl FilterVerdict {
    pub fn reason(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::ForkedSource => "Skipping forked repository",
            Self::Empty => "Skipping empty repository",
            Self::Private => "Skipping private repository",
            Self::MetadataRepo => "Skipping .github repository",
        }
    }
}

/// Apply the batch filtering policy, yielding a verdict per repository
///
/// Empty repositories are always excluded; forks, private repositories, and
/// the `.github` metadata repository are excluded unless explicitly included.
pub fn filter_repositories(
    repos: Vec<RepoFacts>,
    opts: &RunOptions,
) -> Vec<(FilterVerdict, RepoFacts)> {
    repos
        .into_iter()
        .map(|repo| {
            let verdict = if repo.is_fork && !opts.include_forks {
                FilterVerdict::ForkedSource
            } else if repo.size_kb == 0 {
                FilterVerdict::Empty
            } else if repo.is_private && !opts.include_private {
                FilterVerdict::Private
            } else if repo.repo.name == ".github" && !opts.include_dot_github {
                FilterVerdict::MetadataRepo
            } else {
                FilterVerdict::Keep
            };
            (verdict, repo)
        })
        .collect()
}

/// Counters for a whole-account mirror run
#[derive(Debug, Clone, Default)]
pub struct MirrorSummary {
    pub processed: usize,
    pub forked: usize,
    pub synced: usize,
    pub existing: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Fork/sync orchestrator over a repository host
pub struct Superfork<'a, H: RepoHost> {
    host: &'a H,
    runner: CallRunner,
    notifier: Arc<dyn Notice>,
    opts: RunOptions,
}

impl<'a, H: RepoHost> Superfork<'a, H> {
    pub fn new(
        host: &'a H,
        runner: CallRunner,
        notifier: Arc<dyn Notice>,
        opts: RunOptions,
    ) -> Self {
        Self {
            host,
            runner,
            notifier,
            opts,
        }
    }

    /// Fork or sync a single repository into `to_location`
    ///
    /// The destination is always `{destination_owner}/{source_name}`; a name
    /// segment supplied in `to_location` is ignored with a warning.
    pub async fn fork_or_sync(
        &self,
        from_repo: &str,
        to_location: &str,
    ) -> Result<ForkOutcome, ForkError> {
        let source_ref = RepoRef::parse(from_repo)
            .ok_or_else(|| ForkError::InvalidRepoSpec(from_repo.to_string()))?;
        let to_owner = self.destination_owner(to_location)?;
        let destination = RepoRef::new(to_owner.clone(), source_ref.name.clone());

        debug!("resolving source {source_ref}");
        let source = self
            .runner
            .execute(self.host, false, || {
                self.host.get_repository(&source_ref.owner, &source_ref.name)
            })
            .await?
            .ok_or_else(|| ForkError::RepositoryNotFound(from_repo.to_string()))?;

        debug!("resolving destination {destination}");
        let existing = self
            .runner
            .execute(self.host, false, || {
                self.host
                    .get_repository(&destination.owner, &destination.name)
            })
            .await?;

        let decision = match existing {
            Some(dest) => {
                if self.opts.dry_run {
                    ForkDecision::AlreadyExists(dest.repo)
                } else if self.opts.syncing {
                    let branch = self
                        .opts
                        .branch
                        .clone()
                        .or_else(|| dest.default_branch.clone())
                        .unwrap_or_else(|| "main".to_string());
                    self.runner
                        .execute(self.host, true, || {
                            self.host.merge_upstream(&dest.repo, &branch)
                        })
                        .await?;
                    ForkDecision::Synced(dest.repo)
                } else {
                    ForkDecision::Exists(dest.repo)
                }
            }
            None => {
                if self.opts.dry_run {
                    ForkDecision::WouldFork
                } else {
                    let fork = self.create_fork_as(&source.repo, &to_owner).await?;
                    ForkDecision::Forked(fork)
                }
            }
        };

        let destination = match &decision {
            ForkDecision::Forked(r)
            | ForkDecision::Synced(r)
            | ForkDecision::Exists(r)
            | ForkDecision::AlreadyExists(r) => Some(r.clone()),
            ForkDecision::WouldFork | ForkDecision::WouldSync => None,
        };

        Ok(ForkOutcome {
            decision,
            source: source.repo,
            destination,
        })
    }

    /// Fork or sync every repository of `account` into `to_location`
    ///
    /// Processing order is randomized so that a rate-limited partial run is
    /// not biased toward alphabetically-early repositories. Per-repository
    /// failures are reported and counted; the batch continues.
    pub async fn mirror_account(
        &self,
        account: &str,
        to_location: &str,
    ) -> Result<MirrorSummary, ForkError> {
        let repos = self
            .runner
            .execute(self.host, false, || self.host.list_repositories(account))
            .await?
            .ok_or_else(|| ForkError::AccountNotFound(account.to_string()))?;

        self.notifier
            .notice(&format!("Cloning from {account}: {} repositories", repos.len()));

        let mut summary = MirrorSummary::default();
        let mut kept = Vec::new();
        for (verdict, repo) in filter_repositories(repos, &self.opts) {
            if verdict == FilterVerdict::Keep {
                kept.push(repo);
            } else {
                summary.skipped += 1;
                self.notifier
                    .notice(&format!("{}: {}", verdict.reason(), repo.repo));
            }
        }

        self.notifier
            .notice(&format!("Filtered to {} repositories", kept.len()));

        kept.shuffle(&mut rand::thread_rng());

        let total = kept.len();
        for (i, facts) in kept.into_iter().enumerate() {
            summary.processed += 1;
            match self
                .fork_or_sync(&facts.repo.full_name(), to_location)
                .await
            {
                Ok(outcome) => {
                    match &outcome.decision {
                        ForkDecision::Forked(_) => summary.forked += 1,
                        ForkDecision::Synced(_) => summary.synced += 1,
                        ForkDecision::Exists(_) => summary.existing += 1,
                        ForkDecision::AlreadyExists(_)
                        | ForkDecision::WouldFork
                        | ForkDecision::WouldSync => summary.planned += 1,
                    }
                    self.notifier.notice(&format!(
                        "{} of {}. {}: {} -> {}",
                        i + 1,
                        total,
                        outcome.decision,
                        outcome.source,
                        outcome
                            .destination
                            .as_ref()
                            .map_or_else(|| "-".to_string(), RepoRef::full_name),
                    ));
                }
                Err(err) => {
                    summary.failed += 1;
                    self.notifier.warning(&format!(
                        "{} of {}. failed: {}: {err}",
                        i + 1,
                        total,
                        facts.repo,
                    ));
                }
            }
        }

        Ok(summary)
    }

    /// Extract the destination owner, warning when a name segment is present
    ///
    /// A supplied repository name is deliberately ignored; the destination
    /// repository always takes the source's name.
    fn destination_owner(&self, to_location: &str) -> Result<String, ForkError> {
        let mut parts = to_location.splitn(2, '/');
        let owner = parts.next().unwrap_or_default();
        if owner.is_empty() {
            return Err(ForkError::InvalidRepoSpec(to_location.to_string()));
        }
        if parts.next().is_some_and(|rest| !rest.is_empty()) {
            self.notifier
                .warning("ignoring destination repository name");
        }
        Ok(owner.to_string())
    }

    /// Fork `source` under the destination owner, routing through the
    /// organization endpoint when the owner is not the authenticated actor
    async fn create_fork_as(
        &self,
        source: &RepoRef,
        to_owner: &str,
    ) -> Result<RepoRef, ForkError> {
        let login = self.host.authenticated_login();
        let organization = if login.eq_ignore_ascii_case(to_owner) {
            None
        } else {
            let exists = self
                .runner
                .execute(self.host, false, || self.host.organization_exists(to_owner))
                .await?;
            if !exists {
                return Err(ForkError::AmbiguousActor(to_owner.to_string()));
            }
            Some(to_owner)
        };

        let fork = self
            .runner
            .execute(self.host, true, || {
                self.host.create_fork(source, organization)
            })
            .await?;
        Ok(fork)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::testing::RecordingSleeper;
    use crate::config::CallsConfig;
    use crate::host::{HostError, QuotaProbe, RateLimitSnapshot};
    use crate::notice::testing::RecordingNotice;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn facts(owner: &str, name: &str) -> RepoFacts {
        RepoFacts {
            repo: RepoRef::new(owner, name),
            is_fork: false,
            is_private: false,
            size_kb: 128,
            default_branch: Some("main".to_string()),
        }
    }

    /// In-memory host recording every mutating call
    struct FakeHost {
        login: String,
        orgs: Vec<String>,
        accounts: Vec<String>,
        repos: Mutex<HashMap<String, RepoFacts>>,
        mutations: Mutex<Vec<String>>,
    }

    impl FakeHost {
        fn new(login: &str) -> Self {
            Self {
                login: login.to_string(),
                orgs: Vec::new(),
                accounts: Vec::new(),
                repos: Mutex::new(HashMap::new()),
                mutations: Mutex::new(Vec::new()),
            }
        }

        fn with_repo(self, facts: RepoFacts) -> Self {
            let key = facts.repo.full_name().to_ascii_lowercase();
            self.repos.lock().unwrap().insert(key, facts);
            self
        }

        fn with_org(mut self, org: &str) -> Self {
            self.orgs.push(org.to_string());
            self
        }

        fn with_account(mut self, account: &str) -> Self {
            self.accounts.push(account.to_string());
            self
        }

        fn mutations(&self) -> Vec<String> {
            self.mutations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuotaProbe for FakeHost {
        async fn current_limit(&self) -> Result<RateLimitSnapshot, HostError> {
            Ok(RateLimitSnapshot {
                remaining: 5000,
                reset_at: Utc::now() + ChronoDuration::hours(1),
                retry_after_secs: None,
            })
        }
    }

    #[async_trait]
    impl RepoHost for FakeHost {
        async fn get_repository(
            &self,
            owner: &str,
            name: &str,
        ) -> Result<Option<RepoFacts>, HostError> {
            let key = format!("{owner}/{name}").to_ascii_lowercase();
            Ok(self.repos.lock().unwrap().get(&key).cloned())
        }

        async fn create_fork(
            &self,
            source: &RepoRef,
            organization: Option<&str>,
        ) -> Result<RepoRef, HostError> {
            let owner = organization.unwrap_or(&self.login);
            let fork = RepoRef::new(owner, source.name.clone());
            self.mutations
                .lock()
                .unwrap()
                .push(format!("fork:{source}->{fork}"));
            let mut repo_facts = facts(&fork.owner, &fork.name);
            repo_facts.is_fork = true;
            self.repos
                .lock()
                .unwrap()
                .insert(fork.full_name().to_ascii_lowercase(), repo_facts);
            Ok(fork)
        }

        async fn merge_upstream(&self, repo: &RepoRef, branch: &str) -> Result<(), HostError> {
            self.mutations
                .lock()
                .unwrap()
                .push(format!("merge:{repo}@{branch}"));
            Ok(())
        }

        async fn list_repositories(
            &self,
            account: &str,
        ) -> Result<Option<Vec<RepoFacts>>, HostError> {
            if !self.accounts.iter().any(|a| a.eq_ignore_ascii_case(account)) {
                return Ok(None);
            }
            let repos = self
                .repos
                .lock()
                .unwrap()
                .values()
                .filter(|f| f.repo.owner.eq_ignore_ascii_case(account))
                .cloned()
                .collect();
            Ok(Some(repos))
        }

        fn authenticated_login(&self) -> &str {
            &self.login
        }

        async fn organization_exists(&self, org: &str) -> Result<bool, HostError> {
            Ok(self.orgs.iter().any(|o| o.eq_ignore_ascii_case(org)))
        }
    }

    fn superfork<'a>(
        host: &'a FakeHost,
        opts: RunOptions,
    ) -> (Superfork<'a, FakeHost>, Arc<RecordingNotice>) {
        let notifier = Arc::new(RecordingNotice::default());
        let runner = CallRunner::with_sleeper(
            &CallsConfig::default(),
            opts.unpaced,
            notifier.clone(),
            Arc::new(RecordingSleeper::default()),
        );
        (
            Superfork::new(host, runner, notifier.clone(), opts),
            notifier,
        )
    }

    #[tokio::test]
    async fn forks_into_the_authenticated_users_account() {
        let host = FakeHost::new("bob").with_repo(facts("acme", "widget"));
        let (sf, _) = superfork(&host, RunOptions::default());

        let outcome = sf.fork_or_sync("acme/widget", "bob").await.unwrap();

        assert_matches!(outcome.decision, ForkDecision::Forked(ref r) if r.full_name() == "bob/widget");
        assert_eq!(host.mutations(), vec!["fork:acme/widget->bob/widget"]);
    }

    #[tokio::test]
    async fn existing_destination_without_sync_is_left_alone() {
        let host = FakeHost::new("bob")
            .with_repo(facts("acme", "widget"))
            .with_repo(facts("bob", "widget"));
        let (sf, _) = superfork(
            &host,
            RunOptions {
                syncing: false,
                ..RunOptions::default()
            },
        );

        let outcome = sf.fork_or_sync("acme/widget", "bob").await.unwrap();

        assert_matches!(outcome.decision, ForkDecision::Exists(_));
        assert!(host.mutations().is_empty());
    }

    #[tokio::test]
    async fn existing_destination_is_synced_and_stays_synced() {
        let host = FakeHost::new("bob")
            .with_repo(facts("acme", "widget"))
            .with_repo(facts("bob", "widget"));
        let (sf, _) = superfork(&host, RunOptions::default());

        let first = sf.fork_or_sync("acme/widget", "bob").await.unwrap();
        let second = sf.fork_or_sync("acme/widget", "bob").await.unwrap();

        assert_matches!(first.decision, ForkDecision::Synced(_));
        assert_matches!(second.decision, ForkDecision::Synced(_));
        assert_eq!(
            host.mutations(),
            vec!["merge:bob/widget@main", "merge:bob/widget@main"]
        );
    }

    #[tokio::test]
    async fn branch_override_is_used_for_sync() {
        let host = FakeHost::new("bob")
            .with_repo(facts("acme", "widget"))
            .with_repo(facts("bob", "widget"));
        let (sf, _) = superfork(
            &host,
            RunOptions {
                branch: Some("develop".to_string()),
                ..RunOptions::default()
            },
        );

        sf.fork_or_sync("acme/widget", "bob").await.unwrap();

        assert_eq!(host.mutations(), vec!["merge:bob/widget@develop"]);
    }

    #[tokio::test]
    async fn dry_run_never_mutates() {
        let host = FakeHost::new("bob")
            .with_repo(facts("acme", "widget"))
            .with_repo(facts("acme", "gadget"))
            .with_repo(facts("bob", "gadget"));
        let (sf, _) = superfork(
            &host,
            RunOptions {
                dry_run: true,
                ..RunOptions::default()
            },
        );

        let fresh = sf.fork_or_sync("acme/widget", "bob").await.unwrap();
        let existing = sf.fork_or_sync("acme/gadget", "bob").await.unwrap();

        assert_matches!(fresh.decision, ForkDecision::WouldFork);
        assert_matches!(existing.decision, ForkDecision::AlreadyExists(_));
        assert!(host.mutations().is_empty());
    }

    #[tokio::test]
    async fn missing_source_is_reported_not_forked() {
        let host = FakeHost::new("bob");
        let (sf, _) = superfork(&host, RunOptions::default());

        let err = sf.fork_or_sync("acme/ghost", "bob").await.unwrap_err();

        assert_matches!(err, ForkError::RepositoryNotFound(ref r) if r == "acme/ghost");
        assert!(host.mutations().is_empty());
    }

    #[tokio::test]
    async fn destination_name_segment_is_ignored_with_a_warning() {
        let host = FakeHost::new("bob").with_repo(facts("acme", "widget"));
        let (sf, notifier) = superfork(&host, RunOptions::default());

        let outcome = sf.fork_or_sync("acme/widget", "bob/renamed").await.unwrap();

        assert_eq!(outcome.destination.unwrap().full_name(), "bob/widget");
        assert!(notifier.contains("ignoring destination repository name"));
    }

    #[tokio::test]
    async fn forks_into_an_organization_the_actor_can_act_for() {
        let host = FakeHost::new("bob")
            .with_repo(facts("acme", "widget"))
            .with_org("acme-mirror");
        let (sf, _) = superfork(&host, RunOptions::default());

        let outcome = sf.fork_or_sync("acme/widget", "acme-mirror").await.unwrap();

        assert_matches!(outcome.decision, ForkDecision::Forked(ref r) if r.owner == "acme-mirror");
    }

    #[tokio::test]
    async fn unknown_destination_owner_is_ambiguous() {
        let host = FakeHost::new("bob").with_repo(facts("acme", "widget"));
        let (sf, _) = superfork(&host, RunOptions::default());

        let err = sf.fork_or_sync("acme/widget", "nobody").await.unwrap_err();

        assert_matches!(err, ForkError::AmbiguousActor(ref o) if o == "nobody");
        assert!(host.mutations().is_empty());
    }

    #[tokio::test]
    async fn malformed_source_specifier_is_rejected() {
        let host = FakeHost::new("bob");
        let (sf, _) = superfork(&host, RunOptions::default());

        let err = sf.fork_or_sync("not-a-repo", "bob").await.unwrap_err();

        assert_matches!(err, ForkError::InvalidRepoSpec(_));
    }

    #[test]
    fn filtering_excludes_each_category_independently() {
        let opts = RunOptions::default();

        let mut forked = facts("acme", "forky");
        forked.is_fork = true;
        let mut empty = facts("acme", "void");
        empty.size_kb = 0;
        let mut private = facts("acme", "secret");
        private.is_private = true;
        let dot_github = facts("acme", ".github");
        let kept = facts("acme", "widget");

        let verdicts: Vec<FilterVerdict> = filter_repositories(
            vec![
                forked.clone(),
                empty.clone(),
                private.clone(),
                dot_github.clone(),
                kept.clone(),
            ],
            &opts,
        )
        .into_iter()
        .map(|(v, _)| v)
        .collect();

        assert_eq!(
            verdicts,
            vec![
                FilterVerdict::ForkedSource,
                FilterVerdict::Empty,
                FilterVerdict::Private,
                FilterVerdict::MetadataRepo,
                FilterVerdict::Keep,
            ]
        );
    }

    #[test]
    fn include_flags_lift_their_exclusions_but_empty_is_always_dropped() {
        let opts = RunOptions {
            include_forks: true,
            include_private: true,
            include_dot_github: true,
            ..RunOptions::default()
        };

        let mut forked = facts("acme", "forky");
        forked.is_fork = true;
        let mut private = facts("acme", "secret");
        private.is_private = true;
        let dot_github = facts("acme", ".github");
        let mut empty = facts("acme", "void");
        empty.size_kb = 0;

        let verdicts: Vec<FilterVerdict> =
            filter_repositories(vec![forked, private, dot_github, empty], &opts)
                .into_iter()
                .map(|(v, _)| v)
                .collect();

        assert_eq!(
            verdicts,
            vec![
                FilterVerdict::Keep,
                FilterVerdict::Keep,
                FilterVerdict::Keep,
                FilterVerdict::Empty,
            ]
        );
    }

    #[test]
    fn empty_private_fork_is_excluded_as_a_fork_first() {
        let mut repo = facts("acme", "husk");
        repo.is_fork = true;
        repo.is_private = true;
        repo.size_kb = 0;

        let verdicts = filter_repositories(vec![repo], &RunOptions::default());
        assert_eq!(verdicts[0].0, FilterVerdict::ForkedSource);
    }

    #[tokio::test]
    async fn mirror_processes_kept_repos_and_reports_skips() {
        let mut empty = facts("acme", "void");
        empty.size_kb = 0;
        let host = FakeHost::new("bob")
            .with_account("acme")
            .with_repo(facts("acme", "widget"))
            .with_repo(facts("acme", "gadget"))
            .with_repo(empty);
        let (sf, notifier) = superfork(&host, RunOptions::default());

        let summary = sf.mirror_account("acme", "bob").await.unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.forked, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert!(notifier.contains("Skipping empty repository: acme/void"));
        assert!(notifier.contains("Filtered to 2 repositories"));
        assert_eq!(host.mutations().len(), 2);
    }

    #[tokio::test]
    async fn mirror_of_missing_account_is_an_error() {
        let host = FakeHost::new("bob");
        let (sf, _) = superfork(&host, RunOptions::default());

        let err = sf.mirror_account("ghost-org", "bob").await.unwrap_err();

        assert_matches!(err, ForkError::AccountNotFound(ref a) if a == "ghost-org");
    }

    #[tokio::test]
    async fn mirror_dry_run_only_plans() {
        let host = FakeHost::new("bob")
            .with_account("acme")
            .with_repo(facts("acme", "widget"));
        let (sf, _) = superfork(
            &host,
            RunOptions {
                dry_run: true,
                ..RunOptions::default()
            },
        );

        let summary = sf.mirror_account("acme", "bob").await.unwrap();

        assert_eq!(summary.planned, 1);
        assert!(host.mutations().is_empty());
    }
}
