//! Dependency fetching
//!
//! Fetching one dependency means:
//! 1. make sure its source exists at the conventional install path (download if absent)
//! 2. check out the requested version, if one was given
//! 3. read back the exact revision now checked out
//!
//! Step 1 is skipped when the path already exists and step 2 is idempotent per version, so
//! fetching the same dependency again after a partial failure is safe. Nothing is retried
//! or rolled back here.

use std::path::Path;

use tracing::{debug, info};

use crate::command::{CommandRunner, CommandSpec, RunError};
use crate::dependency::{Dependency, ResolvedDependency};
use crate::error::{Result, RevlockError};
use crate::install_root::InstallRoot;
use crate::repository::{Repository, RepositoryCache};

/// Fetches dependencies into an install root and pins them to exact revisions
pub struct DependencyFetcher<R> {
    runner: R,
    root: InstallRoot,
    repositories: RepositoryCache,
}

impl<R: CommandRunner> DependencyFetcher<R> {
    pub fn new(runner: R, root: InstallRoot) -> Self {
        Self {
            runner,
            root,
            repositories: RepositoryCache::new(),
        }
    }

    pub fn root(&self) -> &InstallRoot {
        &self.root
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Fetch `dependency` and pin it to the revision the backend reports
    pub fn fetch(&self, dependency: &Dependency) -> Result<ResolvedDependency> {
        dependency.validate()?;
        let dest = self.root.full_path(dependency);

        self.ensure_downloaded(dependency, &dest)?;

        let repo = self.repositories.get(&dest)?;
        if dependency.has_version() {
            self.checkout(&repo, dependency)?;
        }
        let revision = self.current_revision(&repo, dependency)?;

        info!(path = %dependency.path, requested = %dependency.version, %revision, "resolved");
        Ok(ResolvedDependency::pinned(dependency, revision))
    }

    /// Install a locked entry whose source tree is missing
    ///
    /// Checks out the locked revision and verifies the backend reports the same revision back.
    pub fn materialize(&self, locked: &ResolvedDependency) -> Result<ResolvedDependency> {
        let fetched = self.fetch(&locked.locked_requirement())?;
        if fetched.version != locked.version {
            return Err(RevlockError::RevisionMismatch {
                path: locked.path.clone(),
                expected: locked.version.clone(),
                actual: fetched.version,
            });
        }
        Ok(locked.clone())
    }

    /// Move an existing tree back to its locked revision
    ///
    /// Runs only the checkout: the tree is already downloaded and the lock is trusted for the
    /// revision, so nothing is downloaded or queried.
    pub fn restore(&self, locked: &ResolvedDependency) -> Result<()> {
        let requirement = locked.locked_requirement();
        requirement.validate()?;
        let repo = self.repositories.get(&self.root.full_path(&requirement))?;
        self.checkout(&repo, &requirement)?;
        debug!(path = %locked.path, revision = %locked.version, "restored locked revision");
        Ok(())
    }

    /// Whether `dependency` already has a source tree
    pub fn is_present(&self, dependency: &Dependency) -> bool {
        self.root.full_path(dependency).exists()
    }

    fn ensure_downloaded(&self, dependency: &Dependency, dest: &Path) -> Result<()> {
        if dest.exists() {
            debug!(path = %dependency.path, "already downloaded");
            return Ok(());
        }

        let fetch_failed = |reason: String| RevlockError::FetchFailed {
            path: dependency.path.clone(),
            reason,
        };

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                fetch_failed(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let command = dependency
            .download_vcs()
            .download_command(&dependency.origin_url(), dest);
        self.run(&command).map_err(|e| fetch_failed(e.output()))?;

        if !dest.exists() {
            return Err(fetch_failed(format!(
                "{} did not create {}",
                command,
                dest.display()
            )));
        }
        Ok(())
    }

    fn checkout(&self, repo: &Repository, dependency: &Dependency) -> Result<()> {
        let command = repo.checkout_command(&dependency.version);
        self.run(&command)
            .map(|_| ())
            .map_err(|e| RevlockError::CheckoutFailed {
                path: dependency.path.clone(),
                version: dependency.version.clone(),
                reason: e.output(),
            })
    }

    fn current_revision(&self, repo: &Repository, dependency: &Dependency) -> Result<String> {
        let command = repo.current_version_command();
        let output = self
            .run(&command)
            .map_err(|e| RevlockError::RevisionQueryFailed {
                path: dependency.path.clone(),
                reason: e.output(),
            })?;

        repo.parse_current_version(&output)
            .ok_or_else(|| RevlockError::RevisionQueryFailed {
                path: dependency.path.clone(),
                reason: format!("{command} printed no revision"),
            })
    }

    fn run(&self, command: &CommandSpec) -> std::result::Result<String, RunError> {
        debug!(%command, dir = %command.dir.display(), "exec");
        self.runner.run(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandIntent, FakeCommandRunner};
    use crate::repository::VcsKind;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DependencyFetcher<FakeCommandRunner>) {
        let temp = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        runner.simulate_downloads(".git");
        runner.when_running(&["git", "rev-parse", "HEAD"], |_| Ok("some-sha\n".to_string()));
        let fetcher = DependencyFetcher::new(runner, InstallRoot::new(temp.path()));
        (temp, fetcher)
    }

    fn dependency() -> Dependency {
        Dependency::new("github.com/vito/gocart", "v1.2")
    }

    #[test]
    fn test_fetch_downloads_then_checks_out_requested_version() {
        let (_temp, fetcher) = setup();
        let dep = dependency();

        fetcher.fetch(&dep).unwrap();

        let executed = fetcher.runner().executed_commands();
        assert_eq!(executed.len(), 3);
        assert_eq!(executed[0].intent, CommandIntent::Download);
        assert_eq!(
            executed[0].argv(),
            vec!["git", "clone", "--quiet", "https://github.com/vito/gocart", "gocart"]
        );
        assert_eq!(executed[1].dir, fetcher.root().full_path(&dep));
        assert_eq!(executed[1].argv(), vec!["git", "checkout", "v1.2"]);
        assert_eq!(executed[2].argv(), vec!["git", "rev-parse", "HEAD"]);
    }

    #[test]
    fn test_fetch_returns_reported_revision() {
        let (_temp, fetcher) = setup();

        let resolved = fetcher.fetch(&dependency()).unwrap();

        assert_eq!(resolved.path, "github.com/vito/gocart");
        assert_eq!(resolved.version, "some-sha");
        assert_eq!(resolved.requested, "v1.2");
    }

    #[test]
    fn test_fetch_without_version_skips_checkout() {
        let (_temp, fetcher) = setup();

        fetcher
            .fetch(&Dependency::new("github.com/vito/gocart", ""))
            .unwrap();

        let intents: Vec<_> = fetcher
            .runner()
            .executed_commands()
            .into_iter()
            .map(|c| c.intent)
            .collect();
        assert_eq!(intents, vec![CommandIntent::Download, CommandIntent::CurrentVersion]);
    }

    #[test]
    fn test_refetch_does_not_download_again() {
        let (_temp, fetcher) = setup();
        let dep = dependency();
        let dest = fetcher.root().full_path(&dep);

        fetcher.fetch(&dep).unwrap();
        fetcher.fetch(&dep).unwrap();
        fetcher.fetch(&dep).unwrap();

        assert_eq!(fetcher.runner().download_count(&dest), 1);
        assert_eq!(fetcher.runner().count(CommandIntent::Checkout, &dest), 3);
    }

    #[test]
    fn test_download_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        runner.when_intent(CommandIntent::Download, |spec| {
            Err(RunError::Failed {
                command: spec.to_string(),
                status: "exit status: 128".to_string(),
                output: "fatal: repository not found".to_string(),
            })
        });
        let fetcher = DependencyFetcher::new(runner, InstallRoot::new(temp.path()));

        let err = fetcher.fetch(&dependency()).unwrap_err();
        match err {
            RevlockError::FetchFailed { path, reason } => {
                assert_eq!(path, "github.com/vito/gocart");
                assert!(reason.contains("repository not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Only one attempt
        assert_eq!(fetcher.runner().executed_commands().len(), 1);
    }

    #[test]
    fn test_checkout_failure_reports_backend_output() {
        let (_temp, fetcher) = setup();
        fetcher.runner().when_intent(CommandIntent::Checkout, |spec| {
            Err(RunError::Failed {
                command: spec.to_string(),
                status: "exit status: 1".to_string(),
                output: "error: pathspec 'v1.2' did not match any file(s) known to git".to_string(),
            })
        });

        let err = fetcher.fetch(&dependency()).unwrap_err();
        match err {
            RevlockError::CheckoutFailed { version, reason, .. } => {
                assert_eq!(version, "v1.2");
                assert_eq!(
                    reason,
                    "error: pathspec 'v1.2' did not match any file(s) known to git"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_repository_type() {
        let temp = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        // Download creates the tree but no backend marker
        runner.when_intent(CommandIntent::Download, |spec| {
            let dest = spec.dir.join(spec.args.last().unwrap());
            std::fs::create_dir_all(dest).unwrap();
            Ok(String::new())
        });
        let fetcher = DependencyFetcher::new(runner, InstallRoot::new(temp.path()));

        let err = fetcher.fetch(&dependency()).unwrap_err();
        assert!(matches!(err, RevlockError::UnknownRepositoryType { .. }));
    }

    #[test]
    fn test_empty_revision_output_fails() {
        let (_temp, fetcher) = setup();
        fetcher
            .runner()
            .when_intent(CommandIntent::CurrentVersion, |_| Ok("\n".to_string()));

        let err = fetcher.fetch(&dependency()).unwrap_err();
        assert!(matches!(err, RevlockError::RevisionQueryFailed { .. }));
    }

    #[test]
    fn test_uses_backend_of_existing_tree() {
        let (temp, fetcher) = setup();
        let dep = Dependency::new("code.google.com/p/go.crypto/ssh", "1e7a3e301825");
        std::fs::create_dir_all(temp.path().join("src/code.google.com/p/go.crypto/.hg")).unwrap();
        std::fs::create_dir_all(fetcher.root().full_path(&dep)).unwrap();
        fetcher
            .runner()
            .when_running(&["hg", "id", "-i"], |_| Ok("1e7a3e301825\n".to_string()));

        let resolved = fetcher.fetch(&dep).unwrap();

        assert_eq!(resolved.version, "1e7a3e301825");
        let executed = fetcher.runner().executed_commands();
        assert_eq!(executed[0].argv(), vec!["hg", "update", "-c", "1e7a3e301825"]);
        assert_eq!(fetcher.runner().download_count(&fetcher.root().full_path(&dep)), 0);
    }

    #[test]
    fn test_download_uses_declared_origin_and_backend() {
        let (_temp, fetcher) = setup();
        fetcher.runner().simulate_downloads(".bzr");
        fetcher
            .runner()
            .when_intent(CommandIntent::CurrentVersion, |_| Ok("1\n".to_string()));
        let mut dep = Dependency::new("launchpad.net/gocheck", "");
        dep.origin = Some("lp:gocheck".to_string());
        dep.vcs = Some(VcsKind::Bazaar);

        let resolved = fetcher.fetch(&dep).unwrap();

        assert_eq!(resolved.version, "1");
        let executed = fetcher.runner().executed_commands();
        assert_eq!(
            executed[0].argv(),
            vec!["bzr", "branch", "--quiet", "lp:gocheck", "gocheck"]
        );
        assert_eq!(executed[1].argv(), vec!["bzr", "revno", "--tree"]);
    }

    #[test]
    fn test_materialize_verifies_locked_revision() {
        let (_temp, fetcher) = setup();
        let mut locked = ResolvedDependency::pinned(&dependency(), "some-sha");
        locked.dependencies = vec![Dependency::new("github.com/other/dep", "")];

        let restored = fetcher.materialize(&locked).unwrap();
        assert_eq!(restored, locked);
        let executed = fetcher.runner().executed_commands();
        assert_eq!(executed[1].argv(), vec!["git", "checkout", "some-sha"]);

        let drifted = ResolvedDependency::pinned(&dependency(), "other-sha");
        let err = fetcher.materialize(&drifted).unwrap_err();
        assert!(matches!(err, RevlockError::RevisionMismatch { .. }));
    }

    #[test]
    fn test_restore_checks_out_locked_revision_only() {
        let (_temp, fetcher) = setup();
        let locked = ResolvedDependency::pinned(&dependency(), "some-sha");
        let tree = fetcher.root().full_path(&dependency());
        std::fs::create_dir_all(tree.join(".git")).unwrap();

        fetcher.restore(&locked).unwrap();

        let executed = fetcher.runner().executed_commands();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].intent, CommandIntent::Checkout);
        assert_eq!(executed[0].dir, tree);
        assert_eq!(executed[0].argv(), vec!["git", "checkout", "some-sha"]);
    }

    #[test]
    fn test_restore_reports_checkout_failure() {
        let (_temp, fetcher) = setup();
        std::fs::create_dir_all(fetcher.root().full_path(&dependency()).join(".git")).unwrap();
        fetcher.runner().when_intent(CommandIntent::Checkout, |spec| {
            Err(RunError::Failed {
                command: spec.to_string(),
                status: "exit status: 128".to_string(),
                output: "fatal: reference is not a tree: gone-sha".to_string(),
            })
        });

        let err = fetcher
            .restore(&ResolvedDependency::pinned(&dependency(), "gone-sha"))
            .unwrap_err();
        match err {
            RevlockError::CheckoutFailed { version, .. } => assert_eq!(version, "gone-sha"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
