//! # Repository Synchronization
//!
//! A [`Repository`] is one local checkout of a remote git repository, either
//! **tracked** (follows `origin/<branch>`) or **frozen** (pinned to a commit).
//! It offers idempotent operations:
//!
//! - [`Repository::ensure_local_copy`] clones when needed, refreshes otherwise.
//! - [`Repository::refresh`] fetches and hard-resets to the target. Local
//!   modifications are discarded.
//! - [`Repository::destroy`] removes the checkout, tolerating absence.
//!
//! Git itself sits behind the [`GitOperations`] trait. [`SystemGit`] runs the
//! `git` executable, which picks up SSH keys, credential helpers and any
//! authentication configured in `~/.gitconfig`. Tests substitute a recording
//! mock.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Clone `url` into `target`.
    ///
    /// With a branch, this is a shallow single-branch clone (depth 1). Without
    /// one, the full history of the default branch is cloned so any commit
    /// can be checked out afterwards.
    fn clone_repo(&self, url: &str, branch: Option<&str>, target: &Path) -> Result<()>;

    /// Fetch from `origin`, optionally a single refspec with a history depth.
    fn fetch(&self, repo: &Path, refspec: Option<&str>, depth: Option<u32>) -> Result<()>;

    /// `git reset --hard <target>` inside `repo`.
    fn reset_hard(&self, repo: &Path, target: &str) -> Result<()>;

    /// Root of the working tree containing `repo`, if `repo` is inside one.
    fn toplevel(&self, repo: &Path) -> Option<PathBuf>;
}

/// The default implementation of `GitOperations`, which runs the system's
/// `git` command and blocks until it exits.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl SystemGit {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, cwd: Option<&Path>, args: &[&str], path: &Path) -> Result<String> {
        let mut command = Command::new(&self.program);
        if let Some(dir) = cwd {
            command.arg("-C").arg(dir);
        }
        command.args(args);
        debug!("Running command: {} {}", self.program, args.join(" "));

        let output = command.output().map_err(|e| Error::GitCommand {
            command: args.join(" "),
            path: path.to_path_buf(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = if stderr.contains("Authentication failed")
                || stderr.contains("Permission denied")
                || stderr.contains("Could not read from remote repository")
            {
                format!(
                    "Authentication failed. Make sure you have access to the repository.\n\
                    For private repos, ensure you have:\n\
                    - SSH key added to ssh-agent\n\
                    - Git credentials configured\n\
                    - Personal access token set up\n\
                    Error: {}",
                    stderr.trim()
                )
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::GitCommand {
                command: args.join(" "),
                path: path.to_path_buf(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitOperations for SystemGit {
    fn clone_repo(&self, url: &str, branch: Option<&str>, target: &Path) -> Result<()> {
        let target_str = target.to_string_lossy().into_owned();
        let mut args = vec!["clone"];
        if let Some(branch) = branch {
            args.extend(["--depth", "1", "--single-branch", "--branch", branch]);
        }
        args.push(url);
        args.push(target_str.as_str());
        self.run(None, &args, target).map(drop)
    }

    fn fetch(&self, repo: &Path, refspec: Option<&str>, depth: Option<u32>) -> Result<()> {
        let depth = depth.map(|d| d.to_string());
        let mut args = vec!["fetch"];
        if let Some(depth) = depth.as_deref() {
            args.extend(["--depth", depth]);
        }
        args.push("origin");
        if let Some(refspec) = refspec {
            args.push(refspec);
        }
        self.run(Some(repo), &args, repo).map(drop)
    }

    fn reset_hard(&self, repo: &Path, target: &str) -> Result<()> {
        self.run(Some(repo), &["reset", "--hard", target], repo)
            .map(drop)
    }

    fn toplevel(&self, repo: &Path) -> Option<PathBuf> {
        self.run(Some(repo), &["rev-parse", "--show-toplevel"], repo)
            .ok()
            .filter(|out| !out.is_empty())
            .map(PathBuf::from)
    }
}

/// What a checkout follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Tracked: hard-reset to `origin/<branch>` on every refresh.
    Branch(String),
    /// Frozen: pinned to this commit, never fast-forwarded.
    Commit(String),
}

impl Target {
    /// A commit, when present, wins over a branch.
    pub fn from_parts(branch: Option<&str>, commit: Option<&str>) -> Option<Self> {
        match (commit, branch) {
            (Some(commit), _) if !commit.is_empty() => Some(Target::Commit(commit.to_string())),
            (_, Some(branch)) if !branch.is_empty() => Some(Target::Branch(branch.to_string())),
            _ => None,
        }
    }
}

/// One local checkout of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
    pub url: String,
    pub target: Target,
}

impl Repository {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        url: impl Into<String>,
        target: Target,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            url: url.into(),
            target,
        }
    }

    /// True when the path is a non-empty directory that is itself the root
    /// of a git working tree.
    ///
    /// A directory nested inside another repository (usually the project
    /// itself) is not a valid copy: fetching and resetting there would act
    /// on the enclosing repository.
    pub fn is_valid_local_copy(&self, git: &dyn GitOperations) -> bool {
        let non_empty = fs::read_dir(&self.path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if !non_empty {
            return false;
        }
        let Some(toplevel) = git.toplevel(&self.path) else {
            return false;
        };
        match (fs::canonicalize(&toplevel), fs::canonicalize(&self.path)) {
            (Ok(toplevel), Ok(own)) => toplevel == own,
            _ => false,
        }
    }

    /// Clone the repository, or refresh it when a valid copy already exists.
    pub fn ensure_local_copy(&self, git: &dyn GitOperations) -> Result<()> {
        if self.is_valid_local_copy(git) {
            debug!("{} already present at {}", self.name, self.path.display());
            return self.sync_existing(git).map_err(|e| self.wrap(e));
        }
        self.clone_fresh(git).map_err(|e| self.wrap(e))
    }

    /// Fetch and hard-reset to the target, cloning first if needed.
    pub fn refresh(&self, git: &dyn GitOperations) -> Result<()> {
        if !self.is_valid_local_copy(git) {
            return self.clone_fresh(git).map_err(|e| self.wrap(e));
        }
        self.sync_existing(git).map_err(|e| self.wrap(e))
    }

    /// Remove the checkout. Returns `false` when it was already absent.
    pub fn destroy(&self) -> Result<bool> {
        remove_tree(&self.path)
    }

    fn clone_fresh(&self, git: &dyn GitOperations) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        match &self.target {
            Target::Branch(branch) => git.clone_repo(&self.url, Some(branch), &self.path),
            Target::Commit(commit) => {
                git.clone_repo(&self.url, None, &self.path)?;
                debug!("{} is frozen to {}", self.name, commit);
                git.fetch(&self.path, Some(commit), None)?;
                git.reset_hard(&self.path, commit)
            }
        }
    }

    fn sync_existing(&self, git: &dyn GitOperations) -> Result<()> {
        git.fetch(&self.path, None, None)?;
        match &self.target {
            Target::Branch(branch) => git.reset_hard(&self.path, &format!("origin/{}", branch)),
            Target::Commit(commit) => {
                git.fetch(&self.path, Some(commit), Some(1))?;
                git.reset_hard(&self.path, commit)
            }
        }
    }

    fn wrap(&self, error: Error) -> Error {
        Error::Sync {
            name: self.name.clone(),
            source: Box::new(error),
        }
    }
}

/// Recursively delete `path`. Returns `false` when it did not exist.
pub fn remove_tree(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockGitOperations;
    use super::*;
    use tempfile::TempDir;

    const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

    fn tracked(dir: &Path) -> Repository {
        Repository::new(
            "web",
            dir.join("parts/web"),
            "https://example.com/web.git",
            Target::Branch("14.0".to_string()),
        )
    }

    fn frozen(dir: &Path) -> Repository {
        Repository::new(
            "web",
            dir.join("parts/web"),
            "https://example.com/web.git",
            Target::Commit(COMMIT.to_string()),
        )
    }

    #[test]
    fn test_target_commit_wins_over_branch() {
        assert_eq!(
            Target::from_parts(Some("main"), Some(COMMIT)),
            Some(Target::Commit(COMMIT.to_string()))
        );
        assert_eq!(
            Target::from_parts(Some("main"), None),
            Some(Target::Branch("main".to_string()))
        );
        assert_eq!(
            Target::from_parts(Some("main"), Some("")),
            Some(Target::Branch("main".to_string()))
        );
        assert_eq!(Target::from_parts(None, None), None);
    }

    #[test]
    fn test_tracked_clone_is_shallow_single_branch() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        let repo = tracked(temp.path());

        repo.ensure_local_copy(&git).unwrap();

        let calls = git.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("clone 14.0 https://example.com/web.git"));
        assert!(repo.is_valid_local_copy(&git));
    }

    #[test]
    fn test_frozen_clone_fetches_full_history_then_checks_out_commit() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        let repo = frozen(temp.path());

        repo.ensure_local_copy(&git).unwrap();

        let calls = git.calls();
        assert!(calls[0].starts_with("clone <full>"));
        assert_eq!(calls.last().unwrap(), &format!("reset {} {}", repo.path.display(), COMMIT));
    }

    #[test]
    fn test_ensure_twice_behaves_as_refresh() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        let repo = tracked(temp.path());

        repo.ensure_local_copy(&git).unwrap();
        repo.ensure_local_copy(&git).unwrap();

        let calls = git.calls();
        let path = repo.path.display();
        assert_eq!(
            calls[1..],
            [
                format!("fetch {} origin", path),
                format!("reset {} origin/14.0", path),
            ]
        );
    }

    #[test]
    fn test_tracked_refresh_resets_to_origin_branch() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        let repo = tracked(temp.path());
        fs::create_dir_all(repo.path.join(".git")).unwrap();

        repo.refresh(&git).unwrap();

        let path = repo.path.display();
        assert_eq!(
            git.calls(),
            vec![
                format!("fetch {} origin", path),
                format!("reset {} origin/14.0", path),
            ]
        );
    }

    #[test]
    fn test_frozen_refresh_never_tracks_a_branch() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        let repo = frozen(temp.path());
        fs::create_dir_all(repo.path.join(".git")).unwrap();

        repo.refresh(&git).unwrap();

        let path = repo.path.display();
        let calls = git.calls();
        assert_eq!(
            calls,
            vec![
                format!("fetch {} origin", path),
                format!("fetch {} --depth 1 origin {}", path, COMMIT),
                format!("reset {} {}", path, COMMIT),
            ]
        );
        assert!(!calls.iter().any(|c| c.contains("origin/")));
    }

    #[test]
    fn test_refresh_without_copy_clones() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        let repo = tracked(temp.path());

        repo.refresh(&git).unwrap();

        assert!(git.calls()[0].starts_with("clone"));
    }

    #[test]
    fn test_empty_directory_is_not_a_valid_copy() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        let repo = tracked(temp.path());
        fs::create_dir_all(&repo.path).unwrap();

        assert!(!repo.is_valid_local_copy(&git));
    }

    #[test]
    fn test_directory_nested_in_another_repository_is_not_a_valid_copy() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::new();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        let repo = tracked(temp.path());
        fs::create_dir_all(repo.path.join("leftover")).unwrap();

        assert!(!repo.is_valid_local_copy(&git));

        repo.refresh(&git).unwrap();

        let calls = git.calls();
        assert!(calls[0].starts_with("clone 14.0"));
        assert!(!calls
            .iter()
            .any(|c| c.starts_with("fetch") || c.starts_with("reset")));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_git_toplevel_of_nested_directory() {
        let temp = TempDir::new().unwrap();
        let git = SystemGit::default();
        let init = Command::new("git")
            .arg("-C")
            .arg(temp.path())
            .args(["init", "--quiet"])
            .status();
        if !matches!(init, Ok(status) if status.success()) {
            return;
        }
        let nested = temp.path().join("parts/web");
        fs::create_dir_all(nested.join("leftover")).unwrap();
        let repo = Repository::new(
            "web",
            &nested,
            "https://example.com/web.git",
            Target::Branch("14.0".to_string()),
        );

        let toplevel = git.toplevel(&nested).unwrap();
        assert_eq!(
            fs::canonicalize(toplevel).unwrap(),
            fs::canonicalize(temp.path()).unwrap()
        );
        assert!(!repo.is_valid_local_copy(&git));
    }

    #[test]
    fn test_failure_carries_declaration_name() {
        let temp = TempDir::new().unwrap();
        let git = MockGitOperations::failing(&["https://example.com/web.git"]);
        let repo = tracked(temp.path());

        let err = repo.ensure_local_copy(&git).unwrap_err();
        match err {
            Error::Sync { name, source } => {
                assert_eq!(name, "web");
                assert!(matches!(*source, Error::GitCommand { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_destroy_twice_is_tolerated() {
        let temp = TempDir::new().unwrap();
        let repo = tracked(temp.path());
        fs::create_dir_all(repo.path.join("module")).unwrap();
        fs::write(repo.path.join("module/__init__.py"), "").unwrap();

        assert!(repo.destroy().unwrap());
        assert!(!repo.path.exists());
        assert!(!repo.destroy().unwrap());
    }
}
