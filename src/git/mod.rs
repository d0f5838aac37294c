//! Local cache of remote inventory repositories.
//!
//! Repositories are cloned once under a cache directory and updated in place.
//! Git itself is driven through the `git` executable.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::errors::{Result, TpologyError};

/// A directory holding cloned repositories, one per URL.
#[derive(Debug, Clone)]
pub struct Cache {
    path: PathBuf,
}

impl Cache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached checkout of `url`. Nothing is cloned yet.
    pub fn repository(&self, url: &str, branch: &str) -> Repository {
        Repository {
            url: url.to_string(),
            branch: branch.to_string(),
            dir: self.path.join(clean_url(url)),
        }
    }
}

/// Turns a repository URL into a relative cache path.
///
/// Passwords are dropped, and `:` and `@` become path separators, so
/// `https://u:p@host/org/repo.git` maps to `https/u/host/org/repo.git`.
pub fn clean_url(url: &str) -> String {
    let stripped = match url.split_once("://") {
        Some((scheme, rest)) => {
            let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
            let authority = match authority.rsplit_once('@') {
                Some((userinfo, host)) => {
                    let user = userinfo.split(':').next().unwrap_or_default();
                    format!("{}@{}", user, host)
                }
                None => authority.to_string(),
            };
            format!("{}://{}/{}", scheme, authority, path)
        }
        None => url.to_string(),
    };

    stripped
        .split(['/', ':', '@'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// A cached clone of one remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub url: String,
    pub branch: String,
    pub dir: PathBuf,
}

impl Repository {
    pub fn is_cloned(&self) -> bool {
        self.dir.exists()
    }

    /// Clones the repository into its cache directory.
    pub fn clone_repo(&self) -> Result<()> {
        if self.is_cloned() {
            return Err(self.error("repository already cloned".to_string()));
        }
        if let Some(parent) = self.dir.parent() {
            fs::create_dir_all(parent)?;
        }
        let dir = self.dir.to_string_lossy();
        let mut args = vec!["clone"];
        if !self.branch.is_empty() {
            args.extend(["-b", self.branch.as_str()]);
        }
        args.extend([self.url.as_str(), &*dir]);
        info!(url = %self.url, dir = %dir, "cloning inventory repository");
        self.run(None, &args).map(|_| ())
    }

    pub fn clone_if_not_cloned(&self) -> Result<()> {
        if self.is_cloned() {
            return Ok(());
        }
        self.clone_repo()
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.exec(&["checkout", branch]).map(|_| ())
    }

    /// Fast-forwards the configured branch from its remote.
    pub fn pull(&self) -> Result<()> {
        if !self.branch.is_empty() {
            self.checkout(&self.branch)?;
        }
        self.exec(&["pull", "--ff-only"]).map(|_| ())
    }

    /// `true` when the working tree has no changes or untracked files.
    pub fn is_clean(&self) -> bool {
        self.exec(&["status", "--porcelain"])
            .map(|out| out.trim().is_empty())
            .unwrap_or(false)
    }

    /// Deletes the clone.
    pub fn remove(&self) -> Result<()> {
        if self.is_cloned() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Path of the lock file guarding this clone.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.dir.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Takes an exclusive lock on the clone for this process.
    ///
    /// The lock file holds the owner's PID and is removed when the returned
    /// guard drops.
    pub fn lock(&self) -> Result<RepositoryLock> {
        let path = self.lock_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut f) => {
                write!(f, "{}", std::process::id())?;
                debug!(path = %path.display(), "acquired repository lock");
                Ok(RepositoryLock { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let holder = self
                    .locker_pid()
                    .map(|pid| pid.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                Err(self.error(format!("repository already locked by PID {}", holder)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// PID recorded in the lock file, if the clone is locked.
    pub fn locker_pid(&self) -> Option<u32> {
        fs::read_to_string(self.lock_path())
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }

    fn exec(&self, args: &[&str]) -> Result<String> {
        self.run(Some(self.dir.as_path()), args)
    }

    fn run(&self, cwd: Option<&Path>, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        if let Some(dir) = cwd {
            cmd.arg("-C").arg(dir);
        }
        cmd.args(args);
        debug!(?args, "running git");
        let output = cmd
            .output()
            .map_err(|e| self.error(format!("failed to run git: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.error(format!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn error(&self, message: String) -> TpologyError {
        TpologyError::Git {
            message,
            url: self.url.clone(),
        }
    }
}

/// Held lock on a cached repository; releases on drop.
#[derive(Debug)]
pub struct RepositoryLock {
    path: PathBuf,
}

impl RepositoryLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepositoryLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Makes `url` at `branch` available under `cache_dir` and returns the
/// checkout directory: clones on first use, fast-forwards afterwards.
pub fn fetch(url: &str, branch: &str, cache_dir: &Path) -> Result<PathBuf> {
    let repo = Cache::new(cache_dir).repository(url, branch);
    let _lock = repo.lock()?;
    if repo.is_cloned() {
        if repo.is_clean() {
            repo.pull()?;
        } else {
            info!(dir = %repo.dir.display(), "cached inventory has local changes; not updating");
        }
    } else {
        repo.clone_repo()?;
    }
    Ok(repo.dir)
}
