//! Template source classification and resolution.
//!
//! A template source is either a local directory or a git repository URL.
//! Local directories are used as-is. Repositories are cloned into a cache
//! directory (one subdirectory per repository name) and reused for as long
//! as the checked-out revision matches the remote `HEAD`.
//!
//! # Resolution Strategy
//!
//! 1. Local path: returned unchanged; a missing directory surfaces later when
//!    the engine walks it
//! 2. Remote, no cached checkout: clone into the cache slot
//! 3. Remote, cached checkout at the remote revision: reuse it
//! 4. Remote, cached checkout at another revision (or unreadable, or not a
//!    directory at all): delete the slot and clone again
//!
//! The cache is shared by every invocation on the machine and is not locked.
//! Two processes resolving the same repository at the same time can observe
//! each other's delete-and-clone.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::infrastructure::shell::{CommandExecutor, ProcessCommandExecutor, command_line};

static SCP_REMOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+:").expect("SCP remote pattern is valid")
});

/// Where a template set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates located on the local filesystem.
    Local(PathBuf),

    /// A git repository (`http://`, `https://` or `user@host:path`).
    Remote(String),
}

impl TemplateSource {
    /// Classify a template source string.
    pub fn parse(source: &str) -> Self {
        if Self::is_remote(source) {
            Self::Remote(source.to_string())
        } else {
            Self::Local(PathBuf::from(source))
        }
    }

    /// Returns true if `source` names a clonable repository.
    pub fn is_remote(source: &str) -> bool {
        source.starts_with("http://")
            || source.starts_with("https://")
            || SCP_REMOTE.is_match(source)
    }
}

/// Derive the cache directory name for a repository URL.
///
/// This is the last path segment with any trailing `.git` removed, so
/// `git@github.com:user/templates.git` and `https://github.com/user/templates`
/// share the key `templates`.
pub fn cache_key(url: &str) -> Result<String> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default();
    let key = last.strip_suffix(".git").unwrap_or(last);

    if key.is_empty() || key == "." || key == ".." {
        return Err(Error::resolve(format!(
            "cannot derive cache name from template source: {url}"
        )));
    }
    Ok(key.to_string())
}

/// Resolves template sources to local directories, caching remote checkouts.
#[derive(Clone)]
pub struct TemplateResolver {
    executor: Arc<dyn CommandExecutor>,
    cache_root: PathBuf,
}

impl std::fmt::Debug for TemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResolver")
            .field("cache_root", &self.cache_root)
            .finish_non_exhaustive()
    }
}

impl TemplateResolver {
    /// Create a resolver that runs commands through `executor` and caches
    /// checkouts under `cache_root`.
    pub fn new(executor: Arc<dyn CommandExecutor>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            cache_root: cache_root.into(),
        }
    }

    /// Create a resolver backed by real `git` processes.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ProcessCommandExecutor::new()),
            config.cache_root.clone(),
        )
    }

    /// Resolve `source` to a directory the engine can walk.
    pub fn resolve(&self, source: &str) -> Result<PathBuf> {
        match TemplateSource::parse(source) {
            TemplateSource::Local(path) => {
                debug!("Using local template directory: {}", path.display());
                Ok(path)
            }
            TemplateSource::Remote(url) => self.resolve_remote(&url),
        }
    }

    fn resolve_remote(&self, url: &str) -> Result<PathBuf> {
        let key = cache_key(url)?;
        let remote = self.remote_revision(url)?;

        fs::create_dir_all(&self.cache_root).map_err(|source| Error::Cache {
            path: self.cache_root.clone(),
            source,
        })?;
        let cached = self.cache_root.join(&key);

        if cached.is_dir() {
            match self.local_revision(&cached) {
                Ok(local) if local == remote => {
                    info!(revision = %remote, "Using cached template: {}", cached.display());
                    return Ok(cached);
                }
                Ok(local) => {
                    warn!(
                        cached = %local,
                        remote = %remote,
                        "Cached template is stale, removing {}",
                        cached.display()
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Cached template is unreadable, removing {}", cached.display());
                }
            }
            fs::remove_dir_all(&cached).map_err(|source| Error::Cache {
                path: cached.clone(),
                source,
            })?;
        } else if fs::symlink_metadata(&cached).is_ok() {
            warn!("Cache slot is not a directory, removing {}", cached.display());
            fs::remove_file(&cached).map_err(|source| Error::Cache {
                path: cached.clone(),
                source,
            })?;
        }

        self.clone_into(url, &cached)?;
        Ok(cached)
    }

    /// Revision hash of the remote repository's `HEAD`.
    pub fn remote_revision(&self, url: &str) -> Result<String> {
        let args = ["ls-remote", url, "HEAD"];
        let output = self
            .executor
            .execute("git", &args, None)?
            .into_success(&command_line("git", &args))?;

        output
            .stdout
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| Error::resolve(format!("invalid git ls-remote output for {url}")))
    }

    /// Revision hash currently checked out in `checkout`.
    pub fn local_revision(&self, checkout: &Path) -> Result<String> {
        let args = ["rev-parse", "HEAD"];
        let output = self
            .executor
            .execute("git", &args, Some(checkout))?
            .into_success(&command_line("git", &args))?;

        let revision = output.stdout.trim();
        if revision.is_empty() {
            return Err(Error::resolve(format!(
                "invalid git rev-parse output in {}",
                checkout.display()
            )));
        }
        Ok(revision.to_string())
    }

    fn clone_into(&self, url: &str, dest: &Path) -> Result<()> {
        let dest_str = dest.to_string_lossy();
        let args = ["clone", url, &*dest_str];
        info!("Cloning template repository {} into {}", url, dest.display());
        self.executor
            .execute("git", &args, None)?
            .into_success(&command_line("git", &args))?;
        Ok(())
    }
}
