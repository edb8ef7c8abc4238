//! Version control collaborators
//!
//! The scanner only talks to these traits. `git::GitProvider` implements
//! them on top of the `git` executable.

pub mod git;

#[cfg(test)]
pub mod fake;

use crate::types::Change;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors raised by a version control provider
#[derive(Debug, Error)]
pub enum VcsError {
    /// The provider executable could not be started
    #[error("Failed to run git: {0}")]
    Io(#[from] std::io::Error),

    /// The provider ran but reported a failure
    #[error("`git {args}` failed: {stderr}")]
    Command { args: String, stderr: String },

    /// The path is not inside a repository
    #[error("Not a git repository: {path}")]
    NotARepository { path: String },

    /// Status output could not be parsed
    #[error("Malformed git status entry: {entry}")]
    MalformedStatus { entry: String },
}

/// Locates the repositories to scan
#[async_trait]
pub trait SourceControl: Send + Sync {
    type Repo: Repository;

    async fn list_repositories(&self) -> Result<Vec<Self::Repo>, VcsError>;
}

/// A single working tree
#[async_trait]
pub trait Repository: Send + Sync {
    /// Repository root
    fn root(&self) -> &Path;

    /// Files with unstaged or untracked changes, in provider order
    async fn working_tree_changes(&self) -> Result<Vec<Change>, VcsError>;

    /// Unified diff of the working tree file against HEAD
    async fn diff_with_head(&self, change: &Change) -> Result<String, VcsError>;
}
