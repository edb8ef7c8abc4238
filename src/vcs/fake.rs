//! In-memory provider for tests

use super::{Repository, SourceControl, VcsError};
use crate::types::Change;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct FakeRepository {
    root: PathBuf,
    changes: Vec<(Change, Result<String, String>)>,
    fail_listing: bool,
}

impl FakeRepository {
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            changes: vec![],
            fail_listing: false,
        }
    }

    /// Add a changed file with its diff text
    pub fn change(mut self, path: &str, diff: &str) -> Self {
        self.changes.push((Change::new(path), Ok(diff.to_string())));
        self
    }

    /// Add a changed file whose diff cannot be fetched
    pub fn broken_change(mut self, path: &str, error: &str) -> Self {
        self.changes.push((Change::new(path), Err(error.to_string())));
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

#[async_trait]
impl Repository for FakeRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn working_tree_changes(&self) -> Result<Vec<Change>, VcsError> {
        if self.fail_listing {
            return Err(VcsError::Command {
                args: "status".into(),
                stderr: "index locked".into(),
            });
        }
        Ok(self.changes.iter().map(|(c, _)| c.clone()).collect())
    }

    async fn diff_with_head(&self, change: &Change) -> Result<String, VcsError> {
        let (_, diff) = self
            .changes
            .iter()
            .find(|(c, _)| c.path == change.path)
            .ok_or_else(|| VcsError::Command {
                args: format!("diff HEAD -- {}", change.path),
                stderr: "unknown path".into(),
            })?;
        diff.clone().map_err(|stderr| VcsError::Command {
            args: format!("diff HEAD -- {}", change.path),
            stderr,
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeProvider {
    pub repositories: Vec<FakeRepository>,
}

impl FakeProvider {
    pub fn new(repositories: Vec<FakeRepository>) -> Self {
        Self { repositories }
    }
}

#[async_trait]
impl SourceControl for FakeProvider {
    type Repo = FakeRepository;

    async fn list_repositories(&self) -> Result<Vec<FakeRepository>, VcsError> {
        Ok(self.repositories.clone())
    }
}
