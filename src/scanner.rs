use crate::config::{Config, DiffErrorPolicy};
use crate::rule::import::ImportMatcher;
use crate::rule::path::PathClassifier;
use crate::types::{ScanOutcome, ScanResult, ViolationEntry};
use crate::util::diff::extract_added_lines;
use crate::vcs::{Repository, SourceControl, VcsError};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to list repositories: {0}")]
    ListRepositories(#[source] VcsError),

    #[error("Failed to list working tree changes in {root}: {source}")]
    ListChanges { root: String, source: VcsError },

    #[error("Failed to fetch diff for {path}: {source}")]
    DiffFetch { path: String, source: VcsError },
}

/// Scans working tree changes for disallowed imports
#[derive(Debug, Clone)]
pub struct Scanner {
    classifier: PathClassifier,
    matcher: ImportMatcher,
    on_diff_error: DiffErrorPolicy,
}

impl Scanner {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            classifier: PathClassifier::new(&config.rule)?,
            matcher: ImportMatcher::new(&config.rule.module),
            on_diff_error: config.scan.on_diff_error,
        })
    }

    /// Scan every repository the provider knows about.
    ///
    /// Returns [`ScanOutcome::NoProvider`] without scanning when there is no
    /// provider, so callers can tell "nothing to check" from "no violations".
    pub async fn check<P: SourceControl>(
        &self,
        provider: Option<&P>,
    ) -> Result<ScanOutcome, ScanError> {
        let Some(provider) = provider else {
            debug!("No version control provider, skipping scan");
            return Ok(ScanOutcome::NoProvider);
        };

        let repositories = provider
            .list_repositories()
            .await
            .map_err(ScanError::ListRepositories)?;
        info!("Found {} repositories", repositories.len());

        let result = self.scan(&repositories).await?;
        info!(
            "Scan complete: {} direct imports in {} files",
            result.total_lines(),
            result.total_files()
        );
        Ok(ScanOutcome::Scanned(result))
    }

    /// Scan repositories in order, then their changes in provider order.
    pub async fn scan<R: Repository>(&self, repositories: &[R]) -> Result<ScanResult, ScanError> {
        let mut result = ScanResult::default();

        for repository in repositories {
            let root = repository.root().display().to_string();
            let changes = repository
                .working_tree_changes()
                .await
                .map_err(|source| ScanError::ListChanges {
                    root: root.clone(),
                    source,
                })?;
            debug!("Checking {} changes in {}", changes.len(), root);

            for change in &changes {
                let class = self.classifier.classify(&change.path);
                if !class.is_eligible() {
                    trace!("Skipping {}: {:?}", change.path, class);
                    continue;
                }

                let diff = match repository.diff_with_head(change).await {
                    Ok(diff) => diff,
                    Err(source) => match self.on_diff_error {
                        DiffErrorPolicy::Abort => {
                            return Err(ScanError::DiffFetch {
                                path: change.path.clone(),
                                source,
                            });
                        }
                        DiffErrorPolicy::Skip => {
                            warn!("Skipping {}: {}", change.path, source);
                            result.skip(change.path.clone(), source.to_string());
                            continue;
                        }
                    },
                };
                trace!("Diff for {} is {} bytes", change.path, diff.len());

                let contents: Vec<String> = extract_added_lines(&diff)
                    .into_iter()
                    .filter(|line| self.matcher.matches(line))
                    .map(str::to_string)
                    .collect();

                if let Some(entry) = ViolationEntry::new(change.path.clone(), contents) {
                    debug!(
                        "{} direct imports in {}",
                        entry.contents().len(),
                        entry.file()
                    );
                    result.push(entry);
                }
            }
        }

        Ok(result)
    }
}
