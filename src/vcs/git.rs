use super::{Repository, SourceControl, VcsError};
use crate::types::Change;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, trace};

const GIT: &str = "git";
const NULL_DEVICE: &str = "/dev/null";
/// `git diff --no-index` exits with 1 when the inputs differ
const DIFF_FOUND_EXIT_CODE: i32 = 1;

/// Run git in `cwd` and return stdout. Exit codes in `accepted_codes` are
/// treated as success in addition to 0.
async fn run_git(cwd: &Path, args: &[&str], accepted_codes: &[i32]) -> Result<String, VcsError> {
    trace!("Running git {:?} in {}", args, cwd.display());
    let output = Command::new(GIT).current_dir(cwd).args(args).output().await?;

    let accepted = output
        .status
        .code()
        .is_some_and(|code| accepted_codes.contains(&code));
    if output.status.success() || accepted {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(VcsError::Command {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Version control provider backed by the `git` executable
#[derive(Debug)]
pub struct GitProvider {
    paths: Vec<PathBuf>,
}

impl GitProvider {
    /// Locate git. Returns `None` when the executable cannot be run.
    ///
    /// `paths` are the directories whose repositories will be scanned.
    pub async fn locate(paths: Vec<PathBuf>) -> Option<Self> {
        match Command::new(GIT).arg("--version").output().await {
            Ok(output) if output.status.success() => {
                debug!("Found {}", String::from_utf8_lossy(&output.stdout).trim());
                Some(Self { paths })
            }
            Ok(output) => {
                debug!("git --version exited with {}", output.status);
                None
            }
            Err(e) => {
                debug!("git is not available: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SourceControl for GitProvider {
    type Repo = GitRepository;

    async fn list_repositories(&self) -> Result<Vec<GitRepository>, VcsError> {
        let mut repositories: Vec<GitRepository> = Vec::new();
        for path in &self.paths {
            let repository = GitRepository::discover(path).await?;
            if repositories.iter().any(|r| r.root == repository.root) {
                debug!(
                    "{} belongs to already listed repository {}",
                    path.display(),
                    repository.root.display()
                );
                continue;
            }
            repositories.push(repository);
        }
        Ok(repositories)
    }
}

#[derive(Debug)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Find the repository containing `path`
    pub async fn discover(path: &Path) -> Result<Self, VcsError> {
        let output = run_git(path, &["rev-parse", "--show-toplevel"], &[])
            .await
            .map_err(|e| match e {
                VcsError::Command { .. } => VcsError::NotARepository {
                    path: path.display().to_string(),
                },
                other => other,
            })?;
        let root = PathBuf::from(output.trim());
        debug!("Discovered repository at {}", root.display());
        Ok(Self { root })
    }
}

#[async_trait]
impl Repository for GitRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn working_tree_changes(&self) -> Result<Vec<Change>, VcsError> {
        let output = run_git(
            &self.root,
            &["status", "--porcelain=v1", "-z", "--untracked-files=all"],
            &[],
        )
        .await?;
        parse_status(&output, &self.root)
    }

    async fn diff_with_head(&self, change: &Change) -> Result<String, VcsError> {
        let path = change.path.as_str();
        if change.untracked {
            run_git(
                &self.root,
                &["diff", "--no-color", "--no-ext-diff", "--no-index", "--", NULL_DEVICE, path],
                &[DIFF_FOUND_EXIT_CODE],
            )
            .await
        } else {
            run_git(
                &self.root,
                &["diff", "--no-color", "--no-ext-diff", "HEAD", "--", path],
                &[],
            )
            .await
        }
    }
}

/// Parse `git status --porcelain=v1 -z` output into working tree changes.
///
/// Entries are `XY path`, where X is the index status and Y the worktree
/// status. Entries with a blank worktree status are staged-only and left
/// out. Renames and copies are followed by an extra entry holding the
/// original path.
fn parse_status(output: &str, root: &Path) -> Result<Vec<Change>, VcsError> {
    let mut changes = Vec::new();
    let mut entries = output.split('\0').filter(|e| !e.is_empty());

    while let Some(entry) = entries.next() {
        let bytes = entry.as_bytes();
        if bytes.len() < 4 || bytes[2] != b' ' {
            return Err(VcsError::MalformedStatus {
                entry: entry.to_string(),
            });
        }
        let (index, worktree) = (bytes[0], bytes[1]);
        let path = &entry[3..];

        if matches!(index, b'R' | b'C') || matches!(worktree, b'R' | b'C') {
            entries.next();
        }
        if worktree == b' ' {
            trace!("Skipping staged-only change {}", path);
            continue;
        }

        let absolute = root.join(path).display().to_string();
        changes.push(if index == b'?' {
            Change::untracked(absolute)
        } else {
            Change::new(absolute)
        });
    }

    debug!("{} working tree changes in {}", changes.len(), root.display());
    Ok(changes)
}
