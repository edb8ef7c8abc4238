use serde::Serialize;

/// A file with uncommitted working tree changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Absolute file path
    pub path: String,
    /// Whether the file is not yet known to version control
    pub untracked: bool,
}

impl Change {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            untracked: false,
        }
    }

    pub fn untracked(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            untracked: true,
        }
    }
}

/// A file with at least one disallowed import in its added lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationEntry {
    file: String,
    contents: Vec<String>,
}

impl ViolationEntry {
    /// Returns `None` when there are no offending lines
    pub fn new(file: String, contents: Vec<String>) -> Option<Self> {
        if contents.is_empty() {
            None
        } else {
            Some(Self { file, contents })
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Offending lines in diff order, leading `+` included
    pub fn contents(&self) -> &[String] {
        &self.contents
    }
}

/// A file left out of the scan because its diff could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Violations found by one scan, in repository then change order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    violations: Vec<ViolationEntry>,
    skipped: Vec<SkippedFile>,
}

impl ScanResult {
    pub fn push(&mut self, entry: ViolationEntry) {
        self.violations.push(entry);
    }

    pub fn skip(&mut self, file: String, reason: String) {
        self.skipped.push(SkippedFile { file, reason });
    }

    pub fn violations(&self) -> &[ViolationEntry] {
        &self.violations
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of files with violations
    pub fn total_files(&self) -> usize {
        self.violations.len()
    }

    /// Number of offending lines across all files
    pub fn total_lines(&self) -> usize {
        self.violations.iter().map(|v| v.contents.len()).sum()
    }
}

/// Result of a check: either no version control provider, or a finished scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    NoProvider,
    Scanned(ScanResult),
}
