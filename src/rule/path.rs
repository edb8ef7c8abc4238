use crate::config::RuleConfig;
use crate::util::normalize_separators;
use globset::GlobSet;

/// Path predicates deciding whether a changed file is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathClass {
    /// Ends with a React component extension
    pub is_candidate_extension: bool,
    /// Lives in the shared component directory, or matches an exclude pattern
    pub is_excluded_dir: bool,
    /// Contains the tracked root marker anywhere in the raw path
    pub is_tracked: bool,
}

impl PathClass {
    pub fn is_eligible(&self) -> bool {
        self.is_candidate_extension && !self.is_excluded_dir && self.is_tracked
    }
}

/// Substring heuristics over file paths. These are not path-segment
/// matches: `/home/me/javasrc/App.tsx` counts as tracked because it
/// contains `src`.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    extensions: Vec<String>,
    excluded_dir: String,
    tracked_marker: String,
    exclude: GlobSet,
}

impl PathClassifier {
    pub fn new(rule: &RuleConfig) -> anyhow::Result<Self> {
        Ok(Self {
            extensions: rule.extensions.clone(),
            excluded_dir: rule.excluded_dir.clone(),
            tracked_marker: rule.tracked_marker.clone(),
            exclude: rule.exclude_set()?,
        })
    }

    pub fn classify(&self, path: &str) -> PathClass {
        let normalized = normalize_separators(path);
        PathClass {
            is_candidate_extension: self
                .extensions
                .iter()
                .any(|ext| normalized.ends_with(ext.as_str())),
            is_excluded_dir: normalized.contains(&self.excluded_dir)
                || self.exclude.is_match(&normalized),
            is_tracked: path.contains(&self.tracked_marker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PathClassifier {
        PathClassifier::new(&RuleConfig::default()).unwrap()
    }

    #[test]
    fn test_candidate_extensions() {
        let c = classifier();
        assert!(c.classify("/repo/src/App.tsx").is_candidate_extension);
        assert!(c.classify("/repo/src/App.jsx").is_candidate_extension);
        assert!(!c.classify("/repo/src/App.ts").is_candidate_extension);
        assert!(!c.classify("/repo/src/App.js").is_candidate_extension);
        assert!(!c.classify("/repo/src/App.TSX").is_candidate_extension);
        assert!(!c.classify("/repo/src/App.tsx.bak").is_candidate_extension);
    }

    #[test]
    fn test_excluded_dir_regardless_of_extension() {
        let c = classifier();
        assert!(c.classify("/repo/src/components/Foo.tsx").is_excluded_dir);
        assert!(c.classify("/repo/src/components/index.ts").is_excluded_dir);
        assert!(c.classify(r"C:\repo\src\components\Foo.tsx").is_excluded_dir);
        assert!(!c.classify("/repo/src/pages/Foo.tsx").is_excluded_dir);
    }

    #[test]
    fn test_tracked_is_substring_match() {
        let c = classifier();
        assert!(c.classify("/repo/src/App.tsx").is_tracked);
        assert!(c.classify("/home/me/javasrc/App.tsx").is_tracked);
        assert!(!c.classify("/repo/app/App.tsx").is_tracked);
    }

    #[test]
    fn test_eligibility() {
        let c = classifier();
        assert!(c.classify("/repo/src/Foo.tsx").is_eligible());
        assert!(c.classify(r"C:\repo\src\pages\Foo.jsx").is_eligible());
        assert!(!c.classify("/repo/src/components/Foo.tsx").is_eligible());
        assert!(!c.classify("/repo/src/Foo.ts").is_eligible());
        assert!(!c.classify("/repo/app/Foo.tsx").is_eligible());
    }

    #[test]
    fn test_exclude_patterns() {
        let rule = RuleConfig {
            exclude: vec!["**/*.stories.tsx".into(), "**/src/ui/**".into()],
            ..RuleConfig::default()
        };
        let c = PathClassifier::new(&rule).unwrap();
        assert!(c.classify("/repo/src/Button.stories.tsx").is_excluded_dir);
        assert!(c.classify(r"C:\repo\src\ui\Theme.tsx").is_excluded_dir);
        assert!(c.classify("/repo/src/Button.tsx").is_eligible());
    }
}
