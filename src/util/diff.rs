//! Added-line extraction from unified diff text

const HUNK_HEADER: &str = "@@";
const ADDED_PREFIX: char = '+';

/// Extract the added lines of a unified diff, leading `+` included.
///
/// Only lines after the first `@@` hunk header are considered, so file
/// headers such as `+++ b/src/App.tsx` are never returned. Hunk headers
/// themselves are dropped.
pub fn extract_added_lines(diff: &str) -> Vec<&str> {
    let mut in_hunk = false;
    let mut added = Vec::new();

    for line in diff.split('\n') {
        if line.starts_with(HUNK_HEADER) {
            in_hunk = true;
            continue;
        }
        if in_hunk && line.starts_with(ADDED_PREFIX) {
            added.push(line);
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "diff --git a/src/App.tsx b/src/App.tsx\n\
        index 83db48f..bf269f4 100644\n\
        --- a/src/App.tsx\n\
        +++ b/src/App.tsx\n\
        @@ -1,3 +1,4 @@\n\
        +import {Button} from \"@nextui-org/react\";\n\
        \x20import React from \"react\";\n\
        -const old = 1;\n\
        +const x = 1;\n\
        @@ -20,2 +21,3 @@ export default App;\n\
        \x20context\n\
        +export const y = 2;\n";

    #[test]
    fn test_extract_added_lines() {
        assert_eq!(
            extract_added_lines(DIFF),
            vec![
                "+import {Button} from \"@nextui-org/react\";",
                "+const x = 1;",
                "+export const y = 2;",
            ]
        );
    }

    #[test]
    fn test_extract_added_lines_ignores_lines_before_first_hunk() {
        let diff = "+++ b/src/App.tsx\n+not in a hunk\n@@ -0,0 +1 @@\n+in a hunk";
        assert_eq!(extract_added_lines(diff), vec!["+in a hunk"]);
    }

    #[test]
    fn test_extract_added_lines_without_hunk() {
        assert!(extract_added_lines("+a\n+b\n").is_empty());
        assert!(extract_added_lines("").is_empty());
    }

    #[test]
    fn test_extract_added_lines_keeps_duplicates() {
        let diff = "@@ -1 +1,2 @@\n+same\n+same\n";
        assert_eq!(extract_added_lines(diff), vec!["+same", "+same"]);
    }

    #[test]
    fn test_extract_added_lines_is_stateless() {
        let first = extract_added_lines(DIFF);
        let second = extract_added_lines(DIFF);
        assert_eq!(first, second);
        assert!(extract_added_lines("+after\n").is_empty());
    }
}
