use crate::types::{ScanResult, SkippedFile, ViolationEntry};
use crate::util::fence_backticks;
use serde::Serialize;

pub const REPORT_TITLE: &str = "Share Keeper";

/// Path segment that report paths are trimmed to
const TRIM_MARKER: &str = "src";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Html,
    Json,
}

impl ReportFormat {
    /// Pick a format from an output file extension
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with(".md") {
            Some(Self::Markdown)
        } else if path.ends_with(".html") || path.ends_with(".htm") {
            Some(Self::Html)
        } else if path.ends_with(".json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// Path from the first `src` onwards, or the whole path if it has none
pub fn trimmed_path(path: &str) -> &str {
    match path.find(TRIM_MARKER) {
        Some(index) => &path[index..],
        None => path,
    }
}

/// Render a scan result. `module` is the disallowed import source.
pub fn render(result: &ScanResult, module: &str, format: ReportFormat) -> String {
    match format {
        ReportFormat::Markdown => render_markdown(result, module),
        ReportFormat::Html => render_html(result, module),
        ReportFormat::Json => render_json(result, module),
    }
}

fn no_violations_message(module: &str) -> String {
    format!("Good, you have no direct imports from {}.", module)
}

fn summary_message(result: &ScanResult) -> String {
    format!(
        "You have got {} direct imports in {} files",
        result.total_lines(),
        result.total_files()
    )
}

fn entry_heading(entry: &ViolationEntry) -> String {
    format!(
        "{} direct imports in {}",
        entry.contents().len(),
        trimmed_path(entry.file())
    )
}

fn skipped_line(skipped: &SkippedFile) -> String {
    format!("{}: {}", trimmed_path(&skipped.file), skipped.reason)
}

fn render_markdown(result: &ScanResult, module: &str) -> String {
    let mut output = String::new();

    if result.is_empty() {
        output.push_str(&format!("# {}\n\n", no_violations_message(module)));
    } else {
        output.push_str(&format!("# {}\n\n", summary_message(result)));
        for entry in result.violations() {
            output.push_str(&format!("## {}\n\n", entry_heading(entry)));
            let lines = entry.contents().join("\n");
            let backticks = fence_backticks(&lines);
            output.push_str(&format!("{}\n{}\n{}\n\n", backticks, lines, backticks));
        }
    }

    if !result.skipped().is_empty() {
        output.push_str("## Skipped files\n\n");
        for skipped in result.skipped() {
            output.push_str(&format!("- {}\n", skipped_line(skipped)));
        }
    }

    output.trim_end().to_string()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_html(result: &ScanResult, module: &str) -> String {
    let mut body = String::new();

    if result.is_empty() {
        body.push_str(&format!(
            "    <div style=\"border: 1px solid black; padding: 10px;\">\n      <h1>{}</h1>\n    </div>\n",
            escape_html(&no_violations_message(module))
        ));
    } else {
        body.push_str(&format!("    <h1>{}</h1>\n", escape_html(&summary_message(result))));
        for entry in result.violations() {
            body.push_str("    <div style=\"border: 1px solid black; padding: 10px;\">\n");
            body.push_str(&format!("      <h3>{}</h3>\n      <ul>\n", escape_html(&entry_heading(entry))));
            for line in entry.contents() {
                body.push_str(&format!("        <li><code>{}</code></li>\n", escape_html(line)));
            }
            body.push_str("      </ul>\n    </div>\n");
        }
    }

    if !result.skipped().is_empty() {
        body.push_str("    <h3>Skipped files</h3>\n    <ul>\n");
        for skipped in result.skipped() {
            body.push_str(&format!("      <li>{}</li>\n", escape_html(&skipped_line(skipped))));
        }
        body.push_str("    </ul>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        REPORT_TITLE, body
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    module: &'a str,
    total_files: usize,
    total_lines: usize,
    violations: &'a [ViolationEntry],
    skipped: &'a [SkippedFile],
}

fn render_json(result: &ScanResult, module: &str) -> String {
    let report = JsonReport {
        module,
        total_files: result.total_files(),
        total_lines: result.total_lines(),
        violations: result.violations(),
        skipped: result.skipped(),
    };
    serde_json::to_string_pretty(&report).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULE: &str = "@nextui-org/react";

    fn result() -> ScanResult {
        let mut result = ScanResult::default();
        result.push(
            ViolationEntry::new(
                "/home/me/app/src/pages/Home.tsx".into(),
                vec![
                    "+import {Button} from \"@nextui-org/react\";".into(),
                    "+import {Card} from \"@nextui-org/react\";".into(),
                ],
            )
            .unwrap(),
        );
        result.push(
            ViolationEntry::new(
                "/home/me/app/src/App.jsx".into(),
                vec!["+import {Link} from \"@nextui-org/react\";".into()],
            )
            .unwrap(),
        );
        result
    }

    #[test]
    fn test_trimmed_path() {
        assert_eq!(trimmed_path("/repo/src/pages/Home.tsx"), "src/pages/Home.tsx");
        assert_eq!(trimmed_path("/home/me/javasrc/App.tsx"), "src/App.tsx");
        assert_eq!(trimmed_path("/repo/app/Home.tsx"), "/repo/app/Home.tsx");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ReportFormat::from_path("report.md"), Some(ReportFormat::Markdown));
        assert_eq!(ReportFormat::from_path("report.html"), Some(ReportFormat::Html));
        assert_eq!(ReportFormat::from_path("report.json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_path("report.txt"), None);
    }

    #[test]
    fn test_markdown_without_violations() {
        let output = render(&ScanResult::default(), MODULE, ReportFormat::Markdown);
        assert_eq!(output, "# Good, you have no direct imports from @nextui-org/react.");
    }

    #[test]
    fn test_markdown_with_violations() {
        let output = render(&result(), MODULE, ReportFormat::Markdown);
        assert_eq!(
            output,
            "# You have got 3 direct imports in 2 files\n\n\
             ## 2 direct imports in src/pages/Home.tsx\n\n\
             ```\n\
             +import {Button} from \"@nextui-org/react\";\n\
             +import {Card} from \"@nextui-org/react\";\n\
             ```\n\n\
             ## 1 direct imports in src/App.jsx\n\n\
             ```\n\
             +import {Link} from \"@nextui-org/react\";\n\
             ```"
        );
    }

    #[test]
    fn test_markdown_lists_skipped_files() {
        let mut result = ScanResult::default();
        result.skip("/repo/src/Gone.tsx".into(), "bad revision".into());
        let output = render(&result, MODULE, ReportFormat::Markdown);
        assert!(output.starts_with("# Good, you have no direct imports"));
        assert!(output.ends_with("## Skipped files\n\n- src/Gone.tsx: bad revision"));
    }

    #[test]
    fn test_html_escapes_lines() {
        let output = render(&result(), MODULE, ReportFormat::Html);
        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("<title>Share Keeper</title>"));
        assert!(output.contains("<h1>You have got 3 direct imports in 2 files</h1>"));
        assert!(output.contains("<h3>2 direct imports in src/pages/Home.tsx</h3>"));
        assert!(output.contains(
            "<li><code>+import {Button} from &quot;@nextui-org/react&quot;;</code></li>"
        ));
    }

    #[test]
    fn test_html_without_violations() {
        let output = render(&ScanResult::default(), MODULE, ReportFormat::Html);
        assert!(output.contains("<h1>Good, you have no direct imports from @nextui-org/react.</h1>"));
    }

    #[test]
    fn test_json_report() {
        let output = render(&result(), MODULE, ReportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["module"], MODULE);
        assert_eq!(value["total_files"], 2);
        assert_eq!(value["total_lines"], 3);
        assert_eq!(value["violations"][1]["file"], "/home/me/app/src/App.jsx");
        assert_eq!(
            value["violations"][0]["contents"][1],
            "+import {Card} from \"@nextui-org/react\";"
        );
        assert_eq!(value["skipped"], serde_json::json!([]));
        assert!(value.get("generated_at").is_none());
        assert_eq!(output, render(&result(), MODULE, ReportFormat::Json));
    }
}
