//! Per-file and per-corpus validation.

use crate::finding::{Finding, Severity};
use crate::raw::find_quoted_latex;
use crate::registry::IdRegistry;
use crate::report::LintReport;
use crate::schema::check_document;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Checks one file's text. A YAML syntax error is a single critical
/// finding and skips every other check.
pub fn validate_source(path: &Path, text: &str, registry: &mut IdRegistry) -> Vec<Finding> {
    let document: Value = match serde_yaml::from_str(text) {
        Ok(document) => document,
        Err(err) => {
            return vec![Finding::new(
                path,
                Severity::Critical,
                format!("YAML parse error: {}", err),
            )];
        }
    };

    let mut findings = check_document(path, &document, registry);
    findings.extend(find_quoted_latex(text).into_iter().map(|hit| {
        Finding::new(
            path,
            Severity::High,
            format!(
                "line {}: {} inside a double-quoted string, YAML reads backslashes there as escapes",
                hit.line, hit.command
            ),
        )
        .with_suggestion("use a single-quoted string or a `|` block scalar")
    }));
    findings
}

/// Reads and checks files in order with one shared [`IdRegistry`].
pub fn validate_corpus(files: &[PathBuf]) -> LintReport {
    let mut registry = IdRegistry::new();
    let mut report = LintReport::default();
    for file in files {
        log::debug!("Checking {}", file.display());
        report.files_checked += 1;
        match std::fs::read_to_string(file) {
            Ok(text) => report
                .findings
                .extend(validate_source(file, &text, &mut registry)),
            Err(err) => report.findings.push(Finding::new(
                file,
                Severity::Critical,
                format!("cannot read file: {}", err),
            )),
        }
    }
    log::debug!(
        "Checked {} file(s), {} distinct id(s)",
        report.files_checked,
        registry.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(text: &str) -> Vec<Finding> {
        validate_source(Path::new("atom.yaml"), text, &mut IdRegistry::new())
    }

    #[test]
    fn syntax_error_is_a_single_finding() {
        let findings = validate("id: a\ntitle: \"unterminated\ntype: [lesson\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].message.starts_with("YAML parse error"));
    }

    #[test]
    fn quoted_latex_reports_line() {
        let findings = validate(
            "id: a\ntype: exercise\ntitle: A\nstatement: \"Calculer $\\\\frac{1}{2}$\"\nsolution: '$\\frac{1}{2}$'\n",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert!(findings[0].message.starts_with("line 4: \\frac"));
        assert!(findings[0].suggestion.is_some());
    }

    #[test]
    fn corpus_threads_registry_and_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.yaml");
        let second = dir.path().join("b.yaml");
        let atom = "id: dup\ntype: lesson\ntitle: T\ncontent: c\n";
        std::fs::write(&first, atom).unwrap();
        std::fs::write(&second, atom).unwrap();
        let missing = dir.path().join("missing.yaml");

        let report = validate_corpus(&[first.clone(), second.clone(), missing.clone()]);
        assert_eq!(report.files_checked, 3);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].file, second);
        assert!(report.findings[0].message.contains(&first.display().to_string()));
        assert_eq!(report.findings[1].file, missing);
        assert!(report.has_critical());
    }
}
