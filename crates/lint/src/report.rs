//! Findings of a whole run and their text rendering.

use crate::finding::{Finding, Severity};
use std::fmt::Write;

/// Result of one lint run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    /// Findings in discovery order.
    pub findings: Vec<Finding>,
    /// Files read, including unreadable ones.
    pub files_checked: usize,
}

impl LintReport {
    /// True when any finding is critical. Ignores the display filter.
    pub fn has_critical(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.severity == Severity::Critical)
    }

    /// Number of findings with exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }

    /// Human-readable report: findings at or above `min_severity`, grouped
    /// most severe first, then a summary line counting every finding.
    pub fn render(&self, min_severity: Severity) -> String {
        let mut out = String::new();
        for severity in Severity::DESCENDING {
            if severity < min_severity {
                continue;
            }
            let group: Vec<&Finding> = self
                .findings
                .iter()
                .filter(|finding| finding.severity == severity)
                .collect();
            if group.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{} ({})", severity.as_str().to_uppercase(), group.len());
            for finding in group {
                let _ = writeln!(out, "  {}: {}", finding.file.display(), finding.message);
                if let Some(suggestion) = &finding.suggestion {
                    let _ = writeln!(out, "    suggestion: {}", suggestion);
                }
            }
            out.push('\n');
        }
        let _ = write!(
            out,
            "{} file(s) checked: {} critical, {} high, {} medium, {} low",
            self.files_checked,
            self.count(Severity::Critical),
            self.count(Severity::High),
            self.count(Severity::Medium),
            self.count(Severity::Low),
        );
        out
    }
}
