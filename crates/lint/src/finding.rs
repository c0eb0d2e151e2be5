//! Findings and severities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// How bad a finding is. Ordered from `Low` to `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style nit.
    Low,
    /// Cosmetic or duplicated effort (e.g. `A) ` option prefixes).
    Medium,
    /// The renderer degrades gracefully.
    High,
    /// The renderer cannot work with the content. Fails the run.
    Critical,
}

impl Severity {
    /// Most severe first, the report order.
    pub const DESCENDING: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown severity name.
#[derive(Debug, Error)]
#[error("unknown severity `{0}` (expected critical, high, medium or low)")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Severity::DESCENDING
            .into_iter()
            .find(|severity| severity.as_str() == lower)
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

/// One problem found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// File the finding is about.
    pub file: PathBuf,
    /// Severity.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Literal fix, when one is obvious.
    pub suggestion: Option<String>,
}

impl Finding {
    /// Finding without a suggestion.
    pub fn new(file: &Path, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: file.to_path_buf(),
            severity,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attaches a suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert!("urgent".parse::<Severity>().is_err());
    }
}
