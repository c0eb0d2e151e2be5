//! Linter configuration.

use crate::finding::Severity;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a lint run before any file is checked.
#[derive(Debug, Error)]
pub enum LintError {
    /// A configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A configuration file is not valid YAML for [`LintConfig`].
    #[error("invalid configuration in {path}: {source}")]
    Yaml {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },
    /// Walking the corpus root failed.
    #[error("cannot walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Linter settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LintConfig {
    /// Corpus root searched for files and fuzzy ids.
    pub root: PathBuf,
    /// File extensions linted, without the dot.
    pub extensions: Vec<String>,
    /// Least severe finding printed in the report.
    pub min_severity: Severity,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            extensions: vec!["yaml".to_string(), "yml".to_string()],
            min_severity: Severity::Low,
        }
    }
}

impl LintConfig {
    /// Reads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, LintError> {
        let text = std::fs::read_to_string(path).map_err(|source| LintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| LintError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration text. Empty text gives the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// True when `path` has one of the configured extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}
