#![deny(missing_docs)]
//! coursmd lint: checks a YAML content corpus before it reaches the
//! compiler.
//!
//! Schema checks, QCM shape, custom-tag closure, LaTeX in double-quoted
//! strings and corpus-wide id uniqueness.

/// Configuration and run errors.
pub mod config;
/// Target resolution.
pub mod discover;
/// Findings and severities.
pub mod finding;
/// Checks over the raw text.
pub mod raw;
/// Id uniqueness.
pub mod registry;
/// Run report.
pub mod report;
/// Structural checks.
pub mod schema;
/// Tag-closure heuristic.
pub mod tags;
/// File and corpus entry points.
pub mod validate;

pub use config::{LintConfig, LintError};
pub use discover::discover;
pub use finding::{Finding, ParseSeverityError, Severity};
pub use registry::IdRegistry;
pub use report::LintReport;
pub use validate::{validate_corpus, validate_source};
