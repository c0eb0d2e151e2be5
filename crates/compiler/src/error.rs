//! Compile errors.

use crate::transform::diagrams::DiagramError;
use coursmd_core::CoursError;
use thiserror::Error;

/// Errors that fail the compilation of a whole document.
///
/// Unknown directives and bad math never end up here: the first pass
/// through, the second degrades to inline code.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Markdown could not be parsed.
    #[error(transparent)]
    Parse(#[from] CoursError),
    /// A diagram fence failed to compile.
    #[error("diagram #{index} failed: {source}")]
    Diagram {
        /// Zero-based position of the fence in the document.
        index: usize,
        /// Compiler failure.
        source: DiagramError,
    },
    /// The HTML rewriter rejected the output.
    #[error("sanitize failed: {0}")]
    Sanitize(String),
}
