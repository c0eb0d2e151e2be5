use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Attach a file path to this location.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors raised while reading authored content.
#[derive(Debug, Error)]
pub enum CoursError {
    /// IO error while reading a source document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    MarkdownAdapter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Atom declared a type outside lesson/exercise/qcm.
    #[error("Unknown atom type: {0}")]
    UnknownAtomKind(String),
}

impl CoursError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::MarkdownAdapter {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Shift the reported line by `offset`, used when a markdown segment was
    /// parsed out of a larger document.
    pub fn offset_lines(self, offset: usize) -> Self {
        match self {
            Self::MarkdownAdapter {
                message,
                mut location,
            } => {
                location.line += offset;
                Self::MarkdownAdapter { message, location }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display_with_and_without_file() {
        assert_eq!(SourceLocation::new(3, 7).to_string(), "3:7");
        assert_eq!(
            SourceLocation::new(3, 7).in_file("lesson.yaml").to_string(),
            "lesson.yaml:3:7"
        );
    }

    #[test]
    fn offset_moves_markdown_errors_only() {
        let err = CoursError::parse_error("bad", 2, 1).offset_lines(10);
        assert_eq!(err.to_string(), "Parse error at 12:1: bad");

        let other = CoursError::UnknownAtomKind("quiz".into()).offset_lines(10);
        assert_eq!(other.to_string(), "Unknown atom type: quiz");
    }
}
