//! Custom-tag closure heuristic.
//!
//! Three independent regex counts per tag name. This is a lint, not a
//! parser: nesting, `>` inside attribute values and tags inside comments are
//! not understood, so counts can be off on adversarial input.

use crate::finding::Severity;
use once_cell::sync::Lazy;
use regex::Regex;

/// Tags whose closure is checked.
pub const CHECKED_TAGS: [&str; 4] = ["math", "math-block", "graph", "variations"];

struct TagPatterns {
    name: &'static str,
    open: Regex,
    close: Regex,
    self_closing: Regex,
}

static PATTERNS: Lazy<Vec<TagPatterns>> = Lazy::new(|| {
    CHECKED_TAGS
        .into_iter()
        .map(|name| {
            let escaped = regex::escape(name);
            TagPatterns {
                name,
                open: Regex::new(&format!(r"<{}(\s[^>]*)?>", escaped)).expect("valid tag regex"),
                close: Regex::new(&format!(r"</{}\s*>", escaped)).expect("valid tag regex"),
                self_closing: Regex::new(&format!(r"<{}(\s[^>]*)?/>", escaped)).expect("valid tag regex"),
            }
        })
        .collect()
});

/// Occurrence counts of one tag in one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagCounts {
    /// `<tag ...>`, self-closing forms included.
    pub opens: usize,
    /// `</tag>`.
    pub closes: usize,
    /// `<tag .../>`.
    pub self_closing: usize,
}

/// Counts occurrences of `tag` in `text`. Unknown tags count as zero.
pub fn count_tag(text: &str, tag: &str) -> TagCounts {
    PATTERNS
        .iter()
        .find(|patterns| patterns.name == tag)
        .map(|patterns| TagCounts {
            opens: patterns.open.find_iter(text).count(),
            closes: patterns.close.find_iter(text).count(),
            self_closing: patterns.self_closing.find_iter(text).count(),
        })
        .unwrap_or_default()
}

/// A closure problem in one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagProblem {
    /// Severity.
    pub severity: Severity,
    /// Message, naming the field and tag.
    pub message: String,
    /// Suggested fix.
    pub suggestion: Option<String>,
}

/// Checks every tag in one rich-text field. At most one self-closing and one
/// unclosed problem per tag.
pub fn check_field(field: &str, text: &str) -> Vec<TagProblem> {
    let mut problems = Vec::new();
    for tag in CHECKED_TAGS {
        let counts = count_tag(text, tag);
        if counts.self_closing > 0 {
            problems.push(TagProblem {
                severity: Severity::Critical,
                message: format!(
                    "`{}`: {} self-closing <{}/> tag(s); the renderer cannot recover from them",
                    field, counts.self_closing, tag
                ),
                suggestion: Some(format!("<{0} ...></{0}>", tag)),
            });
        }
        if counts.opens > counts.closes {
            problems.push(TagProblem {
                severity: Severity::Critical,
                message: format!(
                    "`{}`: <{}> opened {} time(s) but closed {} time(s)",
                    field, tag, counts.opens, counts.closes
                ),
                suggestion: None,
            });
        }
    }
    problems
}
