//! Authored `<math>` and `<math-block>` bodies.
//!
//! Their content is TeX, but inside a paragraph markdown would read `*` and
//! `_` as emphasis. Bodies are swapped for HTML comment placeholders before
//! parsing and written back, entity-escaped, after sanitizing.

use crate::transform::diagrams::{Placeholder, source_nonce};
use coursmd_core::{FenceState, advance_fence_state};

const MARKER_PREFIX: &str = "<!--coursmd-tex-";

/// Source with math tag bodies replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shielded {
    /// Source text handed to the markdown parser.
    pub source: String,
    /// One entry per shielded body, in document order.
    pub placeholders: Vec<Placeholder>,
}

impl Shielded {
    /// Source passed through untouched.
    pub fn unchanged(source: &str) -> Self {
        Self {
            source: source.to_string(),
            placeholders: Vec::new(),
        }
    }
}

/// Replaces the body of every bare `<math>` and every `<math-block>` outside
/// fenced code and inline code spans. `<math>` with attributes is already
/// MathML and is left alone.
pub fn shield(source: &str) -> Shielded {
    let fenced = fenced_ranges(source);
    let in_code = |at: usize| fenced.iter().any(|(start, end)| (*start..*end).contains(&at));
    let nonce = source_nonce(source);

    let mut out = String::with_capacity(source.len());
    let mut placeholders = Vec::new();
    let mut copied = 0;
    let mut search = 0;

    while let Some(offset) = source[search..].find("<math") {
        let at = search + offset;
        let Some((body_start, close_tag)) = opening_at(source, at) else {
            search = at + "<math".len();
            continue;
        };
        search = body_start;
        if in_code(at) || in_code_span(source, at) {
            continue;
        }
        let Some(close_offset) = source[body_start..].find(close_tag) else {
            continue;
        };
        let body_end = body_start + close_offset;
        search = body_end + close_tag.len();
        if in_code(body_end) {
            continue;
        }

        let body = &source[body_start..body_end];
        let tex = body.trim_matches('\n');
        if tex.trim().is_empty() {
            continue;
        }

        let marker = format!("{}{:016x}-{}-->", MARKER_PREFIX, nonce, placeholders.len());
        out.push_str(&source[copied..body_start]);
        if body.starts_with('\n') {
            out.push('\n');
        }
        out.push_str(&marker);
        if body.ends_with('\n') {
            out.push('\n');
        }
        placeholders.push(Placeholder {
            marker,
            markup: html_escape::encode_text(tex).into_owned(),
        });
        copied = body_end;
    }
    out.push_str(&source[copied..]);

    if !placeholders.is_empty() {
        log::debug!("Shielded {} math tag body(ies)", placeholders.len());
    }
    Shielded {
        source: out,
        placeholders,
    }
}

/// Puts each escaped body back in place of its placeholder.
pub fn restore(html: &str, placeholders: &[Placeholder]) -> String {
    let mut html = html.to_string();
    for placeholder in placeholders {
        if !html.contains(&placeholder.marker) {
            log::warn!("Math placeholder missing from output: {}", placeholder.marker);
            continue;
        }
        html = html.replace(&placeholder.marker, &placeholder.markup);
    }
    html
}

/// Body start and closing tag for a math tag opening at `at`.
fn opening_at(source: &str, at: usize) -> Option<(usize, &'static str)> {
    let rest = &source[at..];
    if rest.starts_with("<math>") {
        return Some((at + "<math>".len(), "</math>"));
    }
    let after = rest.strip_prefix("<math-block")?;
    match after.chars().next()? {
        '>' => Some((at + "<math-block>".len(), "</math-block>")),
        c if c.is_whitespace() => {
            let end = after.find('>')?;
            if after[..end].ends_with('/') {
                return None;
            }
            Some((at + "<math-block".len() + end + 1, "</math-block>"))
        }
        _ => None,
    }
}

/// Byte ranges of fenced code lines, delimiters included.
fn fenced_ranges(source: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut state = FenceState::default();
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let outcome = advance_fence_state(line.trim_end_matches(['\n', '\r']), state);
        state = outcome.next_state;
        if outcome.in_fence {
            ranges.push((offset, offset + line.len()));
        }
        offset += line.len();
    }
    ranges
}

/// An odd number of backticks before `at` on its line.
fn in_code_span(source: &str, at: usize) -> bool {
    let line_start = source[..at].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..at].matches('`').count() % 2 == 1
}
