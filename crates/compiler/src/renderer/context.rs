//! Rendering context for the HTML stringifier.

use super::RenderOptions;
use coursmd_core::{MathRenderer, MathSpan, render_math};
use std::collections::HashMap;

/// Prefix shared by every diagram placeholder comment.
pub(crate) const DIAGRAM_MARKER_PREFIX: &str = "<!--coursmd-diagram-";

/// Nesting scope tracked during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Document root.
    Root,
    /// Inside a list; `spread` lists keep `<p>` wrappers.
    List {
        /// Whether the list is loose.
        spread: bool,
    },
    /// Inside a table.
    Table,
}

/// Resolved `[label]: url "title"` definition.
#[derive(Debug, Clone)]
pub struct LinkDefinition {
    /// Destination.
    pub url: String,
    /// Optional title.
    pub title: Option<String>,
}

/// Output buffer plus traversal state.
pub struct Context<'a> {
    html: String,
    stack: Vec<Scope>,
    options: &'a RenderOptions,
    math: &'a dyn MathRenderer,
    definitions: HashMap<String, LinkDefinition>,
    footnotes: Vec<(String, String)>,
    footnote_order: Vec<String>,
}

impl<'a> Context<'a> {
    /// Creates an empty context.
    pub fn new(options: &'a RenderOptions, math: &'a dyn MathRenderer) -> Self {
        Self {
            html: String::with_capacity(4096),
            stack: vec![Scope::Root],
            options,
            math,
            definitions: HashMap::new(),
            footnotes: Vec::new(),
            footnote_order: Vec::new(),
        }
    }

    /// Writes markup without escaping.
    pub fn push_raw(&mut self, s: &str) {
        self.html.push_str(s);
    }

    /// Writes text content with HTML escaping.
    pub fn push_text(&mut self, s: &str) {
        self.html.push_str(&html_escape::encode_text(s));
    }

    /// Writes an attribute value (without the surrounding quotes).
    pub fn push_attr_value(&mut self, s: &str) {
        self.html
            .push_str(&html_escape::encode_double_quoted_attribute(s));
    }

    /// Typesets a math span in place.
    pub fn push_math(&mut self, span: &MathSpan) {
        let markup = render_math(self.math, span);
        self.html.push_str(&markup);
    }

    /// Writes a raw HTML node, escaping it when raw HTML is disabled.
    /// Diagram placeholders always pass so they can be restored later.
    pub fn push_html_node(&mut self, value: &str) {
        if self.options.allow_raw_html || value.starts_with(DIAGRAM_MARKER_PREFIX) {
            self.push_raw(value);
        } else {
            log::debug!("Raw HTML escaped: {}", value);
            self.push_text(value);
        }
    }

    /// Ensures the buffer ends with a newline, separating block output.
    pub fn end_block(&mut self) {
        if !self.html.is_empty() && !self.html.ends_with('\n') {
            self.html.push('\n');
        }
    }

    /// Enters a scope.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Leaves the current scope.
    pub fn exit(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// True when the innermost list is tight (paragraph wrappers dropped).
    pub fn is_in_tight_list(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| match scope {
                Scope::List { spread } => Some(!spread),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Registers a link reference definition.
    pub fn add_definition(&mut self, identifier: &str, definition: LinkDefinition) {
        self.definitions
            .entry(identifier.to_lowercase())
            .or_insert(definition);
    }

    /// Looks up a link reference definition.
    pub fn definition(&self, identifier: &str) -> Option<LinkDefinition> {
        self.definitions.get(&identifier.to_lowercase()).cloned()
    }

    /// Returns the 1-based footnote number, assigning one on first use.
    pub fn footnote_ordinal(&mut self, identifier: &str) -> usize {
        if let Some(pos) = self.footnote_order.iter().position(|id| id == identifier) {
            return pos + 1;
        }
        self.footnote_order.push(identifier.to_string());
        self.footnote_order.len()
    }

    /// Stores a rendered footnote body.
    pub fn push_footnote(&mut self, identifier: String, body: String) {
        self.footnotes.push((identifier, body));
    }

    /// Renders into a scratch buffer and returns the produced markup.
    pub fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let saved = std::mem::take(&mut self.html);
        f(self);
        std::mem::replace(&mut self.html, saved)
    }

    /// Finishes rendering, appending the footnote section if any.
    pub fn finish(mut self) -> String {
        if !self.footnotes.is_empty() {
            let mut ordered: Vec<(usize, String, String)> = std::mem::take(&mut self.footnotes)
                .into_iter()
                .map(|(id, body)| {
                    let ordinal = self.footnote_ordinal(&id);
                    (ordinal, id, body)
                })
                .collect();
            ordered.sort_by_key(|(ordinal, _, _)| *ordinal);

            self.end_block();
            self.push_raw("<section class=\"footnotes\"><ol>");
            for (_, id, body) in ordered {
                let safe_id = html_escape::encode_double_quoted_attribute(&id).into_owned();
                self.push_raw(&format!(
                    "<li id=\"fn-{0}\">{1}<a href=\"#fnref-{0}\" class=\"footnote-backref\">↩</a></li>",
                    safe_id, body
                ));
            }
            self.push_raw("</ol></section>");
        }
        let trimmed_len = self.html.trim_end().len();
        self.html.truncate(trimmed_len);
        self.html
    }
}
