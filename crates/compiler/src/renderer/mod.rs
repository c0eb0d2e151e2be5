//! Block tree to HTML stringification.
//!
//! Math is typeset during this pass. Fragments produced by directive
//! expansion are written verbatim.

mod context;
pub mod render;

pub(crate) use context::DIAGRAM_MARKER_PREFIX;
pub use context::{Context, LinkDefinition, Scope};

use crate::tree::Block;
use coursmd_core::{CoursError, MathRenderer, ParseOptions, parse_mdast};
use markdown::mdast::Node;
use render::{collect_definitions, render_blocks, render_node};
use serde::{Deserialize, Serialize};

/// Stringification options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Write raw HTML nodes verbatim (escaped otherwise).
    pub allow_raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            allow_raw_html: true,
        }
    }
}

/// Renders a block tree to an HTML string.
pub fn render_html(blocks: &[Block], options: &RenderOptions, math: &dyn MathRenderer) -> String {
    let mut ctx = Context::new(options, math);
    collect_definitions(blocks, &mut ctx);
    render_blocks(blocks, &mut ctx);
    ctx.finish()
}

/// Renders a short inline markdown string (a directive label) without the
/// surrounding paragraph.
pub fn render_inline(
    text: &str,
    parse: &ParseOptions,
    options: &RenderOptions,
    math: &dyn MathRenderer,
) -> Result<String, CoursError> {
    let root = parse_mdast(text, parse)?;
    let mut ctx = Context::new(options, math);
    match root.children().map(|c| c.as_slice()) {
        Some([Node::Paragraph(para)]) => {
            for child in &para.children {
                render_node(child, &mut ctx);
            }
        }
        _ => render_node(&root, &mut ctx),
    }
    Ok(ctx.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_blocks;
    use coursmd_core::MathMlRenderer;

    fn html(source: &str) -> String {
        let blocks = parse_blocks(source, &ParseOptions::default()).unwrap();
        render_html(&blocks, &RenderOptions::default(), &MathMlRenderer)
    }

    #[test]
    fn paragraph_and_emphasis() {
        assert_eq!(
            html("Une **limite** et *plus*."),
            "<p>Une <strong>limite</strong> et <em>plus</em>.</p>"
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(html("a & b"), "<p>a &amp; b</p>");
    }

    #[test]
    fn tight_list_drops_paragraphs() {
        assert_eq!(html("- un\n- deux"), "<ul><li>un</li><li>deux</li></ul>");
    }

    #[test]
    fn ordered_list_start() {
        assert_eq!(html("3. trois\n4. quatre"), "<ol start=\"3\"><li>trois</li><li>quatre</li></ol>");
    }

    #[test]
    fn code_block_is_escaped_with_language() {
        assert_eq!(
            html("```python\nif a < b:\n    pass\n```"),
            "<pre><code class=\"language-python\">if a &lt; b:\n    pass</code></pre>"
        );
    }

    #[test]
    fn inline_math_is_typeset() {
        let out = html("Soit $x^2$.");
        assert!(out.contains("<span class=\"math math-inline\"><math"));
        assert!(!out.contains('$'));
    }

    #[test]
    fn reference_links_resolve() {
        let out = html("Voir [le cours][c].\n\n[c]: https://example.com \"Cours\"");
        assert!(out.contains("<a href=\"https://example.com\" title=\"Cours\">le cours</a>"));
    }

    #[test]
    fn raw_html_passes_or_escapes() {
        let source = "<graph function=\"x^2\" range=\"[-3,3]\"></graph>";
        assert!(html(source).contains(source));

        let blocks = parse_blocks(source, &ParseOptions::default()).unwrap();
        let escaped = render_html(
            &blocks,
            &RenderOptions {
                allow_raw_html: false,
            },
            &MathMlRenderer,
        );
        assert!(escaped.contains("&lt;graph"));
    }

    #[test]
    fn table_with_alignment() {
        let out = html("| x | f(x) |\n| :-: | --: |\n| 1 | 2 |");
        assert!(out.starts_with("<table><thead><tr><th align=\"center\">x</th>"));
        assert!(out.contains("<tbody><tr><td align=\"center\">1</td><td align=\"right\">2</td></tr></tbody>"));
    }

    #[test]
    fn footnotes_are_appended() {
        let out = html("Texte[^1].\n\n[^1]: Une note.");
        assert!(out.contains("<sup><a href=\"#fn-1\" id=\"fnref-1\" class=\"footnote-ref\">1</a></sup>"));
        assert!(out.ends_with("</ol></section>"));
    }

    #[test]
    fn inline_label_has_no_paragraph() {
        let out = render_inline(
            "Limite en *zéro*",
            &ParseOptions::default(),
            &RenderOptions::default(),
            &MathMlRenderer,
        )
        .unwrap();
        assert_eq!(out, "Limite en <em>zéro</em>");
    }
}
