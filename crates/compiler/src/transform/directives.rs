//! Directive expansion.
//!
//! Replaces directive nodes with open/close HTML fragments around their
//! children. The sibling list is rebuilt rather than spliced in place: every
//! original node is visited once, and fragments emitted here are never
//! scanned again.

use crate::renderer::{RenderOptions, render_inline};
use crate::styles::{Collapsible, DirectiveKind, LessonPart};
use crate::tree::{Block, ContainerDirective};
use coursmd_core::{Attributes, LeafDirective, MathRenderer, ParseOptions};
use std::fmt::Write as _;

/// Expands directives using the built-in style tables.
pub struct Expander<'a> {
    parse: &'a ParseOptions,
    render: &'a RenderOptions,
    math: &'a dyn MathRenderer,
    expanded: usize,
}

impl<'a> Expander<'a> {
    /// Creates an expander; labels are rendered as inline markdown with the
    /// given options.
    pub fn new(parse: &'a ParseOptions, render: &'a RenderOptions, math: &'a dyn MathRenderer) -> Self {
        Self {
            parse,
            render,
            math,
            expanded: 0,
        }
    }

    /// Number of directives replaced so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Expands every directive at every depth.
    pub fn expand(&mut self, blocks: Vec<Block>) -> Vec<Block> {
        let mut out = Vec::with_capacity(blocks.len());
        for block in blocks {
            self.expand_into(block, &mut out);
        }
        out
    }

    fn expand_into(&mut self, block: Block, out: &mut Vec<Block>) {
        match block {
            Block::Container(container) => self.expand_container(container, out),
            Block::Leaf(leaf) => self.expand_leaf(leaf, out),
            Block::Markdown(_) | Block::Html(_) => out.push(block),
        }
    }

    fn expand_container(&mut self, container: ContainerDirective, out: &mut Vec<Block>) {
        match DirectiveKind::from_name(&container.name) {
            DirectiveKind::LessonPart(part) => {
                let title = self.title(container.label.as_deref(), part.style().title);
                self.expanded += 1;
                out.push(Block::Html(lesson_part_open(part, &title)));
                out.extend(self.expand(container.children));
                out.push(Block::Html(LESSON_PART_CLOSE.to_string()));
            }
            DirectiveKind::Statement => {
                self.expanded += 1;
                out.push(Block::Html(STATEMENT_OPEN.to_string()));
                out.extend(self.expand(container.children));
                out.push(Block::Html(STATEMENT_CLOSE.to_string()));
            }
            DirectiveKind::Collapsible(kind) => {
                let title = self.title(container.label.as_deref(), kind.style().title);
                let collapsed = collapsed(kind, &container.attributes);
                self.expanded += 1;
                out.push(Block::Html(collapsible_open(kind, &title, collapsed)));
                out.extend(self.expand(container.children));
                out.push(Block::Html(COLLAPSIBLE_CLOSE.to_string()));
            }
            DirectiveKind::QcmPart(_) => {
                self.expanded += 1;
                out.extend(self.expand(container.children));
            }
            DirectiveKind::Youtube | DirectiveKind::Unknown => {
                let ContainerDirective {
                    name,
                    label,
                    attributes,
                    children,
                } = container;
                out.push(Block::Container(ContainerDirective {
                    name,
                    label,
                    attributes,
                    children: self.expand(children),
                }));
            }
        }
    }

    fn expand_leaf(&mut self, leaf: LeafDirective, out: &mut Vec<Block>) {
        match DirectiveKind::from_name(&leaf.name) {
            DirectiveKind::Youtube => match youtube_element(&leaf.attributes) {
                Some(element) => {
                    self.expanded += 1;
                    out.push(Block::Html(element));
                }
                None => {
                    log::warn!("::youtube directive without an id attribute left as-is");
                    out.push(Block::Leaf(leaf));
                }
            },
            _ => out.push(Block::Leaf(leaf)),
        }
    }

    /// Label rendered as inline markdown, or the escaped default title.
    fn title(&self, label: Option<&str>, default: &str) -> String {
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => render_inline(label, self.parse, self.render, self.math)
                .unwrap_or_else(|err| {
                    log::warn!("Directive label kept as text: {}", err);
                    html_escape::encode_text(label).into_owned()
                }),
            None => html_escape::encode_text(default).into_owned(),
        }
    }
}

/// Expands `blocks` in one call; returns the new list and the number of
/// directives replaced.
pub fn expand(
    blocks: Vec<Block>,
    parse: &ParseOptions,
    render: &RenderOptions,
    math: &dyn MathRenderer,
) -> (Vec<Block>, usize) {
    let mut expander = Expander::new(parse, render, math);
    let blocks = expander.expand(blocks);
    (blocks, expander.expanded())
}

const LESSON_PART_CLOSE: &str = "</div></div>";
const STATEMENT_OPEN: &str = "<div class=\"exercise-statement my-4\">";
const STATEMENT_CLOSE: &str = "</div>";
const COLLAPSIBLE_CLOSE: &str = "</div></details>";

fn lesson_part_open(part: LessonPart, title_html: &str) -> String {
    let style = part.style();
    let mut html = String::new();
    write!(
        html,
        "<div class=\"lesson-part lesson-part-{name} my-6 rounded-lg p-4 {container}\" data-part=\"{name}\">",
        name = part.name(),
        container = style.container,
    )
    .ok();
    write!(
        html,
        "<div class=\"lesson-part-title mb-2 flex items-center gap-2 font-semibold {heading}\"><span class=\"lesson-part-icon\" aria-hidden=\"true\">{icon}</span><span>{title}</span></div>",
        heading = style.heading,
        icon = style.icon,
        title = title_html,
    )
    .ok();
    html.push_str("<div class=\"lesson-part-body\">");
    html
}

fn collapsible_open(kind: Collapsible, title_html: &str, collapsed: bool) -> String {
    let style = kind.style();
    let open_attr = if collapsed { "" } else { " open" };
    format!(
        "<details class=\"exercise-collapsible exercise-collapsible-{name} my-4 rounded-lg {container}\" data-part=\"{name}\"{open}><summary class=\"flex cursor-pointer items-center gap-2 px-4 py-2 font-semibold {summary}\"><span class=\"collapsible-icon\" aria-hidden=\"true\">{icon}</span><span>{title}</span></summary><div class=\"exercise-collapsible-body px-4 pb-4\">",
        name = kind.name(),
        container = style.container,
        open = open_attr,
        summary = style.summary,
        icon = style.icon,
        title = title_html,
    )
}

/// `{collapsed="false"}` opens a collapsible by default.
fn collapsed(kind: Collapsible, attributes: &Attributes) -> bool {
    match attributes.get("collapsed") {
        Some("false") => false,
        Some("true") | Some("") => true,
        _ => kind.style().collapsed,
    }
}

/// Builds the hydration element for a youtube leaf.
fn youtube_element(attributes: &Attributes) -> Option<String> {
    let id = attributes.get("id").filter(|id| !id.is_empty())?;
    let title = attributes.get("title");

    let payload = serde_json::json!({ "id": id, "title": title });
    let mut html = String::from("<youtube id=\"");
    html.push_str(&html_escape::encode_double_quoted_attribute(id));
    html.push('"');
    if let Some(title) = title {
        html.push_str(" title=\"");
        html.push_str(&html_escape::encode_double_quoted_attribute(title));
        html.push('"');
    }
    html.push_str(" data-props=\"");
    html.push_str(&html_escape::encode_double_quoted_attribute(
        &payload.to_string(),
    ));
    html.push_str("\"></youtube>");
    Some(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render_html;
    use crate::tree::{count_directives, parse_blocks};
    use coursmd_core::MathMlRenderer;

    fn expand_source(source: &str) -> Vec<Block> {
        let parse = ParseOptions::default();
        let render = RenderOptions::default();
        let blocks = parse_blocks(source, &parse).unwrap();
        Expander::new(&parse, &render, &MathMlRenderer).expand(blocks)
    }

    fn compile(source: &str) -> String {
        render_html(&expand_source(source), &RenderOptions::default(), &MathMlRenderer)
    }

    #[test]
    fn lesson_part_with_label() {
        let html = compile(":::definition[Limite]\nUne **limite** est ...\n:::");
        assert!(html.contains("lesson-part-definition"));
        assert!(html.contains("border-indigo-500"));
        assert!(html.contains("<span>Limite</span>"));
        assert!(html.contains("<p>Une <strong>limite</strong> est ...</p>"));
        assert!(html.ends_with(LESSON_PART_CLOSE));
    }

    #[test]
    fn lesson_part_default_title() {
        let html = compile(":::theorem\nEnoncé.\n:::");
        assert!(html.contains("<span>Théorème</span>"));
    }

    #[test]
    fn label_math_is_typeset() {
        let html = compile(":::remark[Cas $n = 0$]\nRien.\n:::");
        assert!(html.contains("<span>Cas <span class=\"math math-inline\"><math"));
    }

    #[test]
    fn open_fragment_layout() {
        insta::assert_snapshot!(
            lesson_part_open(LessonPart::Definition, "Limite"),
            @r#"<div class="lesson-part lesson-part-definition my-6 rounded-lg p-4 border-l-4 border-indigo-500 bg-indigo-50 dark:bg-indigo-950/40" data-part="definition"><div class="lesson-part-title mb-2 flex items-center gap-2 font-semibold text-indigo-700 dark:text-indigo-300"><span class="lesson-part-icon" aria-hidden="true">📘</span><span>Limite</span></div><div class="lesson-part-body">"#
        );
    }

    #[test]
    fn statement_is_plain_wrapper() {
        let html = compile(":::enonce\nCalculer $f'(x)$.\n:::");
        assert!(html.starts_with(STATEMENT_OPEN));
        assert!(!html.contains("lesson-part-icon"));
    }

    #[test]
    fn collapsible_is_details_and_closed_by_default() {
        let html = compile(":::solution\nOn dérive.\n:::");
        assert!(html.starts_with("<details class=\"exercise-collapsible exercise-collapsible-solution"));
        assert!(!html.contains(" open>"));
        assert!(html.contains("<span>Solution</span>"));
        assert!(html.ends_with(COLLAPSIBLE_CLOSE));
    }

    #[test]
    fn collapsible_can_start_open() {
        let html = compile(":::hint[Astuce]{collapsed=\"false\"}\nFactoriser.\n:::");
        assert!(html.contains(" open><summary"));
        assert!(html.contains("<span>Astuce</span>"));
    }

    #[test]
    fn qcm_parts_are_unwrapped() {
        let html = compile(":::question\nCapitale ?\n:::\n:::option\nParis\n:::");
        assert_eq!(html, "<p>Capitale ?</p>\n<p>Paris</p>");
    }

    #[test]
    fn unknown_directive_is_passthrough() {
        let blocks = expand_source(":::unknown\ncontent\n:::");
        assert!(matches!(&blocks[0], Block::Container(c) if c.name == "unknown"));
        assert_eq!(
            render_html(&blocks, &RenderOptions::default(), &MathMlRenderer),
            "<p>content</p>"
        );
    }

    #[test]
    fn known_directive_inside_unknown_is_expanded() {
        let html = compile(":::unknown\n:::example\nDedans\n:::\n:::");
        assert!(html.contains("lesson-part-example"));
    }

    #[test]
    fn nested_directives_expand_fully() {
        let blocks = expand_source(":::example\n:::remark\nDedans\n:::\n:::");
        assert_eq!(count_directives(&blocks), 0);
        let html = render_html(&blocks, &RenderOptions::default(), &MathMlRenderer);
        assert!(html.contains("lesson-part-example"));
        assert!(html.contains("lesson-part-remark"));
    }

    #[test]
    fn expansion_is_idempotent() {
        let parse = ParseOptions::default();
        let render = RenderOptions::default();
        let source = ":::definition[A]\nx\n:::\n:::solution\ny\n:::\n:::unknown\nz\n:::\n::youtube{id=\"v\"}";
        let blocks = parse_blocks(source, &parse).unwrap();
        let mut expander = Expander::new(&parse, &render, &MathMlRenderer);
        let once = expander.expand(blocks);
        assert_eq!(expander.expanded(), 3);

        let mut again = Expander::new(&parse, &render, &MathMlRenderer);
        let twice = again.expand(once.clone());
        assert_eq!(once, twice);
        assert_eq!(again.expanded(), 0);
    }

    #[test]
    fn youtube_leaf_becomes_hydration_element() {
        let html = compile("::youtube{id=\"abc123\" title=\"Intro\"}");
        assert!(html.starts_with("<youtube id=\"abc123\" title=\"Intro\" data-props=\""));
        assert!(html.contains("&quot;id&quot;:&quot;abc123&quot;"));
        assert!(html.ends_with("></youtube>"));
    }

    #[test]
    fn youtube_without_id_is_kept() {
        let blocks = expand_source("::youtube{title=\"x\"}");
        assert!(matches!(&blocks[0], Block::Leaf(_)));
    }
}
