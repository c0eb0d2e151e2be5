//! Document tree: markdown blocks interleaved with directive nodes.
//!
//! markdown-rs has no directive construct, so directive lines are split out
//! with a fence-aware line scan first and only the text between them goes
//! through the markdown parser. The result is a tree whose leaves are
//! ordinary mdast block nodes.

use coursmd_core::{
    Attributes, CoursError, DirectiveLine, DirectiveOpening, FenceState, LeafDirective,
    ParseOptions, advance_fence_state, parse_directive_line, parse_mdast,
};
use markdown::mdast::Node;

/// A block-level node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Ordinary markdown block (paragraph, list, code, math, raw HTML...).
    Markdown(Node),
    /// `:::name[label]{attrs}` ... `:::`
    Container(ContainerDirective),
    /// `::name{attrs}`
    Leaf(LeafDirective),
    /// Literal HTML produced by directive expansion.
    Html(String),
}

/// A container directive with its parsed children.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDirective {
    /// Lowercased directive name.
    pub name: String,
    /// Label text from `[...]`, used as display title.
    pub label: Option<String>,
    /// Attributes from `{...}`.
    pub attributes: Attributes,
    /// Nested content.
    pub children: Vec<Block>,
}

struct Frame {
    opening: Option<DirectiveOpening>,
    children: Vec<Block>,
    pending: String,
    pending_start: usize,
}

impl Frame {
    fn new(opening: Option<DirectiveOpening>, line: usize) -> Self {
        Self {
            opening,
            children: Vec::new(),
            pending: String::new(),
            pending_start: line,
        }
    }

    fn push_line(&mut self, line: &str, index: usize) {
        if self.pending.is_empty() {
            self.pending_start = index;
        }
        self.pending.push_str(line);
        self.pending.push('\n');
    }

    /// Parses buffered markdown text into blocks.
    fn flush(&mut self, segments: &Segments<'_>) -> Result<(), CoursError> {
        if self.pending.trim().is_empty() {
            self.pending.clear();
            return Ok(());
        }
        let nodes = segments.parse(&self.pending, self.pending_start)?;
        self.children.extend(nodes.into_iter().map(Block::Markdown));
        self.pending.clear();
        Ok(())
    }

    fn into_container(self) -> Option<ContainerDirective> {
        let opening = self.opening?;
        Some(ContainerDirective {
            name: opening.name,
            label: opening.label,
            attributes: opening.attributes,
            children: self.children,
        })
    }
}

/// Markdown parsing of the text between directive lines.
///
/// Each segment is parsed on its own, so every single-line link definition
/// of the document is appended to each segment; references then resolve
/// across directive boundaries. The appended definitions are dropped from
/// the result.
struct Segments<'a> {
    options: &'a ParseOptions,
    definitions: String,
}

impl<'a> Segments<'a> {
    fn new(source: &str, options: &'a ParseOptions) -> Self {
        Self {
            options,
            definitions: definition_lines(source),
        }
    }

    fn parse(&self, text: &str, first_line: usize) -> Result<Vec<Node>, CoursError> {
        if !self.definitions.is_empty() {
            let own_lines = text.lines().count();
            let joined = format!("{}\n{}", text, self.definitions);
            let nodes = root_children(
                parse_mdast(&joined, self.options).map_err(|err| err.offset_lines(first_line))?,
            );
            let (own, appended): (Vec<Node>, Vec<Node>) = nodes
                .into_iter()
                .partition(|node| line_of(node, |p| p.start.line) <= own_lines);
            let clean = own
                .iter()
                .all(|node| line_of(node, |p| p.end.line) <= own_lines)
                && appended.iter().all(|node| {
                    matches!(node, Node::Definition(_) | Node::FootnoteDefinition(_))
                });
            if clean {
                return Ok(own);
            }
            log::debug!("Segment at line {} swallowed shared definitions, reparsing", first_line);
        }
        Ok(root_children(
            parse_mdast(text, self.options).map_err(|err| err.offset_lines(first_line))?,
        ))
    }
}

fn root_children(root: Node) -> Vec<Node> {
    match root {
        Node::Root(root) => root.children,
        _ => Vec::new(),
    }
}

fn line_of(node: &Node, pick: impl Fn(&markdown::unist::Position) -> usize) -> usize {
    node.position().map_or(0, pick)
}

/// Link and footnote definitions written on one line outside fenced code.
fn definition_lines(source: &str) -> String {
    let mut state = FenceState::default();
    let mut definitions = String::new();
    for line in source.lines() {
        let outcome = advance_fence_state(line, state);
        state = outcome.next_state;
        if !outcome.in_fence && is_definition_line(line) {
            definitions.push_str(line.trim_start());
            definitions.push('\n');
        }
    }
    definitions
}

fn is_definition_line(line: &str) -> bool {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return false;
    }
    let Some(rest) = line[indent..].strip_prefix('[') else {
        return false;
    };
    let Some(close) = rest.find("]:") else {
        return false;
    };
    let label = &rest[..close];
    !label.trim().is_empty() && !label.contains('[') && !rest[close + 2..].trim().is_empty()
}

/// Parses authored text into a block tree.
///
/// Directive markers inside fenced code are content. A closer with no open
/// container is kept as text, and containers left open at the end of input
/// are closed there.
///
/// Directive lines always split the surrounding markdown: a directive
/// indented under a list item closes the list, and items after the
/// directive start a new list.
pub fn parse_blocks(source: &str, options: &ParseOptions) -> Result<Vec<Block>, CoursError> {
    let segments = Segments::new(source, options);
    let mut fence_state = FenceState::default();
    let mut stack = vec![Frame::new(None, 0)];

    for (index, line) in source.lines().enumerate() {
        let outcome = advance_fence_state(line, fence_state);
        fence_state = outcome.next_state;

        let directive = if outcome.in_fence {
            None
        } else {
            parse_directive_line(line)
        };

        match directive {
            Some(DirectiveLine::Open(opening)) => {
                current(&mut stack).flush(&segments)?;
                stack.push(Frame::new(Some(opening), index + 1));
            }
            Some(DirectiveLine::Close) if stack.len() > 1 => {
                close_top(&mut stack, &segments)?;
            }
            Some(DirectiveLine::Leaf(leaf)) => {
                let frame = current(&mut stack);
                frame.flush(&segments)?;
                frame.children.push(Block::Leaf(leaf));
            }
            _ => current(&mut stack).push_line(line, index),
        }
    }

    while stack.len() > 1 {
        if let Some(Frame {
            opening: Some(opening),
            ..
        }) = stack.last()
        {
            log::debug!("Closing unterminated directive :::{}", opening.name);
        }
        close_top(&mut stack, &segments)?;
    }

    let mut root = stack.pop().unwrap_or_else(|| Frame::new(None, 0));
    root.flush(&segments)?;
    Ok(root.children)
}

fn current(stack: &mut [Frame]) -> &mut Frame {
    let last = stack.len() - 1;
    &mut stack[last]
}

fn close_top(stack: &mut Vec<Frame>, segments: &Segments<'_>) -> Result<(), CoursError> {
    let Some(mut frame) = stack.pop() else {
        return Ok(());
    };
    frame.flush(segments)?;
    if let Some(container) = frame.into_container() {
        current(stack).children.push(Block::Container(container));
    }
    Ok(())
}

/// Counts container and leaf directives at every depth.
pub fn count_directives(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .map(|block| match block {
            Block::Container(container) => 1 + count_directives(&container.children),
            Block::Leaf(_) => 1,
            Block::Markdown(_) | Block::Html(_) => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<Block> {
        parse_blocks(source, &ParseOptions::default()).expect("parse")
    }

    #[test]
    fn plain_markdown_has_no_directives() {
        let blocks = parse("# Titre\n\nUn paragraphe.");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| matches!(b, Block::Markdown(_))));
        assert_eq!(count_directives(&blocks), 0);
    }

    #[test]
    fn container_with_label_and_children() {
        let blocks = parse(":::definition[Limite]\nUne **limite** est...\n:::\n\nAprès.");
        assert_eq!(blocks.len(), 2);
        let Block::Container(container) = &blocks[0] else {
            panic!("expected container, got {:?}", blocks[0]);
        };
        assert_eq!(container.name, "definition");
        assert_eq!(container.label.as_deref(), Some("Limite"));
        assert_eq!(container.children.len(), 1);
        assert!(matches!(
            &container.children[0],
            Block::Markdown(Node::Paragraph(_))
        ));
        assert!(matches!(&blocks[1], Block::Markdown(Node::Paragraph(_))));
    }

    #[test]
    fn nested_containers() {
        let blocks = parse(":::example\nAvant\n:::remark\nDedans\n:::\nAprès\n:::");
        let Block::Container(outer) = &blocks[0] else {
            panic!("expected container");
        };
        assert_eq!(outer.children.len(), 3);
        let Block::Container(inner) = &outer.children[1] else {
            panic!("expected nested container, got {:?}", outer.children[1]);
        };
        assert_eq!(inner.name, "remark");
        assert_eq!(count_directives(&blocks), 2);
    }

    #[test]
    fn leaf_directive_splits_markdown() {
        let blocks = parse("Avant\n::youtube{id=\"abc\"}\nAprès");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[1], Block::Leaf(leaf) if leaf.name == "youtube"));
    }

    #[test]
    fn markers_inside_code_fence_are_content() {
        let blocks = parse("```\n:::definition\n:::\n```");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::Markdown(Node::Code(code)) if code.value == ":::definition\n:::"));
    }

    #[test]
    fn stray_closer_is_text() {
        let blocks = parse("texte\n:::");
        assert_eq!(count_directives(&blocks), 0);
        let Block::Markdown(Node::Paragraph(para)) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&para.children[0], Node::Text(t) if t.value.contains(":::")));
    }

    #[test]
    fn references_resolve_across_directive_lines() {
        let blocks = parse(":::definition\nVoir [le cours][c].\n:::\n\n[c]: https://example.com\n");
        let Block::Container(container) = &blocks[0] else {
            panic!("expected container");
        };
        let Block::Markdown(Node::Paragraph(para)) = &container.children[0] else {
            panic!("expected paragraph, got {:?}", container.children[0]);
        };
        assert!(para
            .children
            .iter()
            .any(|node| matches!(node, Node::LinkReference(link) if link.identifier == "c")));
        assert_eq!(container.children.len(), 1);

        let definitions = blocks
            .iter()
            .filter(|b| matches!(b, Block::Markdown(Node::Definition(_))))
            .count();
        assert_eq!(definitions, 1);
    }

    #[test]
    fn shared_definitions_stay_out_of_open_fences() {
        let blocks = parse("[c]: https://example.com\n:::remark\n```\ncode\n");
        let Block::Container(container) = &blocks[1] else {
            panic!("expected container, got {:?}", blocks[1]);
        };
        assert_eq!(container.children.len(), 1);
        let Block::Markdown(Node::Code(code)) = &container.children[0] else {
            panic!("expected code, got {:?}", container.children[0]);
        };
        assert!(code.value.starts_with("code"));
        assert!(!code.value.contains("example.com"));
    }

    #[test]
    fn definition_line_shapes() {
        assert!(is_definition_line("[c]: https://example.com"));
        assert!(is_definition_line("   [^1]: Une note."));
        assert!(!is_definition_line("    [c]: indented"));
        assert!(!is_definition_line("[c]:"));
        assert!(!is_definition_line("Voir [c]: non"));
    }

    #[test]
    fn directive_under_list_item_splits_the_list() {
        let blocks = parse("- item\n\n  :::hint\n  x\n  :::\n- deux");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::Markdown(Node::List(_))));
        assert!(matches!(&blocks[1], Block::Container(c) if c.name == "hint"));
        assert!(matches!(&blocks[2], Block::Markdown(Node::List(_))));
    }

    #[test]
    fn unterminated_container_closes_at_end() {
        let blocks = parse(":::hint\nPense au signe.");
        let Block::Container(container) = &blocks[0] else {
            panic!("expected container");
        };
        assert_eq!(container.name, "hint");
        assert_eq!(container.children.len(), 1);
    }
}
