//! Math span extraction over the block tree.

use crate::tree::Block;
use coursmd_core::MathSpan;
use markdown::mdast::Node;

/// Collects every math span in document order, including spans nested in
/// directives, lists and tables.
pub fn collect_math(blocks: &[Block]) -> Vec<MathSpan> {
    let mut spans = Vec::new();
    for block in blocks {
        collect_block(block, &mut spans);
    }
    spans
}

fn collect_block(block: &Block, spans: &mut Vec<MathSpan>) {
    match block {
        Block::Markdown(node) => collect_node(node, spans),
        Block::Container(container) => {
            for child in &container.children {
                collect_block(child, spans);
            }
        }
        Block::Leaf(_) | Block::Html(_) => {}
    }
}

fn collect_node(node: &Node, spans: &mut Vec<MathSpan>) {
    match node {
        Node::InlineMath(math) => spans.push(MathSpan::inline(&math.value)),
        Node::Math(math) => spans.push(MathSpan::block(&math.value)),
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    collect_node(child, spans);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_blocks;
    use coursmd_core::ParseOptions;

    #[test]
    fn spans_are_collected_in_order_across_directives() {
        let source = "Soit $f$.\n\n:::theorem\n- on a $f(x) > 0$\n\n$$\n\\lim f = 0\n$$\n:::";
        let blocks = parse_blocks(source, &ParseOptions::default()).unwrap();
        let spans = collect_math(&blocks);
        assert_eq!(
            spans,
            vec![
                MathSpan::inline("f"),
                MathSpan::inline("f(x) > 0"),
                MathSpan::block("\\lim f = 0"),
            ]
        );
    }
}
