//! mdast to HTML rendering functions.

use super::context::{Context, LinkDefinition, Scope};
use crate::tree::Block;
use coursmd_core::MathSpan;
use markdown::mdast::{self, Node};

/// Registers every link definition found in the tree so references resolve
/// regardless of where the definition sits.
pub fn collect_definitions(blocks: &[Block], ctx: &mut Context) {
    for block in blocks {
        match block {
            Block::Markdown(node) => collect_node_definitions(node, ctx),
            Block::Container(container) => collect_definitions(&container.children, ctx),
            Block::Leaf(_) | Block::Html(_) => {}
        }
    }
}

fn collect_node_definitions(node: &Node, ctx: &mut Context) {
    if let Node::Definition(def) = node {
        ctx.add_definition(
            &def.identifier,
            LinkDefinition {
                url: def.url.clone(),
                title: def.title.clone(),
            },
        );
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_node_definitions(child, ctx);
        }
    }
}

/// Renders a block list, one block per line.
pub fn render_blocks(blocks: &[Block], ctx: &mut Context) {
    for block in blocks {
        match block {
            Block::Markdown(node) => render_node(node, ctx),
            Block::Html(fragment) => ctx.push_raw(fragment),
            Block::Container(container) => {
                log::debug!(
                    "Passthrough directive :::{} rendered without wrapper",
                    container.name
                );
                render_blocks(&container.children, ctx);
            }
            Block::Leaf(leaf) => {
                log::debug!("Passthrough leaf directive ::{} dropped", leaf.name);
            }
        }
        ctx.end_block();
    }
}

fn render_children(children: &[Node], ctx: &mut Context) {
    for child in children {
        render_node(child, ctx);
    }
}

fn wrap(tag: &str, children: &[Node], ctx: &mut Context) {
    ctx.push_raw(&format!("<{}>", tag));
    render_children(children, ctx);
    ctx.push_raw(&format!("</{}>", tag));
}

/// Renders a paragraph node, suppressing `<p>` wrappers in tight lists.
fn render_paragraph(para: &mdast::Paragraph, ctx: &mut Context) {
    if ctx.is_in_tight_list() {
        render_children(&para.children, ctx);
    } else {
        wrap("p", &para.children, ctx);
    }
}

fn render_list(list: &mdast::List, ctx: &mut Context) {
    let tag = if list.ordered { "ol" } else { "ul" };
    match list.start {
        Some(start) if list.ordered && start != 1 => {
            ctx.push_raw(&format!("<ol start=\"{}\">", start));
        }
        _ => ctx.push_raw(&format!("<{}>", tag)),
    }
    ctx.enter(Scope::List {
        spread: list.spread,
    });
    render_children(&list.children, ctx);
    ctx.exit();
    ctx.push_raw(&format!("</{}>", tag));
}

fn render_list_item(item: &mdast::ListItem, ctx: &mut Context) {
    match item.checked {
        Some(checked) => {
            ctx.push_raw("<li class=\"task-list-item\">");
            let checked_attr = if checked { " checked" } else { "" };
            ctx.push_raw(&format!(
                "<input type=\"checkbox\" disabled{} /> ",
                checked_attr
            ));
        }
        None => ctx.push_raw("<li>"),
    }
    render_children(&item.children, ctx);
    ctx.push_raw("</li>");
}

fn render_link(url: &str, title: Option<&str>, children: &[Node], ctx: &mut Context) {
    ctx.push_raw("<a href=\"");
    ctx.push_attr_value(url);
    ctx.push_raw("\"");
    if let Some(title) = title {
        ctx.push_raw(" title=\"");
        ctx.push_attr_value(title);
        ctx.push_raw("\"");
    }
    ctx.push_raw(">");
    render_children(children, ctx);
    ctx.push_raw("</a>");
}

fn render_image(url: &str, alt: &str, title: Option<&str>, ctx: &mut Context) {
    ctx.push_raw("<img src=\"");
    ctx.push_attr_value(url);
    ctx.push_raw("\" alt=\"");
    ctx.push_attr_value(alt);
    ctx.push_raw("\"");
    if let Some(title) = title {
        ctx.push_raw(" title=\"");
        ctx.push_attr_value(title);
        ctx.push_raw("\"");
    }
    ctx.push_raw(" loading=\"lazy\" />");
}

fn render_code(code: &mdast::Code, ctx: &mut Context) {
    match code.lang.as_deref() {
        Some(lang) if !lang.is_empty() => {
            ctx.push_raw("<pre><code class=\"language-");
            ctx.push_attr_value(lang);
            ctx.push_raw("\">");
        }
        _ => ctx.push_raw("<pre><code>"),
    }
    ctx.push_text(&code.value);
    ctx.push_raw("</code></pre>");
}

fn render_table(table: &mdast::Table, ctx: &mut Context) {
    ctx.enter(Scope::Table);
    ctx.push_raw("<table>");
    for (index, row) in table.children.iter().enumerate() {
        let Node::TableRow(row) = row else { continue };
        let header = index == 0;
        if header {
            ctx.push_raw("<thead>");
        } else if index == 1 {
            ctx.push_raw("<tbody>");
        }
        render_table_row(row, header, &table.align, ctx);
        if header {
            ctx.push_raw("</thead>");
        }
    }
    if table.children.len() > 1 {
        ctx.push_raw("</tbody>");
    }
    ctx.push_raw("</table>");
    ctx.exit();
}

fn render_table_row(
    row: &mdast::TableRow,
    header: bool,
    aligns: &[mdast::AlignKind],
    ctx: &mut Context,
) {
    let tag = if header { "th" } else { "td" };
    ctx.push_raw("<tr>");
    for (i, cell) in row.children.iter().enumerate() {
        let Node::TableCell(cell) = cell else { continue };
        let align = match aligns.get(i) {
            Some(mdast::AlignKind::Left) => " align=\"left\"",
            Some(mdast::AlignKind::Right) => " align=\"right\"",
            Some(mdast::AlignKind::Center) => " align=\"center\"",
            _ => "",
        };
        ctx.push_raw(&format!("<{}{}>", tag, align));
        render_children(&cell.children, ctx);
        ctx.push_raw(&format!("</{}>", tag));
    }
    ctx.push_raw("</tr>");
}

fn render_link_reference(link: &mdast::LinkReference, ctx: &mut Context) {
    match ctx.definition(&link.identifier) {
        Some(def) => render_link(&def.url, def.title.as_deref(), &link.children, ctx),
        None => {
            ctx.push_text("[");
            render_children(&link.children, ctx);
            ctx.push_text("]");
        }
    }
}

fn render_image_reference(image: &mdast::ImageReference, ctx: &mut Context) {
    match ctx.definition(&image.identifier) {
        Some(def) => render_image(&def.url, &image.alt, def.title.as_deref(), ctx),
        None => ctx.push_text(&format!("![{}]", image.alt)),
    }
}

fn render_footnote_reference(fnref: &mdast::FootnoteReference, ctx: &mut Context) {
    let ordinal = ctx.footnote_ordinal(&fnref.identifier);
    let safe_id = html_escape::encode_double_quoted_attribute(&fnref.identifier).into_owned();
    ctx.push_raw(&format!(
        "<sup><a href=\"#fn-{0}\" id=\"fnref-{0}\" class=\"footnote-ref\">{1}</a></sup>",
        safe_id, ordinal
    ));
}

fn render_footnote_definition(fndef: &mdast::FootnoteDefinition, ctx: &mut Context) {
    let body = ctx.capture(|ctx| render_children(&fndef.children, ctx));
    ctx.push_footnote(fndef.identifier.clone(), body);
}

/// Recursively renders an AST node to HTML.
pub fn render_node(node: &Node, ctx: &mut Context) {
    match node {
        Node::Root(root) => render_children(&root.children, ctx),
        Node::Text(text) => ctx.push_text(&text.value),
        Node::Paragraph(para) => render_paragraph(para, ctx),
        Node::Heading(heading) => wrap(&format!("h{}", heading.depth), &heading.children, ctx),
        Node::Strong(strong) => wrap("strong", &strong.children, ctx),
        Node::Emphasis(emphasis) => wrap("em", &emphasis.children, ctx),
        Node::Delete(delete) => wrap("del", &delete.children, ctx),
        Node::Blockquote(quote) => wrap("blockquote", &quote.children, ctx),
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::Break(_) => ctx.push_raw("<br />"),
        Node::ThematicBreak(_) => ctx.push_raw("<hr />"),
        Node::List(list) => render_list(list, ctx),
        Node::ListItem(item) => render_list_item(item, ctx),
        Node::Code(code) => render_code(code, ctx),
        Node::Link(link) => render_link(&link.url, link.title.as_deref(), &link.children, ctx),
        Node::Image(img) => render_image(&img.url, &img.alt, img.title.as_deref(), ctx),
        Node::LinkReference(link) => render_link_reference(link, ctx),
        Node::ImageReference(image) => render_image_reference(image, ctx),
        Node::Definition(_) => {}
        Node::Table(table) => render_table(table, ctx),
        Node::TableRow(_) | Node::TableCell(_) => {}
        Node::Html(html) => ctx.push_html_node(&html.value),
        Node::InlineMath(math) => ctx.push_math(&MathSpan::inline(&math.value)),
        Node::Math(math) => ctx.push_math(&MathSpan::block(&math.value)),
        Node::FootnoteReference(fnref) => render_footnote_reference(fnref, ctx),
        Node::FootnoteDefinition(fndef) => render_footnote_definition(fndef, ctx),
        _ => {
            log::warn!("Unhandled markdown node type: {:?}", node);
        }
    }
}
