//! Custom-tag scanner.
//!
//! Walks compiled HTML once, copying standard markup into `Html` runs and
//! mapping each custom tag through exactly one rule. Never fails: anything
//! it cannot make sense of is kept as HTML.

use crate::attrs::tag_attributes;
use crate::graph::GraphProps;
use crate::node::{ContentNode, CustomTag, YoutubeEmbed};
use crate::variations::{TableRow, VariationTable};
use coursmd_core::MathSpan;

struct Tag<'a> {
    name: String,
    attrs: &'a str,
    closing: bool,
    self_closing: bool,
    /// Byte offset just past `>`.
    end: usize,
}

#[derive(Default)]
struct Runs {
    nodes: Vec<ContentNode>,
    html: String,
}

impl Runs {
    fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    fn push_node(&mut self, node: ContentNode) {
        self.flush();
        self.nodes.push(node);
    }

    fn flush(&mut self) {
        if !self.html.is_empty() {
            self.nodes
                .push(ContentNode::Html(std::mem::take(&mut self.html)));
        }
    }

    fn finish(mut self) -> Vec<ContentNode> {
        self.flush();
        self.nodes
    }
}

/// Splits compiled HTML into content nodes.
pub fn parse_content(html: &str) -> Vec<ContentNode> {
    let mut runs = Runs::default();
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let at = pos + offset;
        runs.push_html(&html[pos..at]);

        if html[at..].starts_with("<!--") {
            let end = html[at..].find("-->").map_or(html.len(), |e| at + e + 3);
            runs.push_html(&html[at..end]);
            pos = end;
            continue;
        }

        pos = match read_tag(html, at) {
            Some(tag) => dispatch(html, at, tag, &mut runs),
            None => {
                runs.push_html("<");
                at + 1
            }
        };
    }
    runs.push_html(&html[pos..]);
    runs.finish()
}

/// Applies the rule for `tag` and returns the offset to resume from.
fn dispatch(html: &str, at: usize, tag: Tag<'_>, runs: &mut Runs) -> usize {
    let raw = &html[at..tag.end];
    let Some(kind) = CustomTag::from_name(&tag.name) else {
        runs.push_html(raw);
        return tag.end;
    };

    if kind == CustomTag::Row {
        log::debug!("Stray <row> outside <variations> suppressed");
        return tag.end;
    }
    if tag.closing {
        runs.push_html(raw);
        return tag.end;
    }

    let attrs = tag_attributes(tag.attrs);
    match kind {
        CustomTag::Math if !attrs.is_empty() => {
            // Typeset MathML from the compiler.
            runs.push_html(raw);
            tag.end
        }
        CustomTag::Math | CustomTag::MathBlock => {
            if tag.self_closing {
                runs.push_html(raw);
                return tag.end;
            }
            let Some((inner, after)) = element_body(html, &tag) else {
                log::debug!("Unterminated <{}> kept as HTML", tag.name);
                runs.push_html(raw);
                return tag.end;
            };
            let tex = text_content(inner);
            let span = if kind == CustomTag::MathBlock {
                MathSpan::block(tex)
            } else {
                MathSpan::inline(tex)
            };
            runs.push_node(ContentNode::Math(span));
            after
        }
        CustomTag::Graph => match element_or_void(html, &tag) {
            Some((_, after)) => {
                runs.push_node(ContentNode::Graph(GraphProps::from_attributes(&attrs)));
                after
            }
            None => {
                runs.push_html(raw);
                tag.end
            }
        },
        CustomTag::Variations => match element_or_void(html, &tag) {
            Some((inner, after)) => {
                let table = VariationTable::from_attributes(&attrs, collect_rows(inner));
                runs.push_node(ContentNode::Variations(table));
                after
            }
            None => {
                runs.push_html(raw);
                tag.end
            }
        },
        CustomTag::Youtube => {
            let Some((_, after)) = element_or_void(html, &tag) else {
                runs.push_html(raw);
                return tag.end;
            };
            match attrs.get("id").map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) => runs.push_node(ContentNode::Youtube(YoutubeEmbed {
                    id: id.to_string(),
                    title: attrs.get("title").map(str::to_string),
                })),
                None => {
                    log::warn!("<youtube> without id kept as HTML");
                    runs.push_html(&html[at..after]);
                }
            }
            after
        }
        CustomTag::Row => tag.end,
    }
}

/// Inner markup and resume offset of a paired element.
fn element_body<'a>(html: &'a str, tag: &Tag<'_>) -> Option<(&'a str, usize)> {
    let (inner_end, after) = find_close(html, tag.end, &tag.name)?;
    Some((&html[tag.end..inner_end], after))
}

/// Like [`element_body`], with `<tag/>` read as an empty element.
fn element_or_void<'a>(html: &'a str, tag: &Tag<'_>) -> Option<(&'a str, usize)> {
    if tag.self_closing {
        Some(("", tag.end))
    } else {
        element_body(html, tag)
    }
}

/// Finds the close tag matching an open `name` element, counting nested
/// elements of the same name. Returns (start of close tag, end of close tag).
fn find_close(html: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(offset) = html[pos..].find('<') {
        let at = pos + offset;
        let Some(tag) = read_tag(html, at) else {
            pos = at + 1;
            continue;
        };
        if tag.name == name {
            if tag.closing {
                depth -= 1;
                if depth == 0 {
                    return Some((at, tag.end));
                }
            } else if !tag.self_closing {
                depth += 1;
            }
        }
        pos = tag.end;
    }
    None
}

/// Reads `<name ...>` or `</name>` at `start`.
fn read_tag(html: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = html.as_bytes();
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();
    match bytes.get(i) {
        Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => {}
        _ => return None,
    }

    let attrs_start = i;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => break,
            None => {}
        }
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let mut attrs = html[attrs_start..i].trim();
    let self_closing = attrs.ends_with('/');
    if self_closing {
        attrs = attrs[..attrs.len() - 1].trim_end();
    }

    Some(Tag {
        name,
        attrs,
        closing,
        self_closing,
        end: i + 1,
    })
}

/// Text of an element: nested tags dropped, entities decoded.
fn text_content(inner: &str) -> String {
    let mut text = String::with_capacity(inner.len());
    let mut rest = inner;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }
    text.push_str(rest);
    html_escape::decode_html_entities(&text).trim().to_string()
}

/// Every `<row>` below a `<variations>` element, at any depth.
fn collect_rows(inner: &str) -> Vec<TableRow> {
    let mut rows = Vec::new();
    let mut pos = 0;
    while let Some(offset) = inner[pos..].find('<') {
        let at = pos + offset;
        match read_tag(inner, at) {
            Some(tag) => {
                if tag.name == "row" && !tag.closing {
                    rows.push(TableRow::from_attributes(&tag_attributes(tag.attrs)));
                }
                pos = tag.end;
            }
            None => pos = at + 1,
        }
    }
    rows
}
