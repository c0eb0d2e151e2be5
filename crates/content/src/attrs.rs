//! Attribute helpers for custom tags.

use coursmd_core::{Attributes, parse_attributes};

/// Parses the attribute source of an HTML start tag. Keys are lowercased
/// and values have their entities decoded.
pub fn tag_attributes(source: &str) -> Attributes {
    let mut decoded = Attributes::new();
    for (key, value) in parse_attributes(source).iter() {
        decoded.insert(
            key.to_ascii_lowercase(),
            html_escape::decode_html_entities(value).into_owned(),
        );
    }
    decoded
}

/// Splits a bracketed list such as `[-inf, 0, "+inf"]` into trimmed,
/// unquoted items. Commas inside parentheses or quotes do not split.
///
/// Brackets are optional; an empty list yields no items.
pub fn parse_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);

    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in inner.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '(' | '[' | '{') => {
                depth += 1;
                current.push(ch);
            }
            (None, ')' | ']' | '}') => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            (None, ',') if depth == 0 => items.push(std::mem::take(&mut current)),
            (None, c) => current.push(c),
        }
    }
    items.push(current);

    let items: Vec<String> = items.iter().map(|item| unquote(item.trim())).collect();
    if items.len() == 1 && items[0].is_empty() {
        return Vec::new();
    }
    items
}

fn unquote(item: &str) -> String {
    for quote in ['"', '\''] {
        if item.len() >= 2 && item.starts_with(quote) && item.ends_with(quote) {
            return item[1..item.len() - 1].to_string();
        }
    }
    item.to_string()
}
