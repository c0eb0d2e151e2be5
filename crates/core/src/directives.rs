//! Directive line syntax.
//!
//! Recognizes the three line shapes of the authoring dialect:
//!
//! ```text
//! :::definition[Limite]{collapsed="false"}   container opener
//! :::                                        container closer
//! ::youtube{id="dQw4w9WgXcQ" title="Intro"}  leaf directive
//! ```
//!
//! Only syntax lives here. Which names mean something is decided by the
//! compiler's style tables, so any well-formed name is accepted.

/// Ordered `key="value"` pairs captured from a `{...}` block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Creates an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `key`, if present. Later duplicates win.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Appends an attribute, merging `class` values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if key == "class"
            && let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| k == "class")
        {
            existing.push(' ');
            existing.push_str(&value);
            return;
        }
        self.entries.push((key, value));
    }

    /// Iterates over the attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true when no attribute was given.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed `:::name[label]{attrs}` opener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveOpening {
    /// Lowercased directive name.
    pub name: String,
    /// Raw label text from the bracket syntax, if any.
    pub label: Option<String>,
    /// Attributes from the brace syntax.
    pub attributes: Attributes,
    /// Number of colons in the fence (3 or more).
    pub fence_len: usize,
}

/// Parsed `::name[label]{attrs}` leaf directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafDirective {
    /// Lowercased directive name.
    pub name: String,
    /// Raw label text, if any.
    pub label: Option<String>,
    /// Attributes from the brace syntax.
    pub attributes: Attributes,
}

/// Classification of a single source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveLine {
    /// Container opener.
    Open(DirectiveOpening),
    /// Bare closer (`:::`, or a longer run of colons).
    Close,
    /// Leaf directive on its own line.
    Leaf(LeafDirective),
}

/// Classifies a line as a directive opener, closer or leaf.
///
/// Returns `None` for ordinary content, including malformed directives
/// (unterminated label or attribute block, trailing text), which then stay
/// literal markdown.
pub fn parse_directive_line(line: &str) -> Option<DirectiveLine> {
    if is_indented_code(line) {
        return None;
    }

    let trimmed = line.trim();
    let colons = trimmed.chars().take_while(|c| *c == ':').count();
    if colons < 2 {
        return None;
    }

    let rest = &trimmed[colons..];
    if rest.is_empty() {
        return (colons >= 3).then_some(DirectiveLine::Close);
    }

    let (name, label, attributes) = parse_head(rest)?;
    if colons == 2 {
        Some(DirectiveLine::Leaf(LeafDirective {
            name,
            label,
            attributes,
        }))
    } else {
        Some(DirectiveLine::Open(DirectiveOpening {
            name,
            label,
            attributes,
            fence_len: colons,
        }))
    }
}

/// Returns true for a bare closer line.
pub fn is_directive_closer(line: &str) -> bool {
    matches!(parse_directive_line(line), Some(DirectiveLine::Close))
}

fn is_indented_code(line: &str) -> bool {
    line.starts_with('\t') || line.starts_with("    ")
}

/// Parses `name[label]{attrs}` after the colons.
fn parse_head(input: &str) -> Option<(String, Option<String>, Attributes)> {
    let mut chars = input.char_indices().peekable();

    let mut name = String::new();
    while let Some(&(_, ch)) = chars.peek() {
        let valid = if name.is_empty() {
            ch.is_ascii_alphabetic()
        } else {
            ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
        };
        if !valid {
            break;
        }
        name.push(ch.to_ascii_lowercase());
        chars.next();
    }
    if name.is_empty() {
        return None;
    }

    let mut cursor = chars.peek().map(|(i, _)| *i).unwrap_or(input.len());
    let mut label = None;
    if input[cursor..].starts_with('[') {
        let (text, consumed) = take_label(&input[cursor..])?;
        label = Some(text.to_string());
        cursor += consumed;
    }

    let mut attributes = Attributes::new();
    let after_label = input[cursor..].trim_start();
    if after_label.starts_with('{') {
        let close = find_attr_block_end(after_label)?;
        attributes = parse_attributes(&after_label[1..close]);
        if !after_label[close + 1..].trim().is_empty() {
            return None;
        }
    } else if !after_label.is_empty() {
        return None;
    }

    Some((name, label, attributes))
}

/// Reads a bracketed label, honoring nested brackets and `\]` escapes.
/// Returns the inner text and the number of bytes consumed.
fn take_label(input: &str) -> Option<(&str, usize)> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[1..i], i + 1));
                }
            }
            _ => {}
        }
    }
    None
}

fn find_attr_block_end(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in input.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '}') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Tokenize attributes respecting quoted values.
/// Splits on whitespace but keeps quoted strings intact.
fn tokenize_attrs(attrs: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;
    let mut in_quotes = false;
    let mut quote_char = '"';

    for (i, c) in attrs.char_indices() {
        match c {
            '"' | '\'' if !in_quotes => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
                in_quotes = true;
                quote_char = c;
            }
            c if c == quote_char && in_quotes => {
                in_quotes = false;
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(start) = token_start.take() {
                    tokens.push(&attrs[start..i]);
                }
            }
            _ => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
            }
        }
    }

    if let Some(start) = token_start {
        tokens.push(&attrs[start..]);
    }

    tokens
}

/// Parses the inside of a `{...}` block.
///
/// Supports `key="value"`, `key='value'`, `key=value`, bare `key`
/// (empty value), `#id` and `.class` shorthands.
pub fn parse_attributes(input: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for token in tokenize_attrs(input) {
        if let Some(id) = token.strip_prefix('#') {
            attributes.insert("id", id);
            continue;
        }
        if let Some(class) = token.strip_prefix('.') {
            attributes.insert("class", class);
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) => attributes.insert(key.trim(), unquote(value.trim())),
            None => attributes.insert(token, ""),
        }
    }
    attributes
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
