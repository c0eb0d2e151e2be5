//! Output sanitizing with lol_html.
//!
//! Runs on the stringified fragment before diagrams are restored, so trusted
//! diagram markup is never rewritten. Custom tags (`<graph>`, `<youtube>`...)
//! and comments pass through.

use crate::error::CompileError;
use lol_html::{RewriteStrSettings, element, rewrite_str};

const URL_ATTRIBUTES: [&str; 5] = ["href", "src", "xlink:href", "action", "formaction"];

/// Removes active content: `<script>`, `<object>`, `<embed>`, event handler
/// attributes and `javascript:` URLs.
pub fn sanitize_html(html: &str) -> Result<String, CompileError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("script, object, embed", |el| {
                    log::debug!("Removed <{}> from compiled output", el.tag_name());
                    el.remove();
                    Ok(())
                }),
                element!("*", |el| {
                    let unsafe_names: Vec<String> = el
                        .attributes()
                        .iter()
                        .filter(|attr| is_unsafe_attribute(&attr.name(), &attr.value()))
                        .map(|attr| attr.name())
                        .collect();
                    for name in unsafe_names {
                        el.remove_attribute(&name);
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| CompileError::Sanitize(err.to_string()))
}

fn is_unsafe_attribute(name: &str, value: &str) -> bool {
    if name.starts_with("on") {
        return true;
    }
    URL_ATTRIBUTES.contains(&name) && is_script_url(value)
}

fn is_script_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(11)
        .collect();
    compact.to_ascii_lowercase().starts_with("javascript:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_removed_with_content() {
        let out = sanitize_html("<p>a</p><script>alert(1)</script><p>b</p>").unwrap();
        assert_eq!(out, "<p>a</p><p>b</p>");
    }

    #[test]
    fn event_handlers_are_stripped() {
        let out = sanitize_html("<p onclick=\"steal()\" class=\"x\">a</p>").unwrap();
        assert!(!out.contains("onclick"));
        assert!(out.contains("class=\"x\""));
    }

    #[test]
    fn javascript_urls_are_stripped() {
        let out = sanitize_html("<a href=\" JavaScript:alert(1)\">x</a><a href=\"https://ok\">y</a>").unwrap();
        assert!(!out.to_lowercase().contains("javascript"));
        assert!(out.contains("href=\"https://ok\""));
    }

    #[test]
    fn custom_tags_and_comments_survive() {
        let html = "<graph function=\"x^2\" range=\"[-3,3]\"></graph>\n<!--coursmd-diagram-1-0-->\n<youtube id=\"a\"></youtube>";
        assert_eq!(sanitize_html(html).unwrap(), html);
    }
}
