//! Math typesetting shared by the compiler and the runtime renderer.
//!
//! Both sides go through [`MathRenderer`] so a formula renders the same at
//! compile time and when a `<math>` tag is hydrated later.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A math span extracted from authored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathSpan {
    /// TeX source without delimiters.
    pub tex: String,
    /// Display (block) math when true, inline otherwise.
    pub display: bool,
}

impl MathSpan {
    /// Inline span.
    pub fn inline(tex: impl Into<String>) -> Self {
        Self {
            tex: tex.into(),
            display: false,
        }
    }

    /// Display span.
    pub fn block(tex: impl Into<String>) -> Self {
        Self {
            tex: tex.into(),
            display: true,
        }
    }
}

/// Typesetting failure for a single span.
#[derive(Debug, Error)]
#[error("cannot typeset `{tex}`: {message}")]
pub struct MathError {
    /// Offending TeX source.
    pub tex: String,
    /// Engine message.
    pub message: String,
}

/// Turns TeX into markup.
pub trait MathRenderer: Send + Sync {
    /// Render one span. Errors are recovered by [`render_math`].
    fn render(&self, span: &MathSpan) -> Result<String, MathError>;
}

/// MathML output through `latex2mathml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathMlRenderer;

impl MathRenderer for MathMlRenderer {
    fn render(&self, span: &MathSpan) -> Result<String, MathError> {
        let style = if span.display {
            latex2mathml::DisplayStyle::Block
        } else {
            latex2mathml::DisplayStyle::Inline
        };
        latex2mathml::latex_to_mathml(&span.tex, style).map_err(|err| MathError {
            tex: span.tex.clone(),
            message: err.to_string(),
        })
    }
}

/// Renders a span inside its container element, degrading to the literal
/// source as inline code when typesetting fails.
pub fn render_math(renderer: &dyn MathRenderer, span: &MathSpan) -> String {
    match renderer.render(span) {
        Ok(markup) if span.display => format!("<div class=\"math math-display\">{}</div>", markup),
        Ok(markup) => format!("<span class=\"math math-inline\">{}</span>", markup),
        Err(err) => {
            log::warn!("{}", err);
            format!(
                "<code class=\"math-error\">{}</code>",
                html_escape::encode_text(&span.tex)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl MathRenderer for Failing {
        fn render(&self, span: &MathSpan) -> Result<String, MathError> {
            Err(MathError {
                tex: span.tex.clone(),
                message: "unsupported".into(),
            })
        }
    }

    #[test]
    fn inline_and_display_containers() {
        let inline = render_math(&MathMlRenderer, &MathSpan::inline("x^2"));
        assert!(inline.starts_with("<span class=\"math math-inline\">"));
        assert!(inline.contains("<math"));

        let display = render_math(&MathMlRenderer, &MathSpan::block("x^2"));
        assert!(display.starts_with("<div class=\"math math-display\">"));
        assert!(display.contains("display=\"block\""));
    }

    #[test]
    fn failure_degrades_to_escaped_code() {
        let html = render_math(&Failing, &MathSpan::inline("a < b"));
        assert_eq!(html, "<code class=\"math-error\">a &lt; b</code>");
    }
}
