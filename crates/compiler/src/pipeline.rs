//! Pipeline assembly: extract diagrams, shield math tags, parse, expand,
//! stringify, sanitize, restore.

use crate::error::CompileError;
use crate::renderer::{RenderOptions, render_html};
use crate::transform::diagrams::{DiagramCompiler, extract, restore};
use crate::transform::directives::expand;
use crate::transform::math::collect_math;
use crate::transform::sanitize::sanitize_html;
use crate::transform::tex::{self, Shielded};
use crate::tree::parse_blocks;
use coursmd_core::{MathMlRenderer, MathRenderer, MathSpan, ParseOptions, SourceDocument};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Compile-time switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Fence info word that marks a diagram; empty disables extraction.
    pub diagram_language: String,
    /// Recognize `$..$` and `$$..$$`.
    pub enable_math: bool,
    /// Keep authored raw HTML (custom tags included). Escaped when false.
    pub allow_raw_html: bool,
    /// Strip scripts, event handlers and `javascript:` URLs.
    pub sanitize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            diagram_language: "tikz".to_string(),
            enable_math: true,
            allow_raw_html: true,
            sanitize: true,
        }
    }
}

impl CompileOptions {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            math: self.enable_math,
            ..ParseOptions::content()
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            allow_raw_html: self.allow_raw_html,
        }
    }
}

/// Output of one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledFragment {
    /// HTML ready for embedding; custom tags are left for the runtime renderer.
    pub html: String,
    /// Every math span, in document order.
    pub math_spans: Vec<MathSpan>,
    /// Number of diagram fences compiled.
    pub diagram_count: usize,
    /// Number of directives expanded.
    pub directive_count: usize,
}

/// Compiles a document with the MathML renderer.
pub fn compile(
    source: &str,
    options: &CompileOptions,
    diagrams: &dyn DiagramCompiler,
) -> Result<CompiledFragment, CompileError> {
    compile_with(source, options, diagrams, &MathMlRenderer)
}

/// Compiles a document with a custom math renderer.
pub fn compile_with(
    source: &str,
    options: &CompileOptions,
    diagrams: &dyn DiagramCompiler,
    math: &dyn MathRenderer,
) -> Result<CompiledFragment, CompileError> {
    let parse = options.parse_options();
    let render = options.render_options();

    let extraction = extract(source, &options.diagram_language, diagrams)?;
    // Escaped raw HTML would show the placeholders as text.
    let shielded = if options.allow_raw_html {
        tex::shield(&extraction.source)
    } else {
        Shielded::unchanged(&extraction.source)
    };
    let blocks = parse_blocks(&shielded.source, &parse)?;
    let math_spans = collect_math(&blocks);
    let (blocks, directive_count) = expand(blocks, &parse, &render, math);

    let mut html = render_html(&blocks, &render, math);
    if options.sanitize {
        html = sanitize_html(&html)?;
    }
    let html = restore(&html, &extraction.placeholders);
    let html = tex::restore(&html, &shielded.placeholders);

    Ok(CompiledFragment {
        html,
        math_spans,
        diagram_count: extraction.placeholders.len(),
        directive_count,
    })
}

/// Compiles the body of an authored atom.
pub fn compile_atom(
    document: &SourceDocument,
    options: &CompileOptions,
    diagrams: &dyn DiagramCompiler,
) -> Result<CompiledFragment, CompileError> {
    log::debug!("Compiling {} {}", document.kind, document.id);
    compile(&document.body, options, diagrams).inspect_err(|err| {
        log::warn!("Failed to compile {}: {}", document.id, err);
    })
}

/// Result for one document of a batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Atom identifier.
    pub id: String,
    /// Compiled fragment or the error that stopped it.
    pub result: Result<CompiledFragment, CompileError>,
}

/// Compiles independent documents in parallel. Results keep input order and
/// one failure does not stop the others.
pub fn compile_batch(
    documents: &[SourceDocument],
    options: &CompileOptions,
    diagrams: &dyn DiagramCompiler,
) -> Vec<BatchResult> {
    documents
        .par_iter()
        .map(|document| BatchResult {
            id: document.id.clone(),
            result: compile_atom(document, options, diagrams),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::diagrams::NoDiagramCompiler;
    use coursmd_core::AtomKind;

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"diagramLanguage":"mermaid"}"#).unwrap();
        assert_eq!(options.diagram_language, "mermaid");
        assert!(options.enable_math);
        assert!(options.sanitize);
    }

    #[test]
    fn fragment_counts() {
        let fragment = compile(
            ":::definition\nSoit $x$ et $$y$$.\n:::\n:::solution\nRien.\n:::",
            &CompileOptions::default(),
            &NoDiagramCompiler,
        )
        .unwrap();
        assert_eq!(fragment.directive_count, 2);
        assert_eq!(fragment.diagram_count, 0);
        assert_eq!(fragment.math_spans.len(), 2);
    }

    #[test]
    fn math_can_be_disabled() {
        let options = CompileOptions {
            enable_math: false,
            ..CompileOptions::default()
        };
        let fragment = compile("Prix: $5 et $6", &options, &NoDiagramCompiler).unwrap();
        assert!(fragment.math_spans.is_empty());
        assert!(fragment.html.contains("$5 et $6"));
    }

    #[test]
    fn raw_html_can_be_escaped() {
        let options = CompileOptions {
            allow_raw_html: false,
            ..CompileOptions::default()
        };
        let fragment = compile("<b>gras</b>", &options, &NoDiagramCompiler).unwrap();
        assert!(fragment.html.contains("&lt;b&gt;"));
    }

    #[test]
    fn math_tag_bodies_skip_markdown() {
        let fragment = compile(
            "Soit <math>a*b*c</math> et <math>x_i + y_j</math>.",
            &CompileOptions::default(),
            &NoDiagramCompiler,
        )
        .unwrap();
        assert_eq!(
            fragment.html,
            "<p>Soit <math>a*b*c</math> et <math>x_i + y_j</math>.</p>"
        );
    }

    #[test]
    fn sanitize_runs_on_raw_html() {
        let fragment = compile(
            "<p onclick=\"x()\">a</p>\n\n<script>alert(1)</script>",
            &CompileOptions::default(),
            &NoDiagramCompiler,
        )
        .unwrap();
        assert!(!fragment.html.contains("onclick"));
        assert!(!fragment.html.contains("alert"));
    }

    #[test]
    fn diagram_without_compiler_fails_the_document() {
        let err = compile("```tikz\nA\n```", &CompileOptions::default(), &NoDiagramCompiler)
            .unwrap_err();
        assert!(matches!(err, CompileError::Diagram { index: 0, .. }));
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let documents = vec![
            SourceDocument::new("a", AtomKind::Lesson, ":::remark\nA\n:::"),
            SourceDocument::new("b", AtomKind::Exercise, "```tikz\nB\n```"),
            SourceDocument::new("c", AtomKind::Qcm, ":::question\nC ?\n:::"),
        ];
        let results = compile_batch(&documents, &CompileOptions::default(), &NoDiagramCompiler);
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_err());
        assert_eq!(
            results[2].result.as_ref().map(|f| f.html.as_str()).ok(),
            Some("<p>C ?</p>")
        );
    }
}
