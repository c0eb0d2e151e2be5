#![deny(missing_docs)]
//! coursmd compiler: directive Markdown to sanitized HTML fragments.

/// Compile errors.
pub mod error;
/// Pipeline assembly.
pub mod pipeline;
/// HTML stringification of the block tree.
pub mod renderer;
/// Directive style tables.
pub mod styles;
/// Transforms (diagrams, directives, math, sanitize).
pub mod transform;
/// Block tree with directive nodes.
pub mod tree;

pub use error::CompileError;
pub use pipeline::{
    BatchResult, CompileOptions, CompiledFragment, compile, compile_atom, compile_batch,
    compile_with,
};
pub use renderer::{RenderOptions, render_html};
pub use styles::{Collapsible, CollapsibleStyle, DirectiveKind, LessonPart, LessonPartStyle, QcmPart};
pub use transform::diagrams::{
    CommandDiagramCompiler, DiagramCompiler, DiagramError, NoDiagramCompiler,
};
pub use tree::{Block, ContainerDirective, parse_blocks};
