#![deny(missing_docs)]
//! coursmd core: directive syntax, fence tracking, markdown options and math.

/// Authored content atoms (lesson, exercise, qcm).
pub mod atom;
/// Code fence detection utilities.
pub mod code_fence;
/// Directive line syntax.
pub mod directives;
/// Core error types.
pub mod error;
/// Math typesetting.
pub mod math;
/// Markdown parsing utilities.
pub mod parse;

pub use atom::{AtomKind, SourceDocument};
pub use code_fence::{FenceEvent, FencePhase, FenceState, LineParseOutcome, advance_fence_state};
pub use directives::{
    Attributes, DirectiveLine, DirectiveOpening, LeafDirective, is_directive_closer,
    parse_attributes, parse_directive_line,
};
pub use error::{CoursError, SourceLocation};
pub use math::{MathError, MathMlRenderer, MathRenderer, MathSpan, render_math};
pub use parse::{ParseOptions, parse_mdast};
