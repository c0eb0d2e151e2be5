//! Tree and string transforms of the compile pipeline.
//!
//! - `diagrams`: fence extraction before parsing, restoration after output.
//! - `directives`: directive expansion over the block tree.
//! - `math`: math span collection.
//! - `sanitize`: removal of active content from the HTML output.
//! - `tex`: math tag bodies kept away from the markdown parser.

/// Diagram placeholders and external diagram compilers.
pub mod diagrams;
/// Directive expansion.
pub mod directives;
/// Math span collection.
pub mod math;
/// HTML sanitizing.
pub mod sanitize;
/// Math tag body placeholders.
pub mod tex;
