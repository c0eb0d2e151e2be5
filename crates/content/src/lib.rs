#![deny(missing_docs)]
//! coursmd content: runtime interpretation of compiled HTML.
//!
//! [`parse_content`] splits compiled HTML into standard markup runs and
//! custom components (`<math>`, `<math-block>`, `<graph>`, `<variations>`,
//! `<youtube>`); [`render_html`] turns that tree into static HTML.

/// Custom-tag attribute helpers.
pub mod attrs;
/// Graph props.
pub mod graph;
/// Content node types.
pub mod node;
/// Static HTML output.
pub mod render;
/// Custom-tag scanner.
pub mod scanner;
/// Sign/variation tables and their layout.
pub mod variations;

pub use graph::{GraphPoint, GraphProps, PropError};
pub use node::{ContentNode, CustomTag, YoutubeEmbed};
pub use render::render_html;
pub use scanner::parse_content;
pub use variations::{
    BoundaryMark, Direction, RowKind, RowLayout, SignRowLayout, TableLayout, TableRow,
    VarRowLayout, VarSegment, VariationTable, layout,
};
