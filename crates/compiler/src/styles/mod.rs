//! Directive vocabulary and the style entries each name maps to.

/// Directive name enums.
pub mod kinds;
/// Static style entries.
pub mod tables;

pub use kinds::{Collapsible, DirectiveKind, LessonPart, QcmPart};
pub use tables::{CollapsibleStyle, LessonPartStyle};
