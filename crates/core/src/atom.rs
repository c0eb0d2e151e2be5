//! Authored content atoms.

use crate::CoursError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three kinds of atom a corpus may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomKind {
    /// Lesson with lesson-part directives.
    Lesson,
    /// Exercise with statement and collapsible directives.
    Exercise,
    /// Multiple-choice question set.
    Qcm,
}

impl AtomKind {
    /// All kinds, in declaration order.
    pub const ALL: [AtomKind; 3] = [AtomKind::Lesson, AtomKind::Exercise, AtomKind::Qcm];

    /// Lowercase name used in authored files.
    pub fn as_str(self) -> &'static str {
        match self {
            AtomKind::Lesson => "lesson",
            AtomKind::Exercise => "exercise",
            AtomKind::Qcm => "qcm",
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AtomKind {
    type Err = CoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AtomKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoursError::UnknownAtomKind(s.to_string()))
    }
}

/// One authored document handed to the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Atom identifier.
    pub id: String,
    /// Declared atom kind.
    #[serde(rename = "type")]
    pub kind: AtomKind,
    /// Body text in the directive Markdown dialect.
    pub body: String,
}

impl SourceDocument {
    /// Builds a document from its parts.
    pub fn new(id: impl Into<String>, kind: AtomKind, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_names() {
        for kind in AtomKind::ALL {
            assert_eq!(kind.as_str().parse::<AtomKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = "quiz".parse::<AtomKind>().unwrap_err();
        assert!(matches!(err, CoursError::UnknownAtomKind(ref k) if k == "quiz"));
    }
}
