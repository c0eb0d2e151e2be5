//! Directive vocabulary.

/// The six lesson-part directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonPart {
    /// `:::definition`
    Definition,
    /// `:::theorem`
    Theorem,
    /// `:::property`
    Property,
    /// `:::example`
    Example,
    /// `:::remark`
    Remark,
    /// `:::attention`
    Attention,
}

impl LessonPart {
    /// All lesson parts, in authoring-guide order.
    pub const ALL: [LessonPart; 6] = [
        LessonPart::Definition,
        LessonPart::Theorem,
        LessonPart::Property,
        LessonPart::Example,
        LessonPart::Remark,
        LessonPart::Attention,
    ];

    /// Directive name.
    pub fn name(self) -> &'static str {
        match self {
            LessonPart::Definition => "definition",
            LessonPart::Theorem => "theorem",
            LessonPart::Property => "property",
            LessonPart::Example => "example",
            LessonPart::Remark => "remark",
            LessonPart::Attention => "attention",
        }
    }
}

/// The four disclosure blocks of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collapsible {
    /// `:::solution`
    Solution,
    /// `:::methode`
    Methode,
    /// `:::hint`
    Hint,
    /// `:::erreurs`
    Erreurs,
}

impl Collapsible {
    /// All collapsibles.
    pub const ALL: [Collapsible; 4] = [
        Collapsible::Solution,
        Collapsible::Methode,
        Collapsible::Hint,
        Collapsible::Erreurs,
    ];

    /// Directive name.
    pub fn name(self) -> &'static str {
        match self {
            Collapsible::Solution => "solution",
            Collapsible::Methode => "methode",
            Collapsible::Hint => "hint",
            Collapsible::Erreurs => "erreurs",
        }
    }
}

/// QCM parts, extracted from source by the QCM tooling rather than rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QcmPart {
    /// `:::question`
    Question,
    /// `:::option`
    Option,
    /// `:::explanation`
    Explanation,
}

/// What a directive name means to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Styled lesson block.
    LessonPart(LessonPart),
    /// Exercise statement (`:::enonce`).
    Statement,
    /// Exercise disclosure block.
    Collapsible(Collapsible),
    /// QCM wrapper, unwrapped on expansion.
    QcmPart(QcmPart),
    /// `::youtube{id=..}` leaf.
    Youtube,
    /// Any other name. Kept verbatim so content written against a newer
    /// vocabulary still compiles.
    Unknown,
}

impl DirectiveKind {
    /// Resolves a (lowercased) directive name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "definition" => DirectiveKind::LessonPart(LessonPart::Definition),
            "theorem" => DirectiveKind::LessonPart(LessonPart::Theorem),
            "property" => DirectiveKind::LessonPart(LessonPart::Property),
            "example" => DirectiveKind::LessonPart(LessonPart::Example),
            "remark" => DirectiveKind::LessonPart(LessonPart::Remark),
            "attention" => DirectiveKind::LessonPart(LessonPart::Attention),
            "enonce" => DirectiveKind::Statement,
            "solution" => DirectiveKind::Collapsible(Collapsible::Solution),
            "methode" => DirectiveKind::Collapsible(Collapsible::Methode),
            "hint" => DirectiveKind::Collapsible(Collapsible::Hint),
            "erreurs" => DirectiveKind::Collapsible(Collapsible::Erreurs),
            "question" => DirectiveKind::QcmPart(QcmPart::Question),
            "option" => DirectiveKind::QcmPart(QcmPart::Option),
            "explanation" => DirectiveKind::QcmPart(QcmPart::Explanation),
            "youtube" => DirectiveKind::Youtube,
            _ => DirectiveKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_their_variants() {
        for part in LessonPart::ALL {
            assert_eq!(
                DirectiveKind::from_name(part.name()),
                DirectiveKind::LessonPart(part)
            );
        }
        for collapsible in Collapsible::ALL {
            assert_eq!(
                DirectiveKind::from_name(collapsible.name()),
                DirectiveKind::Collapsible(collapsible)
            );
        }
        assert_eq!(DirectiveKind::from_name("enonce"), DirectiveKind::Statement);
        assert_eq!(
            DirectiveKind::from_name("option"),
            DirectiveKind::QcmPart(QcmPart::Option)
        );
    }

    #[test]
    fn unknown_names_are_passthrough() {
        assert_eq!(DirectiveKind::from_name("note"), DirectiveKind::Unknown);
        assert_eq!(DirectiveKind::from_name(""), DirectiveKind::Unknown);
    }
}
