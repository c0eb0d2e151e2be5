//! Static style tables for lesson parts and exercise collapsibles.
//!
//! Class tokens are Tailwind utilities consumed by the site stylesheet.

use super::kinds::{Collapsible, LessonPart};

/// Rendering contract for a lesson part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonPartStyle {
    /// Title used when the directive has no label.
    pub title: &'static str,
    /// Emoji shown before the title.
    pub icon: &'static str,
    /// Border and background tokens of the wrapper.
    pub container: &'static str,
    /// Text color tokens of the title row.
    pub heading: &'static str,
}

/// Rendering contract for an exercise collapsible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapsibleStyle {
    /// Summary label used when the directive has no label.
    pub title: &'static str,
    /// Emoji shown in the summary line.
    pub icon: &'static str,
    /// Border and background tokens of the `<details>` element.
    pub container: &'static str,
    /// Tokens of the `<summary>` line.
    pub summary: &'static str,
    /// Whether the body starts hidden.
    pub collapsed: bool,
}

static DEFINITION: LessonPartStyle = LessonPartStyle {
    title: "Définition",
    icon: "📘",
    container: "border-l-4 border-indigo-500 bg-indigo-50 dark:bg-indigo-950/40",
    heading: "text-indigo-700 dark:text-indigo-300",
};

static THEOREM: LessonPartStyle = LessonPartStyle {
    title: "Théorème",
    icon: "🎓",
    container: "border-l-4 border-purple-500 bg-purple-50 dark:bg-purple-950/40",
    heading: "text-purple-700 dark:text-purple-300",
};

static PROPERTY: LessonPartStyle = LessonPartStyle {
    title: "Propriété",
    icon: "📐",
    container: "border-l-4 border-blue-500 bg-blue-50 dark:bg-blue-950/40",
    heading: "text-blue-700 dark:text-blue-300",
};

static EXAMPLE: LessonPartStyle = LessonPartStyle {
    title: "Exemple",
    icon: "💡",
    container: "border-l-4 border-emerald-500 bg-emerald-50 dark:bg-emerald-950/40",
    heading: "text-emerald-700 dark:text-emerald-300",
};

static REMARK: LessonPartStyle = LessonPartStyle {
    title: "Remarque",
    icon: "📝",
    container: "border-l-4 border-slate-400 bg-slate-50 dark:bg-slate-900/40",
    heading: "text-slate-700 dark:text-slate-300",
};

static ATTENTION: LessonPartStyle = LessonPartStyle {
    title: "Attention",
    icon: "⚠️",
    container: "border-l-4 border-red-500 bg-red-50 dark:bg-red-950/40",
    heading: "text-red-700 dark:text-red-300",
};

static SOLUTION: CollapsibleStyle = CollapsibleStyle {
    title: "Solution",
    icon: "✅",
    container: "border border-emerald-300 bg-emerald-50/50 dark:border-emerald-800",
    summary: "text-emerald-700 dark:text-emerald-300",
    collapsed: true,
};

static METHODE: CollapsibleStyle = CollapsibleStyle {
    title: "Méthode",
    icon: "🧭",
    container: "border border-blue-300 bg-blue-50/50 dark:border-blue-800",
    summary: "text-blue-700 dark:text-blue-300",
    collapsed: true,
};

static HINT: CollapsibleStyle = CollapsibleStyle {
    title: "Indice",
    icon: "💡",
    container: "border border-amber-300 bg-amber-50/50 dark:border-amber-800",
    summary: "text-amber-700 dark:text-amber-300",
    collapsed: true,
};

static ERREURS: CollapsibleStyle = CollapsibleStyle {
    title: "Erreurs fréquentes",
    icon: "🚫",
    container: "border border-red-300 bg-red-50/50 dark:border-red-800",
    summary: "text-red-700 dark:text-red-300",
    collapsed: true,
};

impl LessonPart {
    /// Style entry shared by every instance of this part.
    pub fn style(self) -> &'static LessonPartStyle {
        match self {
            LessonPart::Definition => &DEFINITION,
            LessonPart::Theorem => &THEOREM,
            LessonPart::Property => &PROPERTY,
            LessonPart::Example => &EXAMPLE,
            LessonPart::Remark => &REMARK,
            LessonPart::Attention => &ATTENTION,
        }
    }
}

impl Collapsible {
    /// Style entry shared by every instance of this collapsible.
    pub fn style(self) -> &'static CollapsibleStyle {
        match self {
            Collapsible::Solution => &SOLUTION,
            Collapsible::Methode => &METHODE,
            Collapsible::Hint => &HINT,
            Collapsible::Erreurs => &ERREURS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_is_indigo() {
        let style = LessonPart::Definition.style();
        assert_eq!(style.title, "Définition");
        assert!(style.container.contains("indigo"));
        assert!(style.heading.contains("indigo"));
    }

    #[test]
    fn every_entry_has_title_and_icon() {
        for part in LessonPart::ALL {
            assert!(!part.style().title.is_empty());
            assert!(!part.style().icon.is_empty());
        }
        for collapsible in Collapsible::ALL {
            assert!(!collapsible.style().title.is_empty());
            assert!(collapsible.style().collapsed);
        }
    }
}
