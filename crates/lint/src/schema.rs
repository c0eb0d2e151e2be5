//! Structural checks on a parsed atom.

use crate::finding::{Finding, Severity};
use crate::registry::IdRegistry;
use crate::tags::check_field;
use coursmd_core::AtomKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::path::Path;

/// Top-level fields holding compiled-HTML text.
pub const RICH_TEXT_FIELDS: [&str; 5] = ["statement", "solution", "content", "hint", "methode"];

static OPTION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z])\)\s+").expect("valid option prefix regex"));

struct Checker<'a> {
    file: &'a Path,
    findings: Vec<Finding>,
}

impl Checker<'_> {
    fn report(&mut self, severity: Severity, message: impl Into<String>) {
        self.findings.push(Finding::new(self.file, severity, message));
    }

    fn suggest(&mut self, severity: Severity, message: impl Into<String>, fix: impl Into<String>) {
        self.findings
            .push(Finding::new(self.file, severity, message).with_suggestion(fix));
    }

    fn check_tags(&mut self, field: &str, value: Option<&Value>) {
        for text in texts(value) {
            for problem in check_field(field, text) {
                let mut finding = Finding::new(self.file, problem.severity, problem.message);
                finding.suggestion = problem.suggestion;
                self.findings.push(finding);
            }
        }
    }
}

/// Runs the schema, uniqueness and tag-closure checks on one document.
pub fn check_document(file: &Path, document: &Value, registry: &mut IdRegistry) -> Vec<Finding> {
    let mut checker = Checker {
        file,
        findings: Vec::new(),
    };

    if !document.is_mapping() {
        checker.report(Severity::Critical, "document is not a YAML mapping");
        return checker.findings;
    }

    match scalar_text(document.get("id")) {
        Some(id) => {
            if let Err(first) = registry.claim(&id, file) {
                let first = first.display().to_string();
                checker.report(
                    Severity::Critical,
                    format!("duplicate id `{}`, first defined in {}", id, first),
                );
            }
        }
        None => checker.report(Severity::Critical, "missing required field `id`"),
    }

    if scalar_text(document.get("title")).is_none() {
        checker.report(Severity::Critical, "missing required field `title`");
    }

    let kind = match scalar_text(document.get("type")) {
        Some(name) => match name.parse::<AtomKind>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                checker.report(
                    Severity::Critical,
                    format!("invalid type `{}` (expected lesson, exercise or qcm)", name),
                );
                None
            }
        },
        None => {
            checker.report(Severity::Critical, "missing required field `type`");
            None
        }
    };

    match kind {
        Some(AtomKind::Exercise) => {
            for field in ["statement", "solution"] {
                if texts(document.get(field)).is_empty() {
                    checker.report(Severity::High, format!("exercise is missing `{}`", field));
                }
            }
        }
        Some(AtomKind::Lesson) => {
            if texts(document.get("content")).is_empty() {
                checker.report(Severity::High, "lesson is missing `content`");
            }
        }
        Some(AtomKind::Qcm) => check_questions(&mut checker, document.get("questions")),
        None => {}
    }

    for field in RICH_TEXT_FIELDS {
        checker.check_tags(field, document.get(field));
    }

    checker.findings
}

fn check_questions(checker: &mut Checker<'_>, questions: Option<&Value>) {
    let questions = match questions {
        Some(Value::Sequence(items)) if !items.is_empty() => items,
        Some(Value::Sequence(_)) => {
            checker.report(Severity::Critical, "qcm has an empty `questions` list");
            return;
        }
        Some(_) => {
            checker.report(Severity::Critical, "qcm `questions` must be a list");
            return;
        }
        None => {
            checker.report(Severity::Critical, "qcm is missing `questions`");
            return;
        }
    };

    for (index, question) in questions.iter().enumerate() {
        let label = format!("questions[{}]", index + 1);
        if !question.is_mapping() {
            checker.report(Severity::Critical, format!("{} is not a mapping", label));
            continue;
        }
        check_question(checker, &label, question);
    }
}

fn check_question(checker: &mut Checker<'_>, label: &str, question: &Value) {
    if scalar_text(question.get("question")).is_none() {
        checker.report(Severity::High, format!("{}: missing `question` text", label));
    }

    let option_count = match question.get("options") {
        Some(Value::Sequence(options)) => {
            if options.len() < 2 {
                checker.report(
                    Severity::High,
                    format!("{}: needs at least 2 options, found {}", label, options.len()),
                );
            }
            for (index, option) in options.iter().enumerate() {
                let field = format!("{}.options[{}]", label, index + 1);
                if let Some(text) = option.as_str() {
                    check_option_prefix(checker, &field, text);
                }
                checker.check_tags(&field, Some(option));
            }
            Some(options.len())
        }
        Some(_) => {
            checker.report(Severity::Critical, format!("{}: `options` must be a list", label));
            None
        }
        None => {
            checker.report(Severity::Critical, format!("{}: missing `options`", label));
            None
        }
    };

    check_correct_index(checker, label, question.get("correctIndex"), option_count);

    checker.check_tags(&format!("{}.question", label), question.get("question"));
    checker.check_tags(&format!("{}.explanation", label), question.get("explanation"));
}

fn check_option_prefix(checker: &mut Checker<'_>, field: &str, text: &str) {
    let Some(caps) = OPTION_PREFIX.captures(text) else {
        return;
    };
    let prefix = format!("{}) ", &caps[1]);
    let stripped = text[caps.get(0).map_or(0, |m| m.end())..].to_string();
    checker.suggest(
        Severity::Medium,
        format!(
            "{}: remove the `{}` prefix, option letters are added when rendering",
            field, prefix
        ),
        stripped,
    );
}

fn check_correct_index(
    checker: &mut Checker<'_>,
    label: &str,
    value: Option<&Value>,
    option_count: Option<usize>,
) {
    match value {
        None => checker.report(Severity::Critical, format!("{}: missing `correctIndex`", label)),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(index) => {
                if let Some(count) = option_count
                    && (index < 0 || index as usize >= count)
                {
                    checker.report(
                        Severity::High,
                        format!(
                            "{}: `correctIndex` {} is out of range for {} option(s)",
                            label, index, count
                        ),
                    );
                }
            }
            None => checker.report(
                Severity::Critical,
                format!("{}: `correctIndex` must be an integer, found {}", label, number),
            ),
        },
        Some(Value::String(text)) => match text.trim().parse::<i64>() {
            Ok(index) => checker.suggest(
                Severity::Critical,
                format!(
                    "{}: `correctIndex` is the string \"{}\", not an integer",
                    label, text
                ),
                format!("correctIndex: {}", index),
            ),
            Err(_) => checker.report(
                Severity::Critical,
                format!("{}: `correctIndex` must be an integer, found \"{}\"", label, text),
            ),
        },
        Some(_) => checker.report(
            Severity::Critical,
            format!("{}: `correctIndex` must be an integer", label),
        ),
    }
}

/// Non-empty string or number.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Strings of a field that is a string or a list of strings.
fn texts(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => vec![text.as_str()],
        Some(Value::Sequence(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(source: &str) -> Vec<Finding> {
        let document: Value = serde_yaml::from_str(source).expect("yaml");
        check_document(Path::new("atom.yaml"), &document, &mut IdRegistry::new())
    }

    const QCM_HEADER: &str = "id: capitales\ntype: qcm\ntitle: Capitales\nquestions:\n";

    #[test]
    fn valid_exercise_has_no_findings() {
        let findings = check(
            "id: ex-1\ntype: exercise\ntitle: Dérivée\nstatement: Dériver <math>x^2</math>.\nsolution: <math>2x</math>\n",
        );
        assert!(findings.is_empty(), "{:?}", findings);
    }

    #[test]
    fn missing_required_fields_are_critical() {
        let findings = check("type: lesson\ncontent: x\n");
        let critical: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .map(|f| f.message.as_str())
            .collect();
        assert_eq!(
            critical,
            ["missing required field `id`", "missing required field `title`"]
        );
    }

    #[test]
    fn invalid_type_is_critical() {
        let findings = check("id: a\ntitle: A\ntype: quiz\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].message.contains("`quiz`"));
    }

    #[test]
    fn exercise_without_solution_is_high() {
        let findings = check("id: a\ntitle: A\ntype: exercise\nstatement: S\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert!(findings[0].message.contains("`solution`"));
    }

    #[test]
    fn quoted_correct_index_suggests_integer() {
        let findings = check(&format!(
            "{}  - question: Capitale de la France ?\n    options: [Paris, Lyon]\n    correctIndex: \"1\"\n",
            QCM_HEADER
        ));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].suggestion.as_deref(), Some("correctIndex: 1"));
    }

    #[test]
    fn lettered_option_is_medium() {
        let findings = check(&format!(
            "{}  - question: Capitale ?\n    options: [\"A) Paris\", Lyon]\n    correctIndex: 0\n",
            QCM_HEADER
        ));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert!(findings[0].message.contains("`A) `"));
        assert_eq!(findings[0].suggestion.as_deref(), Some("Paris"));
    }

    #[test]
    fn option_shape_checks() {
        let findings = check(&format!(
            "{}  - question: Q1\n    options: [Seule]\n    correctIndex: 3\n  - question: Q2\n    options: Paris\n    correctIndex: 0\n",
            QCM_HEADER
        ));
        let summary: Vec<_> = findings.iter().map(|f| f.severity).collect();
        assert_eq!(
            summary,
            [Severity::High, Severity::High, Severity::Critical]
        );
        assert!(findings[1].message.contains("out of range"));
    }

    #[test]
    fn missing_correct_index_is_critical() {
        let findings = check(&format!(
            "{}  - question: Q\n    options: [a, b]\n",
            QCM_HEADER
        ));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("missing `correctIndex`"));
    }

    #[test]
    fn empty_questions_list_is_critical() {
        let findings = check(&format!("{} []\n", QCM_HEADER.trim_end()));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn self_closing_graph_in_content() {
        let findings = check(
            "id: l\ntype: lesson\ntitle: L\ncontent: '<graph function=\"x^2\" range=\"[-3,3]\"></graph><graph function=\"x\" range=\"[-1,1]\"/>'\n",
        );
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.severity == Severity::Critical));
        assert!(findings[0].message.contains("self-closing"));
        assert!(findings[1].message.contains("opened 2 time(s) but closed 1"));
    }

    #[test]
    fn tags_in_options_are_checked() {
        let findings = check(&format!(
            "{}  - question: Q\n    options: ['<math>x', b]\n    correctIndex: 0\n",
            QCM_HEADER
        ));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("`questions[1].options[1]`"));
    }

    #[test]
    fn duplicate_ids_name_the_first_file() {
        let document: Value = serde_yaml::from_str("id: dup\ntype: lesson\ntitle: T\ncontent: c\n").unwrap();
        let mut registry = IdRegistry::new();
        assert!(check_document(Path::new("first.yaml"), &document, &mut registry).is_empty());
        let findings = check_document(Path::new("second.yaml"), &document, &mut registry);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].message.contains("first.yaml"));
        assert_eq!(findings[0].file, Path::new("second.yaml"));
    }
}
