//! Checks over the unparsed YAML text.

use once_cell::sync::Lazy;
use regex::Regex;

static DOUBLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid quoted-string regex"));

static LATEX_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(frac|sqrt|int|sum|lim|infty|left|right|mathbb|text|times|leq|geq|to|cdot)\b",
    )
    .expect("valid latex command regex")
});

/// A LaTeX command inside a double-quoted scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedLatex {
    /// 1-based line number.
    pub line: usize,
    /// First command found on the line, with its backslash.
    pub command: String,
}

/// Finds lines where a double-quoted string holds a LaTeX command. YAML
/// reads `\f`, `\t`, `\r`... inside double quotes as escapes, so such
/// strings are silently corrupted. One hit per line.
pub fn find_quoted_latex(source: &str) -> Vec<QuotedLatex> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with('#'))
        .filter_map(|(index, line)| {
            DOUBLE_QUOTED.captures_iter(line).find_map(|caps| {
                LATEX_COMMAND.captures(&caps[1]).map(|cmd| QuotedLatex {
                    line: index + 1,
                    command: format!("\\{}", &cmd[1]),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_quoted_latex_is_found() {
        let source = "id: a\nstatement: \"Calculer $\\frac{1}{2}$\"\nsolution: 'ok $\\frac{1}{2}$'\n";
        assert_eq!(
            find_quoted_latex(source),
            vec![QuotedLatex {
                line: 2,
                command: "\\frac".into(),
            }]
        );
    }

    #[test]
    fn escaped_backslashes_still_count() {
        let hits = find_quoted_latex("hint: \"$\\\\sqrt{2}$\"");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].command, "\\sqrt");
    }

    #[test]
    fn prefixes_of_longer_commands_do_not_match() {
        assert!(find_quoted_latex("a: \"$\\top$ et $\\intercal$\"").is_empty());
        assert_eq!(find_quoted_latex("a: \"$x \\to 0$\"").len(), 1);
    }

    #[test]
    fn block_scalars_and_comments_are_ignored() {
        let source = "content: |\n  $\\frac{1}{2}$\n# \"\\frac\" in a comment\n";
        assert!(find_quoted_latex(source).is_empty());
    }
}
