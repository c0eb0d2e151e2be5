//! Sign and variation tables.
//!
//! A table is authored as boundary labels plus compact rows:
//!
//! ```text
//! <variations var="x" intervals="[-\infty, 0, +\infty]">
//!   <row label="f'(x)" kind="sign" values="[-, 0, +]"></row>
//!   <row label="f(x)" kind="var" values="[+\infty, 0, +\infty]"></row>
//! </variations>
//! ```
//!
//! [`layout`] turns that into one cell per boundary and per interval. Rows are
//! processed in document order because a `var` row takes its arrow
//! directions from the latest `sign` row above it.

use crate::attrs::parse_list;
use coursmd_core::Attributes;
use serde::Serialize;

/// Kind of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// Signs per interval, optional `0` / `||` at interior boundaries.
    Sign,
    /// Values at interval ends, arrows in between.
    Var,
}

/// One authored `<row>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Row header, TeX.
    pub label: String,
    /// Row kind.
    pub kind: RowKind,
    /// Flat value list.
    pub values: Vec<String>,
}

impl TableRow {
    /// Reads a row from `<row>` attributes. An unknown `kind` is read as a
    /// sign row.
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let kind = match attrs.get("kind").map(str::trim) {
            Some("var") => RowKind::Var,
            Some("sign") | None => RowKind::Sign,
            Some(other) => {
                log::warn!("variations: unknown row kind `{}` read as sign", other);
                RowKind::Sign
            }
        };
        Self {
            label: attrs.get("label").unwrap_or_default().to_string(),
            kind,
            values: attrs.get("values").map(parse_list).unwrap_or_default(),
        }
    }
}

/// A `<variations>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariationTable {
    /// Variable name shown in the header cell.
    pub variable: String,
    /// Boundary labels; one more than the number of intervals.
    pub boundaries: Vec<String>,
    /// Rows in document order.
    pub rows: Vec<TableRow>,
}

impl VariationTable {
    /// Builds a table from the `<variations>` attributes and its rows.
    pub fn from_attributes(attrs: &Attributes, rows: Vec<TableRow>) -> Self {
        Self {
            variable: attrs.get("var").unwrap_or("x").to_string(),
            boundaries: attrs.get("intervals").map(parse_list).unwrap_or_default(),
            rows,
        }
    }

    /// Number of intervals (columns between boundaries).
    pub fn interval_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }
}

/// Annotation at an interior boundary of a sign row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoundaryMark {
    /// `0`
    Zero,
    /// `||`, undefined at that boundary.
    Undefined,
}

impl BoundaryMark {
    fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "0" => Some(BoundaryMark::Zero),
            "||" => Some(BoundaryMark::Undefined),
            _ => None,
        }
    }

    /// Source token.
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryMark::Zero => "0",
            BoundaryMark::Undefined => "||",
        }
    }
}

/// Arrow drawn over an interval of a var row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Increasing.
    Up,
    /// Decreasing.
    Down,
}

/// Laid-out sign row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignRowLayout {
    /// Row header.
    pub label: String,
    /// One sign per interval; empty when the input ran short.
    pub signs: Vec<String>,
    /// One slot per boundary. The first and last are always `None`.
    pub marks: Vec<Option<BoundaryMark>>,
}

/// One interval of a var row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarSegment {
    /// Value at the left end.
    pub start: String,
    /// Value at the right end.
    pub end: String,
    /// Arrow direction.
    pub direction: Direction,
    /// Whether `end` is drawn: last interval, or the next one restarts from
    /// another value.
    pub show_end: bool,
}

/// Laid-out var row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarRowLayout {
    /// Row header.
    pub label: String,
    /// One segment per interval.
    pub segments: Vec<VarSegment>,
}

/// Laid-out row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowLayout {
    /// Sign row.
    Sign(SignRowLayout),
    /// Var row.
    Var(VarRowLayout),
}

/// Output of [`layout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLayout {
    /// Variable name.
    pub variable: String,
    /// Boundary labels.
    pub boundaries: Vec<String>,
    /// Rows in input order.
    pub rows: Vec<RowLayout>,
}

/// Lays out every row of `table`.
pub fn layout(table: &VariationTable) -> TableLayout {
    let intervals = table.interval_count();
    if intervals == 0 {
        log::warn!("variations: fewer than two boundaries, table is empty");
    }

    let mut last_signs: Option<Vec<String>> = None;
    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        match row.kind {
            RowKind::Sign => {
                let laid = layout_sign_row(&row.label, &row.values, intervals);
                last_signs = Some(laid.signs.clone());
                rows.push(RowLayout::Sign(laid));
            }
            RowKind::Var => {
                rows.push(RowLayout::Var(layout_var_row(
                    &row.label,
                    &row.values,
                    intervals,
                    last_signs.as_deref(),
                )));
            }
        }
    }

    TableLayout {
        variable: table.variable.clone(),
        boundaries: table.boundaries.clone(),
        rows,
    }
}

/// Plain when there is exactly one value per interval, interleaved
/// otherwise.
pub fn layout_sign_row(label: &str, values: &[String], intervals: usize) -> SignRowLayout {
    let boundaries = intervals + 1;
    let mut marks = vec![None; boundaries];

    if values.len() == intervals {
        return SignRowLayout {
            label: label.to_string(),
            signs: values.iter().map(|v| v.trim().to_string()).collect(),
            marks,
        };
    }

    let mut signs = Vec::with_capacity(intervals);
    let mut next = values.iter().map(|v| v.trim()).peekable();
    for interval in 0..intervals {
        if interval > 0
            && let Some(mark) = next.peek().and_then(|token| BoundaryMark::from_token(token))
        {
            marks[interval] = Some(mark);
            next.next();
        }
        signs.push(next.next().unwrap_or_default().to_string());
    }

    let leftover = next.count();
    if leftover > 0 {
        log::debug!("variations: {} extra sign value(s) in `{}` ignored", leftover, label);
    }

    SignRowLayout {
        label: label.to_string(),
        signs,
        marks,
    }
}

/// Pairs endpoint values into segments.
///
/// Each interval starts where the previous one ended, unless more values
/// remain than intervals left to fill; the next value is then a fresh start
/// (a discontinuity). Arrows follow `signs`, ascending when there is none.
pub fn layout_var_row(
    label: &str,
    values: &[String],
    intervals: usize,
    signs: Option<&[String]>,
) -> VarRowLayout {
    let mut cursor = 0usize;
    let mut segments: Vec<VarSegment> = Vec::with_capacity(intervals);
    for interval in 0..intervals {
        let start = match segments.last() {
            None => take_value(values, &mut cursor),
            Some(previous) => {
                let remaining = values.len().saturating_sub(cursor);
                if remaining > intervals - interval {
                    take_value(values, &mut cursor)
                } else {
                    previous.end.clone()
                }
            }
        };
        let end = take_value(values, &mut cursor);
        let direction = match signs.and_then(|signs| signs.get(interval)) {
            Some(sign) if sign.trim() == "+" => Direction::Up,
            Some(_) => Direction::Down,
            None => Direction::Up,
        };
        segments.push(VarSegment {
            start,
            end,
            direction,
            show_end: false,
        });
    }

    for i in 0..segments.len() {
        segments[i].show_end = match segments.get(i + 1) {
            None => true,
            Some(next) => next.start != segments[i].end,
        };
    }

    VarRowLayout {
        label: label.to_string(),
        segments,
    }
}

fn take_value(values: &[String], cursor: &mut usize) -> String {
    let value = values.get(*cursor).map(|v| v.trim().to_string());
    *cursor += 1;
    value.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_sign_row_has_no_marks() {
        let row = layout_sign_row("f'(x)", &strings(&["-", "+", "-"]), 3);
        assert_eq!(row.signs, ["-", "+", "-"]);
        assert!(row.marks.iter().all(Option::is_none));
        assert_eq!(row.marks.len(), 4);
    }

    #[test]
    fn interleaved_sign_row() {
        let row = layout_sign_row("f'(x)", &strings(&["-", "0", "+", "||", "-"]), 3);
        assert_eq!(row.signs, ["-", "+", "-"]);
        assert_eq!(
            row.marks,
            [None, Some(BoundaryMark::Zero), Some(BoundaryMark::Undefined), None]
        );
    }

    #[test]
    fn interleaved_row_with_partial_marks() {
        let row = layout_sign_row("g(x)", &strings(&["+", "0", "-", "-"]), 3);
        assert_eq!(row.signs, ["+", "-", "-"]);
        assert_eq!(row.marks, [None, Some(BoundaryMark::Zero), None, None]);
    }

    #[test]
    fn short_sign_row_is_padded() {
        let row = layout_sign_row("h", &strings(&["+", "0"]), 3);
        assert_eq!(row.signs, ["+", "", ""]);
        assert_eq!(row.marks[1], Some(BoundaryMark::Zero));
    }

    #[test]
    fn extremities_never_carry_marks() {
        let row = layout_sign_row("h", &strings(&["0", "+", "0"]), 2);
        assert_eq!(row.marks[0], None);
        assert_eq!(row.marks[2], None);
        assert_eq!(row.signs, ["0", "+"]);
    }

    #[test]
    fn continuous_var_row_reuses_ends() {
        let signs = strings(&["-", "+"]);
        let row = layout_var_row("f", &strings(&["+\\infty", "-1", "+\\infty"]), 2, Some(&signs));
        assert_eq!(row.segments[0].start, "+\\infty");
        assert_eq!(row.segments[0].end, "-1");
        assert_eq!(row.segments[1].start, "-1");
        assert_eq!(row.segments[1].end, "+\\infty");
        assert_eq!(row.segments[0].direction, Direction::Down);
        assert_eq!(row.segments[1].direction, Direction::Up);
        assert!(!row.segments[0].show_end);
        assert!(row.segments[1].show_end);
    }

    #[test]
    fn discontinuous_var_row_takes_fresh_start() {
        let row = layout_var_row(
            "f",
            &strings(&["0", "-\\infty", "+\\infty", "0"]),
            2,
            None,
        );
        assert_eq!(row.segments[0].end, "-\\infty");
        assert_eq!(row.segments[1].start, "+\\infty");
        assert!(row.segments[0].show_end);
        assert!(row.segments.iter().all(|s| s.direction == Direction::Up));
    }

    #[test]
    fn var_row_uses_latest_sign_row() {
        let table = VariationTable {
            variable: "x".into(),
            boundaries: strings(&["a", "b", "c"]),
            rows: vec![
                TableRow {
                    label: "s1".into(),
                    kind: RowKind::Sign,
                    values: strings(&["+", "+"]),
                },
                TableRow {
                    label: "s2".into(),
                    kind: RowKind::Sign,
                    values: strings(&["-", "+"]),
                },
                TableRow {
                    label: "f".into(),
                    kind: RowKind::Var,
                    values: strings(&["1", "0", "1"]),
                },
            ],
        };
        let laid = layout(&table);
        let RowLayout::Var(var) = &laid.rows[2] else {
            panic!("expected var row");
        };
        assert_eq!(var.segments[0].direction, Direction::Down);
        assert_eq!(var.segments[1].direction, Direction::Up);
    }

    #[test]
    fn row_from_attributes() {
        let attrs = crate::attrs::tag_attributes(r#"label="f(x)" kind="var" values="[0, 1]""#);
        let row = TableRow::from_attributes(&attrs);
        assert_eq!(row.kind, RowKind::Var);
        assert_eq!(row.values, ["0", "1"]);
    }
}
