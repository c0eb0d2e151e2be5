//! `<graph>` props.

use crate::attrs::parse_list;
use coursmd_core::Attributes;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// X range used when `range` is missing or malformed.
pub const DEFAULT_RANGE: (f64, f64) = (-5.0, 5.0);

static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\(\s*([^,()]+?)\s*,\s*([^,()]+?)\s*(?:,\s*(?:"([^"]*)"|'([^']*)'|([^,()]*?))\s*)?\)"#)
        .expect("valid point regex")
});

/// Malformed graph attribute.
#[derive(Debug, Error, PartialEq)]
pub enum PropError {
    /// Not a `[min,max]` pair of numbers.
    #[error("invalid range `{0}`")]
    Range(String),
    /// `min` is not below `max`.
    #[error("empty range `{0}`")]
    EmptyRange(String),
    /// A coordinate is not a number.
    #[error("invalid point `{0}`")]
    Point(String),
}

/// Annotated point drawn on the plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPoint {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
    /// Optional annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Input contract of the plotting component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphProps {
    /// Expression in `x`, e.g. `x^2 - 1`.
    pub function: String,
    /// Plotted x interval.
    pub range: (f64, f64),
    /// Fixed y interval; derived from the samples when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<(f64, f64)>,
    /// Annotated points.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<GraphPoint>,
    /// Hide the `y = ...` caption.
    pub hide_formula: bool,
}

impl GraphProps {
    /// Reads props from tag attributes. Malformed values are logged and
    /// replaced by defaults, never rejected.
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let range = match attrs.get("range") {
            Some(value) => parse_range(value).unwrap_or_else(|err| {
                log::warn!("graph: {}, using [-5,5]", err);
                DEFAULT_RANGE
            }),
            None => DEFAULT_RANGE,
        };

        let y_range = attrs.get("y-range").and_then(|value| {
            parse_range(value)
                .inspect_err(|err| log::warn!("graph: {}, y range ignored", err))
                .ok()
        });

        let points = attrs
            .get("points")
            .map(|value| {
                parse_points(value).unwrap_or_else(|err| {
                    log::warn!("graph: {}, points ignored", err);
                    Vec::new()
                })
            })
            .unwrap_or_default();

        let hide_formula = attrs
            .get("hide-formula")
            .is_some_and(|value| !value.eq_ignore_ascii_case("false"));

        Self {
            function: attrs.get("function").unwrap_or_default().trim().to_string(),
            range,
            y_range,
            points,
            hide_formula,
        }
    }
}

/// Parses `[min,max]`.
pub fn parse_range(value: &str) -> Result<(f64, f64), PropError> {
    let items = parse_list(value);
    let [min, max] = items.as_slice() else {
        return Err(PropError::Range(value.to_string()));
    };
    let min = parse_number(min).ok_or_else(|| PropError::Range(value.to_string()))?;
    let max = parse_number(max).ok_or_else(|| PropError::Range(value.to_string()))?;
    if min >= max {
        return Err(PropError::EmptyRange(value.to_string()));
    }
    Ok((min, max))
}

/// Parses `[(x,y),(x,y,"label"),...]`.
pub fn parse_points(value: &str) -> Result<Vec<GraphPoint>, PropError> {
    POINT_RE
        .captures_iter(value)
        .map(|caps| {
            let raw = caps.get(0).map_or("", |m| m.as_str());
            let x = parse_number(&caps[1]).ok_or_else(|| PropError::Point(raw.to_string()))?;
            let y = parse_number(&caps[2]).ok_or_else(|| PropError::Point(raw.to_string()))?;
            let label = caps
                .get(3)
                .or_else(|| caps.get(4))
                .or_else(|| caps.get(5))
                .map(|m| m.as_str().trim().to_string())
                .filter(|label| !label.is_empty());
            Ok(GraphPoint { x, y, label })
        })
        .collect()
}

/// Accepts plain decimals plus `pi` multiples (`pi`, `-2pi`, `pi/2`).
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(value) = text.parse::<f64>() {
        return value.is_finite().then_some(value);
    }

    let (numerator, denominator) = match text.split_once('/') {
        Some((num, den)) => (num.trim(), den.trim().parse::<f64>().ok()?),
        None => (text, 1.0),
    };
    let coefficient = numerator
        .strip_suffix("pi")
        .or_else(|| numerator.strip_suffix('π'))?
        .trim();
    let coefficient = match coefficient {
        "" | "+" => 1.0,
        "-" => -1.0,
        other => other.trim_end_matches('*').parse::<f64>().ok()?,
    };
    let value = coefficient * std::f64::consts::PI / denominator;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::tag_attributes;

    #[test]
    fn full_props() {
        let attrs = tag_attributes(
            r#"function="x^2" range="[-3,3]" y-range="[0, 9]" points="[(0,0),(1,1,'A')]" hide-formula"#,
        );
        let props = GraphProps::from_attributes(&attrs);
        assert_eq!(props.function, "x^2");
        assert_eq!(props.range, (-3.0, 3.0));
        assert_eq!(props.y_range, Some((0.0, 9.0)));
        assert_eq!(props.points.len(), 2);
        assert_eq!(props.points[1].label.as_deref(), Some("A"));
        assert!(props.hide_formula);
    }

    #[test]
    fn bad_range_falls_back_to_default() {
        let attrs = tag_attributes(r#"function="x" range="[a,b]""#);
        assert_eq!(GraphProps::from_attributes(&attrs).range, DEFAULT_RANGE);

        let attrs = tag_attributes(r#"function="x" range="[3,-3]""#);
        assert_eq!(GraphProps::from_attributes(&attrs).range, DEFAULT_RANGE);
    }

    #[test]
    fn missing_range_is_default() {
        let props = GraphProps::from_attributes(&tag_attributes(r#"function="sin(x)""#));
        assert_eq!(props.range, DEFAULT_RANGE);
        assert!(props.y_range.is_none());
        assert!(!props.hide_formula);
    }

    #[test]
    fn hide_formula_false_is_visible() {
        let props = GraphProps::from_attributes(&tag_attributes(r#"hide-formula="false""#));
        assert!(!props.hide_formula);
    }

    #[test]
    fn pi_multiples() {
        let (min, max) = parse_range("[-2pi, pi/2]").unwrap();
        assert!((min + 2.0 * std::f64::consts::PI).abs() < 1e-12);
        assert!((max - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn bad_point_is_an_error() {
        assert_eq!(
            parse_points("[(x,1)]"),
            Err(PropError::Point("(x,1)".to_string()))
        );
    }
}
