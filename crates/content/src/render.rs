//! Static HTML for content nodes.
//!
//! Interactive clients hydrate from the `data-props` attributes; the markup
//! itself is readable without scripts.

use crate::graph::GraphProps;
use crate::node::{ContentNode, YoutubeEmbed};
use crate::variations::{Direction, RowLayout, SignRowLayout, TableLayout, VarRowLayout, layout};
use coursmd_core::{MathRenderer, MathSpan, render_math};

/// Renders nodes back to a single HTML string.
pub fn render_html(nodes: &[ContentNode], math: &dyn MathRenderer) -> String {
    let mut html = String::new();
    for node in nodes {
        match node {
            ContentNode::Html(raw) => html.push_str(raw),
            ContentNode::Math(span) => html.push_str(&render_math(math, span)),
            ContentNode::Graph(props) => render_graph(props, math, &mut html),
            ContentNode::Variations(table) => render_table(&layout(table), math, &mut html),
            ContentNode::Youtube(embed) => render_youtube(embed, &mut html),
        }
    }
    html
}

fn push_props(value: &impl serde::Serialize, html: &mut String) {
    match serde_json::to_string(value) {
        Ok(json) => {
            html.push_str(" data-props=\"");
            html.push_str(&html_escape::encode_double_quoted_attribute(&json));
            html.push('"');
        }
        Err(err) => log::warn!("Cannot serialize component props: {}", err),
    }
}

fn render_graph(props: &GraphProps, math: &dyn MathRenderer, html: &mut String) {
    html.push_str("<figure class=\"graph\"");
    push_props(props, html);
    html.push('>');
    if !props.hide_formula && !props.function.is_empty() {
        html.push_str("<figcaption>");
        html.push_str(&render_math(
            math,
            &MathSpan::inline(format!("y = {}", props.function)),
        ));
        html.push_str("</figcaption>");
    }
    html.push_str("</figure>");
}

fn render_youtube(embed: &YoutubeEmbed, html: &mut String) {
    let id = html_escape::encode_double_quoted_attribute(&embed.id);
    let title = html_escape::encode_double_quoted_attribute(
        embed.title.as_deref().unwrap_or("YouTube video"),
    );
    html.push_str(&format!(
        "<div class=\"youtube\"><iframe src=\"https://www.youtube-nocookie.com/embed/{}\" title=\"{}\" loading=\"lazy\" allowfullscreen></iframe></div>",
        id, title
    ));
}

/// Inline math for a cell value, nothing for an empty one.
fn cell_math(value: &str, math: &dyn MathRenderer) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        render_math(math, &MathSpan::inline(value))
    }
}

fn render_table(table: &TableLayout, math: &dyn MathRenderer, html: &mut String) {
    html.push_str("<table class=\"variations\"><thead><tr><th>");
    html.push_str(&cell_math(&table.variable, math));
    html.push_str("</th>");
    for (i, boundary) in table.boundaries.iter().enumerate() {
        if i > 0 {
            html.push_str("<th class=\"interval\"></th>");
        }
        html.push_str("<th class=\"boundary\">");
        html.push_str(&cell_math(boundary, math));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        match row {
            RowLayout::Sign(sign) => render_sign_row(sign, math, html),
            RowLayout::Var(var) => render_var_row(var, math, html),
        }
    }
    html.push_str("</tbody></table>");
}

fn render_sign_row(row: &SignRowLayout, math: &dyn MathRenderer, html: &mut String) {
    html.push_str("<tr class=\"sign-row\"><th>");
    html.push_str(&cell_math(&row.label, math));
    html.push_str("</th>");
    for (i, mark) in row.marks.iter().enumerate() {
        if i > 0 {
            html.push_str("<td class=\"sign\">");
            if let Some(sign) = row.signs.get(i - 1) {
                html.push_str(&html_escape::encode_text(sign));
            }
            html.push_str("</td>");
        }
        match mark {
            Some(mark) => {
                html.push_str("<td class=\"boundary mark\">");
                html.push_str(mark.as_str());
                html.push_str("</td>");
            }
            None => html.push_str("<td class=\"boundary\"></td>"),
        }
    }
    html.push_str("</tr>");
}

fn render_var_row(row: &VarRowLayout, math: &dyn MathRenderer, html: &mut String) {
    html.push_str("<tr class=\"var-row\"><th>");
    html.push_str(&cell_math(&row.label, math));
    html.push_str("</th>");
    for (i, segment) in row.segments.iter().enumerate() {
        if i == 0 {
            push_var_cell(&[segment.start.as_str()], math, html);
        }
        let (class, arrow) = match segment.direction {
            Direction::Up => ("arrow arrow-up", "↗"),
            Direction::Down => ("arrow arrow-down", "↘"),
        };
        html.push_str(&format!("<td class=\"{}\">{}</td>", class, arrow));

        match row.segments.get(i + 1) {
            None => push_var_cell(&[segment.end.as_str()], math, html),
            Some(next) if segment.show_end => {
                push_var_cell(&[segment.end.as_str(), next.start.as_str()], math, html)
            }
            Some(next) => push_var_cell(&[next.start.as_str()], math, html),
        }
    }
    html.push_str("</tr>");
}

/// Boundary cell; two values mark a discontinuity.
fn push_var_cell(values: &[&str], math: &dyn MathRenderer, html: &mut String) {
    if values.len() > 1 {
        html.push_str("<td class=\"value discontinuity\">");
    } else {
        html.push_str("<td class=\"value\">");
    }
    let rendered: Vec<String> = values.iter().map(|v| cell_math(v, math)).collect();
    html.push_str(&rendered.join("<span class=\"separator\">||</span>"));
    html.push_str("</td>");
}
