//! Component tree produced by the scanner.

use crate::graph::GraphProps;
use crate::variations::VariationTable;
use coursmd_core::MathSpan;
use serde::Serialize;

/// A `<youtube>` embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YoutubeEmbed {
    /// Video id.
    pub id: String,
    /// Accessible title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One run of compiled content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "props", rename_all = "camelCase")]
pub enum ContentNode {
    /// Standard HTML, byte for byte.
    Html(String),
    /// `<math>` or `<math-block>`.
    Math(MathSpan),
    /// `<graph>`.
    Graph(GraphProps),
    /// `<variations>` with its rows.
    Variations(VariationTable),
    /// `<youtube>`.
    Youtube(YoutubeEmbed),
}

/// Tag names with a dispatch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomTag {
    /// `math`
    Math,
    /// `math-block`
    MathBlock,
    /// `graph`
    Graph,
    /// `variations`
    Variations,
    /// `youtube`
    Youtube,
    /// `row`, only meaningful inside `variations`.
    Row,
}

impl CustomTag {
    /// Resolves a lowercased tag name; `None` for standard HTML.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "math" => Some(CustomTag::Math),
            "math-block" => Some(CustomTag::MathBlock),
            "graph" => Some(CustomTag::Graph),
            "variations" => Some(CustomTag::Variations),
            "youtube" => Some(CustomTag::Youtube),
            "row" => Some(CustomTag::Row),
            _ => None,
        }
    }

    /// Tag name.
    pub fn name(self) -> &'static str {
        match self {
            CustomTag::Math => "math",
            CustomTag::MathBlock => "math-block",
            CustomTag::Graph => "graph",
            CustomTag::Variations => "variations",
            CustomTag::Youtube => "youtube",
            CustomTag::Row => "row",
        }
    }
}
