//! Inline style properties the layout reads and writes
//!
//! Only the handful of properties tab layout touches are modelled. Everything
//! else about the rendered appearance belongs to the host.

use super::tabstop::RuleStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outer display type of an inline element
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Inline,
    InlineBlock,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DecorationLine {
    None,
    Underline,
    Overline,
    LineThrough,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecorationStyle {
    Solid,
    Double,
    Dotted,
    Dashed,
    Wavy,
}

/// Computed `text-decoration` of a text run
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextDecoration {
    pub line: DecorationLine,
    pub style: DecorationStyle,
}

impl TextDecoration {
    pub fn underline(style: DecorationStyle) -> Self {
        Self {
            line: DecorationLine::Underline,
            style,
        }
    }

    pub fn is_underline(&self) -> bool {
        self.line == DecorationLine::Underline
    }

    /// Rule style an underline-as-leader maps onto
    pub fn rule_style(&self) -> RuleStyle {
        match self.style {
            DecorationStyle::Dotted => RuleStyle::Dotted,
            DecorationStyle::Dashed | DecorationStyle::Wavy => RuleStyle::Dashed,
            DecorationStyle::Solid | DecorationStyle::Double => RuleStyle::Solid,
        }
    }
}

/// Inline style of an element
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InlineStyle {
    pub display: Display,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,

    /// Left and right margin, in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_x: Option<f32>,

    /// 1px bottom border
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<RuleStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,

    /// Custom properties (`--name: value`) declared inline
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: BTreeMap<String, String>,
}

impl InlineStyle {
    /// Drop every property a layout pass may have written
    pub fn clear_tab_layout(&mut self) {
        self.display = Display::Inline;
        self.width = None;
        self.min_width = None;
        self.margin_x = None;
        self.border_bottom = None;
        self.text_align = None;
    }

    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }
}
