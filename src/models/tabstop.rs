//! Tab stop records
//!
//! A [`TabStop`] is one resolved declaration: where it sits, how the text after
//! the tab aligns against it, and what fills the gap.

use crate::error::{Result, TabstopsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alignment of the text run that follows a tab
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Start,
    Right,
    End,
    Center,
    Decimal,
    /// A vertical rule drawn at the position; never selected as a stop
    Bar,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Start => "start",
            Alignment::Right => "right",
            Alignment::End => "end",
            Alignment::Center => "center",
            Alignment::Decimal => "decimal",
            Alignment::Bar => "bar",
        }
    }

    pub fn is_bar(&self) -> bool {
        matches!(self, Alignment::Bar)
    }
}

impl FromStr for Alignment {
    type Err = TabstopsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Alignment::Left),
            "start" => Ok(Alignment::Start),
            "right" => Ok(Alignment::Right),
            "end" => Ok(Alignment::End),
            "center" => Ok(Alignment::Center),
            "decimal" => Ok(Alignment::Decimal),
            "bar" => Ok(Alignment::Bar),
            other => Err(TabstopsError::InvalidSpecFormat(format!(
                "unknown alignment '{}'",
                other
            ))),
        }
    }
}

/// Line style of a border-mode leader
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleStyle {
    Dotted,
    Dashed,
    Solid,
}

impl RuleStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStyle::Dotted => "dotted",
            RuleStyle::Dashed => "dashed",
            RuleStyle::Solid => "solid",
        }
    }
}

impl From<RuleStyle> for Leader {
    fn from(rule: RuleStyle) -> Self {
        match rule {
            RuleStyle::Dotted => Leader::Dotted,
            RuleStyle::Dashed => Leader::Dashed,
            RuleStyle::Solid => Leader::Solid,
        }
    }
}

/// Fill drawn across a tab gap
///
/// Serialized as its keyword, or as a double-quoted string for literals.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum Leader {
    Dotted,
    Dashed,
    Solid,
    #[default]
    Blank,
    Literal(String),
}

const NO_BREAK_SPACE: char = '\u{a0}';

impl Leader {
    /// Parse one declaration token: a keyword, an OOXML leader name, or a
    /// quoted literal
    pub fn parse_token(token: &str) -> Result<Leader> {
        if let Some(leader) = Self::keyword(token) {
            return Ok(leader);
        }
        if let Some(literal) = unquote(token) {
            return Ok(Leader::Literal(literal.to_string()));
        }
        Err(TabstopsError::InvalidSpecFormat(format!(
            "unknown leader '{}'",
            token
        )))
    }

    /// Keyword form of a leader, if `token` is one
    pub fn keyword(token: &str) -> Option<Leader> {
        match token {
            "dotted" | "dot" => Some(Leader::Dotted),
            "dashed" | "hyphen" => Some(Leader::Dashed),
            "solid" | "underscore" | "heavy" => Some(Leader::Solid),
            "blank" | "none" => Some(Leader::Blank),
            "middleDot" => Some(Leader::Literal("\u{b7}".to_string())),
            _ => None,
        }
    }

    pub fn rule_style(&self) -> Option<RuleStyle> {
        match self {
            Leader::Dotted => Some(RuleStyle::Dotted),
            Leader::Dashed => Some(RuleStyle::Dashed),
            Leader::Solid => Some(RuleStyle::Solid),
            Leader::Blank | Leader::Literal(_) => None,
        }
    }

    /// One repetition of the text-mode fill
    pub fn fill_unit(&self) -> String {
        match self {
            Leader::Dotted => ".".to_string(),
            Leader::Dashed => "-".to_string(),
            Leader::Solid => "_".to_string(),
            Leader::Literal(text) if !text.is_empty() => text.replace(' ', "\u{a0}"),
            Leader::Blank | Leader::Literal(_) => NO_BREAK_SPACE.to_string(),
        }
    }
}

fn unquote(token: &str) -> Option<&str> {
    ['"', '\''].iter().find_map(|&quote| {
        token
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leader::Dotted => f.write_str("dotted"),
            Leader::Dashed => f.write_str("dashed"),
            Leader::Solid => f.write_str("solid"),
            Leader::Blank => f.write_str("blank"),
            Leader::Literal(text) => write!(f, "\"{}\"", text),
        }
    }
}

impl From<Leader> for String {
    fn from(leader: Leader) -> String {
        leader.to_string()
    }
}

impl TryFrom<String> for Leader {
    type Error = TabstopsError;

    fn try_from(value: String) -> Result<Self> {
        Leader::parse_token(value.trim())
    }
}

/// A resolved tab stop
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStop {
    /// Length expression as declared
    pub position: String,

    /// Container-relative position in pixels
    pub pixel_offset: f32,

    pub alignment: Alignment,

    pub leader: Leader,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_tokens() {
        assert_eq!(Leader::parse_token("dotted").unwrap(), Leader::Dotted);
        assert_eq!(Leader::parse_token("hyphen").unwrap(), Leader::Dashed);
        assert_eq!(
            Leader::parse_token("\"- \"").unwrap(),
            Leader::Literal("- ".to_string())
        );
        assert_eq!(
            Leader::parse_token("'*'").unwrap(),
            Leader::Literal("*".to_string())
        );
        assert!(Leader::parse_token("zigzag").is_err());
    }

    #[test]
    fn test_fill_units() {
        assert_eq!(Leader::Dotted.fill_unit(), ".");
        assert_eq!(Leader::Blank.fill_unit(), "\u{a0}");
        assert_eq!(Leader::Literal("- ".into()).fill_unit(), "-\u{a0}");
        assert_eq!(Leader::Literal(String::new()).fill_unit(), "\u{a0}");
    }

    #[test]
    fn test_leader_serializes_literals_quoted() {
        let json = serde_json::to_string(&Leader::Literal("ab".into())).unwrap();
        assert_eq!(json, r#""\"ab\"""#);
        let back: Leader = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Leader::Literal("ab".into()));
    }

    #[test]
    fn test_unknown_alignment_is_rejected() {
        let err = "justify".parse::<Alignment>().unwrap_err();
        assert!(matches!(err, TabstopsError::InvalidSpecFormat(_)));
    }
}
